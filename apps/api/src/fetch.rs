//! Remote spreadsheet acquisition — the URL alternative to a direct upload.

use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Downloads the spreadsheet at `url`. A non-2xx response or transport
/// error halts the request before the pipeline runs.
pub async fn fetch_spreadsheet(client: &reqwest::Client, url: &str) -> Result<Bytes, AppError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to download file: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Validation(format!(
            "Failed to download file: server returned {status}"
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to download file: {e}")))?;

    info!("Fetched {} bytes from {url}", bytes.len());
    Ok(bytes)
}
