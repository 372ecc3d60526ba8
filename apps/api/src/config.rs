use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default location of the TOML secrets file, overridable via `SECRETS_FILE`.
const DEFAULT_SECRETS_FILE: &str = ".secrets.toml";

/// Application configuration built once at startup and passed by reference
/// into the pipeline — no ambient globals downstream.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    /// Where the key came from. Logged by `main` once tracing is up —
    /// this module never logs, it runs before the subscriber exists.
    pub credential_source: CredentialSource,
    pub port: u16,
    pub rust_log: String,
}

/// Which configuration layer supplied the OpenAI credential.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    SecretsFile(String),
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::SecretsFile(path) => write!(f, "secrets file {path}"),
            CredentialSource::Environment => write!(f, "OPENAI_API_KEY environment variable"),
        }
    }
}

impl Config {
    /// Loads configuration. Fails when no OpenAI credential can be resolved
    /// from either the secrets file or the environment — the pipeline never
    /// runs without one.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let (openai_api_key, credential_source) = resolve_api_key()?;

        Ok(Config {
            openai_api_key,
            credential_source,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Layered credential resolution: secrets file first, then the
/// `OPENAI_API_KEY` environment variable.
fn resolve_api_key() -> Result<(String, CredentialSource)> {
    let secrets_path =
        std::env::var("SECRETS_FILE").unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string());

    if let Some(key) = api_key_from_secrets(Path::new(&secrets_path)) {
        return Ok((key, CredentialSource::SecretsFile(secrets_path)));
    }

    let key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .context(
            "OpenAI API key not found. Provide it in the secrets file ([openai] api_key) \
             or via the OPENAI_API_KEY environment variable",
        )?;
    Ok((key, CredentialSource::Environment))
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    openai: Option<OpenAiSecrets>,
}

#[derive(Debug, Deserialize)]
struct OpenAiSecrets {
    api_key: Option<String>,
}

/// Reads `[openai] api_key` from a TOML secrets file. Any problem — missing
/// file, malformed TOML, absent key — falls through to the next layer.
fn api_key_from_secrets(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let secrets: SecretsFile = toml::from_str(&text).ok()?;
    secrets.openai?.api_key.filter(|k| !k.is_empty())
}
