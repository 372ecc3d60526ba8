//! Record Loader — turns raw spreadsheet bytes into typed `ContactRecord`s.
//!
//! Accepts XLSX (the format the contact base is exported in) or CSV, sniffed
//! by magic bytes. All normalization happens here, once: downstream stages
//! never see a missing agent name or an invalid timestamp.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::debug;

use crate::models::lead::{ContactRecord, AGENT_NOT_INFORMED};

/// Header names exactly as they appear in the exported contact base.
pub const COL_CONTACT_DATE: &str = "Data do Atendimento";
pub const COL_LEAD_NAME: &str = "Nome do Atendido";
pub const COL_AGENT: &str = "Atendente";
pub const COL_NOTES: &str = "Registro";

const REQUIRED_COLUMNS: [&str; 4] = [COL_CONTACT_DATE, COL_LEAD_NAME, COL_AGENT, COL_NOTES];

/// Timestamp formats tried in order when the cell is textual.
const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("malformed spreadsheet: {0}")]
    Parse(String),
}

/// Parses a spreadsheet byte buffer into normalized contact records.
///
/// Rows whose timestamp cannot be coerced are dropped — a data-quality
/// filter, not an error. Structural problems (unreadable workbook, missing
/// columns) are errors.
pub fn load(bytes: &[u8]) -> Result<Vec<ContactRecord>, LoadError> {
    if bytes.starts_with(b"PK\x03\x04") {
        load_xlsx(bytes)
    } else {
        load_csv(bytes)
    }
}

fn load_xlsx(bytes: &[u8]) -> Result<Vec<ContactRecord>, LoadError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| LoadError::Parse(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Parse("workbook has no worksheets".to_string()))?
        .map_err(|e| LoadError::Parse(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LoadError::Parse("worksheet is empty".to_string()))?;
    let header: Vec<String> = header.iter().map(|c| cell_text(c).trim().to_string()).collect();
    let columns = resolve_columns(&header)?;

    let mut records = Vec::new();
    for row in rows {
        let timestamp = row.get(columns.contact_date).and_then(cell_timestamp);
        push_row(
            &mut records,
            timestamp,
            row.get(columns.lead_name).map(cell_text).unwrap_or_default(),
            row.get(columns.agent).map(cell_text).unwrap_or_default(),
            row.get(columns.notes).map(cell_text).unwrap_or_default(),
        );
    }

    Ok(records)
}

fn load_csv(bytes: &[u8]) -> Result<Vec<ContactRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = resolve_columns(&header)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| LoadError::Parse(e.to_string()))?;
        let field = |i: usize| row.get(i).unwrap_or("").to_string();
        let timestamp = parse_timestamp(&field(columns.contact_date));
        push_row(
            &mut records,
            timestamp,
            field(columns.lead_name),
            field(columns.agent),
            field(columns.notes),
        );
    }

    Ok(records)
}

/// Column indices resolved from a header row.
struct ColumnIndices {
    contact_date: usize,
    lead_name: usize,
    agent: usize,
    notes: usize,
}

fn resolve_columns(header: &[String]) -> Result<ColumnIndices, LoadError> {
    let find = |name: &str| header.iter().position(|h| h == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| find(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    Ok(ColumnIndices {
        contact_date: find(COL_CONTACT_DATE).unwrap(),
        lead_name: find(COL_LEAD_NAME).unwrap(),
        agent: find(COL_AGENT).unwrap(),
        notes: find(COL_NOTES).unwrap(),
    })
}

fn push_row(
    records: &mut Vec<ContactRecord>,
    timestamp: Option<NaiveDateTime>,
    lead_name: String,
    agent_name: String,
    notes: String,
) {
    let Some(contacted_at) = timestamp else {
        // Never retained with a placeholder timestamp
        debug!("Dropping row with unparseable contact date (lead: {lead_name:?})");
        return;
    };

    let agent_name = match agent_name.trim() {
        "" => AGENT_NOT_INFORMED.to_string(),
        trimmed => trimmed.to_string(),
    };

    records.push(ContactRecord {
        contacted_at,
        lead_name: lead_name.trim().to_string(),
        agent_name,
        notes,
    });
}

/// Best-effort coercion of a textual timestamp. Date-only values parse to
/// midnight.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
        if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn cell_timestamp(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) => parse_timestamp(s),
        Data::String(s) => parse_timestamp(s),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Data do Atendimento,Nome do Atendido,Atendente,Registro";

    fn csv_bytes(rows: &[&str]) -> Vec<u8> {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.into_bytes()
    }

    #[test]
    fn loads_well_formed_csv() {
        let bytes = csv_bytes(&[
            "2025-01-04 10:30:00,Josiele Pereira,Mariana Souza,Possível objeção de preço",
            "2025-01-02,Carlos Lima,Rafael,",
        ]);
        let records = load(&bytes).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lead_name, "Josiele Pereira");
        assert_eq!(records[0].agent_name, "Mariana Souza");
        assert_eq!(records[0].notes, "Possível objeção de preço");
        assert_eq!(records[1].contact_date(), "2025-01-02");
        assert_eq!(records[1].notes, "");
    }

    #[test]
    fn missing_columns_are_reported_by_name() {
        let bytes = b"Data do Atendimento,Nome do Atendido\n2025-01-04,Josiele".to_vec();
        let err = load(&bytes).unwrap_err();
        match err {
            LoadError::MissingColumns(cols) => {
                assert_eq!(cols, vec![COL_AGENT.to_string(), COL_NOTES.to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn rows_with_bad_timestamps_are_dropped() {
        let bytes = csv_bytes(&[
            "not-a-date,Ana Paula,Rafael,urgente",
            "2025-01-03,Bruno Dias,Rafael,ok",
            ",Caio Melo,Rafael,ok",
        ]);
        let records = load(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lead_name, "Bruno Dias");
    }

    #[test]
    fn blank_agent_gets_sentinel() {
        let bytes = csv_bytes(&["2025-01-03,Bruno Dias, ,ok"]);
        let records = load(&bytes).unwrap();
        assert_eq!(records[0].agent_name, AGENT_NOT_INFORMED);
    }

    #[test]
    fn brazilian_date_format_is_accepted() {
        let bytes = csv_bytes(&["04/01/2025 09:15:00,Ana Paula,Rafael,ok"]);
        let records = load(&bytes).unwrap();
        assert_eq!(records[0].contact_date(), "2025-01-04");
    }

    #[test]
    fn garbage_zip_is_a_parse_error() {
        // PK magic but not a real workbook
        let bytes = b"PK\x03\x04garbage".to_vec();
        assert!(matches!(load(&bytes), Err(LoadError::Parse(_))));
    }
}
