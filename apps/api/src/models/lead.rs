//! Typed rows for the contact spreadsheet and the filtered priority subset.
//!
//! Validation happens once at load time — downstream code never re-checks
//! presence or types of these fields.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sentinel used when the spreadsheet has no agent name for a row.
pub const AGENT_NOT_INFORMED: &str = "Não Informado";

/// One row of the contact base after load-time normalization.
///
/// Invariant: `contacted_at` is always a valid timestamp — rows whose
/// timestamp could not be parsed are dropped by the loader, never kept
/// with a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub contacted_at: NaiveDateTime,
    pub lead_name: String,
    pub agent_name: String,
    pub notes: String,
}

impl ContactRecord {
    /// First whitespace-delimited token of the agent name, or "N/A" when
    /// the field is blank. This is what the report payload and the
    /// fallback section display.
    pub fn agent_first_name(&self) -> &str {
        self.agent_name.split_whitespace().next().unwrap_or("N/A")
    }

    /// Contact date formatted as `YYYY-MM-DD` for prompts and fallbacks.
    pub fn contact_date(&self) -> String {
        self.contacted_at.format("%Y-%m-%d").to_string()
    }
}

/// A `ContactRecord` that satisfied at least one priority rule, tagged with
/// which rule(s) matched. Produced by the filter, consumed exactly once by
/// the report assembler, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityLead {
    #[serde(flatten)]
    pub record: ContactRecord,
    /// Notes contained one of the priority keywords.
    pub matched_keyword: bool,
    /// Last contact is at least two business days old.
    pub stale: bool,
}

/// One Markdown block of the final report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub lead_name: String,
    pub text: String,
    /// False when this is the local fallback emitted after a failed
    /// generation call.
    pub generated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(agent: &str) -> ContactRecord {
        ContactRecord {
            contacted_at: NaiveDate::from_ymd_opt(2025, 1, 4)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            lead_name: "Josiele Pereira".to_string(),
            agent_name: agent.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn agent_first_name_takes_first_token() {
        assert_eq!(record("Mariana Souza Lima").agent_first_name(), "Mariana");
    }

    #[test]
    fn agent_first_name_blank_is_na() {
        assert_eq!(record("").agent_first_name(), "N/A");
        assert_eq!(record("   ").agent_first_name(), "N/A");
    }

    #[test]
    fn contact_date_is_iso() {
        assert_eq!(record("Mariana").contact_date(), "2025-01-04");
    }
}
