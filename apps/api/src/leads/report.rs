//! Report Assembler — one generation call per priority lead, in order.
//!
//! Strictly sequential: no batching, no concurrency, no retries. A failed
//! call degrades that one lead to a deterministic fallback section and the
//! batch continues — a single lead can never abort the report.

use tracing::{info, warn};

use crate::leads::prompts::{AGENT_SYSTEM, FALLBACK_SECTION_TEMPLATE, LEAD_PAYLOAD_TEMPLATE};
use crate::llm_client::TextGenerator;
use crate::models::lead::{PriorityLead, ReportSection};

/// Runs the per-lead generation loop.
///
/// Output invariants: one section per input lead, in input order. Sections
/// from the collaborator are trusted verbatim — the expected Markdown
/// template is not validated, only logged when visibly off.
pub async fn assemble_report(
    leads: &[PriorityLead],
    generator: &dyn TextGenerator,
) -> Vec<ReportSection> {
    let total = leads.len();
    let mut sections = Vec::with_capacity(total);

    for (index, lead) in leads.iter().enumerate() {
        info!("Processing lead {} of {}", index + 1, total);

        let payload = build_lead_payload(lead);
        let section = match generator.generate(AGENT_SYSTEM, &payload).await {
            Ok(text) => {
                if !text.trim_start().starts_with("---") {
                    // Trust-verbatim contract: log, never rewrite.
                    warn!(
                        "Generated section for {:?} does not start with the expected delimiter",
                        lead.record.lead_name
                    );
                }
                ReportSection {
                    lead_name: lead.record.lead_name.clone(),
                    text,
                    generated: true,
                }
            }
            Err(e) => {
                warn!(
                    "Generation failed for {:?}: {e} — emitting fallback section",
                    lead.record.lead_name
                );
                ReportSection {
                    lead_name: lead.record.lead_name.clone(),
                    text: build_fallback_section(lead),
                    generated: false,
                }
            }
        };
        sections.push(section);
    }

    sections
}

/// Concatenates sections into the final report. Sections carry their own
/// `---` delimiters, so they are joined with nothing in between.
pub fn render_report(sections: &[ReportSection]) -> String {
    sections.iter().map(|s| s.text.as_str()).collect()
}

/// Builds the user message for one lead, mirroring the payload format the
/// agent prompt documents.
pub fn build_lead_payload(lead: &PriorityLead) -> String {
    LEAD_PAYLOAD_TEMPLATE
        .replace("{lead_name}", &lead.record.lead_name)
        .replace("{agent_first}", lead.record.agent_first_name())
        .replace("{contact_date}", &lead.record.contact_date())
        .replace("{notes}", &lead.record.notes)
}

fn build_fallback_section(lead: &PriorityLead) -> String {
    FALLBACK_SECTION_TEMPLATE
        .replace("{lead_name}", &lead.record.lead_name)
        .replace("{agent_first}", lead.record.agent_first_name())
        .replace("{contact_date}", &lead.record.contact_date())
}
