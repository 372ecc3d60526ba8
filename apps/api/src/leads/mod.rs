//! The lead-analysis pipeline: loader → filter → report assembler.

pub mod filter;
pub mod handlers;
pub mod loader;
pub mod prompts;
pub mod report;

#[cfg(test)]
mod pipeline_tests {
    //! End-to-end run over the three stages with a scripted generator.

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::leads::filter::filter_priority;
    use crate::leads::loader::load;
    use crate::leads::report::{assemble_report, render_report};
    use crate::llm_client::{LlmError, TextGenerator};

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, _system: &str, user: &str) -> Result<String, LlmError> {
            // Echo the lead name back so ordering is observable in the report
            let name = user
                .lines()
                .find_map(|l| l.strip_prefix("- Nome Lead: "))
                .unwrap_or("?");
            Ok(format!("---\nsection for {name}\n---"))
        }
    }

    fn monday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn three_row_scenario_selects_two_leads_in_order() {
        // Row 1: keyword match. Row 2: five business days stale.
        // Row 3: recent and neutral — excluded.
        let csv = "Data do Atendimento,Nome do Atendido,Atendente,Registro\n\
                   2025-01-06,Ana Paula,Mariana,Possível objeção de preço\n\
                   2024-12-30,Bruno Dias,Rafael,sem novidades\n\
                   2025-01-03,Caio Melo,Paula,tudo certo\n";

        let records = load(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        let leads = filter_priority(&records, monday());
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].record.lead_name, "Ana Paula");
        assert!(leads[0].matched_keyword && !leads[0].stale);
        assert_eq!(leads[1].record.lead_name, "Bruno Dias");
        assert!(leads[1].stale && !leads[1].matched_keyword);

        let sections = assemble_report(&leads, &EchoGenerator).await;
        let report = render_report(&sections);
        assert_eq!(
            report,
            "---\nsection for Ana Paula\n------\nsection for Bruno Dias\n---"
        );
    }
}
