use crate::config::DEFAULT_MODEL;
use crate::error::Result;
use crate::llm::client::GeminiClient;
use crate::llm::prompts::build_analysis_prompt;
use crate::schema::AnalysisReport;
use log::info;

/// Asks Gemini for a written analysis of a processed statement.
pub struct NarrativeAnalyst {
    client: GeminiClient,
    model: String,
}

impl NarrativeAnalyst {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The response text is returned verbatim.
    pub async fn analyze(&self, report: &AnalysisReport) -> Result<String> {
        let prompt = build_analysis_prompt(&report.table, &report.ratios);
        info!(
            "Requesting AI analysis of '{}' ({} line items)",
            report.source_name,
            report.table.len()
        );
        self.client.generate_text(&self.model, &prompt).await
    }
}
