//! # Financial Statement Analyzer
//!
//! Turns a two-period financial statement spreadsheet into a growth and
//! composition analysis, with an optional narrative written by Gemini.
//!
//! ## Core Concepts
//!
//! - **Line items**: rows of `label, prior year, current year`, read from xlsx/xls/ods or CSV
//! - **Growth %**: period-over-period change of each line item
//! - **Composition %**: each line item's share of total assets, per period
//! - **Current ratio**: short-term assets over short-term liabilities
//! - **Anchor rows**: "total assets" and "total liabilities and equity" must both be present,
//!   otherwise the statement is rejected
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_statement_analyzer::*;
//! use std::path::Path;
//!
//! let analyzer = FinancialStatementAnalyzer::new(AnalyzerConfig::default())?;
//! let report = analyzer.analyze_file(Path::new("balance_sheet.xlsx"))?;
//!
//! println!("{}", render_report(&report, None));
//!
//! // With the `gemini` feature:
//! let analyst = llm::NarrativeAnalyst::new(llm::GeminiClient::from_env()?);
//! let narrative = analyst.analyze(&report).await?;
//! ```

pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod llm;
pub mod ratios;
pub mod render;
pub mod schema;
pub mod session;

pub use config::{AnalyzerConfig, LabelConfig, LabelPatterns, LoaderOptions, NarrativeOptions};
pub use dashboard::DashboardBuilder;
pub use engine::{growth_pct, process_statement, StatementCalculator, ZERO_DENOMINATOR};
pub use error::{ErrorClass, FinancialAnalysisError, Result};
pub use ingestion::{load_statement, load_statement_from_bytes, FileKind};
pub use ratios::{calculate_ratios, RatioReport};
pub use render::{format_thousands, markdown_table, render_report};
pub use schema::*;
pub use session::{AnalysisSession, InputKey};

use chrono::Utc;
use log::{debug, info};
use std::path::Path;

pub struct FinancialStatementAnalyzer {
    config: AnalyzerConfig,
    patterns: LabelPatterns,
}

impl FinancialStatementAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let patterns = config.compile()?;
        Ok(Self { config, patterns })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisReport> {
        let raw = load_statement(path, &self.config.loader)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("statement");
        self.analyze_raw(name, &raw)
    }

    pub fn analyze_bytes(
        &self,
        source_name: &str,
        bytes: &[u8],
        kind: FileKind,
    ) -> Result<AnalysisReport> {
        let raw = load_statement_from_bytes(bytes, kind, &self.config.loader)?;
        self.analyze_raw(source_name, &raw)
    }

    /// Runs calculation, ratios and dashboard over an already loaded statement.
    ///
    /// Fails only on structural problems; missing optional rows become warnings.
    pub fn analyze_raw(&self, source_name: &str, raw: &RawStatement) -> Result<AnalysisReport> {
        info!("Analyzing financial statement: {}", source_name);
        debug!("Statement contains {} raw rows", raw.rows.len());

        let table = process_statement(raw, &self.patterns)?;
        let RatioReport { ratios, mut warnings } = calculate_ratios(&table, &self.patterns);

        let (dashboard, dashboard_warnings) =
            DashboardBuilder::new(&self.config, &self.patterns).build(&table, &ratios);
        warnings.extend(dashboard_warnings);

        Ok(AnalysisReport {
            source_name: source_name.to_string(),
            generated_at: Utc::now(),
            table,
            ratios,
            dashboard,
            warnings,
        })
    }
}

/// JSON schema of [`AnalysisReport`], for consumers of the JSON output.
pub fn report_json_schema() -> serde_json::Result<serde_json::Value> {
    let schema = schemars::schema_for!(AnalysisReport);
    serde_json::to_value(&schema)
}
