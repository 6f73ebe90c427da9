use crate::error::{FinancialAnalysisError, Result};
use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Label patterns are case-insensitive regular expressions matched anywhere in the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LabelConfig {
    pub total_assets: String,
    pub total_capital: String,
    pub current_assets: String,
    pub current_liabilities: String,
    pub revenue: String,
    pub revenue_family: String,
    pub net_profit: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            total_assets: "TỔNG CỘNG TÀI SẢN|TỔNG TÀI SẢN|TOTAL ASSETS".to_string(),
            total_capital: r"TỔNG CỘNG NGUỒN VỐN|TỔNG NGUỒN VỐN|TOTAL LIABILITIES\s*(AND|&|\+)\s*(SHAREHOLDERS'?\s*|OWNERS'?\s*)?EQUITY".to_string(),
            // "Non-current ..." rows must not count as current.
            current_assets: r"TÀI SẢN NGẮN HẠN|SHORT-TERM ASSETS|(?:^|[^-\w])CURRENT ASSETS"
                .to_string(),
            current_liabilities:
                r"NỢ NGẮN HẠN|SHORT-TERM LIABILITIES|(?:^|[^-\w])CURRENT LIABILITIES".to_string(),
            revenue: "DOANH THU BÁN HÀNG|REVENUE FROM SALES|NET SALES|^\\s*REVENUE".to_string(),
            revenue_family: "DOANH THU|REVENUE|SALES".to_string(),
            net_profit: "LỢI NHUẬN SAU THUẾ|PROFIT AFTER TAX|NET (INCOME|PROFIT)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoaderOptions {
    /// Treat the first non-empty row as column headers and skip it.
    pub has_header: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { has_header: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NarrativeOptions {
    pub model: String,
}

impl Default for NarrativeOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub labels: LabelConfig,
    /// Exact labels whose current-year values make up the asset structure pie.
    pub pie_chart_items: Vec<String>,
    /// Exact labels compared side by side in the prior/current chart.
    pub comparison_items: Vec<String>,
    pub loader: LoaderOptions,
    pub narrative: NarrativeOptions,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            labels: LabelConfig::default(),
            pie_chart_items: [
                "Tiền và các khoản tương đương tiền",
                "Hàng tồn kho",
                "Các khoản phải thu ngắn hạn",
                "Tài sản cố định",
                "Cash and cash equivalents",
                "Inventories",
                "Short-term receivables",
                "Fixed assets",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            comparison_items: [
                "TỔNG CỘNG TÀI SẢN",
                "NỢ PHẢI TRẢ",
                "VỐN CHỦ SỞ HỮU",
                "Doanh thu bán hàng và cung cấp dịch vụ",
                "Lợi nhuận sau thuế thu nhập doanh nghiệp",
                "Total assets",
                "Liabilities",
                "Equity",
                "Revenue",
                "Profit after tax",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            loader: LoaderOptions::default(),
            narrative: NarrativeOptions::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn compile(&self) -> Result<LabelPatterns> {
        let labels = &self.labels;
        Ok(LabelPatterns {
            total_assets: compile_pattern("total_assets", &labels.total_assets)?,
            total_capital: compile_pattern("total_capital", &labels.total_capital)?,
            current_assets: compile_pattern("current_assets", &labels.current_assets)?,
            current_liabilities: compile_pattern(
                "current_liabilities",
                &labels.current_liabilities,
            )?,
            revenue: compile_pattern("revenue", &labels.revenue)?,
            revenue_family: compile_pattern("revenue_family", &labels.revenue_family)?,
            net_profit: compile_pattern("net_profit", &labels.net_profit)?,
        })
    }
}

/// Compiled form of [`LabelConfig`].
#[derive(Debug, Clone)]
pub struct LabelPatterns {
    pub total_assets: Regex,
    pub total_capital: Regex,
    pub current_assets: Regex,
    pub current_liabilities: Regex,
    pub revenue: Regex,
    pub revenue_family: Regex,
    pub net_profit: Regex,
}

impl Default for LabelPatterns {
    fn default() -> Self {
        // The built-in patterns are constants and always compile.
        AnalyzerConfig::default()
            .compile()
            .expect("default label patterns are valid")
    }
}

fn compile_pattern(field: &str, pattern: &str) -> Result<Regex> {
    if pattern.trim().is_empty() {
        return Err(FinancialAnalysisError::InvalidPattern {
            field: field.to_string(),
            details: "pattern is empty".to_string(),
        });
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| FinancialAnalysisError::InvalidPattern {
            field: field.to_string(),
            details: e.to_string(),
        })
}
