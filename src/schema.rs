use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell as it came out of the spreadsheet, before numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "PascalCase")]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Coerce to a number. Anything that does not read as a number becomes zero.
    pub fn coerce(&self) -> f64 {
        match self {
            CellValue::Number(v) if !v.is_nan() => *v,
            CellValue::Number(_) => 0.0,
            CellValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(v) if !v.is_nan() => v,
                _ => 0.0,
            },
            CellValue::Empty => 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawLineItem {
    pub label: String,
    pub prior: CellValue,
    pub current: CellValue,
}

/// The loader's output: rows in file order, numeric columns untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawStatement {
    pub rows: Vec<RawLineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineItem {
    #[schemars(description = "Row label exactly as it appears in the file")]
    pub label: String,
    pub prior_value: f64,
    pub current_value: f64,
    #[schemars(description = "Period-over-period change in percent")]
    pub growth_pct: f64,
    #[schemars(description = "Share of total assets in the prior year, in percent")]
    pub prior_share_pct: f64,
    #[schemars(description = "Share of total assets in the current year, in percent")]
    pub current_share_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatementTable {
    pub items: Vec<LineItem>,
}

impl StatementTable {
    /// First row whose label matches. Later duplicates are ignored.
    pub fn find(&self, pattern: &regex::Regex) -> Option<&LineItem> {
        self.items.iter().find(|item| pattern.is_match(&item.label))
    }

    pub fn find_all<'a>(
        &'a self,
        pattern: &'a regex::Regex,
    ) -> impl Iterator<Item = &'a LineItem> + 'a {
        self.items.iter().filter(move |item| pattern.is_match(&item.label))
    }

    /// Rows whose trimmed label equals one of `names`, ignoring case.
    pub fn select_exact<'a>(&'a self, names: &[String]) -> Vec<&'a LineItem> {
        let wanted: Vec<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
        self.items
            .iter()
            .filter(|item| wanted.contains(&item.label.trim().to_lowercase()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", content = "value", rename_all = "PascalCase")]
pub enum RatioValue {
    Value(f64),
    NotAvailable,
}

impl RatioValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            RatioValue::Value(v) => Some(*v),
            RatioValue::NotAvailable => None,
        }
    }
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioValue::Value(v) => write!(f, "{:.2}", v),
            RatioValue::NotAvailable => write!(f, "N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialRatios {
    pub current_ratio_prior: RatioValue,
    pub current_ratio_current: RatioValue,
}

impl Default for FinancialRatios {
    fn default() -> Self {
        Self {
            current_ratio_prior: RatioValue::NotAvailable,
            current_ratio_current: RatioValue::NotAvailable,
        }
    }
}

/// Degradations that do not stop the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum AnalysisWarning {
    MissingLiquidityRows { missing: Vec<String> },
    IncompleteDashboard { missing: Vec<String> },
    NoPieChartData,
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::MissingLiquidityRows { missing } => write!(
                f,
                "Missing {} rows; liquidity ratios cannot be calculated",
                missing.join(" and ")
            ),
            AnalysisWarning::IncompleteDashboard { missing } => write!(
                f,
                "Dashboard is incomplete; missing rows: {}",
                missing.join(", ")
            ),
            AnalysisWarning::NoPieChartData => {
                write!(f, "Not enough detail rows to draw the asset structure chart")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricTile {
    pub title: String,
    pub value: f64,
    pub unit: MetricUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum MetricUnit {
    Currency,
    Percent,
    Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GroupedChartPoint {
    pub label: String,
    pub prior: f64,
    pub current: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "chart", rename_all = "PascalCase")]
pub enum Chart {
    Pie {
        title: String,
        slices: Vec<ChartPoint>,
    },
    Bar {
        title: String,
        bars: Vec<ChartPoint>,
    },
    GroupedBar {
        title: String,
        groups: Vec<GroupedChartPoint>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Dashboard {
    pub headline: Vec<MetricTile>,
    pub indicators: Vec<MetricTile>,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    pub source_name: String,
    pub generated_at: DateTime<Utc>,
    pub table: StatementTable,
    pub ratios: FinancialRatios,
    pub dashboard: Dashboard,
    pub warnings: Vec<AnalysisWarning>,
}
