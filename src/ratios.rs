use crate::config::LabelPatterns;
use crate::schema::{AnalysisWarning, FinancialRatios, RatioValue, StatementTable};
use log::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct RatioReport {
    pub ratios: FinancialRatios,
    pub warnings: Vec<AnalysisWarning>,
}

/// Current ratio for both periods.
///
/// Missing short-term rows degrade to `N/A` with a warning instead of failing.
pub fn calculate_ratios(table: &StatementTable, patterns: &LabelPatterns) -> RatioReport {
    let current_assets = table.find(&patterns.current_assets);
    let current_liabilities = table.find(&patterns.current_liabilities);

    match (current_assets, current_liabilities) {
        (Some(assets), Some(liabilities)) => RatioReport {
            ratios: FinancialRatios {
                current_ratio_prior: RatioValue::Value(safe_ratio(
                    assets.prior_value,
                    liabilities.prior_value,
                )),
                current_ratio_current: RatioValue::Value(safe_ratio(
                    assets.current_value,
                    liabilities.current_value,
                )),
            },
            warnings: Vec::new(),
        },
        (assets, liabilities) => {
            let mut missing = Vec::new();
            if assets.is_none() {
                missing.push("short-term assets".to_string());
            }
            if liabilities.is_none() {
                missing.push("short-term liabilities".to_string());
            }
            let warning = AnalysisWarning::MissingLiquidityRows { missing };
            warn!("{}", warning);
            RatioReport {
                ratios: FinancialRatios::default(),
                warnings: vec![warning],
            }
        }
    }
}

/// Zero denominators yield zero.
fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
