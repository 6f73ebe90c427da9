use crate::config::LabelPatterns;
use crate::error::{FinancialAnalysisError, Result};
use crate::schema::{LineItem, RawStatement, StatementTable};
use log::debug;

/// Stand-in denominator for zero values, so division never produces infinity.
pub const ZERO_DENOMINATOR: f64 = 1e-9;

pub fn process_statement(raw: &RawStatement, patterns: &LabelPatterns) -> Result<StatementTable> {
    StatementCalculator::new(patterns).process(raw)
}

pub struct StatementCalculator<'a> {
    patterns: &'a LabelPatterns,
}

impl<'a> StatementCalculator<'a> {
    pub fn new(patterns: &'a LabelPatterns) -> Self {
        Self { patterns }
    }

    pub fn process(&self, raw: &RawStatement) -> Result<StatementTable> {
        let mut items: Vec<LineItem> = raw
            .rows
            .iter()
            .map(|row| {
                let prior_value = row.prior.coerce();
                let current_value = row.current.coerce();
                LineItem {
                    label: row.label.clone(),
                    prior_value,
                    current_value,
                    growth_pct: growth_pct(prior_value, current_value),
                    prior_share_pct: 0.0,
                    current_share_pct: 0.0,
                }
            })
            .collect();

        let total_assets = items
            .iter()
            .find(|item| self.patterns.total_assets.is_match(&item.label));
        let total_capital = items
            .iter()
            .find(|item| self.patterns.total_capital.is_match(&item.label));

        let (total_assets, _total_capital) = match (total_assets, total_capital) {
            (Some(assets), Some(capital)) => (assets, capital),
            (assets, capital) => {
                let mut missing = Vec::new();
                if assets.is_none() {
                    missing.push("total assets".to_string());
                }
                if capital.is_none() {
                    missing.push("total liabilities and equity".to_string());
                }
                return Err(FinancialAnalysisError::MissingAnchorRows { missing });
            }
        };

        debug!(
            "Anchor row '{}': prior {} / current {}",
            total_assets.label, total_assets.prior_value, total_assets.current_value
        );

        // Shares are measured against total assets in both periods.
        let prior_total = non_zero(total_assets.prior_value);
        let current_total = non_zero(total_assets.current_value);

        for item in &mut items {
            item.prior_share_pct = 100.0 * item.prior_value / prior_total;
            item.current_share_pct = 100.0 * item.current_value / current_total;
        }

        Ok(StatementTable { items })
    }
}

/// Percentage change from `prior` to `current`.
///
/// A zero prior value is replaced by [`ZERO_DENOMINATOR`], so the result is a very
/// large finite number rather than infinity.
pub fn growth_pct(prior: f64, current: f64) -> f64 {
    (current - prior) / non_zero(prior) * 100.0
}

fn non_zero(value: f64) -> f64 {
    if value == 0.0 {
        ZERO_DENOMINATOR
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CellValue, RawLineItem};

    fn raw(rows: &[(&str, f64, f64)]) -> RawStatement {
        RawStatement {
            rows: rows
                .iter()
                .map(|(label, prior, current)| RawLineItem {
                    label: label.to_string(),
                    prior: CellValue::Number(*prior),
                    current: CellValue::Number(*current),
                })
                .collect(),
        }
    }

    #[test]
    fn test_growth_with_zero_prior_is_finite() {
        let growth = growth_pct(0.0, 5000.0);
        assert!(growth.is_finite());
        assert!(growth > 1e12);
        assert_eq!(growth_pct(0.0, 0.0), 0.0);
        assert!((growth_pct(200.0, 150.0) + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_composition_against_total_assets() {
        let statement = raw(&[
            ("Cash", 20.0, 30.0),
            ("Inventory", 80.0, 120.0),
            ("Total assets", 100.0, 150.0),
            ("Liabilities", 60.0, 90.0),
            ("Total liabilities and equity", 100.0, 150.0),
        ]);
        let table = process_statement(&statement, &LabelPatterns::default()).unwrap();

        assert_eq!(table.items[0].prior_share_pct, 20.0);
        assert_eq!(table.items[0].current_share_pct, 20.0);
        assert_eq!(table.items[2].prior_share_pct, 100.0);
        assert_eq!(table.items[3].current_share_pct, 60.0);
        assert!((table.items[1].growth_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_total_assets_aborts() {
        let statement = raw(&[("Cash", 1.0, 2.0), ("Total liabilities and equity", 1.0, 2.0)]);
        let err = process_statement(&statement, &LabelPatterns::default()).unwrap_err();

        match err {
            FinancialAnalysisError::MissingAnchorRows { missing } => {
                assert_eq!(missing, vec!["total assets".to_string()])
            }
            other => panic!("expected MissingAnchorRows, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_both_anchors_names_both() {
        let statement = raw(&[("Cash", 1.0, 2.0)]);
        let err = process_statement(&statement, &LabelPatterns::default()).unwrap_err();
        assert!(err.to_string().contains("total assets"));
        assert!(err.to_string().contains("total liabilities and equity"));
    }

    #[test]
    fn test_zero_total_assets_does_not_divide_by_zero() {
        let statement = raw(&[
            ("Cash", 5.0, 0.0),
            ("Total assets", 0.0, 0.0),
            ("Total liabilities & equity", 0.0, 0.0),
        ]);
        let table = process_statement(&statement, &LabelPatterns::default()).unwrap();

        assert!(table.items[0].prior_share_pct.is_finite());
        assert_eq!(table.items[0].current_share_pct, 0.0);
    }

    #[test]
    fn test_non_numeric_cells_become_zero() {
        let mut statement = raw(&[
            ("Total assets", 100.0, 100.0),
            ("Total liabilities and equity", 100.0, 100.0),
        ]);
        statement.rows.push(RawLineItem {
            label: "Goodwill".to_string(),
            prior: CellValue::Text("see note 4".to_string()),
            current: CellValue::Empty,
        });
        let table = process_statement(&statement, &LabelPatterns::default()).unwrap();

        let goodwill = &table.items[2];
        assert_eq!(goodwill.prior_value, 0.0);
        assert_eq!(goodwill.current_value, 0.0);
        assert_eq!(goodwill.growth_pct, 0.0);
    }
}
