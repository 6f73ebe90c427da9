use crate::config::{AnalyzerConfig, LabelPatterns};
use crate::schema::{
    AnalysisWarning, Chart, ChartPoint, Dashboard, FinancialRatios, GroupedChartPoint, MetricTile,
    MetricUnit, StatementTable,
};
use log::warn;

pub struct DashboardBuilder<'a> {
    config: &'a AnalyzerConfig,
    patterns: &'a LabelPatterns,
}

impl<'a> DashboardBuilder<'a> {
    pub fn new(config: &'a AnalyzerConfig, patterns: &'a LabelPatterns) -> Self {
        Self { config, patterns }
    }

    pub fn build(
        &self,
        table: &StatementTable,
        ratios: &FinancialRatios,
    ) -> (Dashboard, Vec<AnalysisWarning>) {
        let mut warnings = Vec::new();

        let headline = match self.headline_tiles(table) {
            Ok(tiles) => tiles,
            Err(missing) => {
                warnings.push(AnalysisWarning::IncompleteDashboard { missing });
                Vec::new()
            }
        };

        let indicators = self.indicator_tiles(table, ratios);

        let mut charts = Vec::new();
        match self.asset_structure_chart(table) {
            Some(chart) => charts.push(chart),
            None => warnings.push(AnalysisWarning::NoPieChartData),
        }
        charts.push(growth_chart(table));
        charts.push(self.comparison_chart(table));

        for warning in &warnings {
            warn!("{}", warning);
        }

        (
            Dashboard {
                headline,
                indicators,
                charts,
            },
            warnings,
        )
    }

    /// Current-year total assets, revenue and profit after tax.
    ///
    /// All three or none: a partially filled headline row is dropped.
    fn headline_tiles(&self, table: &StatementTable) -> Result<Vec<MetricTile>, Vec<String>> {
        let wanted = [
            ("Total assets (current year)", "total assets", &self.patterns.total_assets),
            ("Revenue (current year)", "revenue", &self.patterns.revenue),
            (
                "Profit after tax (current year)",
                "profit after tax",
                &self.patterns.net_profit,
            ),
        ];

        let mut tiles = Vec::new();
        let mut missing = Vec::new();
        for (title, name, pattern) in wanted {
            match table.find(pattern) {
                Some(item) => tiles.push(MetricTile {
                    title: title.to_string(),
                    value: item.current_value,
                    unit: MetricUnit::Currency,
                }),
                None => missing.push(name.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(tiles)
        } else {
            Err(missing)
        }
    }

    fn indicator_tiles(&self, table: &StatementTable, ratios: &FinancialRatios) -> Vec<MetricTile> {
        let mut tiles = Vec::new();

        let revenue_growth: Vec<f64> = table
            .find_all(&self.patterns.revenue_family)
            .map(|item| item.growth_pct)
            .collect();
        if !revenue_growth.is_empty() {
            tiles.push(MetricTile {
                title: "Average revenue growth".to_string(),
                value: revenue_growth.iter().sum::<f64>() / revenue_growth.len() as f64,
                unit: MetricUnit::Percent,
            });
        }

        if let Some(item) = table.find(&self.patterns.current_assets) {
            tiles.push(MetricTile {
                title: "Short-term assets share".to_string(),
                value: item.current_share_pct,
                unit: MetricUnit::Percent,
            });
        }

        if let Some(ratio) = ratios.current_ratio_current.value() {
            tiles.push(MetricTile {
                title: "Current ratio".to_string(),
                value: ratio,
                unit: MetricUnit::Ratio,
            });
        }

        tiles
    }

    fn asset_structure_chart(&self, table: &StatementTable) -> Option<Chart> {
        let slices: Vec<ChartPoint> = table
            .select_exact(&self.config.pie_chart_items)
            .into_iter()
            .map(|item| ChartPoint {
                label: item.label.clone(),
                value: item.current_value,
            })
            .collect();

        if slices.is_empty() {
            return None;
        }

        Some(Chart::Pie {
            title: "Asset structure (current year)".to_string(),
            slices,
        })
    }

    fn comparison_chart(&self, table: &StatementTable) -> Chart {
        Chart::GroupedBar {
            title: "Prior year vs current year".to_string(),
            groups: table
                .select_exact(&self.config.comparison_items)
                .into_iter()
                .map(|item| GroupedChartPoint {
                    label: item.label.clone(),
                    prior: item.prior_value,
                    current: item.current_value,
                })
                .collect(),
        }
    }
}

fn growth_chart(table: &StatementTable) -> Chart {
    Chart::Bar {
        title: "Growth by line item (%)".to_string(),
        bars: table
            .items
            .iter()
            .filter(|item| item.growth_pct.abs() > 0.0)
            .map(|item| ChartPoint {
                label: item.label.clone(),
                value: item.growth_pct,
            })
            .collect(),
    }
}
