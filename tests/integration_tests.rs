use calamine::{Data, Range};
use financial_statement_analyzer::llm::build_analysis_prompt;
use financial_statement_analyzer::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const VN_STATEMENT: &str = "\
Chỉ tiêu,Năm trước,Năm sau
A. TÀI SẢN NGẮN HẠN,5000000,6500000
Tiền và các khoản tương đương tiền,1200000,1500000
Các khoản phải thu ngắn hạn,1800000,2100000
Hàng tồn kho,2000000,2900000
B. TÀI SẢN DÀI HẠN,5000000,5500000
Tài sản cố định,5000000,5500000
TỔNG CỘNG TÀI SẢN,10000000,12000000
C. NỢ PHẢI TRẢ,4000000,4500000
I. Nợ ngắn hạn,2500000,3250000
D. VỐN CHỦ SỞ HỮU,6000000,7500000
TỔNG CỘNG NGUỒN VỐN,10000000,12000000
Doanh thu bán hàng và cung cấp dịch vụ,8000000,9600000
Doanh thu hoạt động tài chính,0,5000
Lợi nhuận sau thuế thu nhập doanh nghiệp,900000,1200000
";

const EN_STATEMENT: &str = "\
Item,FY2022,FY2023
Cash and cash equivalents,150000,185000
Inventories,550000,680000
Equipment,450000,450000
Total assets,1150000,1315000
Accounts payable,220000,285000
Bank loan,450000,450000
Share capital,480000,580000
Total liabilities and equity,1150000,1315000
";

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn analyzer() -> FinancialStatementAnalyzer {
    FinancialStatementAnalyzer::new(AnalyzerConfig::default()).unwrap()
}

fn find<'a>(report: &'a AnalysisReport, label: &str) -> &'a LineItem {
    report
        .table
        .items
        .iter()
        .find(|item| item.label == label)
        .unwrap_or_else(|| panic!("row '{}' missing", label))
}

#[test]
fn test_vietnamese_statement_from_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "bctc.csv", VN_STATEMENT);

    let report = analyzer().analyze_file(&path).unwrap();

    assert_eq!(report.source_name, "bctc.csv");
    assert_eq!(report.table.len(), 14);
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);

    let inventory = find(&report, "Hàng tồn kho");
    assert!((inventory.growth_pct - 45.0).abs() < 1e-9);
    assert!((inventory.prior_share_pct - 20.0).abs() < 1e-9);
    assert!((inventory.current_share_pct - 2900000.0 / 120000.0).abs() < 1e-9);

    assert_eq!(report.ratios.current_ratio_prior, RatioValue::Value(2.0));
    assert_eq!(report.ratios.current_ratio_current, RatioValue::Value(2.0));

    let headline: Vec<f64> = report.dashboard.headline.iter().map(|t| t.value).collect();
    assert_eq!(headline, vec![12000000.0, 9600000.0, 1200000.0]);

    match &report.dashboard.charts[0] {
        Chart::Pie { slices, .. } => assert_eq!(slices.len(), 4),
        other => panic!("expected pie chart, got {:?}", other),
    }
    match &report.dashboard.charts[2] {
        Chart::GroupedBar { groups, .. } => assert_eq!(groups.len(), 3),
        other => panic!("expected grouped bar chart, got {:?}", other),
    }
}

#[test]
fn test_leaf_asset_shares_sum_to_one_hundred_percent() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "bs.csv", EN_STATEMENT);
    let report = analyzer().analyze_file(&path).unwrap();

    let leaves = ["Cash and cash equivalents", "Inventories", "Equipment"];
    let prior: f64 = leaves.iter().map(|l| find(&report, l).prior_share_pct).sum();
    let current: f64 = leaves
        .iter()
        .map(|l| find(&report, l).current_share_pct)
        .sum();

    assert!((prior - 100.0).abs() < 1e-9, "prior shares sum to {}", prior);
    assert!((current - 100.0).abs() < 1e-9, "current shares sum to {}", current);

    let total = find(&report, "Total assets");
    assert_eq!(total.prior_share_pct, 100.0);
    assert_eq!(total.current_share_pct, 100.0);
}

#[test]
fn test_zero_prior_growth_is_large_and_finite() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "bctc.csv", VN_STATEMENT);
    let report = analyzer().analyze_file(&path).unwrap();

    let financial_income = find(&report, "Doanh thu hoạt động tài chính");
    assert!(financial_income.growth_pct.is_finite());
    assert!(financial_income.growth_pct > 1e12);
}

#[test]
fn test_non_current_rows_ahead_of_current_rows() {
    let statement = "\
Item,FY2022,FY2023
Non-current assets,700,800
Current assets,300,400
Total assets,1000,1200
Non-current liabilities,500,500
Current liabilities,150,200
Equity,350,500
Total liabilities and equity,1000,1200
";
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "ifrs.csv", statement);
    let report = analyzer().analyze_file(&path).unwrap();

    assert_eq!(report.ratios.current_ratio_prior, RatioValue::Value(2.0));
    assert_eq!(report.ratios.current_ratio_current, RatioValue::Value(2.0));

    let share = report
        .dashboard
        .indicators
        .iter()
        .find(|t| t.title == "Short-term assets share")
        .expect("short-term assets share tile");
    assert!((share.value - 400.0 / 12.0).abs() < 1e-9, "share is {}", share.value);
}

#[test]
fn test_missing_short_term_rows_degrade_to_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "bs.csv", EN_STATEMENT);
    let report = analyzer().analyze_file(&path).unwrap();

    assert_eq!(report.ratios, FinancialRatios::default());
    assert!(report.warnings.contains(&AnalysisWarning::MissingLiquidityRows {
        missing: vec![
            "short-term assets".to_string(),
            "short-term liabilities".to_string()
        ]
    }));

    let prompt = build_analysis_prompt(&report.table, &report.ratios);
    assert!(prompt.contains("- Current ratio, current year: N/A"));

    let text = render_report(&report, None);
    assert!(text.contains("Current ratio: prior year N/A, current year N/A"));
}

#[test]
fn test_missing_total_assets_stops_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "bad.csv",
        "Item,Prior,Current\nCash,1,2\nTotal liabilities and equity,1,2\n",
    );

    let err = analyzer().analyze_file(&path).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Structural);
    assert!(matches!(err, FinancialAnalysisError::MissingAnchorRows { .. }));
    assert!(err.user_message().contains("Total assets"));
}

#[test]
fn test_wrong_column_count_is_structural() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "wide.csv", "Item,2021,2022,2023\nCash,1,2,3\n");

    let err = analyzer().analyze_file(&path).unwrap_err();
    assert!(matches!(err, FinancialAnalysisError::InvalidStructure(_)));
}

#[test]
fn test_prompt_is_byte_identical_across_runs() {
    let first = analyzer()
        .analyze_bytes("a.csv", VN_STATEMENT.as_bytes(), FileKind::Csv)
        .unwrap();
    let second = analyzer()
        .analyze_bytes("a.csv", VN_STATEMENT.as_bytes(), FileKind::Csv)
        .unwrap();

    assert_eq!(
        build_analysis_prompt(&first.table, &first.ratios),
        build_analysis_prompt(&second.table, &second.ratios)
    );
}

#[test]
fn test_workbook_range_goes_through_same_pipeline() {
    let rows: [(&str, f64, f64); 4] = [
        ("Current assets", 300.0, 400.0),
        ("Total assets", 1000.0, 1000.0),
        ("Current liabilities", 150.0, 0.0),
        ("Total liabilities and equity", 1000.0, 1000.0),
    ];
    let mut range: Range<Data> = Range::new((0, 0), (rows.len() as u32, 2));
    range.set_value((0, 0), Data::String("Item".into()));
    range.set_value((0, 1), Data::String("Prior".into()));
    range.set_value((0, 2), Data::String("Current".into()));
    for (i, (label, prior, current)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        range.set_value((r, 0), Data::String(label.to_string()));
        range.set_value((r, 1), Data::Float(*prior));
        range.set_value((r, 2), Data::Float(*current));
    }

    let raw = ingestion::statement_from_range(&range, &LoaderOptions::default()).unwrap();
    let report = analyzer().analyze_raw("sheet.xlsx", &raw).unwrap();

    assert_eq!(report.ratios.current_ratio_prior, RatioValue::Value(2.0));
    assert_eq!(report.ratios.current_ratio_current, RatioValue::Value(0.0));
}

#[test]
fn test_custom_labels_from_json_config() {
    let dir = TempDir::new().unwrap();
    let config_path = write_fixture(
        &dir,
        "config.json",
        r#"{
            "labels": {
                "total_assets": "^Assets total$",
                "total_capital": "^Funding total$"
            },
            "loader": { "has_header": false }
        }"#,
    );
    let statement = write_fixture(
        &dir,
        "custom.csv",
        "Cash,50,75\nAssets total,100,150\nFunding total,100,150\n",
    );

    let config = AnalyzerConfig::from_json_file(&config_path).unwrap();
    let report = FinancialStatementAnalyzer::new(config)
        .unwrap()
        .analyze_file(&statement)
        .unwrap();

    assert_eq!(report.table.len(), 3);
    assert_eq!(find(&report, "Cash").current_share_pct, 50.0);
}

#[test]
fn test_report_serializes_to_json() {
    let report = analyzer()
        .analyze_bytes("bs.csv", EN_STATEMENT.as_bytes(), FileKind::Csv)
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["source_name"], "bs.csv");
    assert_eq!(json["ratios"]["current_ratio_prior"]["status"], "NotAvailable");
    assert_eq!(json["table"]["items"][0]["label"], "Cash and cash equivalents");
}
