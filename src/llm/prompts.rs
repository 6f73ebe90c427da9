use crate::render::markdown_table;
use crate::schema::{FinancialRatios, StatementTable};

pub const ANALYST_PREAMBLE: &str = r#"Acting as a senior financial analyst, use the data below to write a detailed analysis of the company's financial position.

The analysis must be clearly structured, professional and easy to follow, with the following sections:
1.  **Overall assessment:** General comments on the financial health of the company over the period analysed.
2.  **Scale and growth:** Based on the movement in Total assets, Revenue and Profit.
3.  **Asset and capital structure:** Comment on changes in the share of the main items (e.g. short-term assets, liabilities).
4.  **Liquidity:** Based on the liquidity ratios calculated below.
5.  **Conclusions and recommendations (if any):** Summarise strengths and weaknesses and offer a few suggestions."#;

pub const ANALYST_CLOSING: &str =
    "Present the analysis coherently, using precise financial terminology.";

/// Builds the narrative request.
///
/// The output depends only on `table` and `ratios`; identical inputs give
/// byte-identical prompts.
pub fn build_analysis_prompt(table: &StatementTable, ratios: &FinancialRatios) -> String {
    format!(
        "{preamble}\n\n\
         **INPUT DATA:**\n\n\
         **1. Growth and composition table:**\n\
         {table}\n\
         **2. Key financial ratios:**\n\
         - Current ratio, prior year: {prior}\n\
         - Current ratio, current year: {current}\n\n\
         {closing}\n",
        preamble = ANALYST_PREAMBLE,
        table = markdown_table(table),
        prior = ratios.current_ratio_prior,
        current = ratios.current_ratio_current,
        closing = ANALYST_CLOSING,
    )
}
