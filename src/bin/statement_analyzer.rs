//! statement-analyzer - growth, composition and liquidity report for a two-period statement

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use financial_statement_analyzer::llm::{GeminiClient, NarrativeAnalyst};
use financial_statement_analyzer::{
    render_report, report_json_schema, AnalysisReport, AnalysisSession, AnalyzerConfig, FileKind,
    FinancialAnalysisError,
};
use log::error;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "statement-analyzer")]
#[command(
    author,
    version,
    about = "Analyze a prior/current year financial statement and ask Gemini for a narrative"
)]
struct Cli {
    /// Statement file with three columns: item, prior year, current year (xlsx, xls, ods, csv)
    input: Option<PathBuf>,

    /// JSON file overriding label patterns, chart items and defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The first row holds data, not column headers
    #[arg(long)]
    no_header: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Request an AI-written analysis of the computed figures
    #[arg(short, long)]
    narrative: bool,

    /// Gemini model name
    #[arg(short, long)]
    model: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the JSON schema of the report and exit
    #[arg(long)]
    print_schema: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a AnalysisReport,
    narrative: Option<&'a str>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.print_schema {
        println!("{}", serde_json::to_string_pretty(&report_json_schema()?)?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(input) = cli.input.as_ref() else {
        eprintln!("Please provide a statement file to start the analysis.");
        return Ok(ExitCode::FAILURE);
    };

    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    if cli.no_header {
        config.loader.has_header = false;
    }
    if let Some(model) = &cli.model {
        config.narrative.model = model.clone();
    }

    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read '{}'", input.display()))?;
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("statement")
        .to_string();

    let mut session = match AnalysisSession::new(config) {
        Ok(session) => session,
        Err(e) => return Ok(report_error(&e)),
    };
    let report = match session.analyze(&name, &bytes, FileKind::from_path(input)) {
        Ok(report) => report,
        Err(e) => return Ok(report_error(&e)),
    };

    let mut exit = ExitCode::SUCCESS;
    let narrative = if cli.narrative {
        let model = &session.analyzer().config().narrative.model;
        match request_narrative(&report, cli.api_key.as_deref(), model).await {
            Ok(text) => Some(text),
            Err(e) => {
                exit = report_error(&e);
                None
            }
        }
    } else {
        None
    };

    match cli.format {
        OutputFormat::Text => print!("{}", render_report(&report, narrative.as_deref())),
        OutputFormat::Json => {
            let output = JsonOutput {
                report: &report,
                narrative: narrative.as_deref(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(exit)
}

async fn request_narrative(
    report: &AnalysisReport,
    api_key: Option<&str>,
    model: &str,
) -> financial_statement_analyzer::Result<String> {
    let api_key = api_key.ok_or(FinancialAnalysisError::MissingApiKey)?;
    let analyst = NarrativeAnalyst::new(GeminiClient::new(api_key)?).with_model(model);
    eprintln!("Analyzing the data, please wait...");
    analyst.analyze(report).await
}

fn report_error(e: &FinancialAnalysisError) -> ExitCode {
    error!("{:?} error: {}", e.class(), e);
    eprintln!("{}", e.user_message());
    ExitCode::FAILURE
}
