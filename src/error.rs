use thiserror::Error;

/// Broad buckets used when deciding how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The uploaded file is not shaped like a financial statement.
    Structural,
    /// The AI service rejected or failed the request.
    ExternalService,
    /// Anything else (I/O, parsing, bad configuration).
    Internal,
}

#[derive(Error, Debug)]
pub enum FinancialAnalysisError {
    #[error("Invalid statement structure: {0}")]
    InvalidStructure(String),

    #[error("The statement contains no data rows")]
    EmptyStatement,

    #[error("Required total rows not found: {}", missing.join(", "))]
    MissingAnchorRows { missing: Vec<String> },

    #[error("Invalid label pattern for '{field}': {details}")]
    InvalidPattern { field: String, details: String },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("Gemini rejected the API key: {0}")]
    InvalidApiKey(String),

    #[error("Narrative request failed: {0}")]
    NarrativeFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FinancialAnalysisError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidStructure(_) | Self::EmptyStatement | Self::MissingAnchorRows { .. } => {
                ErrorClass::Structural
            }
            Self::MissingApiKey | Self::InvalidApiKey(_) | Self::NarrativeFailed(_) => {
                ErrorClass::ExternalService
            }
            _ => ErrorClass::Internal,
        }
    }

    /// Message shown to the person running the analysis.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingAnchorRows { .. } => format!(
                "Error: {}. Make sure the sheet has a 'Total assets' row and a \
                 'Total liabilities and equity' row.",
                self
            ),
            Self::InvalidStructure(details) => format!(
                "Data structure error: {}. Please check that the file has exactly three \
                 columns: item, prior year, current year.",
                details
            ),
            Self::EmptyStatement => {
                "The uploaded file has no line items below the header row.".to_string()
            }
            Self::MissingApiKey => "GEMINI_API_KEY is not set. Add it to the environment \
                 (or a .env file) to request the AI analysis."
                .to_string(),
            Self::InvalidApiKey(_) => "API key error: the Gemini API key is invalid or has \
                 expired. Please check the configured secret."
                .to_string(),
            Self::NarrativeFailed(details) => {
                format!("An error occurred while contacting Gemini AI: {}", details)
            }
            other => format!(
                "Unexpected error: {}. Please check the file format.",
                other
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinancialAnalysisError>;
