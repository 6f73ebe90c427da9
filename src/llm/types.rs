use crate::error::FinancialAnalysisError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text: Some(text.into()) }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all text parts joined.
    pub fn into_text(self) -> Result<String, FinancialAnalysisError> {
        let candidate = self
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| {
                FinancialAnalysisError::NarrativeFailed("No candidates returned".to_string())
            })?;

        let content = candidate.content.ok_or_else(|| {
            FinancialAnalysisError::NarrativeFailed(format!(
                "Candidate has no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            return Err(FinancialAnalysisError::NarrativeFailed(
                "Model returned non-text content".to_string(),
            ));
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Maps a failed Gemini response to an error.
///
/// Gemini reports a bad key as HTTP 400 `INVALID_ARGUMENT`; every
/// `INVALID_ARGUMENT` is treated as a credential problem, as are 401 and 403.
pub fn classify_api_error(status: u16, body: &str) -> FinancialAnalysisError {
    let parsed: ApiErrorBody = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();
    let message = if parsed.message.is_empty() {
        body.trim().to_string()
    } else {
        parsed.message
    };

    let key_rejected = matches!(status, 401 | 403)
        || (status == 400
            && (parsed.status == "INVALID_ARGUMENT" || message.contains("API key")));

    if key_rejected {
        FinancialAnalysisError::InvalidApiKey(message)
    } else {
        FinancialAnalysisError::NarrativeFailed(format!(
            "Gemini API Error (status {}): {}",
            status, message
        ))
    }
}
