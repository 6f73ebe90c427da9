use crate::error::{FinancialAnalysisError, Result};
use crate::llm::types::*;
use log::debug;
use reqwest::Client;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Fails with [`FinancialAnalysisError::MissingApiKey`] on a blank key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FinancialAnalysisError::MissingApiKey);
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let key =
            std::env::var("GEMINI_API_KEY").map_err(|_| FinancialAnalysisError::MissingApiKey)?;
        Self::new(key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One `generateContent` call with a single user prompt. No retries.
    pub async fn generate_text(&self, model: &str, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
        };

        debug!("Requesting narrative from model {}", model);
        let res = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &err_text));
        }

        let body: GenerateContentResponse = res.json().await.map_err(transport_error)?;
        body.into_text()
    }
}

// Strips the URL (and with it the key) from transport errors before they are shown.
fn transport_error(e: reqwest::Error) -> FinancialAnalysisError {
    FinancialAnalysisError::NarrativeFailed(e.without_url().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_rejected() {
        assert!(matches!(
            GeminiClient::new("   "),
            Err(FinancialAnalysisError::MissingApiKey)
        ));
    }

    #[test]
    fn test_base_url_override() {
        let client = GeminiClient::new("key")
            .unwrap()
            .with_base_url("http://localhost:8080/v1beta/");
        assert_eq!(client.base_url(), "http://localhost:8080/v1beta");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_generic_failure() {
        let client = GeminiClient::new("key")
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = client.generate_text("m", "hello").await.unwrap_err();
        assert!(matches!(err, FinancialAnalysisError::NarrativeFailed(_)));
    }
}
