//! Gemini AI provider implementation.
//!
//! Calls the `generateContent` REST endpoint with an optional response
//! schema for structured JSON output.

use super::{GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }
}

/// Gemini text provider. Built once at startup and shared across requests.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::NotConfigured("Gemini API key not configured".into()))
    }

    /// Build the API URL for the given model and method.
    fn api_url(&self, method: &str, api_key: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method,
            api_key
        )
    }

    fn build_generation_config(params: &GenerationParams) -> GenerationConfig {
        GenerationConfig {
            temperature: params.temperature,
            response_mime_type: params
                .output_schema
                .as_ref()
                .map(|_| "application/json".to_string()),
            response_schema: params.output_schema.clone(),
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        let api_key = self.api_key()?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: Some(Self::build_generation_config(params)),
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            structured = params.output_schema.is_some(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        parse_response(api_response)
    }
}

fn parse_response(api_response: GenerateContentResponse) -> Result<ProviderResponse, ProviderError> {
    let candidate = api_response.candidates.first();

    if let Some("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST") =
        candidate.and_then(|c| c.finish_reason.as_deref())
    {
        return Err(ProviderError::ContentFiltered);
    }

    let text = candidate
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .filter(|text| !text.is_empty());

    let usage = api_response.usage_metadata.unwrap_or_default();

    Ok(ProviderResponse {
        text,
        input_tokens: usage.prompt_token_count.unwrap_or(0),
        output_tokens: usage.candidates_token_count.unwrap_or(0),
    })
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<ProviderResponse, ProviderError> {
        parse_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn generation_config_requests_json_when_schema_present() {
        let params = GenerationParams {
            temperature: Some(0.0),
            output_schema: Some(json!({ "type": "OBJECT" })),
        };
        let config = serde_json::to_value(GeminiTextProvider::build_generation_config(&params))
            .unwrap();

        assert_eq!(config["temperature"], 0.0);
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert!(config.get("maxOutputTokens").is_none());
    }

    #[test]
    fn response_text_parts_are_concatenated() {
        let response = parse(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"title\":" }, { "text": "\"Soup\"}" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 5 }
        }))
        .unwrap();

        assert_eq!(response.text.as_deref(), Some("{\"title\":\"Soup\"}"));
        assert_eq!(response.input_tokens, 12);
        assert_eq!(response.output_tokens, 5);
    }

    #[test]
    fn truncated_output_is_returned_for_schema_checking() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"title\": \"Sou" }] },
                "finishReason": "MAX_TOKENS"
            }]
        }))
        .unwrap();

        assert_eq!(response.text.as_deref(), Some("{\"title\": \"Sou"));
    }

    #[test]
    fn missing_candidates_yield_no_text() {
        let response = parse(json!({})).unwrap();
        assert!(response.text.is_none());
    }

    #[test]
    fn safety_block_is_content_filtered() {
        let err = parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap_err();
        assert!(matches!(err, ProviderError::ContentFiltered));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_network() {
        let provider =
            GeminiTextProvider::new(GeminiConfig::new(None, "gemini-2.0-flash")).unwrap();
        let err = provider
            .generate("hi", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn api_url_targets_model_method() {
        let mut config = GeminiConfig::new(Some("k".into()), "gemini-2.0-flash");
        config.base_url = "http://localhost:9999/v1beta/".to_string();
        let provider = GeminiTextProvider::new(config).unwrap();
        assert_eq!(
            provider.api_url("generateContent", "k"),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent?key=k"
        );
    }
}
