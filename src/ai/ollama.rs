//! Ollama API client

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::config::OllamaConfig;
use crate::error::{Result, WeaveError};

/// Timeout for the model listing used by the health checks
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for a single (non-streaming) generation
const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for a local Ollama server
pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.host.trim_end_matches('/'), path)
    }

    /// Whether the server answers `GET /api/tags` with 200
    pub async fn check_connection(&self) -> bool {
        let url = self.endpoint("tags");
        tracing::debug!("Checking Ollama at {}", url);

        match self.client.get(&url).timeout(TAGS_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Ollama connection failed: {}", e);
                false
            }
        }
    }

    /// Whether any installed model name contains the configured model
    pub async fn is_model_available(&self) -> bool {
        match self.list_models().await {
            Ok(models) => models_include(&models, &self.config.model),
            Err(e) => {
                tracing::debug!("Could not list Ollama models: {}", e);
                false
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let tags: TagsResponse = self
            .client
            .get(self.endpoint("tags"))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Generate a completion for `prompt`, returning the trimmed response text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint("generate");
        tracing::debug!("Generating with {} at {}", self.config.model, url);

        let request_body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        };

        let response = self
            .client
            .post(&url)
            .timeout(GENERATE_TIMEOUT)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| WeaveError::Ollama(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WeaveError::Ollama(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        parse_generate_response(&body)
    }
}

fn models_include(models: &[String], wanted: &str) -> bool {
    models.iter().any(|name| name.contains(wanted))
}

fn parse_generate_response(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| WeaveError::Ollama(format!("Failed to parse response: {}", e)))?;
    Ok(parsed.response.trim().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Ollama API types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            model: "llama3.2",
            prompt: "hello",
            stream: false,
            options: GenerateOptions {
                temperature: 0.3,
                top_p: 0.9,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["prompt"], "hello");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.3);
        assert_eq!(json["options"]["top_p"], 0.9);
    }

    #[test]
    fn test_parse_generate_response() {
        let body = r#"{"model":"llama3.2","response":"  feat(Core): add x \n","done":true}"#;
        assert_eq!(parse_generate_response(body).unwrap(), "feat(Core): add x");

        assert!(matches!(
            parse_generate_response("not json"),
            Err(WeaveError::Ollama(_))
        ));
    }

    #[test]
    fn test_model_matching_is_substring() {
        let tags: TagsResponse = serde_json::from_str(
            r#"{"models":[{"name":"llama3.2:latest"},{"name":"mistral:7b"}]}"#,
        )
        .unwrap();
        let names: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();

        assert!(models_include(&names, "llama3.2"));
        assert!(models_include(&names, "mistral"));
        assert!(!models_include(&names, "qwen"));
        assert!(!models_include(&[], "llama3.2"));
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let config = OllamaConfig {
            host: "http://localhost:11434/".to_string(),
            ..OllamaConfig::default()
        };
        let client = OllamaClient::new(&config);
        assert_eq!(client.endpoint("tags"), "http://localhost:11434/api/tags");
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let config = OllamaConfig {
            host: "http://127.0.0.1:1".to_string(),
            ..OllamaConfig::default()
        };
        let client = OllamaClient::new(&config);
        assert!(!client.check_connection().await);
        assert!(!client.is_model_available().await);
        assert!(client.generate("hi").await.is_err());
    }
}
