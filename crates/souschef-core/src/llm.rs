use std::future::Future;
use std::time::Duration;

use crate::config::{resolve_secret, LlmConfig};
use crate::error::{Result, SousChefError};

const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_GEMINI_ENV_VAR: &str = "GEMINI_API_KEY";
/// The API key travels in this header, never in the URL.
const GEMINI_KEY_HEADER: &str = "x-goog-api-key";

/// Anything that turns a prompt into model text. The dialogue only depends
/// on this, so tests can script replies without a network.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP client for the configured generative model provider.
pub struct LlmService {
    provider: LlmProvider,
    config: LlmConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for LlmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmService")
            .field("provider", &self.provider)
            .field("model", &self.config.model)
            .finish()
    }
}

enum LlmProvider {
    Gemini { api_key: String },
    Ollama,
}

impl std::fmt::Debug for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini { .. } => f.write_str("Gemini"),
            Self::Ollama => f.write_str("Ollama"),
        }
    }
}

impl LlmService {
    /// Build the client. Fails when the provider is unknown or when Gemini
    /// has no API key, so a misconfigured bot never starts.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider = match config.provider.as_str() {
            "gemini" => {
                let env_var = config.env_var.as_deref().unwrap_or(DEFAULT_GEMINI_ENV_VAR);
                let api_key = resolve_secret(config.api_key.as_deref(), env_var, "llm.api_key")?;
                LlmProvider::Gemini { api_key }
            }
            "ollama" => LlmProvider::Ollama,
            other => {
                return Err(SousChefError::Config(format!(
                    "unknown LLM provider: '{other}' (expected 'gemini' or 'ollama')"
                )));
            }
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            provider,
            config: config.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Gemini: POST {base_url}/v1beta/models/{model}:generateContent
    async fn generate_gemini(
        &self,
        api_key: &str,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String> {
        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_GEMINI_URL);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            self.config.model,
        );

        let mut body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "responseMimeType": "application/json",
            }
        });

        if let Some(sys) = system {
            body["systemInstruction"] = serde_json::json!({"parts": [{"text": sys}]});
        }

        let resp = self
            .client
            .post(&url)
            .header(GEMINI_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SousChefError::Llm(format!("Gemini error {status}: {text}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SousChefError::Llm(format!("Gemini response parse error: {e}")))?;

        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| SousChefError::Llm("Gemini response missing text".into()))
    }

    /// Ollama: POST {base_url}/api/generate
    async fn generate_ollama(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
        let url = format!("{}/api/generate", base_url.trim_end_matches('/'));

        let mut body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
            "options": {
                "num_predict": self.config.max_tokens,
            }
        });

        if let Some(sys) = system {
            body["system"] = serde_json::Value::String(sys.to_string());
        }

        let resp = self.client.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(SousChefError::Llm(format!("Ollama error {status}: {text}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SousChefError::Llm(format!("Ollama response parse error: {e}")))?;

        json["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| SousChefError::Llm("Ollama response missing 'response' field".into()))
    }
}

impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        tracing::debug!(provider = ?self.provider, model = %self.config.model, "generating");
        match &self.provider {
            LlmProvider::Gemini { api_key } => self.generate_gemini(api_key, prompt, system).await,
            LlmProvider::Ollama => self.generate_ollama(prompt, system).await,
        }
    }
}
