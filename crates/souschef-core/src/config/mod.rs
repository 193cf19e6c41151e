use crate::error::{Result, SousChefError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SousChefConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_telegram_env_var")]
    pub env_var: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            env_var: default_telegram_env_var(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_key: None,
            env_var: None,
            base_url: None,
            max_tokens: default_llm_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Full MongoDB connection string. Takes precedence over the parts below.
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default = "default_uri_env_var")]
    pub uri_env_var: String,
    #[serde(default = "default_password_env_var")]
    pub password_env_var: String,
    /// Atlas user; combined with `host` and the password env var when no URI is set.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
    #[serde(default = "default_recipes_collection")]
    pub recipes_collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            uri: None,
            uri_env_var: default_uri_env_var(),
            password_env_var: default_password_env_var(),
            user: None,
            host: None,
            app_name: None,
            database: default_database(),
            users_collection: default_users_collection(),
            recipes_collection: default_recipes_collection(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Valid storage backend names.
pub const VALID_STORAGE_BACKENDS: &[&str] = &["mongo", "memory"];

/// Valid LLM provider names.
pub const VALID_LLM_PROVIDERS: &[&str] = &["gemini", "ollama"];

/// Valid log output formats.
pub const VALID_LOG_FORMATS: &[&str] = &["compact", "json"];

// -- Defaults --

fn default_telegram_env_var() -> String {
    "TELEGRAM_BOT_TOKEN".to_string()
}
fn default_llm_provider() -> String {
    "gemini".to_string()
}
fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_llm_max_tokens() -> usize {
    8192
}
fn default_llm_timeout_secs() -> u64 {
    120
}
fn default_storage_backend() -> String {
    "mongo".to_string()
}
fn default_uri_env_var() -> String {
    "MONGO_URI".to_string()
}
fn default_password_env_var() -> String {
    "MONGO_PASSWORD".to_string()
}
fn default_database() -> String {
    "sous_chef_ai_db".to_string()
}
fn default_users_collection() -> String {
    "users".to_string()
}
fn default_recipes_collection() -> String {
    "recipes".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}

impl SousChefConfig {
    /// Load configuration, later layers overriding earlier ones:
    /// 1. ~/.config/souschef/config.toml (global, optional)
    /// 2. `explicit` file (required when given)
    /// 3. `SOUSCHEF__SECTION__KEY` environment variables
    ///
    /// Values are not validated here; call [`validate`](Self::validate) once
    /// logging is up so its warnings are visible.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SOUSCHEF")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = builder
            .build()
            .map_err(|e| SousChefError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| SousChefError::Config(e.to_string()))
    }

    /// Validate config values, replacing unknown ones with defaults.
    /// Lenient: the returned warnings are also logged.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !VALID_STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            warnings.push(format!(
                "unknown storage backend '{}', valid: {}; using memory",
                self.storage.backend,
                VALID_STORAGE_BACKENDS.join(", ")
            ));
            self.storage.backend = "memory".to_string();
        }

        if !VALID_LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            warnings.push(format!(
                "unknown LLM provider '{}', valid: {}; using {}",
                self.llm.provider,
                VALID_LLM_PROVIDERS.join(", "),
                default_llm_provider()
            ));
            self.llm.provider = default_llm_provider();
        }

        if self.llm.max_tokens == 0 {
            warnings.push(format!(
                "llm.max_tokens = 0, setting to {}",
                default_llm_max_tokens()
            ));
            self.llm.max_tokens = default_llm_max_tokens();
        }

        if self.llm.timeout_secs == 0 {
            warnings.push(format!(
                "llm.timeout_secs = 0, setting to {}",
                default_llm_timeout_secs()
            ));
            self.llm.timeout_secs = default_llm_timeout_secs();
        }

        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            warnings.push(format!(
                "unknown log format '{}', valid: {}",
                self.logging.format,
                VALID_LOG_FORMATS.join(", ")
            ));
            self.logging.format = default_log_format();
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }

    /// The Telegram bot token. Required: the process cannot start without it.
    pub fn telegram_token(&self) -> Result<String> {
        resolve_secret(
            self.telegram.token.as_deref(),
            &self.telegram.env_var,
            "telegram.token",
        )
    }

    /// MongoDB connection string, if one can be assembled.
    ///
    /// Priority: `storage.uri` → `$MONGO_URI` → `mongodb+srv://{user}:{$MONGO_PASSWORD}@{host}`.
    pub fn mongo_uri(&self) -> Option<String> {
        if let Ok(uri) = resolve_secret(
            self.storage.uri.as_deref(),
            &self.storage.uri_env_var,
            "storage.uri",
        ) {
            return Some(uri);
        }

        let password = std::env::var(&self.storage.password_env_var)
            .ok()
            .filter(|p| !p.is_empty())?;
        let user = self.storage.user.as_deref()?;
        let host = self.storage.host.as_deref()?;

        let mut uri = format!(
            "mongodb+srv://{}:{}@{host}/?retryWrites=true&w=majority",
            urlencoding::encode(user),
            urlencoding::encode(&password),
        );
        if let Some(app) = &self.storage.app_name {
            uri.push_str(&format!("&appName={app}"));
        }
        Some(uri)
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("souschef").join("config.toml"))
}

/// Resolve a secret: config field first, then the environment variable.
pub fn resolve_secret(value: Option<&str>, env_var: &str, setting: &str) -> Result<String> {
    if let Some(v) = value {
        if !v.is_empty() {
            return Ok(v.to_string());
        }
    }

    match std::env::var(env_var) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(SousChefError::Config(format!(
            "missing credential (set {setting} or {env_var})"
        ))),
    }
}
