use thiserror::Error;

#[derive(Debug, Error)]
pub enum SousChefError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Recipe generation failed: {0}")]
    RecipeGeneration(String),

    #[error("Rendering error: {0}")]
    Rendering(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SousChefError {
    /// Returns `true` when the failure came from an external service being
    /// unreachable or unhealthy rather than from bad input.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::StoreUnavailable(_) | Self::Mongo(_) | Self::Unreachable(_) => true,
            Self::Llm(msg) => is_unavailable_message(msg),
            _ => false,
        }
    }
}

fn is_unavailable_message(msg: &str) -> bool {
    let msg_lower = msg.to_lowercase();
    for code in ["429", "500", "502", "503", "504"] {
        if msg_lower.contains(code) {
            return true;
        }
    }
    let patterns = [
        "timeout",
        "timed out",
        "connection refused",
        "connection reset",
        "temporarily unavailable",
    ];
    patterns.iter().any(|p| msg_lower.contains(p))
}

pub type Result<T> = std::result::Result<T, SousChefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_is_unavailable() {
        let err = SousChefError::StoreUnavailable("ping failed".into());
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_llm_503_is_unavailable() {
        let err = SousChefError::Llm("Gemini error 503: overloaded".into());
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_llm_timeout_is_unavailable() {
        let err = SousChefError::Llm("request timed out".into());
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_llm_401_is_not_unavailable() {
        let err = SousChefError::Llm("Gemini error 401: API key not valid".into());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_generation_error_is_not_unavailable() {
        let err = SousChefError::RecipeGeneration("missing recipe_facts".into());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_not_found_display() {
        let err = SousChefError::NotFound("recipe 42".into());
        assert_eq!(err.to_string(), "Not found: recipe 42");
    }
}
