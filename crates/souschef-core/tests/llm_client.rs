//! `LlmService` against a mock Gemini/Ollama endpoint.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use souschef_core::config::LlmConfig;
use souschef_core::dialogue::Dialogue;
use souschef_core::error::SousChefError;
use souschef_core::llm::{LlmService, TextGenerator};
use souschef_core::render::TextFormat;
use souschef_core::storage::MemoryStorage;
use wiremock::matchers::{body_partial_json, header, method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEMINI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn gemini(server: &MockServer) -> LlmService {
    let config = LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some(server.uri()),
        timeout_secs: 5,
        ..Default::default()
    };
    LlmService::from_config(&config).expect("gemini config should be valid")
}

fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn gemini_request_shape_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(query_param_is_missing("key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{"text": "hello"}]}],
            "generationConfig": {"responseMimeType": "application/json"},
            "systemInstruction": {"parts": [{"text": "be brief"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("{\"ok\":true}")))
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini(&server)
        .generate("hello", Some("be brief"))
        .await
        .unwrap();
    assert_eq!(text, "{\"ok\":true}");
}

#[tokio::test]
async fn gemini_error_status_is_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let err = gemini(&server).generate("hello", None).await.unwrap_err();
    assert!(matches!(err, SousChefError::Llm(_)));
    assert!(err.to_string().contains("503"));
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn gemini_envelope_without_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}})),
        )
        .mount(&server)
        .await;

    let err = gemini(&server).generate("hello", None).await.unwrap_err();
    assert!(err.to_string().contains("missing text"));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let config = LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some(uri),
        timeout_secs: 2,
        ..Default::default()
    };
    let err = LlmService::from_config(&config)
        .unwrap()
        .generate("hello", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SousChefError::Unreachable(_)));
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn ollama_request_asks_for_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.2",
            "stream": false,
            "format": "json"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "{}"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = LlmConfig {
        provider: "ollama".into(),
        model: "llama3.2".into(),
        base_url: Some(server.uri()),
        ..Default::default()
    };
    let text = LlmService::from_config(&config)
        .unwrap()
        .generate("hello", None)
        .await
        .unwrap();
    assert_eq!(text, "{}");
}

#[tokio::test]
async fn dialogue_over_mock_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(SAMPLE)))
        .mount(&server)
        .await;

    let dialogue = Dialogue::new(MemoryStorage::new(), gemini(&server));
    let reply = dialogue
        .handle_text(1, "chickpeas, spinach", no_interstitial)
        .await;

    assert_eq!(reply.format, TextFormat::MarkdownV2);
    assert!(reply.text.contains("Chickpea & Spinach Stew"));
    assert_eq!(dialogue.last_recipe(1).await.unwrap().document, sample());
}
