use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use localrag_core::traits::LanguageModel;
use localrag_llm::{LlmError, OllamaClient, OllamaConfig};

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

fn client(base_url: String) -> OllamaClient {
    OllamaClient::new(OllamaConfig { base_url, model: "mistral".into(), temperature: 0.2, timeout: Duration::from_secs(5) }).unwrap()
}

#[tokio::test]
async fn generate_sends_prompt_and_returns_response() {
    let router = Router::new().route(
        "/api/generate",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["model"], "mistral");
            assert_eq!(body["stream"], false);
            let echoed = format!("echo: {}", body["prompt"].as_str().unwrap_or_default());
            Json(json!({ "model": "mistral", "response": echoed, "done": true }))
        }),
    );
    let base = spawn(router).await;

    let answer = client(base).generate("Bonjour").await.unwrap();
    assert_eq!(answer, "echo: Bonjour");
}

#[tokio::test]
async fn server_error_surfaces_as_api_error() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::NOT_FOUND, "model 'mistral' not found") }),
    );
    let base = spawn(router).await;

    let err = client(base).complete("x").await.unwrap_err();
    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("not found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let err = client("http://127.0.0.1:9".into()).complete("x").await.unwrap_err();
    assert!(matches!(err, LlmError::Http(_)));
}
