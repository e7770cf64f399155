use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use localrag_cli::server::{router, AppState};
use localrag_core::config::Settings;
use localrag_core::traits::LanguageModel;
use localrag_embed::HashEmbedder;
use localrag_pipeline::RagService;
use localrag_vector::MemoryIndex;

struct FixedModel(&'static str);

#[async_trait]
impl LanguageModel for FixedModel {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}

struct OfflineModel;

#[async_trait]
impl LanguageModel for OfflineModel {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("error sending request for url (http://localhost:11434/api/generate)")
    }
}

fn state(model: Arc<dyn LanguageModel>, documents_dir: PathBuf) -> AppState {
    let service = RagService::new(&Settings::default(), Arc::new(HashEmbedder::new(64)), Arc::new(MemoryIndex::new()), model).unwrap();
    AppState { service: Arc::new(service), documents_dir }
}

async fn call(app: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder.header("content-type", "application/json").body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = ServiceExt::<Request<Body>>::oneshot(app, req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let app = router(state(Arc::new(FixedModel("x")), PathBuf::from("data")));
    let (status, body) = call(app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn ingest_then_ask() {
    let docs = TempDir::new().unwrap();
    fs::write(docs.path().join("guide.txt"), "Paris est la capitale de la France.").unwrap();
    let state = state(Arc::new(FixedModel("Oui, tout à fait.")), docs.path().to_path_buf());

    let (status, report) = call(router(state.clone()), "POST", "/ingest", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report, json!({ "document_count": 1, "chunk_count": 1 }));

    let question = json!({ "question": "Paris est en France, oui ou non ?" });
    let (status, body) = call(router(state), "POST", "/ask", Some(question)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Oui");
    let guide = docs.path().join("guide.txt").to_string_lossy().to_string();
    assert_eq!(body["sources"], json!([{ "source": guide, "chunk": 0 }]));
}

#[tokio::test]
async fn empty_folder_is_not_found() {
    let docs = TempDir::new().unwrap();
    let app = router(state(Arc::new(FixedModel("x")), docs.path().to_path_buf()));
    let (status, body) = call(app, "POST", "/ingest", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn blank_question_is_a_bad_request() {
    let app = router(state(Arc::new(FixedModel("x")), PathBuf::from("data")));
    let (status, body) = call(app, "POST", "/ask", Some(json!({ "question": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn model_outage_is_a_bad_gateway() {
    let app = router(state(Arc::new(OfflineModel), PathBuf::from("data")));
    let (status, body) = call(app, "POST", "/ask", Some(json!({ "question": "Où est Paris ?" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["retryable"], true);
    assert!(body["error"].as_str().unwrap().starts_with("Generation failed"));
}
