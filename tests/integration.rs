//! End-to-end tests for the chat API and frontend server.
//!
//! A stub Ollama upstream runs in-process on an ephemeral port, returning
//! deterministic embeddings and a fixed chat reply. The chat API is served
//! the same way and exercised over HTTP with reqwest.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::{extract::State, routing::post, Json, Router};
use tempfile::TempDir;

use faq_harness::config::{
    Config, DatasetConfig, FrontendConfig, OllamaConfig, RetrievalConfig, ServerConfig,
};
use faq_harness::corpus::{self, Corpus};
use faq_harness::frontend;
use faq_harness::prompt::FALLBACK_REPLY;
use faq_harness::server::{app, AppState};

const STUB_REPLY: &str = "The stub model says hi.";

/// Deterministic 4-dim embedding derived from the text bytes.
fn stub_embedding(text: &str) -> Vec<f32> {
    let bytes = text.as_bytes();
    let len = bytes.len() as f32;
    let sum: f32 = bytes.iter().map(|b| *b as f32).sum();
    vec![len, (sum % 97.0) + 1.0, (sum % 13.0) + 1.0, 1.0]
}

/// Captured chat requests, for asserting on the prompt the server sends.
type ChatLog = Arc<Mutex<Vec<serde_json::Value>>>;

async fn stub_embed_handler(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    let inputs = body["input"].as_array().cloned().unwrap_or_default();
    let embeddings: Vec<Vec<f32>> = inputs
        .iter()
        .map(|v| stub_embedding(v.as_str().unwrap_or("")))
        .collect();
    Json(serde_json::json!({ "embeddings": embeddings }))
}

async fn stub_chat_handler(
    State(log): State<ChatLog>,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    log.lock().unwrap().push(body);
    Json(serde_json::json!({
        "message": { "role": "assistant", "content": STUB_REPLY },
        "done": true
    }))
}

/// Start the stub Ollama server, returning its address and the chat log.
async fn start_stub_ollama() -> (SocketAddr, ChatLog) {
    let log: ChatLog = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/api/embed", post(stub_embed_handler))
        .route("/api/chat", post(stub_chat_handler))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, log)
}

fn write_dataset(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("faq.json");
    fs::write(
        &path,
        r#"[
  {"question": "When is the event?", "answer": "In April."},
  {"question": "How much does it cost?", "answer": "It is free."},
  {"question": "What should I bring?", "answer": "A laptop and a charger."}
]"#,
    )
    .unwrap();
    path
}

fn make_config(ollama_addr: SocketAddr, dataset_path: &Path) -> Config {
    Config {
        dataset: DatasetConfig {
            path: dataset_path.to_path_buf(),
        },
        ollama: OllamaConfig {
            url: format!("http://{}", ollama_addr),
            embedding_model: "stub-embed".to_string(),
            chat_model: "stub-chat".to_string(),
            timeout_secs: 5,
            max_retries: 0,
        },
        retrieval: RetrievalConfig { top_n: 3 },
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
        },
        frontend: FrontendConfig::default(),
    }
}

/// Serve a router on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn start_api() -> (String, ChatLog, Arc<Config>) {
    let (ollama_addr, chat_log) = start_stub_ollama().await;
    let tmp = TempDir::new().unwrap();
    let dataset_path = write_dataset(tmp.path());
    let config = Arc::new(make_config(ollama_addr, &dataset_path));

    let corpus = corpus::build_corpus(config.as_ref()).await.unwrap();
    let state = AppState {
        config: config.clone(),
        corpus: Arc::new(corpus),
    };
    let base = serve(app(state)).await;
    (base, chat_log, config)
}

#[tokio::test]
async fn test_root_returns_running() {
    let (base, _log, _cfg) = start_api().await;

    let resp = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "running");
}

#[tokio::test]
async fn test_chat_returns_ok_response() {
    let (base, _log, _cfg) = start_api().await;

    let resp = reqwest::get(format!("{}/chat?query=hello", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["response"], STUB_REPLY);
}

#[tokio::test]
async fn test_chat_prompt_carries_fallback_and_context() {
    let (base, log, _cfg) = start_api().await;

    let resp = reqwest::get(format!("{}/chat?query=how much does it cost", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];

    assert_eq!(req["stream"], false);
    let messages = req["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "how much does it cost");

    let system = messages[0]["content"].as_str().unwrap();
    assert!(system.contains(FALLBACK_REPLY));
    // All three dataset chunks fit within top_n = 3.
    assert!(system.contains("q: How much does it cost?\na: It is free."));
}

#[tokio::test]
async fn test_chat_missing_query_is_bad_request() {
    let (base, _log, _cfg) = start_api().await;

    let resp = reqwest::get(format!("{}/chat", base)).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    let resp = reqwest::get(format!("{}/chat?query=%20%20", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_chat_upstream_down_is_service_unavailable() {
    let (ollama_addr, _log) = start_stub_ollama().await;
    let tmp = TempDir::new().unwrap();
    let dataset_path = write_dataset(tmp.path());

    // Build the corpus against the live stub, then point the serving
    // config at a dead port.
    let build_config = make_config(ollama_addr, &dataset_path);
    let corpus = corpus::build_corpus(&build_config).await.unwrap();

    let dead_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead_listener.local_addr().unwrap();
    drop(dead_listener);

    let mut dead_config = make_config(ollama_addr, &dataset_path);
    dead_config.ollama.url = format!("http://{}", dead_addr);

    let state = AppState {
        config: Arc::new(dead_config),
        corpus: Arc::new(corpus),
    };
    let base = serve(app(state)).await;

    let resp = reqwest::get(format!("{}/chat?query=hello", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "upstream_unavailable");
}

#[tokio::test]
async fn test_corpus_build_matches_dataset() {
    let (ollama_addr, _log) = start_stub_ollama().await;
    let tmp = TempDir::new().unwrap();
    let dataset_path = write_dataset(tmp.path());
    let config = make_config(ollama_addr, &dataset_path);

    let corpus: Corpus = corpus::build_corpus(&config).await.unwrap();
    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.dims(), 4);
}

#[tokio::test]
async fn test_corpus_build_rejects_empty_dataset() {
    let (ollama_addr, _log) = start_stub_ollama().await;
    let tmp = TempDir::new().unwrap();
    let dataset_path = tmp.path().join("faq.json");
    fs::write(&dataset_path, "[]").unwrap();

    let config = make_config(ollama_addr, &dataset_path);
    let err = corpus::build_corpus(&config).await.unwrap_err();
    assert!(err.to_string().contains("no entries"));
}

#[tokio::test]
async fn test_frontend_serves_files_with_cors() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("index.html"), "<html>faq</html>").unwrap();

    let base = serve(frontend::app(tmp.path())).await;

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("{}/index.html", base))
        .header("Origin", "http://localhost:9999")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
    assert_eq!(resp.text().await.unwrap(), "<html>faq</html>");
}

#[tokio::test]
async fn test_frontend_missing_file_is_404() {
    let tmp = TempDir::new().unwrap();
    let base = serve(frontend::app(tmp.path())).await;

    let resp = reqwest::get(format!("{}/nope.html", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}
