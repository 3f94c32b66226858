use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use question_forge::config::Config;
use question_forge::error::AppError;
use question_forge::infrastructure::{CompletionClient, GeminiClient};
use question_forge::services::{MemoryQuestionStore, QuestionStore};
use question_forge::workflow::{GenerationFlow, GenerationRequest, GenerationSource, SessionContext};

/// 启动只应答一次的 HTTP 服务，返回基础 URL 和收到的原始请求
async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{}/v1beta", addr), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn config_for(base_url: &str) -> Config {
    Config {
        llm_api_key: Some("test-key".to_string()),
        llm_api_base_url: base_url.to_string(),
        llm_model_name: "gemini-test".to_string(),
        ..Config::default()
    }
}

fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
    .to_string()
}

#[tokio::test]
async fn test_gemini_client_returns_candidate_text() {
    let questions = r#"[{"text": "Q1", "options": ["a", "b", "c", "d"], "correct_answer": 1}]"#;
    let (base_url, server) = serve_once("200 OK", candidate_body(questions)).await;

    let client = GeminiClient::new(&config_for(&base_url));
    let text = client.complete("Generate 1 question").await.unwrap();
    assert_eq!(text, questions);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1beta/models/gemini-test:generateContent?key=test-key"));
    assert!(request.contains("Generate 1 question"));
}

#[tokio::test]
async fn test_http_500_is_service_error_and_persists_nothing() {
    let (base_url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"error": {"message": "backend unavailable"}}"#.to_string(),
    )
    .await;

    let completion = Arc::new(GeminiClient::new(&config_for(&base_url)));
    let store = Arc::new(MemoryQuestionStore::new());
    let flow = GenerationFlow::new(completion, store.clone(), 10_000);

    let request =
        GenerationRequest::new(GenerationSource::Topic("Photosynthesis".to_string()), 3).unwrap();
    let session = SessionContext::new("teacher-42", "biology", 1).unwrap();

    let err = flow.run(&request, &session).await.unwrap_err();
    match err {
        AppError::Service { status, body } => {
            assert_eq!(status, Some(500));
            assert!(body.contains("backend unavailable"));
        }
        other => panic!("expected service error, got {:?}", other),
    }

    assert!(store.list_questions(None).await.unwrap().is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn test_missing_candidates_is_empty_response() {
    let (base_url, server) = serve_once("200 OK", r#"{"candidates": []}"#.to_string()).await;

    let client = GeminiClient::new(&config_for(&base_url));
    let err = client.complete("anything").await.unwrap_err();
    assert!(matches!(err, AppError::EmptyResponse { ref model } if model == "gemini-test"));

    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_service_has_no_status() {
    // 绑定后立即释放端口，连接会被拒绝
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeminiClient::new(&config_for(&format!("http://{}/v1beta", addr)));
    let err = client.complete("anything").await.unwrap_err();

    assert!(matches!(err, AppError::Service { status: None, .. }));
    assert!(!err.to_string().contains("test-key"));
}
