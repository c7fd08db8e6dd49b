//! Insight generation against a local axum stub of the chat completions API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_client::OpenAi;
use axum::{http::StatusCode, routing::post, Json, Router};
use commentlens::insight::NO_RESPONSE;
use commentlens::testing::MockCommentSource;
use commentlens::{AnalyzeError, Analyzer, GroqInsightGenerator, InsightGenerator, InsightSettings};
use serde_json::Value;

type Seen = Arc<Mutex<Vec<Value>>>;

async fn spawn_stub(status: StatusCode, response: &'static str) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().route(
        "/chat/completions",
        post(move |Json(body): Json<Value>| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(body);
                (status, response)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), seen)
}

fn generator(base_url: String) -> GroqInsightGenerator {
    let ai = OpenAi::groq("gsk-test", "llama3-8b-8192")
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5));
    GroqInsightGenerator::new(ai, InsightSettings::default())
}

#[tokio::test]
async fn sends_fixed_request_shape_and_returns_content() {
    let (base, seen) = spawn_stub(
        StatusCode::OK,
        r#"{"choices":[{"message":{"role":"assistant","content":"Positive Reach: 80%..."}}]}"#,
    )
    .await;

    let insight = generator(base)
        .summarize("Great video!\nfollow me for more\nNice!!")
        .await
        .unwrap();
    assert_eq!(insight, "Positive Reach: 80%...");

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let body = &requests[0];
    assert_eq!(body["model"], "llama3-8b-8192");
    assert_eq!(body["max_tokens"], 350);
    assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(
        body["messages"][0]["content"],
        "You are an expert social media analyst."
    );
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("Great video!\nfollow me for more\nNice!!"));
}

#[tokio::test]
async fn missing_content_falls_back() {
    let (base, _) = spawn_stub(StatusCode::OK, r#"{"choices":[]}"#).await;

    let insight = generator(base).summarize("hello").await.unwrap();
    assert_eq!(insight, NO_RESPONSE);
}

#[tokio::test]
async fn rate_limit_surfaces_through_pipeline() {
    let (base, seen) = spawn_stub(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":{"message":"Rate limit reached"}}"#,
    )
    .await;

    let analyzer = Analyzer::new(
        Box::new(MockCommentSource::returning(["Great video!", "follow me for more"])),
        Box::new(generator(base)),
    );

    let err = analyzer
        .analyze("https://www.youtube.com/watch?v=abc123")
        .await
        .unwrap_err();

    match err {
        AnalyzeError::Analysis { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("Rate limit reached"));
        }
        other => panic!("expected analysis error, got {other:?}"),
    }
    assert_eq!(seen.lock().unwrap().len(), 1, "no retry");
}

#[tokio::test]
async fn configured_model_is_sent() {
    let (base, seen) = spawn_stub(StatusCode::OK, r#"{"choices":[]}"#).await;

    let ai = OpenAi::groq("gsk-test", "llama3-8b-8192").with_base_url(base);
    let settings = InsightSettings {
        model: "llama-3.1-8b-instant".to_string(),
        ..InsightSettings::default()
    };
    GroqInsightGenerator::new(ai, settings)
        .summarize("nice")
        .await
        .unwrap();

    let requests = seen.lock().unwrap();
    assert_eq!(requests[0]["model"], "llama-3.1-8b-instant");
}
