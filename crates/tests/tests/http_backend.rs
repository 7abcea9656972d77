use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use appscout_core::{classify_fallback, ClassificationSource, Intent, LlmSettings};
use appscout_ml::{
    ClassifierError, ClassifierStack, CompletionBackend, IntentClassifier,
    OpenAiCompatibleBackend, StatusKind, CLASSIFICATION_PROMPT,
};
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Mutex;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    delay: Duration,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn completions(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    stub.seen.lock().await.push((auth, body));

    tokio::time::sleep(stub.delay).await;
    (stub.status, Json(stub.body.clone())).into_response()
}

async fn spawn_stub(status: StatusCode, body: Value, delay: Duration) -> (SocketAddr, Stub) {
    let stub = Stub {
        status,
        body,
        delay,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, stub)
}

fn settings_for(addr: SocketAddr, timeout: Duration) -> LlmSettings {
    LlmSettings {
        api_key: Some("gsk_test".to_string()),
        base_url: format!("http://{addr}/v1"),
        timeout,
        ..LlmSettings::default()
    }
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

#[tokio::test]
async fn sends_prompt_model_and_bearer_token() {
    let (addr, stub) = spawn_stub(StatusCode::OK, completion("problem_report"), Duration::ZERO).await;
    let backend = OpenAiCompatibleBackend::new(&settings_for(addr, Duration::from_secs(5))).unwrap();

    let answer = backend
        .complete(CLASSIFICATION_PROMPT, "عندي مشكلة")
        .await
        .unwrap();
    assert_eq!(answer, "problem_report");

    let seen = stub.seen.lock().await;
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer gsk_test"));
    assert_eq!(body["model"], "llama3-8b-8192");
    assert_eq!(body["temperature"].as_f64(), Some(0.0));
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], CLASSIFICATION_PROMPT);
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "عندي مشكلة");
}

#[tokio::test]
async fn stack_classifies_through_http() {
    let (addr, _stub) =
        spawn_stub(StatusCode::OK, completion("  'Greeting_Or_Chat' "), Duration::ZERO).await;
    let stack = ClassifierStack::from_settings(&settings_for(addr, Duration::from_secs(5)));
    assert!(stack.remote_enabled);

    let prediction = stack.classifier.predict("هلو").await;
    assert_eq!(prediction.intent, Intent::GreetingOrChat);
    assert_eq!(prediction.source, ClassificationSource::Remote);
    assert_eq!(prediction.model, "llama3-8b-8192");
}

#[tokio::test]
async fn rate_limit_status_is_classified() {
    let (addr, _stub) = spawn_stub(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "Rate limit reached" } }),
        Duration::ZERO,
    )
    .await;
    let backend = OpenAiCompatibleBackend::new(&settings_for(addr, Duration::from_secs(5))).unwrap();

    match backend.complete(CLASSIFICATION_PROMPT, "x").await {
        Err(ClassifierError::Status { kind, status, body }) => {
            assert_eq!(kind, StatusKind::RateLimit);
            assert_eq!(status, 429);
            assert!(body.contains("Rate limit reached"));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn auth_failure_falls_back_to_keywords() {
    let (addr, _stub) = spawn_stub(
        StatusCode::UNAUTHORIZED,
        json!({ "error": { "message": "Invalid API Key" } }),
        Duration::ZERO,
    )
    .await;
    let stack = ClassifierStack::from_settings(&settings_for(addr, Duration::from_secs(5)));

    let text = "أريد برنامج لـ الرسم";
    let prediction = stack.classifier.predict(text).await;
    assert_eq!(prediction.intent, classify_fallback(text));
    assert_eq!(prediction.intent, Intent::AppRecommendation);
    assert_eq!(prediction.source, ClassificationSource::Fallback);
}

#[tokio::test]
async fn empty_choices_fall_back() {
    let (addr, _stub) = spawn_stub(StatusCode::OK, json!({ "choices": [] }), Duration::ZERO).await;
    let stack = ClassifierStack::from_settings(&settings_for(addr, Duration::from_secs(5)));

    let prediction = stack.classifier.predict("عطل بالشاشة").await;
    assert_eq!(prediction.intent, Intent::ProblemReport);
    assert_eq!(prediction.source, ClassificationSource::Fallback);
}

#[tokio::test]
async fn slow_backend_times_out_and_falls_back() {
    let (addr, _stub) =
        spawn_stub(StatusCode::OK, completion("greeting_or_chat"), Duration::from_secs(3)).await;
    let settings = settings_for(addr, Duration::from_millis(200));

    let backend = OpenAiCompatibleBackend::new(&settings).unwrap();
    let err = backend.complete(CLASSIFICATION_PROMPT, "x").await.unwrap_err();
    assert!(matches!(err, ClassifierError::Timeout), "got {err:?}");

    let stack = ClassifierStack::from_settings(&settings);
    let prediction = stack.classifier.predict("هلو").await;
    assert_eq!(prediction.intent, Intent::AppSearch);
    assert_eq!(prediction.source, ClassificationSource::Fallback);
}

#[tokio::test]
async fn unreachable_backend_falls_back() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let stack = ClassifierStack::from_settings(&settings_for(addr, Duration::from_secs(2)));
    let prediction = stack.classifier.predict("عندي مشكلة").await;
    assert_eq!(prediction.intent, Intent::ProblemReport);
    assert_eq!(prediction.source, ClassificationSource::Fallback);
}
