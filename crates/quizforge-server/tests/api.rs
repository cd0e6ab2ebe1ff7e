//! End-to-end tests of the REST API against a mock provider and an
//! in-memory store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use quizforge_core::chat::{ChatConfig, ChatService};
use quizforge_core::generator::{GeneratorConfig, QuizGenerator, RetryPolicy};
use quizforge_providers::mock::MockProvider;
use quizforge_server::{router, AppState, AuthConfig};
use quizforge_store::MemoryStore;

const COMPLETION: &str = "Here are your questions:

**1. What is 2 + 2?**
- a) 3
- b) 4
- c) 5
- d) 6
**Answer: b**

**2. Which planet is the largest?**
- a) Mars
- b) Venus
- c) Jupiter
- d) Earth
**Answer: c**";

fn app_with(provider: Arc<MockProvider>) -> Router {
    let generator = QuizGenerator::new(
        provider.clone(),
        GeneratorConfig {
            retry: RetryPolicy {
                max_retries: 0,
                retry_delay: Duration::from_millis(1),
            },
            ..Default::default()
        },
    );
    let chat = ChatService::new(provider, ChatConfig::default());
    let auth = AuthConfig::new("test-secret", Duration::from_secs(3600))
        .unwrap()
        .with_bcrypt_cost(4);
    router(AppState::new(
        Arc::new(MemoryStore::new()),
        generator,
        chat,
        auth,
    ))
}

fn app() -> Router {
    app_with(Arc::new(MockProvider::with_fixed_response(COMPLETION)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": email, "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health() {
    let (status, body) = send(&app(), Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn register_and_login() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "Dana@Example.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Registration successful");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "dana@example.com", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "User already exists");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "dana@example.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Login successful");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "dana@example.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Invalid credentials");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Invalid credentials");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/my-quizzes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "No token, authorization denied");

    let request = Request::builder()
        .uri("/api/my-quizzes")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["msg"], "Invalid token format.");

    let (status, body) = send(&app, Method::GET, "/api/my-quizzes", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Token is not valid or expired");
}

#[tokio::test]
async fn quiz_lifecycle() {
    let provider = Arc::new(MockProvider::with_fixed_response(COMPLETION));
    let app = app_with(provider.clone());
    let owner = register(&app, "owner@example.com").await;
    let stranger = register(&app, "stranger@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-quiz",
        Some(&owner),
        Some(json!({"title": "General knowledge", "numQuestions": 2, "difficulty": "easy"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let quiz_id = body["quizId"].as_str().unwrap().to_string();
    assert_eq!(
        body["questions"][0],
        json!({"question": "What is 2 + 2?", "a": "3", "b": "4", "c": "5", "d": "6", "answer": "b"})
    );
    assert_eq!(body["questions"][1]["answer"], "c");

    let prompt = &provider.last_request().unwrap().messages[0].content;
    assert!(prompt.contains("Generate 2 easy level multiple-choice quiz questions"));

    let (status, body) = send(&app, Method::GET, "/api/my-quizzes", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "General knowledge");
    assert_eq!(body[0]["numQuestions"], 2);

    let (_, body) = send(&app, Method::GET, "/api/my-quizzes", Some(&stranger), None).await;
    assert_eq!(body, json!([]));

    // Shared quizzes are readable without a token.
    let uri = format!("/api/quiz/{quiz_id}");
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], quiz_id.as_str());
    assert!(body["userId"].is_string());

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["msg"],
        "Quiz not found or you do not have permission to delete it."
    );

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Quiz deleted successfully");

    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Quiz not found");
}

#[tokio::test]
async fn generate_quiz_validates_input() {
    let provider = Arc::new(MockProvider::with_fixed_response(COMPLETION));
    let app = app_with(provider.clone());
    let token = register(&app, "val@example.com").await;

    let cases = [
        json!({"title": "Rust", "numQuestions": 5}),
        json!({"numQuestions": 5, "difficulty": "easy"}),
        json!({"title": "Rust", "numQuestions": 0, "difficulty": "easy"}),
        json!({"title": "Rust", "numQuestions": 51, "difficulty": "easy"}),
        json!({"title": "   ", "numQuestions": 5, "difficulty": "easy"}),
        json!({"title": "Rust", "numQuestions": 5, "difficulty": "impossible"}),
    ];
    for case in cases {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/generate-quiz",
            Some(&token),
            Some(case.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert!(body["error"].is_string(), "{case}");
    }
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn unparseable_completion_is_not_saved() {
    let app = app_with(Arc::new(MockProvider::with_fixed_response(
        "I'm sorry, I can't produce a quiz on that topic.",
    )));
    let token = register(&app, "empty@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generate-quiz",
        Some(&token),
        Some(json!({"title": "Nothing", "numQuestions": 3, "difficulty": "hard"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to parse any questions from the model response."
    );

    let (_, body) = send(&app, Method::GET, "/api/my-quizzes", Some(&token), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn malformed_quiz_id() {
    let (status, body) = send(&app(), Method::GET, "/api/quiz/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid Quiz ID format.");
}

#[tokio::test]
async fn chat() {
    let provider = Arc::new(MockProvider::with_fixed_response("Ownership moves values."));
    let app = app_with(provider.clone());
    let token = register(&app, "chat@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chat",
        Some(&token),
        Some(json!({"messages": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "No messages provided for chat.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chat",
        Some(&token),
        Some(json!({"messages": [{"role": "user", "content": "What is ownership?"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Ownership moves values.");

    let request = provider.last_request().unwrap();
    assert_eq!(request.model, "deepseek/deepseek-chat-v3-0324:free");
    assert_eq!(request.messages.len(), 2);
}

#[tokio::test]
async fn chat_reports_provider_auth_failure() {
    let app = app_with(Arc::new(MockProvider::rejecting_auth()));
    let token = register(&app, "badkey@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chat",
        Some(&token),
        Some(json!({"messages": [{"role": "user", "content": "hi"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["msg"], "AI API authentication failed. Check your API key.");
}
