//! Request handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizforge_core::error::{ParseError, ProviderError};
use quizforge_core::model::{Difficulty, NewQuiz, ParsedQuestion, QuizRecord, QuizRequest};
use quizforge_core::traits::ChatMessage;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub msg: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}

/// Body of a quiz generation request. Fields are optional so that missing
/// ones produce the API's own 400 instead of an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizBody {
    pub title: Option<String>,
    pub num_questions: Option<u32>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizResponse {
    pub quiz_id: Uuid,
    pub questions: Vec<ParsedQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        message: "quizforge API is alive".into(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (email, password) = require_credentials(&body)?;

    if state.users.find_user_by_email(email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".into()));
    }

    let hash = state.auth.hash_password(password).await?;
    let user = state.users.create_user(email, &hash).await?;
    tracing::info!(user = %user.id, "registered user");

    Ok(Json(TokenResponse {
        token: state.auth.issue_token(user.id)?,
        msg: "Registration successful",
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    let invalid = || ApiError::BadRequest("Invalid credentials".into());
    let (email, password) = require_credentials(&body)?;

    let user = state.users.find_user_by_email(email).await?.ok_or_else(invalid)?;
    if !state.auth.verify_password(password, &user.password_hash).await? {
        return Err(invalid());
    }

    Ok(Json(TokenResponse {
        token: state.auth.issue_token(user.id)?,
        msg: "Login successful",
    }))
}

fn require_credentials(body: &Credentials) -> Result<(&str, &str), ApiError> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }
    Ok((email, &body.password))
}

pub async fn generate_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<GenerateQuizBody>,
) -> Result<Json<GenerateQuizResponse>, ApiError> {
    let (Some(title), Some(num_questions), Some(difficulty)) =
        (body.title, body.num_questions, body.difficulty)
    else {
        return Err(ApiError::InvalidInput(
            "Missing title or number of questions".into(),
        ));
    };
    let difficulty: Difficulty = difficulty.parse().map_err(ApiError::InvalidInput)?;
    let request = QuizRequest::new(title.trim(), num_questions, difficulty);
    request.validate().map_err(ApiError::InvalidInput)?;

    let generated = state.generator.generate(&request).await.map_err(|e| {
        if e.downcast_ref::<ParseError>().is_some() {
            ApiError::Internal("Failed to parse any questions from the model response.".into())
        } else {
            tracing::error!("quiz generation failed: {e:#}");
            ApiError::Internal("Failed to generate quiz due to an unexpected server error.".into())
        }
    })?;

    let record = state
        .quizzes
        .insert_quiz(NewQuiz {
            title: request.title,
            num_questions: request.num_questions,
            questions: generated.questions,
            owner: user.id,
        })
        .await?;
    tracing::info!(
        quiz = %record.id,
        questions = record.questions.len(),
        discarded = generated.discarded.len(),
        "saved quiz"
    );

    Ok(Json(GenerateQuizResponse {
        quiz_id: record.id,
        questions: record.questions,
    }))
}

pub async fn my_quizzes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<QuizRecord>>, ApiError> {
    Ok(Json(state.quizzes.list_quizzes(user.id).await?))
}

pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuizRecord>, ApiError> {
    let id = parse_quiz_id(&id)?;
    state
        .quizzes
        .get_quiz(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))
}

pub async fn delete_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_quiz_id(&id)?;
    if !state.quizzes.delete_quiz(id, user.id).await? {
        return Err(ApiError::NotOwned(
            "Quiz not found or you do not have permission to delete it.".into(),
        ));
    }
    tracing::info!(quiz = %id, "deleted quiz");
    Ok(Json(MessageResponse {
        msg: "Quiz deleted successfully",
    }))
}

fn parse_quiz_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidInput("Invalid Quiz ID format.".into()))
}

pub async fn chat(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    if body.messages.is_empty() {
        return Err(ApiError::BadRequest("No messages provided for chat.".into()));
    }

    let reply = state.chat.reply(&body.messages).await.map_err(|e| {
        tracing::error!("chat failed: {e:#}");
        match e.downcast_ref::<ProviderError>() {
            Some(ProviderError::AuthenticationFailed(_)) => {
                ApiError::Upstream("AI API authentication failed. Check your API key.".into())
            }
            _ => ApiError::Upstream(
                "AI model failed to generate a response. Please try again or rephrase.".into(),
            ),
        }
    })?;

    Ok(Json(ChatResponse { reply }))
}
