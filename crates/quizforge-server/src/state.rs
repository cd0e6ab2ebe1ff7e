//! Shared handler state.

use std::sync::Arc;

use axum::extract::FromRef;

use quizforge_core::chat::ChatService;
use quizforge_core::generator::QuizGenerator;
use quizforge_core::traits::{QuizStore, UserStore};

use crate::auth::AuthConfig;

/// Application state for the REST API server.
///
/// Cheap to clone; every field is reference counted.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub quizzes: Arc<dyn QuizStore>,
    pub generator: Arc<QuizGenerator>,
    pub chat: Arc<ChatService>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    /// Build state around a single store serving both users and quizzes.
    pub fn new<S>(store: Arc<S>, generator: QuizGenerator, chat: ChatService, auth: AuthConfig) -> Self
    where
        S: UserStore + QuizStore + 'static,
    {
        Self {
            users: store.clone(),
            quizzes: store,
            generator: Arc::new(generator),
            chat: Arc::new(chat),
            auth: Arc::new(auth),
        }
    }
}
