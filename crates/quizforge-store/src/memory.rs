//! In-memory store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quizforge_core::error::StoreError;
use quizforge_core::model::{NewQuiz, QuizRecord, UserRecord};
use quizforge_core::traits::{QuizStore, UserStore};

use crate::dataset::Dataset;

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        self.data.write().await.create_user(email, password_hash)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.data.read().await.find_user_by_email(email))
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn insert_quiz(&self, quiz: NewQuiz) -> Result<QuizRecord, StoreError> {
        Ok(self.data.write().await.insert_quiz(quiz))
    }

    async fn get_quiz(&self, id: Uuid) -> Result<Option<QuizRecord>, StoreError> {
        Ok(self.data.read().await.get_quiz(id))
    }

    async fn list_quizzes(&self, owner: Uuid) -> Result<Vec<QuizRecord>, StoreError> {
        Ok(self.data.read().await.list_quizzes(owner))
    }

    async fn delete_quiz(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        Ok(self.data.write().await.delete_quiz(id, owner))
    }
}
