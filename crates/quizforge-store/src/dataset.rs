//! The collection of users and quizzes shared by both stores.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizforge_core::error::StoreError;
use quizforge_core::model::{normalize_email, NewQuiz, QuizRecord, UserRecord};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Dataset {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub quizzes: Vec<QuizRecord>,
}

impl Dataset {
    pub fn create_user(&mut self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError> {
        let email = normalize_email(email);
        if self.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email));
        }
        let user = UserRecord {
            id: Uuid::new_v4(),
            email,
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<UserRecord> {
        let email = normalize_email(email);
        self.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn insert_quiz(&mut self, quiz: NewQuiz) -> QuizRecord {
        let record = QuizRecord {
            id: Uuid::new_v4(),
            title: quiz.title,
            num_questions: quiz.num_questions,
            questions: quiz.questions,
            owner: quiz.owner,
            created_at: Utc::now(),
        };
        self.quizzes.push(record.clone());
        record
    }

    pub fn get_quiz(&self, id: Uuid) -> Option<QuizRecord> {
        self.quizzes.iter().find(|q| q.id == id).cloned()
    }

    /// Newest first; quizzes created in the same instant keep reverse
    /// insertion order.
    pub fn list_quizzes(&self, owner: Uuid) -> Vec<QuizRecord> {
        let mut quizzes: Vec<QuizRecord> = self
            .quizzes
            .iter()
            .rev()
            .filter(|q| q.owner == owner)
            .cloned()
            .collect();
        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        quizzes
    }

    pub fn delete_quiz(&mut self, id: Uuid, owner: Uuid) -> bool {
        let before = self.quizzes.len();
        self.quizzes.retain(|q| !(q.id == id && q.owner == owner));
        self.quizzes.len() != before
    }
}
