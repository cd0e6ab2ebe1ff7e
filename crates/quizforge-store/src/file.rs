//! JSON-file backed store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use quizforge_core::error::StoreError;
use quizforge_core::model::{NewQuiz, QuizRecord, UserRecord};
use quizforge_core::traits::{QuizStore, UserStore};

use crate::dataset::Dataset;

/// Store that keeps its data in memory and rewrites a JSON snapshot after
/// every mutation.
///
/// The snapshot is written to a sibling `.tmp` file and renamed over the
/// target, so a crash mid-write leaves the previous snapshot intact. A
/// mutation reaches the in-memory data only once its snapshot is written.
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<Dataset>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading an existing snapshot if present.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<Dataset>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Dataset::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(
            users = data.users.len(),
            quizzes = data.quizzes.len(),
            "opened data file {}",
            path.display()
        );
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, data: &Dataset) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!("wrote snapshot to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let user = next.create_user(email, password_hash)?;
        self.persist(&next).await?;
        *data = next;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.data.lock().await.find_user_by_email(email))
    }
}

#[async_trait]
impl QuizStore for JsonFileStore {
    async fn insert_quiz(&self, quiz: NewQuiz) -> Result<QuizRecord, StoreError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let record = next.insert_quiz(quiz);
        self.persist(&next).await?;
        *data = next;
        Ok(record)
    }

    async fn get_quiz(&self, id: Uuid) -> Result<Option<QuizRecord>, StoreError> {
        Ok(self.data.lock().await.get_quiz(id))
    }

    async fn list_quizzes(&self, owner: Uuid) -> Result<Vec<QuizRecord>, StoreError> {
        Ok(self.data.lock().await.list_quizzes(owner))
    }

    async fn delete_quiz(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        if !next.delete_quiz(id, owner) {
            return Ok(false);
        }
        self.persist(&next).await?;
        *data = next;
        Ok(true)
    }
}
