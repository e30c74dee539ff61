use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::resume::Resume;
use crate::models::user::{normalize_email, User};
use crate::store::{ResumeStore, StoreError, UserStore, USERS};

/// Process-local document store for development and tests. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    /// Keyed by (partition key, id).
    resumes: RwLock<HashMap<(String, String), Resume>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {} already registered", user.email)));
        }
        users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.user_id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                container: USERS,
                id: user.user_id.clone(),
            }),
        }
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn upsert(&self, resume: &Resume) -> Result<(), StoreError> {
        self.resumes.write().await.insert(
            (resume.user_id.clone(), resume.id.clone()),
            resume.clone(),
        );
        Ok(())
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Resume>, StoreError> {
        let key = (user_id.to_string(), id.to_string());
        Ok(self.resumes.read().await.get(&key).cloned())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Resume>, StoreError> {
        let mut found: Vec<Resume> = self
            .resumes
            .read()
            .await
            .iter()
            .filter(|((partition, _), _)| partition == user_id)
            .map(|(_, resume)| resume.clone())
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<bool, StoreError> {
        let key = (user_id.to_string(), id.to_string());
        Ok(self.resumes.write().await.remove(&key).is_some())
    }
}
