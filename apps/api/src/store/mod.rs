//! Persistence seams. Handlers only see these traits; `main` picks the backends.
//!
//! Carried in `AppState` as `Arc<dyn UserStore>`, `Arc<dyn ResumeStore>` and
//! `Arc<dyn BlobStore>`.

pub mod blob;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::models::resume::Resume;
use crate::models::user::User;

pub use blob::{MemoryBlobStore, S3BlobStore};
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Container holding user accounts, partitioned by `userId`.
pub const USERS: &str = "users";
/// Container holding resumes, partitioned by `userId`.
pub const RESUMES: &str = "resumes";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{container} document {id} not found")]
    NotFound { container: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("blob storage error: {0}")]
    Blob(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new account. Fails with `Conflict` if the email is taken.
    async fn create(&self, user: &User) -> Result<(), StoreError>;

    /// Looks up by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn get(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Replaces an existing account. Fails with `NotFound` if absent.
    async fn update(&self, user: &User) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn upsert(&self, resume: &Resume) -> Result<(), StoreError>;

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Resume>, StoreError>;

    /// All resumes in the partition, most recently updated first.
    async fn list(&self, user_id: &str) -> Result<Vec<Resume>, StoreError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, user_id: &str, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), StoreError>;

    /// Returns `false` when the object did not exist.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Time-limited URL a browser can GET the object from.
    async fn url(&self, key: &str) -> Result<String, StoreError>;
}
