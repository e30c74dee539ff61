//! Postgres-backed document store.
//!
//! Every record lives in the single `documents` table, addressed by
//! `(container, partition_key, id)` with the record itself in a JSONB `body`.
//! Reads are point queries on the primary key or a partition scan.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::models::resume::Resume;
use crate::models::user::{normalize_email, User};
use crate::store::{ResumeStore, StoreError, UserStore, RESUMES, USERS};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_document<T: Serialize + Sync>(
        &self,
        container: &str,
        partition_key: &str,
        id: &str,
        doc: &T,
    ) -> Result<(), StoreError> {
        let body = serde_json::to_value(doc)?;
        sqlx::query(
            r#"
            INSERT INTO documents (container, partition_key, id, body, updated_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (container, partition_key, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(container)
        .bind(partition_key)
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn read_document<T: DeserializeOwned>(
        &self,
        container: &str,
        partition_key: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let body: Option<Value> = sqlx::query_scalar(
            "SELECT body FROM documents WHERE container = $1 AND partition_key = $2 AND id = $3",
        )
        .bind(container)
        .bind(partition_key)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body.map(serde_json::from_value).transpose()?)
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl UserStore for PgDocumentStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let body = serde_json::to_value(user)?;
        let inserted = sqlx::query(
            "INSERT INTO documents (container, partition_key, id, body) VALUES ($1, $2, $3, $4)",
        )
        .bind(USERS)
        .bind(&user.user_id)
        .bind(&user.id)
        .bind(body)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(format!(
                "email {} already registered",
                user.email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let body: Option<Value> = sqlx::query_scalar(
            "SELECT body FROM documents WHERE container = $1 AND body->>'email' = $2 LIMIT 1",
        )
        .bind(USERS)
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;
        Ok(body.map(serde_json::from_value).transpose()?)
    }

    async fn get(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let body: Option<Value> = sqlx::query_scalar(
            "SELECT body FROM documents WHERE container = $1 AND partition_key = $2 LIMIT 1",
        )
        .bind(USERS)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body.map(serde_json::from_value).transpose()?)
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let body = serde_json::to_value(user)?;
        let result = sqlx::query(
            r#"
            UPDATE documents SET body = $4, updated_at = now()
            WHERE container = $1 AND partition_key = $2 AND id = $3
            "#,
        )
        .bind(USERS)
        .bind(&user.user_id)
        .bind(&user.id)
        .bind(body)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                container: USERS,
                id: user.user_id.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for PgDocumentStore {
    async fn upsert(&self, resume: &Resume) -> Result<(), StoreError> {
        self.upsert_document(RESUMES, &resume.user_id, &resume.id, resume)
            .await
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Resume>, StoreError> {
        self.read_document(RESUMES, user_id, id).await
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Resume>, StoreError> {
        let bodies: Vec<Value> = sqlx::query_scalar(
            r#"
            SELECT body FROM documents
            WHERE container = $1 AND partition_key = $2
            ORDER BY updated_at DESC
            "#,
        )
        .bind(RESUMES)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        bodies
            .into_iter()
            .map(|body| serde_json::from_value(body).map_err(StoreError::from))
            .collect()
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE container = $1 AND partition_key = $2 AND id = $3",
        )
        .bind(RESUMES)
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
