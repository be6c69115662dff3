//! Post persistence and the signed-in user handle.

pub mod sqlite;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use sqlite::SqlitePostStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] sqlx::Error),
}

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// The writable fields of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured: bool,
}

pub trait PostStore {
    /// Inserts a post and returns its id.
    fn create(
        &self,
        draft: &PostDraft,
        created_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Returns `false` when no post has this id.
    fn update(
        &self,
        id: i64,
        draft: &PostDraft,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Returns `false` when no post has this id.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Option<PostRecord>, StoreError>> + Send;

    /// All posts, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<PostRecord>, StoreError>> + Send;

    fn unfeature_all(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// The authenticated author. Publishing requires one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
}

impl CurrentUser {
    pub const ENV: &str = "BLOGSMITH_USER";

    pub fn from_env() -> Option<Self> {
        std::env::var(Self::ENV)
            .ok()
            .map(|email| email.trim().to_owned())
            .filter(|email| !email.is_empty())
            .map(|email| Self { email })
    }
}
