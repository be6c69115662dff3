use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{PostDraft, PostRecord, PostStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    excerpt TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL,
    featured INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
)
"#;

const COLUMNS: &str = "id, title, slug, excerpt, content, featured, created_at";

pub struct SqlitePostStore {
    pool: sqlx::SqlitePool,
}

impl SqlitePostStore {
    /// Opens (creating if needed) the database and its `posts` table.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = sqlx::sqlite::SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // `:memory:` databases live and die with their connection.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        info!(url, "opened post store");
        Ok(Self { pool })
    }
}

impl PostStore for SqlitePostStore {
    async fn create(&self, draft: &PostDraft, created_at: DateTime<Utc>) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO posts (title, slug, excerpt, content, featured, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.title)
        .bind(&draft.slug)
        .bind(&draft.excerpt)
        .bind(&draft.content)
        .bind(draft.featured)
        .bind(created_at)
        .execute(&self.pool)
        .await?;
        let id = result.last_insert_rowid();
        debug!(id, slug = draft.slug, "inserted post");
        Ok(id)
    }

    async fn update(&self, id: i64, draft: &PostDraft) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE posts SET title = ?, slug = ?, excerpt = ?, content = ?, featured = ? WHERE id = ?",
        )
        .bind(&draft.title)
        .bind(&draft.slug)
        .bind(&draft.excerpt)
        .bind(&draft.content)
        .bind(draft.featured)
        .bind(id)
        .execute(&self.pool)
        .await?;
        debug!(id, rows = result.rows_affected(), "updated post");
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64) -> Result<Option<PostRecord>, StoreError> {
        let statement = format!("SELECT {COLUMNS} FROM posts WHERE id = ?");
        Ok(sqlx::query_as::<_, PostRecord>(&statement)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self) -> Result<Vec<PostRecord>, StoreError> {
        let statement = format!("SELECT {COLUMNS} FROM posts ORDER BY created_at DESC, id DESC");
        Ok(sqlx::query_as::<_, PostRecord>(&statement)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn unfeature_all(&self) -> Result<(), StoreError> {
        sqlx::query("UPDATE posts SET featured = 0 WHERE featured != 0")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn draft(title: &str, featured: bool) -> PostDraft {
        PostDraft {
            title: title.into(),
            slug: crate::derive::slug(title),
            excerpt: String::new(),
            content: format!("<p>{title}</p>"),
            featured,
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_get_list() {
        let store = SqlitePostStore::open("sqlite::memory:").await.unwrap();
        let first = store.create(&draft("First", false), at(1)).await.unwrap();
        let second = store.create(&draft("Second", true), at(2)).await.unwrap();

        let post = store.get(first).await.unwrap().unwrap();
        assert_eq!(post.slug, "first");
        assert_eq!(post.created_at, at(1));
        assert!(!post.featured);

        let ids = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(store.get(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_delete_unfeature() {
        let store = SqlitePostStore::open("sqlite::memory:").await.unwrap();
        let id = store.create(&draft("Old", true), at(1)).await.unwrap();

        assert!(store.update(id, &draft("New", true)).await.unwrap());
        assert!(!store.update(id + 1, &draft("New", true)).await.unwrap());
        let post = store.get(id).await.unwrap().unwrap();
        assert_eq!(post.title, "New");
        assert_eq!(post.created_at, at(1));

        store.unfeature_all().await.unwrap();
        assert!(!store.get(id).await.unwrap().unwrap().featured);

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
