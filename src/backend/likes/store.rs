/**
 * Blog Like Storage
 *
 * A like is a (blog, user) pair; each user likes a blog at most once.
 * `MemoryLikeStore` keeps the pairs in a map of sets, `PgLikeStore` in the
 * `blog_likes` table whose primary key enforces the uniqueness.
 */

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::backend::error::StoreError;

/// Like storage consumed by the like handlers
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Like the blog if the user has not, otherwise remove the like.
    /// Returns `true` if the blog is liked by the user afterwards.
    async fn toggle(&self, blog_id: &str, user_id: &str) -> Result<bool, StoreError>;

    /// Number of likes on a blog
    async fn count(&self, blog_id: &str) -> Result<u64, StoreError>;

    /// Whether the user currently likes the blog
    async fn has_liked(&self, blog_id: &str, user_id: &str) -> Result<bool, StoreError>;
}

/// In-memory like store
#[derive(Debug, Default)]
pub struct MemoryLikeStore {
    likes: RwLock<HashMap<String, HashSet<String>>>,
}

impl MemoryLikeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LikeStore for MemoryLikeStore {
    async fn toggle(&self, blog_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let mut likes = self.likes.write().await;
        let users = likes.entry(blog_id.to_string()).or_default();

        if users.remove(user_id) {
            if users.is_empty() {
                likes.remove(blog_id);
            }
            Ok(false)
        } else {
            users.insert(user_id.to_string());
            Ok(true)
        }
    }

    async fn count(&self, blog_id: &str) -> Result<u64, StoreError> {
        let likes = self.likes.read().await;
        Ok(likes.get(blog_id).map_or(0, |users| users.len() as u64))
    }

    async fn has_liked(&self, blog_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let likes = self.likes.read().await;
        Ok(likes.get(blog_id).is_some_and(|users| users.contains(user_id)))
    }
}

/// PostgreSQL like store
#[derive(Debug, Clone)]
pub struct PgLikeStore {
    pool: PgPool,
}

impl PgLikeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for PgLikeStore {
    async fn toggle(&self, blog_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM blog_likes WHERE blog_id = $1 AND user_id = $2")
            .bind(blog_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                "INSERT INTO blog_likes (blog_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(blog_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed == 0)
    }

    async fn count(&self, blog_id: &str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_likes WHERE blog_id = $1")
            .bind(blog_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn has_liked(&self, blog_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let liked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM blog_likes WHERE blog_id = $1 AND user_id = $2)",
        )
        .bind(blog_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(liked)
    }
}
