use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{error, info};

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts in insertion order.
    async fn list_all(&self) -> Result<Vec<Post>, DomainError>;
    async fn insert(&self, post: NewPost) -> Result<Post, DomainError>;
    /// Returns `false` when no post had this id.
    async fn delete(&self, post_id: i64) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT post_id, title, body
            FROM posts
            ORDER BY post_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::from(e)
        })
    }

    async fn insert(&self, post: NewPost) -> Result<Post, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, body)
            VALUES (?, ?)
            RETURNING post_id, title, body
            "#,
        )
        .bind(post.title)
        .bind(post.body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::from(e)
        })?;

        info!(post_id = post.post_id, "post created");
        Ok(post)
    }

    async fn delete(&self, post_id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE post_id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", post_id, e);
                DomainError::from(e)
            })?;

        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        info!(post_id, "post deleted");
        Ok(true)
    }
}
