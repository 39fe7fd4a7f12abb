use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post};
use tracing::instrument;

#[derive(Clone)]
pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_all().await
    }

    #[instrument(skip(self, body))]
    pub async fn create_post(&self, title: String, body: String) -> Result<Post, DomainError> {
        self.repo.insert(NewPost::new(title, body)).await
    }

    /// `raw_id` is the id exactly as the client sent it; it is echoed back in
    /// the not-found message.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, raw_id: &str) -> Result<(), DomainError> {
        let not_found = || DomainError::PostNotFound(raw_id.to_string());
        let post_id: i64 = raw_id.trim().parse().map_err(|_| not_found())?;

        if self.repo.delete(post_id).await? {
            Ok(())
        } else {
            Err(not_found())
        }
    }
}
