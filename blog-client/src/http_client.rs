use crate::Post;
use crate::error::BlogClientError;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

#[derive(Clone)]
pub struct BlogClientHttp {
    client: Client,
    base_url: String,
}

impl BlogClientHttp {
    pub fn connect(endpoint: &str) -> Result<Self, BlogClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn sanity(&self) -> Result<String, BlogClientError> {
        let resp = self.client.get(self.url("/sanity")).send().await?;

        if resp.status().is_success() {
            Ok(resp.text().await?)
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, BlogClientError> {
        let resp = self.client.get(self.url("/posts")).send().await?;

        if resp.status().is_success() {
            let posts: Vec<Post> = resp.json().await?;
            debug!(count = posts.len(), "posts fetched");
            Ok(posts)
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    pub async fn create_post(&self, title: String, body: String) -> Result<Post, BlogClientError> {
        let resp = self
            .client
            .post(self.url("/post"))
            .json(&json!({
                "title": title,
                "body": body,
            }))
            .send()
            .await?;

        if resp.status().is_success() {
            let post: Post = resp.json().await?;
            debug!(post_id = post.post_id, "post created");
            Ok(post)
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), BlogClientError> {
        let resp = self
            .client
            .delete(self.url("/delete_post"))
            .query(&[("id", id)])
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }
}
