//! HTTP client for the blog post service.

mod error;
mod http_client;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::BlogClientError;
pub use http_client::BlogClientHttp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: i64,
    pub title: String,
    pub body: String,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}\n{}", self.post_id, self.title, self.body)
    }
}
