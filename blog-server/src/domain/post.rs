use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Post {
    pub post_id: i64,
    pub title: String,
    pub body: String,
}

/// A post that has not been stored yet. The id is assigned by storage on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

impl NewPost {
    pub fn new(title: String, body: String) -> Self {
        Self { title, body }
    }
}
