use crate::domain::error::DomainError;
use actix_web::web;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Upper bound on request bodies read by the create handler.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

impl Default for BodyLimit {
    fn default() -> Self {
        Self(DEFAULT_MAX_BODY_BYTES)
    }
}

// ======================= POSTS =======================

#[derive(Debug, PartialEq, Eq)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

impl CreatePostRequest {
    /// Validates a decoded request body. Title is checked completely before
    /// body, so a body with a bad title and no body reports the title.
    pub fn from_json(value: Value) -> Result<Self, DomainError> {
        let Value::Object(mut fields) = value else {
            return Err(DomainError::InvalidJson);
        };

        let title = take_field(&mut fields, "title", DomainError::MissingTitle)?;
        let body = take_field(&mut fields, "body", DomainError::MissingBody)?;

        Ok(Self { title, body })
    }
}

fn take_field(
    fields: &mut Map<String, Value>,
    name: &'static str,
    missing: DomainError,
) -> Result<String, DomainError> {
    let value = fields.remove(name).ok_or(missing)?;
    coerce_scalar(value).ok_or(DomainError::InvalidField(name))
}

/// Strings are kept verbatim, numbers and booleans become their JSON text.
/// `null`, arrays and objects have no string form.
pub fn coerce_scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Field order is part of the response contract.
#[derive(Debug, Serialize)]
pub struct CreatedPostResponse {
    pub title: String,
    pub body: String,
    pub post_id: i64,
}

#[derive(Debug)]
pub struct DeletePostQuery {
    pub id: Option<String>,
}

impl DeletePostQuery {
    /// Keeps the first `id` when it is repeated. An undecodable query string
    /// carries no usable id.
    pub fn parse(query: &str) -> Self {
        let id = web::Query::<Vec<(String, String)>>::from_query(query)
            .ok()
            .and_then(|pairs| pairs.into_inner().into_iter().find(|(key, _)| key == "id"))
            .map(|(_, value)| value);
        Self { id }
    }

    pub fn id(&self) -> Result<&str, DomainError> {
        self.id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(DomainError::MissingId)
    }
}
