pub mod health;
pub mod post;

use actix_web::{HttpResponse, web};
use serde_json::json;

/// Registers every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::sanity)
        .service(post::get_posts)
        .service(post::create_post)
        .service(post::delete_post);
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Not found" }))
}
