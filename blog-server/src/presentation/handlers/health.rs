use actix_web::{HttpResponse, get};

pub const SANITY_MESSAGE: &str = "Sanity still intact.";

#[get("/sanity")]
pub async fn sanity() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::TEXT_PLAIN_UTF_8)
        .body(SANITY_MESSAGE)
}
