use crate::application::post_service::PostService;
use crate::data::post_repository::SqlitePostRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{BodyLimit, CreatePostRequest, CreatedPostResponse, DeletePostQuery};
use crate::presentation::middleware::request_id;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, delete, get, post, web};
use futures_util::StreamExt;
use serde_json::Value;
use tracing::info;

type Posts = web::Data<PostService<SqlitePostRepository>>;

#[get("/posts")]
pub async fn get_posts(req: HttpRequest, post: Posts) -> Result<HttpResponse, DomainError> {
    let posts = post.get_posts().await?;

    info!(
        request_id = %request_id(&req),
        total = posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[post("/post")]
pub async fn create_post(
    req: HttpRequest,
    post: Posts,
    payload: web::Payload,
) -> Result<HttpResponse, DomainError> {
    ensure_json(&req)?;
    let limit = req
        .app_data::<web::Data<BodyLimit>>()
        .map(|limit| *limit.get_ref())
        .unwrap_or_default();
    let payload = read_body(payload, limit).await?;
    let value: Value = serde_json::from_slice(&payload).map_err(|_| DomainError::InvalidJson)?;
    let CreatePostRequest { title, body } = CreatePostRequest::from_json(value)?;

    let created = post.create_post(title, body).await?;

    info!(
        request_id = %request_id(&req),
        post_id = created.post_id,
        "post created"
    );

    Ok(HttpResponse::Created().json(CreatedPostResponse {
        title: created.title,
        body: created.body,
        post_id: created.post_id,
    }))
}

#[delete("/delete_post")]
pub async fn delete_post(req: HttpRequest, post: Posts) -> Result<HttpResponse, DomainError> {
    let query = DeletePostQuery::parse(req.query_string());
    let id = query.id()?;

    post.delete_post(id).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

/// Collects the request body, refusing anything over `limit` bytes.
async fn read_body(
    mut payload: web::Payload,
    BodyLimit(limit): BodyLimit,
) -> Result<web::BytesMut, DomainError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|_| DomainError::InvalidJson)?;
        if body.len() + chunk.len() > limit {
            return Err(DomainError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Accepts `application/json` and `application/*+json`, with any parameters.
fn ensure_json(req: &HttpRequest) -> Result<(), DomainError> {
    match req.mime_type() {
        Ok(Some(ct))
            if ct.type_() == mime::APPLICATION
                && (ct.subtype() == mime::JSON || ct.suffix() == Some(mime::JSON)) =>
        {
            Ok(())
        }
        _ => Err(DomainError::InvalidContentType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::memory_pool;
    use crate::presentation::handlers::{configure, not_found};
    use actix_web::http::StatusCode;
    use actix_web::http::header::ContentType;
    use actix_web::{App, test};
    use serde_json::json;
    use sqlx::SqlitePool;
    use std::sync::Arc;

    macro_rules! test_app {
        ($pool:expr) => {
            test_app!($pool, BodyLimit::default())
        };
        ($pool:expr, $limit:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(PostService::new(Arc::new(
                        SqlitePostRepository::new($pool),
                    ))))
                    .app_data(web::Data::new($limit))
                    .configure(configure)
                    .default_service(web::to(not_found)),
            )
            .await
        };
    }

    fn create(payload: Value) -> test::TestRequest {
        test::TestRequest::post().uri("/post").set_json(payload)
    }

    fn list() -> test::TestRequest {
        test::TestRequest::get().uri("/posts")
    }

    fn remove(uri: &str) -> test::TestRequest {
        test::TestRequest::delete().uri(uri)
    }

    #[actix_web::test]
    async fn empty_store_lists_empty_array() {
        let app = test_app!(memory_pool().await);

        let res = test::call_service(&app, list().to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn create_returns_post_with_assigned_id() {
        let app = test_app!(memory_pool().await);

        let res = test::call_service(
            &app,
            create(json!({"title": "How to yodel", "body": "Practice a lot, grasshopper!"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = test::read_body(res).await;
        assert_eq!(
            body,
            r#"{"title":"How to yodel","body":"Practice a lot, grasshopper!","post_id":1}"#
                .as_bytes()
        );
    }

    #[actix_web::test]
    async fn created_posts_are_listed_in_creation_order() {
        let app = test_app!(memory_pool().await);
        let titles = ["How to yodel", "Why is the sky blue", "Third"];
        let bodies = ["Practice a lot, grasshopper!", "It only appears blue.", "..."];

        for (title, body) in titles.iter().zip(bodies) {
            let res =
                test::call_service(&app, create(json!({"title": title, "body": body})).to_request())
                    .await;
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let res = test::call_service(&app, list().to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let posts: Vec<Value> = test::read_body_json(res).await;
        assert_eq!(posts.len(), 3);
        for (i, post) in posts.iter().enumerate() {
            assert_eq!(
                *post,
                json!({"post_id": i + 1, "title": titles[i], "body": bodies[i]})
            );
        }
    }

    #[actix_web::test]
    async fn create_coerces_scalar_fields() {
        let app = test_app!(memory_pool().await);

        let res =
            test::call_service(&app, create(json!({"title": 42, "body": false})).to_request()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"title": "42", "body": "false", "post_id": 1}));
    }

    #[actix_web::test]
    async fn create_without_title_is_rejected() {
        let app = test_app!(memory_pool().await);

        let res =
            test::call_service(&app, create(json!({"body": "Just some body text."})).to_request())
                .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Please provide the title of the post!"}));
    }

    #[actix_web::test]
    async fn create_without_body_is_rejected() {
        let app = test_app!(memory_pool().await);

        let res = test::call_service(&app, create(json!({"title": "A title"})).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Please provide the body of the post!"}));
    }

    #[actix_web::test]
    async fn create_requires_json_content_type() {
        let app = test_app!(memory_pool().await);

        let req = test::TestRequest::post()
            .uri("/post")
            .insert_header(ContentType::plaintext())
            .set_payload(r#"{"title": "t", "body": "b"}"#)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Please use application/json content type!"}));

        let req = test::TestRequest::post()
            .uri("/post")
            .set_payload(r#"{"title": "t", "body": "b"}"#)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_accepts_json_with_charset() {
        let app = test_app!(memory_pool().await);

        let req = test::TestRequest::post()
            .uri("/post")
            .insert_header(("content-type", "application/json; charset=utf-8"))
            .set_payload(r#"{"title": "t", "body": "b"}"#)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn create_accepts_large_posts() {
        let app = test_app!(memory_pool().await);
        let title = "x".repeat(300_000);

        let res =
            test::call_service(&app, create(json!({"title": title, "body": "b"})).to_request())
                .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["title"].as_str().map(str::len), Some(300_000));
        assert_eq!(body["post_id"], json!(1));
    }

    #[actix_web::test]
    async fn create_over_body_limit_uses_error_envelope() {
        let app = test_app!(memory_pool().await, BodyLimit(64));

        let res = test::call_service(
            &app,
            create(json!({"title": "x".repeat(100), "body": "b"})).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "The request body is larger than 64 bytes!"}));

        let res = test::call_service(&app, list().to_request()).await;
        let posts: Vec<Value> = test::read_body_json(res).await;
        assert!(posts.is_empty());
    }

    #[actix_web::test]
    async fn create_rejects_malformed_json_and_structured_fields() {
        let app = test_app!(memory_pool().await);

        let req = test::TestRequest::post()
            .uri("/post")
            .insert_header(ContentType::json())
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Please provide a valid JSON object!"}));

        let res = test::call_service(
            &app,
            create(json!({"title": {"nested": true}, "body": "b"})).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = test::call_service(&app, list().to_request()).await;
        let posts: Vec<Value> = test::read_body_json(res).await;
        assert!(posts.is_empty());
    }

    #[actix_web::test]
    async fn delete_removes_post_once() {
        let app = test_app!(memory_pool().await);
        test::call_service(&app, create(json!({"title": "a", "body": "a"})).to_request()).await;
        test::call_service(&app, create(json!({"title": "b", "body": "b"})).to_request()).await;

        let res = test::call_service(&app, remove("/delete_post?id=1").to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert!(test::read_body(res).await.is_empty());

        let res = test::call_service(&app, list().to_request()).await;
        let posts: Vec<Value> = test::read_body_json(res).await;
        assert_eq!(posts, vec![json!({"post_id": 2, "title": "b", "body": "b"})]);

        let res = test::call_service(&app, remove("/delete_post?id=1").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "There is no blog post with id: 1 in the DB."}));
    }

    #[actix_web::test]
    async fn delete_with_repeated_id_uses_the_first() {
        let app = test_app!(memory_pool().await);
        test::call_service(&app, create(json!({"title": "a", "body": "a"})).to_request()).await;
        test::call_service(&app, create(json!({"title": "b", "body": "b"})).to_request()).await;

        let res = test::call_service(&app, remove("/delete_post?id=1&id=2").to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = test::call_service(&app, list().to_request()).await;
        let posts: Vec<Value> = test::read_body_json(res).await;
        assert_eq!(posts, vec![json!({"post_id": 2, "title": "b", "body": "b"})]);
    }

    #[actix_web::test]
    async fn delete_without_id_is_rejected() {
        let app = test_app!(memory_pool().await);

        for uri in ["/delete_post", "/delete_post?id="] {
            let res = test::call_service(&app, remove(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(res).await;
            let message = body["error"].as_str().unwrap();
            assert!(message.contains("Please provide the pk of the post to delete"));
        }
    }

    #[actix_web::test]
    async fn delete_unknown_id_is_not_found() {
        let app = test_app!(memory_pool().await);

        let res = test::call_service(&app, remove("/delete_post?id=999").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "There is no blog post with id: 999 in the DB."}));

        let res = test::call_service(&app, remove("/delete_post?id=abc").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "There is no blog post with id: abc in the DB."}));
    }

    #[actix_web::test]
    async fn new_ids_exceed_deleted_ones() {
        let app = test_app!(memory_pool().await);
        test::call_service(&app, create(json!({"title": "a", "body": "a"})).to_request()).await;
        test::call_service(&app, remove("/delete_post?id=1").to_request()).await;

        let res =
            test::call_service(&app, create(json!({"title": "b", "body": "b"})).to_request()).await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["post_id"], json!(2));
    }

    #[actix_web::test]
    async fn storage_failure_is_service_unavailable() {
        let pool: SqlitePool = memory_pool().await;
        pool.close().await;
        let app = test_app!(pool);

        let res = test::call_service(&app, list().to_request()).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());

        let res = test::call_service(&app, create(json!({"title": "t", "body": "b"})).to_request())
            .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        let res = test::call_service(&app, remove("/delete_post?id=1").to_request()).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn unknown_route_gets_json_404() {
        let app = test_app!(memory_pool().await);

        let res = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"error": "Not found"}));
    }
}
