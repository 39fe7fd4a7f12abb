mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use std::sync::Arc;

use application::post_service::PostService;
use data::post_repository::SqlitePostRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    run_migrations(&pool).await?;

    let post_repo = Arc::new(SqlitePostRepository::new(pool.clone()));
    let post_service = PostService::new(post_repo);

    let result = server::start_rest_server(config, post_service).await;

    pool.close().await;
    info!("database pool closed");

    result
}
