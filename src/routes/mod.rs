use axum::{routing::get, Router};
use mongodb::Database;
use std::sync::Arc;

use crate::config::Config;
use crate::services::test_service::TestService;
use crate::store::mongo::{MongoQuestionStore, MongoResultStore, MongoTestStore};


#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check OK")
    )
)]
pub async fn health_check() -> &'static str {
    "OK"
}

pub fn init_routes(db: Arc<Database>, config: Arc<Config>) -> Router {
    let test_store = Arc::new(MongoTestStore::new(db.clone()));
    let question_store = Arc::new(MongoQuestionStore::new(db.clone()));
    let result_store = Arc::new(MongoResultStore::new(db));

    let test_service = Arc::new(TestService::new(test_store, question_store, result_store));

    Router::new()
        .route("/health", get(health_check))
        .merge(tests::test_routes(test_service, config))
}
