use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;
use utoipa::{openapi::{security::{HttpAuthScheme, HttpBuilder, SecurityScheme}, SecurityRequirement}, Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, routes::init_routes};

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod store;
mod utils;
mod validation;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health_check,
        routes::tests::get_tests,
        routes::tests::get_test_by_id,
        routes::tests::create_test,
        routes::tests::update_test,
        routes::tests::update_test_visibility,
    ),
    components(
        schemas(
            models::test::TestResponse,
            models::test::TestListResponse,
            models::test::TestDetailResponse,
            models::question::QuestionResponse,
            models::question::AnswerKeyResponse,
            models::word::WordResponse,
            models::result::ResultResponse,
            models::result::ResultAnswerResponse,
            services::test_service::ListTestsResponse,
            services::test_service::GetTestResponse,
            services::test_service::SuccessResponse,
            utils::Claims,
        ),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

/// runtime modifier that injects a `bearer_auth` SecurityScheme and a global SecurityRequirement
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // ensure components exists
        let comps = openapi.components.get_or_insert_with(Default::default);

        // Add a bearer SecurityScheme named "bearer_auth"
        comps.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

        let sr = SecurityRequirement::new::<String, Vec<String>, String>(
            "bearer_auth".to_string(),
            Vec::<String>::new(),
        );

        // Make the scheme a global security requirement (so ops show padlocks)
        openapi.security = Some(vec![sr]);
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let db = Arc::new(db::init_db(&config.mongodb_uri).await);
    let port = config.port;

    let app = Router::new()
        .merge(init_routes(db, Arc::new(config)))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
