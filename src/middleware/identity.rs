use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use bson::oid::ObjectId;
use std::sync::Arc;

use crate::config::Config;
use crate::utils::validate_jwt;

/// The caller's identity, when a valid bearer token accompanied the
/// request. Inserted for every request; anonymous callers carry `None`.
#[derive(Clone, Copy, Default)]
pub struct Identity(pub Option<ObjectId>);

/// Middleware compatible with `middleware::from_fn_with_state`.
/// - Reads `Authorization: Bearer <token>` when present.
/// - A valid token becomes `Identity(Some(user))`; a missing or bad token
///   leaves the request anonymous instead of rejecting it.
pub async fn identity_middleware(
    State(config): State<Arc<Config>>,
    mut req: Request,
    next: Next,
) -> Response {
    let user = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| validate_jwt(token, &config.jwt_secret))
        .and_then(|claims| ObjectId::parse_str(&claims.sub).ok());

    req.extensions_mut().insert(Identity(user));
    next.run(req).await
}
