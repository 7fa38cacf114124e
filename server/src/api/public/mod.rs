pub mod auth;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register::register))
        .route("/auth/login", post(auth::login::login))
}

#[derive(OpenApi)]
#[openapi(
    paths(auth::register::register, auth::login::login),
    components(schemas(
        auth::register::RegisterRequest,
        auth::login::LoginRequest,
        auth::TokenResponse,
    ))
)]
pub struct ApiDoc;
