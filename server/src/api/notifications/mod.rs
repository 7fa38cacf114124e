pub mod send;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /notifications endpoints (mounted at /notifications)
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(send::send_notification))
}

#[derive(OpenApi)]
#[openapi(
    paths(send::send_notification),
    components(schemas(
        send::SendNotificationRequest,
        send::NotificationPayload,
        send::NotificationResult,
    ))
)]
pub struct ApiDoc;
