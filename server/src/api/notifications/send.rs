use crate::api::users::friends::find_user;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, DbPool};
use crate::error::ApiError;
use axum::{extract::State, Json};
use recipebox_core::notify::notify_user;
use recipebox_core::{NavigateTo, PushNotification, PushNotifier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NotificationPayload {
    #[serde(default)]
    pub navigate_to: Option<NavigateTo>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SendNotificationRequest {
    pub recipient_id: Uuid,
    pub message: String,
    #[serde(default)]
    pub payload: NotificationPayload,
}

impl SendNotificationRequest {
    fn notification(&self) -> PushNotification {
        PushNotification {
            message: self.message.clone(),
            navigate_to: self.payload.navigate_to,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationResult {
    pub success: bool,
}

/// Push a message to another user's device. `success` is false unless the
/// notifier actually delivered it.
#[utoipa::path(
    post,
    path = "/notifications",
    tag = "notifications",
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Whether the notification was delivered", body = NotificationResult),
        (status = 400, description = "Recipient not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_notification(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(notifier): State<Arc<dyn PushNotifier>>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<Json<NotificationResult>, ApiError> {
    let recipient = in_transaction(&pool, |conn| Ok(find_user(conn, req.recipient_id)?))?
        .ok_or_else(|| ApiError::BadRequest("Recipient not found".to_string()))?;

    let success = notify_user(
        notifier.as_ref(),
        recipient.push_permission(),
        recipient.expo_push_token.as_deref(),
        &req.notification(),
    )
    .await;

    tracing::info!(
        sender_id = %user.id,
        recipient_id = %recipient.id,
        success,
        "sent push notification"
    );

    Ok(Json(NotificationResult { success }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let req: SendNotificationRequest = serde_json::from_str(
            r#"{
                "recipient_id": "6f1c2d4e-8a9b-4c3d-9e2f-1a2b3c4d5e6f",
                "message": "Dinner is ready",
                "payload": {"navigate_to": "shared_recipes"}
            }"#,
        )
        .unwrap();

        assert_eq!(
            req.notification(),
            PushNotification {
                message: "Dinner is ready".to_string(),
                navigate_to: Some(NavigateTo::SharedRecipes),
            }
        );
    }

    #[test]
    fn test_payload_target_is_optional() {
        let req: SendNotificationRequest = serde_json::from_str(
            r#"{
                "recipient_id": "6f1c2d4e-8a9b-4c3d-9e2f-1a2b3c4d5e6f",
                "message": "hi",
                "payload": {"navigate_to": null}
            }"#,
        )
        .unwrap();
        assert_eq!(req.notification().navigate_to, None);

        let missing_recipient = serde_json::from_str::<SendNotificationRequest>(r#"{"message": "hi"}"#);
        assert!(missing_recipient.is_err());
    }

    #[test]
    fn test_result_shape() {
        let json = serde_json::to_value(NotificationResult { success: false }).unwrap();
        assert_eq!(json, serde_json::json!({"success": false}));
    }
}
