//! Push notifications.
//!
//! Delivery itself goes through a [`PushNotifier`]; this module decides
//! whether a user should be notified at all based on the permission they
//! granted and the push token their device registered.

use crate::error::NotifyError;
use crate::types::PushPermission;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Screen the client app should open when the notification is tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NavigateTo {
    FriendRequests,
    Friends,
    SharedRecipes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushNotification {
    pub message: String,
    pub navigate_to: Option<NavigateTo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery<'a> {
    Send { token: &'a str },
    Skip { reason: &'static str },
}

pub fn delivery_for(permission: PushPermission, token: Option<&str>) -> Delivery<'_> {
    let token = match (permission, token) {
        (PushPermission::None, _) | (_, None) => {
            return Delivery::Skip {
                reason: "no push notification preferences",
            }
        }
        (PushPermission::Rejected, _) => {
            return Delivery::Skip {
                reason: "push notifications rejected",
            }
        }
        (PushPermission::Accepted, Some(token)) => token,
    };

    if token.contains("development") {
        return Delivery::Skip {
            reason: "development push token",
        };
    }

    Delivery::Send { token }
}

#[async_trait]
pub trait PushNotifier: Send + Sync + fmt::Debug {
    /// Deliver a notification to a device token. Returns whether the push
    /// service accepted it.
    async fn send(&self, token: &str, notification: &PushNotification)
        -> Result<bool, NotifyError>;
}

/// Applies the permission gate, then delivers. Failures are logged and
/// reported as `false`; callers never fail a request over a notification.
pub async fn notify_user(
    notifier: &dyn PushNotifier,
    permission: PushPermission,
    token: Option<&str>,
    notification: &PushNotification,
) -> bool {
    match delivery_for(permission, token) {
        Delivery::Skip { reason } => {
            tracing::info!(reason, "skipping push notification");
            false
        }
        Delivery::Send { token } => match notifier.send(token, notification).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::warn!(error = %e, "push notification failed");
                false
            }
        },
    }
}

/// Notifier that only logs. Stands in for a real push service.
#[derive(Debug, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl PushNotifier for LoggingNotifier {
    async fn send(
        &self,
        token: &str,
        notification: &PushNotification,
    ) -> Result<bool, NotifyError> {
        tracing::info!(
            token,
            message = %notification.message,
            navigate_to = ?notification.navigate_to,
            "push notification"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PushNotifier for RecordingNotifier {
        async fn send(
            &self,
            token: &str,
            _notification: &PushNotification,
        ) -> Result<bool, NotifyError> {
            self.sent.lock().unwrap().push(token.to_string());
            Ok(true)
        }
    }

    #[derive(Debug)]
    struct FailingNotifier;

    #[async_trait]
    impl PushNotifier for FailingNotifier {
        async fn send(
            &self,
            _token: &str,
            _notification: &PushNotification,
        ) -> Result<bool, NotifyError> {
            Err(NotifyError::DeliveryFailed("timeout".to_string()))
        }
    }

    fn shared() -> PushNotification {
        PushNotification {
            message: "Sam shared a recipe with you".to_string(),
            navigate_to: Some(NavigateTo::SharedRecipes),
        }
    }

    #[test]
    fn test_delivery_requires_accepted_permission() {
        assert!(matches!(
            delivery_for(PushPermission::None, Some("ExponentPushToken[abc]")),
            Delivery::Skip { .. }
        ));
        assert!(matches!(
            delivery_for(PushPermission::Rejected, Some("ExponentPushToken[abc]")),
            Delivery::Skip { .. }
        ));
        assert!(matches!(
            delivery_for(PushPermission::Accepted, None),
            Delivery::Skip { .. }
        ));
        assert_eq!(
            delivery_for(PushPermission::Accepted, Some("ExponentPushToken[abc]")),
            Delivery::Send {
                token: "ExponentPushToken[abc]"
            }
        );
    }

    #[test]
    fn test_development_tokens_are_skipped() {
        assert_eq!(
            delivery_for(PushPermission::Accepted, Some("development-token")),
            Delivery::Skip {
                reason: "development push token"
            }
        );
    }

    #[tokio::test]
    async fn test_notify_user_only_sends_when_allowed() {
        let notifier = RecordingNotifier::default();

        let sent = notify_user(&notifier, PushPermission::Rejected, Some("tok"), &shared()).await;
        assert!(!sent);

        let sent = notify_user(&notifier, PushPermission::Accepted, Some("tok"), &shared()).await;
        assert!(sent);

        assert_eq!(*notifier.sent.lock().unwrap(), vec!["tok".to_string()]);
    }

    #[tokio::test]
    async fn test_notify_user_swallows_failures() {
        let sent = notify_user(
            &FailingNotifier,
            PushPermission::Accepted,
            Some("tok"),
            &shared(),
        )
        .await;
        assert!(!sent);
    }
}
