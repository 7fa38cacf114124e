pub mod friends;
pub mod me;
pub mod push_token;
pub mod search;

use crate::models::User;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use recipebox_core::PushPermission;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// The caller's own profile.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub push_permission: PushPermission,
    pub expo_push_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        let push_permission = user.push_permission();
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            push_permission,
            expo_push_token: user.expo_push_token,
            created_at: user.created_at,
        }
    }
}

/// Another user, as seen in search results and friend lists.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Returns the router for /users endpoints (mounted at /users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me::get_me))
        .route("/search", get(search::search_users))
        .route("/friends", get(friends::list_friends))
        .route("/friend-requests", get(friends::list_friend_requests))
        .route("/friend-request", post(friends::send_friend_request))
        .route(
            "/friend-request/{request_from_user_id}/accept",
            post(friends::accept_friend_request),
        )
        .route("/push-token", post(push_token::update_push_token))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        me::get_me,
        search::search_users,
        friends::list_friends,
        friends::list_friend_requests,
        friends::send_friend_request,
        friends::accept_friend_request,
        push_token::update_push_token,
    ),
    components(schemas(
        UserProfile,
        UserSummary,
        friends::FriendRequestEntry,
        friends::SendFriendRequest,
        friends::FriendshipResponse,
        push_token::UpdatePushTokenRequest,
    ))
)]
pub struct ApiDoc;
