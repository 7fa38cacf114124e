use super::UserSummary;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::{Friendship, NewFriendship, User};
use crate::schema::{friendships, users};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use recipebox_core::notify::notify_user;
use recipebox_core::{NavigateTo, PushNotification, PushNotifier};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FriendRequestEntry {
    pub user: UserSummary,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SendFriendRequest {
    pub friend_user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FriendshipResponse {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Null while the request is still pending
    pub accepted_at: Option<DateTime<Utc>>,
}

impl From<Friendship> for FriendshipResponse {
    fn from(f: Friendship) -> Self {
        Self {
            id: f.id,
            requester_id: f.requester_id,
            addressee_id: f.addressee_id,
            created_at: f.created_at,
            accepted_at: f.accepted_at,
        }
    }
}

/// Ids of everyone with an accepted friendship with `user_id`, in either direction.
pub fn friend_ids(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Uuid>> {
    let pairs: Vec<(Uuid, Uuid)> = traced("friend_ids", || {
        friendships::table
            .filter(friendships::accepted_at.is_not_null())
            .filter(
                friendships::requester_id
                    .eq(user_id)
                    .or(friendships::addressee_id.eq(user_id)),
            )
            .select((friendships::requester_id, friendships::addressee_id))
            .load(conn)
    })?;

    Ok(pairs
        .into_iter()
        .map(|(requester, addressee)| {
            if requester == user_id {
                addressee
            } else {
                requester
            }
        })
        .collect())
}

pub fn find_user(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<User>> {
    traced("find_user", || {
        users::table
            .filter(users::id.eq(id))
            .select(User::as_select())
            .first(conn)
            .optional()
    })
}

#[utoipa::path(
    get,
    path = "/users/friends",
    tag = "users",
    responses(
        (status = 200, description = "Accepted friends", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_friends(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let friends: Vec<User> = in_transaction(&pool, |conn| {
        let ids = friend_ids(conn, user.id)?;
        Ok(traced("load_friends", || {
            users::table
                .filter(users::id.eq_any(&ids))
                .order(users::name.asc())
                .select(User::as_select())
                .load(conn)
        })?)
    })?;

    Ok(Json(friends.into_iter().map(UserSummary::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/friend-requests",
    tag = "users",
    responses(
        (status = 200, description = "Pending friend requests sent to the caller", body = Vec<FriendRequestEntry>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_friend_requests(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<FriendRequestEntry>>, ApiError> {
    let pending: Vec<(User, DateTime<Utc>)> = in_transaction(&pool, |conn| {
        Ok(traced("pending_friend_requests", || {
            friendships::table
                .inner_join(users::table.on(users::id.eq(friendships::requester_id)))
                .filter(friendships::addressee_id.eq(user.id))
                .filter(friendships::accepted_at.is_null())
                .order(friendships::created_at.desc())
                .select((User::as_select(), friendships::created_at))
                .load(conn)
        })?)
    })?;

    Ok(Json(
        pending
            .into_iter()
            .map(|(requester, requested_at)| FriendRequestEntry {
                user: requester.into(),
                requested_at,
            })
            .collect(),
    ))
}

/// Send a friend request. If the other user already asked the caller, the
/// existing request is accepted instead.
#[utoipa::path(
    post,
    path = "/users/friend-request",
    tag = "users",
    request_body = SendFriendRequest,
    responses(
        (status = 201, description = "Friend request sent (or reciprocal request accepted)", body = FriendshipResponse),
        (status = 400, description = "Request to self, or friendship already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_friend_request(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(notifier): State<Arc<dyn PushNotifier>>,
    Json(req): Json<SendFriendRequest>,
) -> Result<(StatusCode, Json<FriendshipResponse>), ApiError> {
    if req.friend_user_id == user.id {
        return Err(ApiError::BadRequest(
            "Cannot send a friend request to yourself".to_string(),
        ));
    }

    let (friendship, target) = in_transaction(&pool, |conn| {
        let target = find_user(conn, req.friend_user_id)?
            .ok_or_else(|| ApiError::not_found("User"))?;

        let reverse: Option<Friendship> = traced("find_reverse_friendship", || {
            friendships::table
                .filter(friendships::requester_id.eq(target.id))
                .filter(friendships::addressee_id.eq(user.id))
                .select(Friendship::as_select())
                .for_update()
                .first(conn)
                .optional()
        })?;

        let friendship = match reverse {
            Some(existing) if existing.accepted_at.is_some() => return Err(ApiError::Duplicate),
            Some(existing) => traced("accept_reverse_friendship", || {
                diesel::update(friendships::table.filter(friendships::id.eq(existing.id)))
                    .set(friendships::accepted_at.eq(Some(Utc::now())))
                    .returning(Friendship::as_returning())
                    .get_result(conn)
            })?,
            None => traced("insert_friendship", || {
                diesel::insert_into(friendships::table)
                    .values(&NewFriendship {
                        requester_id: user.id,
                        addressee_id: target.id,
                    })
                    .returning(Friendship::as_returning())
                    .get_result(conn)
            })?,
        };

        Ok((friendship, target))
    })?;

    let notification = if friendship.accepted_at.is_some() {
        tracing::info!(friend_id = %target.id, "accepted reciprocal friend request");
        PushNotification {
            message: format!("{} accepted your friend request", user.name),
            navigate_to: Some(NavigateTo::Friends),
        }
    } else {
        tracing::info!(friend_id = %target.id, "sent friend request");
        PushNotification {
            message: format!("{} sent you a friend request", user.name),
            navigate_to: Some(NavigateTo::FriendRequests),
        }
    };

    notify_user(
        notifier.as_ref(),
        target.push_permission(),
        target.expo_push_token.as_deref(),
        &notification,
    )
    .await;

    Ok((StatusCode::CREATED, Json(friendship.into())))
}

#[utoipa::path(
    post,
    path = "/users/friend-request/{request_from_user_id}/accept",
    tag = "users",
    params(
        ("request_from_user_id" = Uuid, Path, description = "User who sent the friend request")
    ),
    responses(
        (status = 200, description = "Friend request accepted", body = FriendshipResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Friend request not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn accept_friend_request(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(notifier): State<Arc<dyn PushNotifier>>,
    Path(request_from_user_id): Path<Uuid>,
) -> Result<Json<FriendshipResponse>, ApiError> {
    let (friendship, requester) = in_transaction(&pool, |conn| {
        let accepted: Option<Friendship> = traced("accept_friendship", || {
            diesel::update(
                friendships::table
                    .filter(friendships::requester_id.eq(request_from_user_id))
                    .filter(friendships::addressee_id.eq(user.id))
                    .filter(friendships::accepted_at.is_null()),
            )
            .set(friendships::accepted_at.eq(Some(Utc::now())))
            .returning(Friendship::as_returning())
            .get_result(conn)
            .optional()
        })?;
        let friendship = accepted.ok_or_else(|| ApiError::not_found("Friend request"))?;

        let requester = find_user(conn, request_from_user_id)?
            .ok_or_else(|| ApiError::not_found("User"))?;

        Ok((friendship, requester))
    })?;

    tracing::info!(friend_id = %requester.id, "accepted friend request");

    notify_user(
        notifier.as_ref(),
        requester.push_permission(),
        requester.expo_push_token.as_deref(),
        &PushNotification {
            message: format!("{} accepted your friend request", user.name),
            navigate_to: Some(NavigateTo::Friends),
        },
    )
    .await;

    Ok(Json(friendship.into()))
}
