use super::UserProfile;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use axum::Json;

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(user.into())
}
