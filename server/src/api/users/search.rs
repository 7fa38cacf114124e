use super::UserSummary;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use axum::{
    extract::{Query, State},
    Json,
};
use diesel::prelude::*;
use recipebox_core::search::like_pattern;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

const MAX_RESULTS: i64 = 20;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchUsersParams {
    /// Substring of a name or email address
    pub query: String,
}

#[utoipa::path(
    get,
    path = "/users/search",
    tag = "users",
    params(SearchUsersParams),
    responses(
        (status = 200, description = "Matching users, excluding the caller", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search_users(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<SearchUsersParams>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let pattern = like_pattern(query);

    let found: Vec<User> = in_transaction(&pool, |conn| {
        Ok(traced("search_users", || {
            users::table
                .filter(users::id.ne(user.id))
                .filter(
                    users::name
                        .ilike(pattern.as_str())
                        .or(users::email.ilike(pattern.as_str())),
                )
                .order(users::name.asc())
                .limit(MAX_RESULTS)
                .select(User::as_select())
                .load(conn)
        })?)
    })?;

    Ok(Json(found.into_iter().map(UserSummary::from).collect()))
}
