use super::TokenResponse;
use crate::api::ErrorResponse;
use crate::auth::{create_session, verify_password};
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Incorrect email or password".to_string())
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "sam@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = in_transaction(&pool, |conn| {
        let user: Option<User> = traced("find_user_by_email", || {
            users::table
                .filter(
                    diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(email) = LOWER(")
                        .bind::<diesel::sql_types::Text, _>(req.email.trim())
                        .sql(")"),
                )
                .select(User::as_select())
                .first(conn)
                .optional()
        })?;

        let user = user.ok_or_else(invalid_credentials)?;

        if !verify_password(&req.password, &user.password_hash) {
            return Err(invalid_credentials());
        }

        create_session(conn, user.id)
    })?;

    Ok(Json(TokenResponse::bearer(token)))
}
