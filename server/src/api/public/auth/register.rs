use super::TokenResponse;
use crate::api::ErrorResponse;
use crate::auth::{create_session, hash_password};
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::models::{NewUser, User};
use crate::schema::users;
use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::BadRequest("A valid email is required".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Name is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(ApiError::BadRequest("Password is required".to_string()));
        }
        Ok(())
    }
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body(content = RegisterRequest, example = json!({"email": "sam@example.com", "name": "Sam", "password": "password"})),
    responses(
        (status = 201, description = "User created", body = TokenResponse),
        (status = 400, description = "Invalid request or email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(pool): State<Arc<DbPool>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    req.validate()?;

    let password_hash = hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let token = in_transaction(&pool, |conn| {
        let new_user = NewUser {
            email: req.email.trim(),
            name: req.name.trim(),
            password_hash: &password_hash,
        };

        let user: User = traced("insert_user", || {
            diesel::insert_into(users::table)
                .values(&new_user)
                .returning(User::as_returning())
                .get_result(conn)
        })?;

        tracing::info!(user_id = %user.id, "registered user");

        create_session(conn, user.id)
    })?;

    Ok((StatusCode::CREATED, Json(TokenResponse::bearer(token))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, name: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate() {
        assert!(request("sam@example.com", "Sam", "pw").validate().is_ok());
        assert!(request("sam", "Sam", "pw").validate().is_err());
        assert!(request("sam@example.com", "  ", "pw").validate().is_err());
        assert!(request("sam@example.com", "Sam", "").validate().is_err());
    }
}
