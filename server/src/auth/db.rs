use crate::db::{traced, DbPool};
use crate::error::ApiError;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

const SESSION_TTL_DAYS: i64 = 30;

/// Create a session for `user_id` and return the bearer token. Only the
/// token's hash is stored.
pub fn create_session(conn: &mut PgConnection, user_id: uuid::Uuid) -> Result<String, ApiError> {
    let token = generate_token().map_err(|e| ApiError::Internal(e.to_string()))?;
    let token_hash = hash_token(&token);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
    };

    traced("insert_session", || {
        diesel::insert_into(sessions::table)
            .values(&new_session)
            .execute(conn)
    })?;

    Ok(token)
}

/// Look up the user owning an unexpired session. `Ok(None)` means the token
/// is unknown or expired; pool and query failures come back as errors.
pub fn get_user_from_token(pool: &DbPool, token: &str) -> Result<Option<User>, ApiError> {
    let mut conn = pool.get()?;
    let token_hash = hash_token(token);

    let user = traced("user_from_session", || {
        sessions::table
            .inner_join(users::table)
            .filter(sessions::token_hash.eq(&token_hash))
            .filter(sessions::expires_at.gt(Utc::now()))
            .select(User::as_select())
            .first(&mut conn)
            .optional()
    })?;

    Ok(user)
}
