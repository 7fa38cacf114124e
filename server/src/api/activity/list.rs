use crate::api::users::friends::friend_ids;
use crate::api::{ErrorResponse, Page, PaginationMetadata};
use crate::auth::AuthUser;
use crate::db::{in_transaction, traced, DbPool};
use crate::error::ApiError;
use crate::raw_sql;
use crate::schema::{recipe_cooks, recipes, users};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Whose cooks to include.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Who {
    #[default]
    Me,
    Friends,
    Both,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListActivityParams {
    #[serde(default)]
    #[param(inline)]
    pub who: Who,
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityEntry {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub cooked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityResponse {
    pub entries: Vec<ActivityEntry>,
    pub pagination: PaginationMetadata,
}

/// Recent cooks, newest first.
#[utoipa::path(
    get,
    path = "/activity",
    tag = "activity",
    params(ListActivityParams),
    responses(
        (status = 200, description = "Page of activity entries", body = ActivityResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_activity(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListActivityParams>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };
    let (limit, offset) = (page.limit(), page.offset());

    let response = in_transaction(&pool, |conn| {
        let mut user_ids = match params.who {
            Who::Me => Vec::new(),
            Who::Friends | Who::Both => friend_ids(conn, user.id)?,
        };
        if params.who != Who::Friends {
            user_ids.push(user.id);
        }

        let rows: Vec<(Uuid, String, Uuid, String, DateTime<Utc>, i64)> =
            traced("list_activity", || {
                recipe_cooks::table
                    .inner_join(recipes::table)
                    .inner_join(users::table.on(users::id.eq(recipe_cooks::user_id)))
                    .filter(recipe_cooks::user_id.eq_any(&user_ids))
                    .order(recipe_cooks::cooked_at.desc())
                    .select((
                        recipe_cooks::recipe_id,
                        recipes::name,
                        recipe_cooks::user_id,
                        users::name,
                        recipe_cooks::cooked_at,
                        raw_sql::count_over(),
                    ))
                    .limit(limit)
                    .offset(offset)
                    .load(conn)
            })?;

        let total = rows.first().map(|row| row.5).unwrap_or(0);

        Ok(ActivityResponse {
            entries: rows
                .into_iter()
                .map(
                    |(recipe_id, recipe_name, user_id, user_name, cooked_at, _)| ActivityEntry {
                        recipe_id,
                        recipe_name,
                        user_id,
                        user_name,
                        cooked_at,
                    },
                )
                .collect(),
            pagination: PaginationMetadata {
                total,
                limit,
                offset,
            },
        })
    })?;

    Ok(Json(response))
}
