use crate::db::traced;
use crate::models::NewRecommendation;
use crate::schema::{recipe_recommendations, recipes};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use recipebox_core::{Candidate, RecommendationHistory};
use std::collections::HashSet;
use uuid::Uuid;

/// Recommendation history persisted in `recipe_recommendations`, one set per user.
pub struct PgRecommendationHistory<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgRecommendationHistory<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl RecommendationHistory for PgRecommendationHistory<'_> {
    type Error = diesel::result::Error;

    fn recently_shown(&mut self, user_id: Uuid) -> QueryResult<HashSet<Uuid>> {
        let ids: Vec<Uuid> = traced("recently_recommended", || {
            recipe_recommendations::table
                .filter(recipe_recommendations::user_id.eq(user_id))
                .select(recipe_recommendations::recipe_id)
                .load(self.conn)
        })?;
        Ok(ids.into_iter().collect())
    }

    fn reset(&mut self, user_id: Uuid) -> QueryResult<()> {
        traced("reset_recommendations", || {
            diesel::delete(
                recipe_recommendations::table.filter(recipe_recommendations::user_id.eq(user_id)),
            )
            .execute(self.conn)
        })?;
        Ok(())
    }

    fn record(&mut self, user_id: Uuid, recipe_id: Uuid, at: DateTime<Utc>) -> QueryResult<()> {
        traced("record_recommendation", || {
            diesel::insert_into(recipe_recommendations::table)
                .values(&NewRecommendation {
                    user_id,
                    recipe_id,
                    recommended_at: at,
                })
                .execute(self.conn)
        })?;
        Ok(())
    }
}

/// Every recipe the user owns, reduced to what the sampler needs.
pub fn load_candidates(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Candidate>> {
    let rows: Vec<(Uuid, DateTime<Utc>, Option<DateTime<Utc>>)> =
        traced("recommendation_candidates", || {
            recipes::table
                .filter(recipes::user_id.eq(user_id))
                .select((recipes::id, recipes::saved_at, recipes::last_made_at))
                .load(conn)
        })?;

    Ok(rows
        .into_iter()
        .map(|(id, saved_at, last_made_at)| Candidate {
            id,
            saved_at,
            last_made_at,
        })
        .collect())
}
