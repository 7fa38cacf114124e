//! Recipe share requests.
//!
//! A share request starts out pending with a seven day lifetime. The recipient
//! redeems it once, which marks it accepted; either party may delete it while
//! it is still pending. Redeeming past the expiry fails without changing state.

use crate::error::ShareError;
use crate::types::{Recipe, RecipeChildren, RecipeRecord};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const SHARE_REQUEST_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShareStatus {
    Pending,
    Accepted,
    Deleted,
}

impl ShareStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareStatus::Pending => "pending",
            ShareStatus::Accepted => "accepted",
            ShareStatus::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ShareStatus::Pending),
            "accepted" => Some(ShareStatus::Accepted),
            "deleted" => Some(ShareStatus::Deleted),
            _ => None,
        }
    }
}

/// Lifecycle state of one share request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareGrant {
    pub status: ShareStatus,
    pub expires_at: DateTime<Utc>,
}

impl ShareGrant {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            status: ShareStatus::Pending,
            expires_at: now + Duration::days(SHARE_REQUEST_TTL_DAYS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Redeem the grant. Only a pending, unexpired grant can be accepted.
    pub fn accept(&mut self, now: DateTime<Utc>) -> Result<(), ShareError> {
        if self.status != ShareStatus::Pending {
            return Err(ShareError::NotFound);
        }
        if self.is_expired(now) {
            return Err(ShareError::Expired);
        }
        self.status = ShareStatus::Accepted;
        Ok(())
    }

    pub fn delete(&mut self) -> Result<(), ShareError> {
        if self.status != ShareStatus::Pending {
            return Err(ShareError::NotFound);
        }
        self.status = ShareStatus::Deleted;
        Ok(())
    }
}

/// Build the recipient's copy of a shared recipe.
///
/// The copy belongs to `recipient_id` and points back at the source through
/// `parent_recipe_id`. It starts with fresh timestamps and no cook history.
pub fn copy_for_recipient(
    source: &Recipe,
    recipient_id: Uuid,
    copy_id: Uuid,
    now: DateTime<Utc>,
) -> (RecipeRecord, RecipeChildren) {
    let record = RecipeRecord {
        id: copy_id,
        user_id: recipient_id,
        name: source.name.clone(),
        author: source.author.clone(),
        cuisine: source.cuisine.clone(),
        location: source.location.clone(),
        time_estimate_minutes: source.time_estimate_minutes,
        notes: source.notes.clone(),
        meal: source.meal,
        recipe_type: source.recipe_type,
        parent_recipe_id: Some(source.id),
        saved_at: now,
        updated_at: now,
        last_made_at: None,
    };

    (record, source.children())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grant_expires_in_seven_days() {
        let now = Utc::now();
        let grant = ShareGrant::new(now);
        assert_eq!(grant.status, ShareStatus::Pending);
        assert_eq!(grant.expires_at - now, Duration::days(7));
        assert!(!grant.is_expired(now + Duration::days(6)));
        assert!(grant.is_expired(now + Duration::days(7)));
    }

    #[test]
    fn test_delete_only_from_pending() {
        let now = Utc::now();
        let mut grant = ShareGrant::new(now);
        grant.delete().unwrap();
        assert_eq!(grant.status, ShareStatus::Deleted);
        assert_eq!(grant.delete(), Err(ShareError::NotFound));
        assert_eq!(grant.accept(now), Err(ShareError::NotFound));
    }

    #[test]
    fn test_status_strings() {
        for status in [ShareStatus::Pending, ShareStatus::Accepted, ShareStatus::Deleted] {
            assert_eq!(ShareStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ShareStatus::from_str("expired"), None);
    }
}
