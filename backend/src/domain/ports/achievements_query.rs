//! Driving port for achievement reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Badge, BorderProgress, BorderTier, EarnedBadge, Error, UserId};

/// Badge held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadgePayload {
    pub badge: Badge,
    pub awarded_at: DateTime<Utc>,
}

impl From<EarnedBadge> for EarnedBadgePayload {
    fn from(value: EarnedBadge) -> Self {
        Self {
            badge: value.badge,
            awarded_at: value.awarded_at,
        }
    }
}

/// Border definition with the user's award state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderPayload {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub tier: BorderTier,
    pub sort_order: i32,
    pub earned: bool,
    pub awarded_at: Option<DateTime<Utc>>,
}

impl From<BorderProgress> for BorderPayload {
    fn from(value: BorderProgress) -> Self {
        let BorderProgress { border, awarded_at } = value;
        Self {
            id: border.id,
            slug: border.slug,
            name: border.name,
            description: border.description,
            tier: border.tier,
            sort_order: border.sort_order,
            earned: awarded_at.is_some(),
            awarded_at,
        }
    }
}

/// Driving port for reading earned achievements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementsQuery: Send + Sync {
    /// Badges a user holds, newest first.
    async fn list_badges(&self, user_id: &UserId) -> Result<Vec<EarnedBadgePayload>, Error>;

    /// Every border in display order with the user's award state.
    async fn list_borders(&self, user_id: &UserId) -> Result<Vec<BorderPayload>, Error>;
}
