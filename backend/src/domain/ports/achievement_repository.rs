//! Port for achievement statistics and award persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AvatarBorder, Badge, BorderStats, CheckinStats, EarnedBadge, EarnedBorder, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by achievement repository adapters.
    pub enum AchievementRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "achievement repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "achievement repository query failed: {message}",
    }
}

/// Port for evaluator inputs and award rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Check-in totals, per-type counts and pioneer rank for a user.
    async fn load_checkin_stats(
        &self,
        user_id: &UserId,
    ) -> Result<CheckinStats, AchievementRepositoryError>;

    /// Aggregates consumed by border criteria.
    async fn load_border_stats(
        &self,
        user_id: &UserId,
    ) -> Result<BorderStats, AchievementRepositoryError>;

    /// Every badge definition.
    async fn list_badges(&self) -> Result<Vec<Badge>, AchievementRepositoryError>;

    /// Badges held by a user, newest first.
    async fn list_user_badges(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EarnedBadge>, AchievementRepositoryError>;

    /// Award badges, ignoring ones already held.
    async fn award_badges(
        &self,
        user_id: &UserId,
        badge_ids: &[Uuid],
        awarded_at: DateTime<Utc>,
    ) -> Result<(), AchievementRepositoryError>;

    /// Every border definition in display order.
    async fn list_borders(&self) -> Result<Vec<AvatarBorder>, AchievementRepositoryError>;

    /// Borders held by a user.
    async fn list_user_borders(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EarnedBorder>, AchievementRepositoryError>;

    /// Award borders, ignoring ones already held.
    async fn award_borders(
        &self,
        user_id: &UserId,
        border_ids: &[Uuid],
        awarded_at: DateTime<Utc>,
    ) -> Result<(), AchievementRepositoryError>;
}

/// Fixture implementation for running without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementRepository;

#[async_trait]
impl AchievementRepository for FixtureAchievementRepository {
    async fn load_checkin_stats(
        &self,
        _user_id: &UserId,
    ) -> Result<CheckinStats, AchievementRepositoryError> {
        Ok(CheckinStats::default())
    }

    async fn load_border_stats(
        &self,
        _user_id: &UserId,
    ) -> Result<BorderStats, AchievementRepositoryError> {
        Ok(BorderStats::default())
    }

    async fn list_badges(&self) -> Result<Vec<Badge>, AchievementRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_user_badges(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<EarnedBadge>, AchievementRepositoryError> {
        Ok(Vec::new())
    }

    async fn award_badges(
        &self,
        _user_id: &UserId,
        _badge_ids: &[Uuid],
        _awarded_at: DateTime<Utc>,
    ) -> Result<(), AchievementRepositoryError> {
        Ok(())
    }

    async fn list_borders(&self) -> Result<Vec<AvatarBorder>, AchievementRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_user_borders(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<EarnedBorder>, AchievementRepositoryError> {
        Ok(Vec::new())
    }

    async fn award_borders(
        &self,
        _user_id: &UserId,
        _border_ids: &[Uuid],
        _awarded_at: DateTime<Utc>,
    ) -> Result<(), AchievementRepositoryError> {
        Ok(())
    }
}
