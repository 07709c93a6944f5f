//! Badge and avatar-border evaluation service.
//!
//! Aggregates are recomputed from scratch on every run. Badge and border
//! evaluation are independent: a failure in one is logged and yields an empty
//! award list without affecting the other.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AchievementEvaluator, AchievementRepository, AchievementRepositoryError, AchievementsQuery,
    BorderPayload, EarnedBadgePayload, UserDirectory,
};
use crate::domain::repository_errors::map_achievement_error;
use crate::domain::{
    AvatarBorder, AwardedAchievements, Badge, BorderProgress, Error, Notifier, UserId,
    newly_earned_badges, newly_earned_borders,
};

/// Achievement service implementing the evaluator and query ports.
#[derive(Clone)]
pub struct AchievementService<A, U> {
    achievements: Arc<A>,
    users: Arc<U>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl<A, U> AchievementService<A, U> {
    /// Create a new achievement service.
    pub fn new(
        achievements: Arc<A>,
        users: Arc<U>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            achievements,
            users,
            notifier,
            clock,
        }
    }
}

impl<A, U> AchievementService<A, U>
where
    A: AchievementRepository,
    U: UserDirectory,
{
    async fn award_new_badges(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Badge>, AchievementRepositoryError> {
        let stats = self.achievements.load_checkin_stats(user_id).await?;
        if stats.total == 0 {
            return Ok(Vec::new());
        }
        let catalogue = self.achievements.list_badges().await?;
        let held: HashSet<Uuid> = self
            .achievements
            .list_user_badges(user_id)
            .await?
            .into_iter()
            .map(|earned| earned.badge.id)
            .collect();

        let awarded = newly_earned_badges(&catalogue, &held, &stats);
        if !awarded.is_empty() {
            let ids: Vec<Uuid> = awarded.iter().map(|badge| badge.id).collect();
            self.achievements
                .award_badges(user_id, &ids, self.clock.utc())
                .await?;
        }
        Ok(awarded)
    }

    async fn award_new_borders(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AvatarBorder>, AchievementRepositoryError> {
        let stats = self.achievements.load_border_stats(user_id).await?;
        let catalogue = self.achievements.list_borders().await?;
        let held: HashSet<Uuid> = self
            .achievements
            .list_user_borders(user_id)
            .await?
            .into_iter()
            .map(|earned| earned.border_id)
            .collect();

        let awarded = newly_earned_borders(&catalogue, &held, &stats);
        if !awarded.is_empty() {
            let ids: Vec<Uuid> = awarded.iter().map(|border| border.id).collect();
            self.achievements
                .award_borders(user_id, &ids, self.clock.utc())
                .await?;
        }
        Ok(awarded)
    }

    async fn announce_badges(&self, user_id: &UserId, badges: &[Badge]) {
        if badges.is_empty() {
            return;
        }
        let recipient = match self.users.find_contact(user_id).await {
            Ok(Some(recipient)) => recipient,
            Ok(None) => return,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "could not resolve badge email recipient");
                return;
            }
        };
        for badge in badges {
            let message = self.notifier.badge_awarded(&recipient, badge);
            self.notifier.send_best_effort(&message).await;
        }
    }
}

#[async_trait]
impl<A, U> AchievementEvaluator for AchievementService<A, U>
where
    A: AchievementRepository,
    U: UserDirectory,
{
    async fn evaluate(&self, user_id: &UserId) -> AwardedAchievements {
        let badges = self.award_new_badges(user_id).await.unwrap_or_else(|err| {
            warn!(user_id = %user_id, error = %err, "badge evaluation failed");
            Vec::new()
        });
        let borders = self.award_new_borders(user_id).await.unwrap_or_else(|err| {
            warn!(user_id = %user_id, error = %err, "avatar border evaluation failed");
            Vec::new()
        });

        let awarded = AwardedAchievements { badges, borders };
        if !awarded.is_empty() {
            info!(
                user_id = %user_id,
                badges = awarded.badges.len(),
                borders = awarded.borders.len(),
                "achievements awarded"
            );
        }
        self.announce_badges(user_id, &awarded.badges).await;
        awarded
    }
}

#[async_trait]
impl<A, U> AchievementsQuery for AchievementService<A, U>
where
    A: AchievementRepository,
    U: UserDirectory,
{
    async fn list_badges(&self, user_id: &UserId) -> Result<Vec<EarnedBadgePayload>, Error> {
        let earned = self
            .achievements
            .list_user_badges(user_id)
            .await
            .map_err(map_achievement_error)?;
        Ok(earned.into_iter().map(EarnedBadgePayload::from).collect())
    }

    async fn list_borders(&self, user_id: &UserId) -> Result<Vec<BorderPayload>, Error> {
        let catalogue = self
            .achievements
            .list_borders()
            .await
            .map_err(map_achievement_error)?;
        let earned = self
            .achievements
            .list_user_borders(user_id)
            .await
            .map_err(map_achievement_error)?;

        Ok(catalogue
            .into_iter()
            .map(|border| {
                let awarded_at = earned
                    .iter()
                    .find(|held| held.border_id == border.id)
                    .map(|held| held.awarded_at);
                BorderPayload::from(BorderProgress { border, awarded_at })
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "achievement_service_tests.rs"]
mod tests;
