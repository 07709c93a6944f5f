//! Driving port for running the badge and border evaluators.

use async_trait::async_trait;

use crate::domain::{AwardedAchievements, UserId};

/// Recomputes a user's achievements from scratch and awards new ones.
///
/// Evaluation never fails the caller: errors are logged and reported as an
/// empty award set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementEvaluator: Send + Sync {
    /// Evaluate badges and borders for a user.
    async fn evaluate(&self, user_id: &UserId) -> AwardedAchievements;
}

/// Evaluator that never awards anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementEvaluator;

#[async_trait]
impl AchievementEvaluator for FixtureAchievementEvaluator {
    async fn evaluate(&self, _user_id: &UserId) -> AwardedAchievements {
        AwardedAchievements::default()
    }
}
