//! Badges and avatar borders earned through attendance.

pub mod badges;
pub mod borders;

pub use self::badges::{
    Badge, BadgeKey, CheckinStats, EarnedBadge, PIONEER_RANK_LIMIT, evaluate_badge_keys,
    newly_earned_badges, pioneer_rank,
};
pub use self::borders::{
    AvatarBorder, BorderCriteria, BorderCriteriaError, BorderStats, BorderTier, EarnedBorder,
    newly_earned_borders,
};

/// Achievements granted by one evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwardedAchievements {
    /// Newly awarded badges.
    pub badges: Vec<Badge>,
    /// Newly awarded borders.
    pub borders: Vec<AvatarBorder>,
}

impl AwardedAchievements {
    /// Whether nothing was awarded.
    pub fn is_empty(&self) -> bool {
        self.badges.is_empty() && self.borders.is_empty()
    }
}

/// Border definition annotated with the viewer's award state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderProgress {
    /// Border definition.
    pub border: AvatarBorder,
    /// Award instant when earned.
    pub awarded_at: Option<chrono::DateTime<chrono::Utc>>,
}
