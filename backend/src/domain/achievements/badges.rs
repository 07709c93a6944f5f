//! Badge predicates evaluated against a user's check-in history.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::event::EventType;
use crate::domain::string_enum::string_enum;

/// Users whose first check-in ranks at or below this ordinal earn `pioneer`.
pub const PIONEER_RANK_LIMIT: u32 = 100;

string_enum! {
    /// Fixed predicates a badge row may reference through `criteria_key`.
    pub enum BadgeKey ("badge criteria key") {
        /// At least one hiking check-in.
        FirstHike => "first_hike",
        /// At least one mountain biking check-in.
        FirstMtb => "first_mtb",
        /// At least one road biking check-in.
        FirstRoadRide => "first_road_ride",
        /// At least one running check-in.
        FirstRun => "first_run",
        /// At least one trail running check-in.
        FirstTrailRun => "first_trail_run",
        /// Every event type at least once.
        AllRounder => "all_rounder",
        /// Five check-ins.
        FiveEvents => "five_events",
        /// Ten check-ins.
        TenEvents => "ten_events",
        /// Twenty-five check-ins.
        TwentyFiveEvents => "twenty_five_events",
        /// Fifty check-ins.
        FiftyEvents => "fifty_events",
        /// Among the first hundred users to check in anywhere.
        Pioneer => "pioneer",
    }
}

/// Volume tiers in descending threshold order.
const VOLUME_TIERS: [(u32, BadgeKey); 4] = [
    (50, BadgeKey::FiftyEvents),
    (25, BadgeKey::TwentyFiveEvents),
    (10, BadgeKey::TenEvents),
    (5, BadgeKey::FiveEvents),
];

fn first_of_type(event_type: EventType) -> BadgeKey {
    match event_type {
        EventType::Hiking => BadgeKey::FirstHike,
        EventType::Mtb => BadgeKey::FirstMtb,
        EventType::RoadBike => BadgeKey::FirstRoadRide,
        EventType::Running => BadgeKey::FirstRun,
        EventType::TrailRun => BadgeKey::FirstTrailRun,
    }
}

/// Check-in aggregates for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckinStats {
    /// Total check-ins.
    pub total: u32,
    /// Check-ins per event type.
    pub by_type: BTreeMap<EventType, u32>,
    /// Ordinal of the user's first check-in among all users' first check-ins.
    pub pioneer_rank: Option<u32>,
}

impl CheckinStats {
    /// Aggregate the event types of each attended event.
    pub fn from_event_types(
        types: impl IntoIterator<Item = EventType>,
        pioneer_rank: Option<u32>,
    ) -> Self {
        let mut stats = Self {
            pioneer_rank,
            ..Self::default()
        };
        for event_type in types {
            stats.total = stats.total.saturating_add(1);
            let entry = stats.by_type.entry(event_type).or_insert(0);
            *entry = entry.saturating_add(1);
        }
        stats
    }

    /// Check-ins recorded for `event_type`.
    pub fn count_for(&self, event_type: EventType) -> u32 {
        self.by_type.get(&event_type).copied().unwrap_or(0)
    }

    /// Whether every event type has at least one check-in.
    pub fn covers_all_types(&self) -> bool {
        EventType::ALL.iter().all(|kind| self.count_for(*kind) >= 1)
    }
}

/// 1-based rank of `user`'s first check-in among everyone's first check-ins.
///
/// Ordering is `(first check-in, user id)`, so ranks are unique even when
/// several users checked in at the same instant.
pub fn pioneer_rank(first_checkins: &[(UserId, DateTime<Utc>)], user: &UserId) -> Option<u32> {
    let own = first_checkins
        .iter()
        .find(|(id, _)| id == user)
        .map(|(id, at)| (*at, *id.as_uuid()))?;
    let ahead = first_checkins
        .iter()
        .filter(|(id, at)| (*at, *id.as_uuid()) < own)
        .count();
    u32::try_from(ahead).ok().map(|count| count.saturating_add(1))
}

/// Criteria keys satisfied by `stats`.
///
/// Only the highest volume tier reached is included.
///
/// # Examples
/// ```
/// use eventtara::domain::{BadgeKey, CheckinStats, EventType, evaluate_badge_keys};
///
/// let stats = CheckinStats::from_event_types([EventType::Hiking; 10], None);
/// let keys = evaluate_badge_keys(&stats);
/// assert!(keys.contains(&BadgeKey::TenEvents));
/// assert!(!keys.contains(&BadgeKey::FiveEvents));
/// ```
pub fn evaluate_badge_keys(stats: &CheckinStats) -> BTreeSet<BadgeKey> {
    let mut keys = BTreeSet::new();
    if stats.total == 0 {
        return keys;
    }
    for event_type in EventType::ALL {
        if stats.count_for(*event_type) >= 1 {
            keys.insert(first_of_type(*event_type));
        }
    }
    if stats.covers_all_types() {
        keys.insert(BadgeKey::AllRounder);
    }
    if let Some((_, tier)) = VOLUME_TIERS
        .iter()
        .find(|(threshold, _)| stats.total >= *threshold)
    {
        keys.insert(*tier);
    }
    if stats
        .pioneer_rank
        .is_some_and(|rank| rank <= PIONEER_RANK_LIMIT)
    {
        keys.insert(BadgeKey::Pioneer);
    }
    keys
}

/// Badge definition row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    /// Badge identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Short description.
    pub description: Option<String>,
    /// Artwork URL.
    pub image_url: Option<String>,
    /// Raw criteria key; event-specific badges carry none.
    pub criteria_key: Option<String>,
}

impl Badge {
    /// Parsed criteria key, when it names a known predicate.
    pub fn key(&self) -> Option<BadgeKey> {
        self.criteria_key.as_deref().and_then(|key| key.parse().ok())
    }
}

/// Badge held by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarnedBadge {
    /// Badge definition.
    pub badge: Badge,
    /// Award instant.
    pub awarded_at: DateTime<Utc>,
}

/// Badges satisfied by `stats` that the user does not yet hold.
pub fn newly_earned_badges(
    catalogue: &[Badge],
    held: &HashSet<Uuid>,
    stats: &CheckinStats,
) -> Vec<Badge> {
    let keys = evaluate_badge_keys(stats);
    catalogue
        .iter()
        .filter(|badge| !held.contains(&badge.id))
        .filter(|badge| badge.key().is_some_and(|key| keys.contains(&key)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalogue() -> Vec<Badge> {
        BadgeKey::ALL
            .iter()
            .map(|key| Badge {
                id: Uuid::new_v4(),
                title: key.as_str().to_owned(),
                description: None,
                image_url: None,
                criteria_key: Some(key.as_str().to_owned()),
            })
            .collect()
    }

    fn hikes(count: usize) -> CheckinStats {
        CheckinStats::from_event_types(std::iter::repeat_n(EventType::Hiking, count), None)
    }

    #[rstest]
    fn zero_checkins_earn_nothing() {
        assert!(evaluate_badge_keys(&CheckinStats::default()).is_empty());
    }

    #[rstest]
    fn zero_checkins_ignore_pioneer_rank() {
        let stats = CheckinStats {
            pioneer_rank: Some(1),
            ..CheckinStats::default()
        };
        assert!(evaluate_badge_keys(&stats).is_empty());
    }

    #[rstest]
    fn all_types_earn_all_rounder() {
        let stats = CheckinStats::from_event_types(EventType::ALL.iter().copied(), None);
        let keys = evaluate_badge_keys(&stats);
        assert!(keys.contains(&BadgeKey::AllRounder));
        assert!(keys.contains(&BadgeKey::FiveEvents));
        for key in [
            BadgeKey::FirstHike,
            BadgeKey::FirstMtb,
            BadgeKey::FirstRoadRide,
            BadgeKey::FirstRun,
            BadgeKey::FirstTrailRun,
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[rstest]
    fn four_types_are_not_all_rounder() {
        let stats = CheckinStats::from_event_types(
            [
                EventType::Hiking,
                EventType::Mtb,
                EventType::RoadBike,
                EventType::Running,
            ],
            None,
        );
        assert!(!evaluate_badge_keys(&stats).contains(&BadgeKey::AllRounder));
    }

    #[rstest]
    #[case(4, None)]
    #[case(5, Some(BadgeKey::FiveEvents))]
    #[case(9, Some(BadgeKey::FiveEvents))]
    #[case(10, Some(BadgeKey::TenEvents))]
    #[case(25, Some(BadgeKey::TwentyFiveEvents))]
    #[case(50, Some(BadgeKey::FiftyEvents))]
    #[case(80, Some(BadgeKey::FiftyEvents))]
    fn exactly_one_volume_tier(#[case] count: usize, #[case] expected: Option<BadgeKey>) {
        let keys = evaluate_badge_keys(&hikes(count));
        let tiers: Vec<BadgeKey> = VOLUME_TIERS
            .iter()
            .map(|(_, key)| *key)
            .filter(|key| keys.contains(key))
            .collect();
        assert_eq!(tiers, expected.into_iter().collect::<Vec<_>>());
    }

    #[rstest]
    #[case(Some(100), true)]
    #[case(Some(101), false)]
    #[case(None, false)]
    fn pioneer_requires_rank_within_limit(#[case] rank: Option<u32>, #[case] expected: bool) {
        let mut stats = hikes(1);
        stats.pioneer_rank = rank;
        assert_eq!(evaluate_badge_keys(&stats).contains(&BadgeKey::Pioneer), expected);
    }

    fn minute(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, minute, 0)
            .single()
            .expect("timestamp")
    }

    #[rstest]
    fn pioneer_rank_breaks_ties_by_user_id() {
        let first = UserId::random();
        let mut tied = [UserId::random(), UserId::random()];
        tied.sort_by_key(|id| *id.as_uuid());
        let [low, high] = tied;
        let firsts = vec![
            (high.clone(), minute(5)),
            (first.clone(), minute(1)),
            (low.clone(), minute(5)),
        ];
        assert_eq!(pioneer_rank(&firsts, &first), Some(1));
        assert_eq!(pioneer_rank(&firsts, &low), Some(2));
        assert_eq!(pioneer_rank(&firsts, &high), Some(3));
        assert_eq!(pioneer_rank(&firsts, &UserId::random()), None);
    }

    #[rstest]
    fn simultaneous_first_checkins_cap_pioneers_at_limit() {
        let firsts: Vec<(UserId, DateTime<Utc>)> =
            (0..150).map(|_| (UserId::random(), minute(0))).collect();

        let pioneers = firsts
            .iter()
            .map(|(user, _)| {
                let mut stats = hikes(1);
                stats.pioneer_rank = pioneer_rank(&firsts, user);
                stats
            })
            .filter(|stats| evaluate_badge_keys(stats).contains(&BadgeKey::Pioneer))
            .count();

        assert_eq!(pioneers, PIONEER_RANK_LIMIT as usize);
    }

    #[rstest]
    fn newly_earned_skips_held_and_unkeyed_badges(catalogue: Vec<Badge>) {
        let mut catalogue = catalogue;
        catalogue.push(Badge {
            id: Uuid::new_v4(),
            title: "Pulag Finisher".to_owned(),
            description: None,
            image_url: None,
            criteria_key: None,
        });
        let first_hike = catalogue
            .iter()
            .find(|badge| badge.key() == Some(BadgeKey::FirstHike))
            .map(|badge| badge.id)
            .expect("first_hike badge");
        let held = HashSet::from([first_hike]);

        let earned = newly_earned_badges(&catalogue, &held, &hikes(5));

        let keys: Vec<Option<BadgeKey>> = earned.iter().map(Badge::key).collect();
        assert_eq!(keys, vec![Some(BadgeKey::FiveEvents)]);
    }
}
