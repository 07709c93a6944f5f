//! Data-driven avatar border criteria.
//!
//! Each border row stores a `criteria_type` discriminator next to an untyped
//! JSON `criteria_value`. Rows are parsed into [`BorderCriteria`] at
//! evaluation time; rows that fail to parse are skipped.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use super::badges::CheckinStats;
use crate::domain::event::EventType;
use crate::domain::string_enum::string_enum;

string_enum! {
    /// Rarity tier controlling border presentation.
    pub enum BorderTier ("border tier") {
        /// Easily earned.
        Common => "common",
        /// Takes some dedication.
        Rare => "rare",
        /// Takes a lot of dedication.
        Epic => "epic",
        /// Reserved for the most committed.
        Legendary => "legendary",
    }
}

/// Parsed award rule for a border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorderCriteria {
    /// Signed up strictly before midnight UTC on `date`.
    SignupBefore {
        /// Cut-off date.
        date: NaiveDate,
    },
    /// Total check-ins reach `min_events`.
    EventCount {
        /// Threshold.
        min_events: u32,
    },
    /// Check-ins of one type reach `min_events`.
    EventTypeCount {
        /// Counted type.
        event_type: EventType,
        /// Threshold.
        min_events: u32,
    },
    /// Every event type at least once.
    AllEventTypes,
    /// Distinct checked-in events in a region reach `min_events`.
    RegionCount {
        /// Region name, compared case-insensitively.
        region: String,
        /// Threshold.
        min_events: u32,
    },
    /// Non-draft events organised by the user reach `min_events`.
    OrganizerEventCount {
        /// Threshold.
        min_events: u32,
    },
}

/// Reasons a criteria row cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BorderCriteriaError {
    /// Discriminator is not recognised.
    #[error("unknown border criteria type `{0}`")]
    UnknownType(String),
    /// Value does not have the shape the type requires.
    #[error("malformed `{criteria_type}` criteria value: {message}")]
    MalformedValue {
        /// Discriminator of the offending row.
        criteria_type: String,
        /// Deserialisation failure.
        message: String,
    },
}

#[derive(Deserialize)]
struct SignupBeforeValue {
    date: NaiveDate,
}

#[derive(Deserialize)]
struct MinEventsValue {
    min_events: u32,
}

#[derive(Deserialize)]
struct EventTypeCountValue {
    event_type: EventType,
    min_events: u32,
}

#[derive(Deserialize)]
struct RegionCountValue {
    region: String,
    min_events: u32,
}

fn value_as<T: DeserializeOwned>(criteria_type: &str, value: &Value) -> Result<T, BorderCriteriaError> {
    T::deserialize(value).map_err(|err| BorderCriteriaError::MalformedValue {
        criteria_type: criteria_type.to_owned(),
        message: err.to_string(),
    })
}

impl BorderCriteria {
    /// Interpret a `criteria_type` / `criteria_value` pair.
    ///
    /// # Examples
    /// ```
    /// use eventtara::domain::{BorderCriteria, EventType};
    /// use serde_json::json;
    ///
    /// let rule = BorderCriteria::parse(
    ///     "event_type_count",
    ///     &json!({ "event_type": "hiking", "min_events": 3 }),
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     rule,
    ///     BorderCriteria::EventTypeCount { event_type: EventType::Hiking, min_events: 3 }
    /// );
    /// ```
    pub fn parse(criteria_type: &str, value: &Value) -> Result<Self, BorderCriteriaError> {
        match criteria_type {
            "signup_before" => {
                let SignupBeforeValue { date } = value_as(criteria_type, value)?;
                Ok(Self::SignupBefore { date })
            }
            "event_count" => {
                let MinEventsValue { min_events } = value_as(criteria_type, value)?;
                Ok(Self::EventCount { min_events })
            }
            "event_type_count" => {
                let EventTypeCountValue {
                    event_type,
                    min_events,
                } = value_as(criteria_type, value)?;
                Ok(Self::EventTypeCount {
                    event_type,
                    min_events,
                })
            }
            "all_event_types" => Ok(Self::AllEventTypes),
            "region_count" => {
                let RegionCountValue { region, min_events } = value_as(criteria_type, value)?;
                Ok(Self::RegionCount { region, min_events })
            }
            "organizer_event_count" => {
                let MinEventsValue { min_events } = value_as(criteria_type, value)?;
                Ok(Self::OrganizerEventCount { min_events })
            }
            other => Err(BorderCriteriaError::UnknownType(other.to_owned())),
        }
    }

    /// Whether `stats` satisfies the rule.
    pub fn is_met(&self, stats: &BorderStats) -> bool {
        match self {
            Self::SignupBefore { date } => {
                let cutoff = date.and_time(chrono::NaiveTime::MIN).and_utc();
                stats.signed_up_at.is_some_and(|signed_up| signed_up < cutoff)
            }
            Self::EventCount { min_events } => stats.checkins.total >= *min_events,
            Self::EventTypeCount {
                event_type,
                min_events,
            } => stats.checkins.count_for(*event_type) >= *min_events,
            Self::AllEventTypes => stats.checkins.covers_all_types(),
            Self::RegionCount { region, min_events } => {
                stats.count_for_region(region) >= *min_events
            }
            Self::OrganizerEventCount { min_events } => stats.organized_events >= *min_events,
        }
    }
}

/// Aggregates consumed by border criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderStats {
    /// Account creation instant.
    pub signed_up_at: Option<DateTime<Utc>>,
    /// Check-in totals and per-type counts.
    pub checkins: CheckinStats,
    /// Distinct checked-in events per region, keyed by lowercase region name.
    pub events_by_region: BTreeMap<String, u32>,
    /// Non-draft events organised by the user.
    pub organized_events: u32,
}

impl BorderStats {
    /// Count one attended event for each distinct region it visits.
    pub fn record_event_regions<'a>(&mut self, regions: impl IntoIterator<Item = &'a str>) {
        let distinct: HashSet<String> = regions
            .into_iter()
            .map(|region| region.trim().to_lowercase())
            .filter(|region| !region.is_empty())
            .collect();
        for region in distinct {
            let entry = self.events_by_region.entry(region).or_insert(0);
            *entry = entry.saturating_add(1);
        }
    }

    /// Checked-in events in `region`, ignoring case.
    pub fn count_for_region(&self, region: &str) -> u32 {
        self.events_by_region
            .get(&region.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

/// Avatar border definition row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarBorder {
    /// Border identifier.
    pub id: Uuid,
    /// Stable slug used by the frontend.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Short description of how to earn it.
    pub description: Option<String>,
    /// Rarity tier.
    pub tier: BorderTier,
    /// Rule discriminator.
    pub criteria_type: String,
    /// Rule parameters.
    pub criteria_value: Value,
    /// Display order.
    pub sort_order: i32,
}

impl AvatarBorder {
    /// Parse the row's rule.
    pub fn criteria(&self) -> Result<BorderCriteria, BorderCriteriaError> {
        BorderCriteria::parse(&self.criteria_type, &self.criteria_value)
    }
}

/// Border held by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarnedBorder {
    /// Border identifier.
    pub border_id: Uuid,
    /// Award instant.
    pub awarded_at: DateTime<Utc>,
}

/// Borders satisfied by `stats` that the user does not yet hold.
pub fn newly_earned_borders(
    catalogue: &[AvatarBorder],
    held: &HashSet<Uuid>,
    stats: &BorderStats,
) -> Vec<AvatarBorder> {
    catalogue
        .iter()
        .filter(|border| !held.contains(&border.id))
        .filter(|border| match border.criteria() {
            Ok(criteria) => criteria.is_met(stats),
            Err(err) => {
                warn!(border = %border.slug, error = %err, "skipping avatar border with invalid criteria");
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn border(criteria_type: &str, value: Value) -> AvatarBorder {
        AvatarBorder {
            id: Uuid::new_v4(),
            slug: format!("{criteria_type}-border"),
            name: criteria_type.to_owned(),
            description: None,
            tier: BorderTier::Common,
            criteria_type: criteria_type.to_owned(),
            criteria_value: value,
            sort_order: 0,
        }
    }

    fn hiking_stats(count: usize) -> BorderStats {
        BorderStats {
            checkins: CheckinStats::from_event_types(
                std::iter::repeat_n(EventType::Hiking, count),
                None,
            ),
            ..BorderStats::default()
        }
    }

    #[rstest]
    #[case(3, true)]
    #[case(2, false)]
    fn event_type_count_threshold(#[case] hikes: usize, #[case] expected: bool) {
        let rule = BorderCriteria::parse(
            "event_type_count",
            &json!({ "event_type": "hiking", "min_events": 3 }),
        )
        .expect("valid rule");
        assert_eq!(rule.is_met(&hiking_stats(hikes)), expected);
    }

    #[rstest]
    #[case("2026-01-01T00:00:00Z", false)]
    #[case("2025-12-31T23:59:59Z", true)]
    fn signup_before_is_strict(#[case] signed_up: &str, #[case] expected: bool) {
        let rule = BorderCriteria::parse("signup_before", &json!({ "date": "2026-01-01" }))
            .expect("valid rule");
        let stats = BorderStats {
            signed_up_at: Some(signed_up.parse().expect("timestamp")),
            ..BorderStats::default()
        };
        assert_eq!(rule.is_met(&stats), expected);
    }

    #[rstest]
    fn signup_before_needs_a_signup_date() {
        let rule = BorderCriteria::SignupBefore {
            date: NaiveDate::from_ymd_opt(2030, 1, 1).expect("date"),
        };
        assert!(!rule.is_met(&BorderStats::default()));
    }

    #[rstest]
    fn region_count_ignores_case_and_counts_events_once() {
        let mut stats = BorderStats::default();
        stats.record_event_regions(["Benguet", "benguet ", "Ifugao"]);
        stats.record_event_regions(["BENGUET"]);
        let rule = BorderCriteria::parse(
            "region_count",
            &json!({ "region": "Benguet", "min_events": 2 }),
        )
        .expect("valid rule");
        assert!(rule.is_met(&stats));
        assert_eq!(stats.count_for_region("ifugao"), 1);
    }

    #[rstest]
    fn organizer_event_count_threshold() {
        let rule = BorderCriteria::parse("organizer_event_count", &json!({ "min_events": 2 }))
            .expect("valid rule");
        let stats = BorderStats {
            organized_events: 2,
            ..BorderStats::default()
        };
        assert!(rule.is_met(&stats));
    }

    #[rstest]
    fn all_event_types_ignores_value() {
        let rule = BorderCriteria::parse("all_event_types", &Value::Null).expect("valid rule");
        let stats = BorderStats {
            checkins: CheckinStats::from_event_types(EventType::ALL.iter().copied(), None),
            ..BorderStats::default()
        };
        assert!(rule.is_met(&stats));
        assert!(!rule.is_met(&hiking_stats(20)));
    }

    #[rstest]
    #[case("moon_landing", json!({}))]
    #[case("event_count", json!({ "min": 3 }))]
    #[case("event_count", json!({ "min_events": -1 }))]
    #[case("event_type_count", json!({ "event_type": "kayak", "min_events": 1 }))]
    #[case("signup_before", json!({ "date": "yesterday" }))]
    fn rejects_unknown_and_malformed_rows(#[case] criteria_type: &str, #[case] value: Value) {
        assert!(BorderCriteria::parse(criteria_type, &value).is_err());
    }

    #[rstest]
    fn newly_earned_skips_invalid_and_held_rows() {
        let held_rule = border("event_count", json!({ "min_events": 1 }));
        let fresh_rule = border("event_count", json!({ "min_events": 3 }));
        let unmet_rule = border("event_count", json!({ "min_events": 4 }));
        let broken_rule = border("event_count", json!("three"));
        let catalogue = vec![
            held_rule.clone(),
            fresh_rule.clone(),
            unmet_rule,
            broken_rule,
        ];
        let held = HashSet::from([held_rule.id]);

        let earned = newly_earned_borders(&catalogue, &held, &hiking_stats(3));

        let ids: Vec<Uuid> = earned.iter().map(|border| border.id).collect();
        assert_eq!(ids, vec![fresh_rule.id]);
    }

    #[rstest]
    fn parses_signup_cutoff_at_utc_midnight() {
        let cutoff = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp");
        let stats = BorderStats {
            signed_up_at: Some(cutoff - chrono::TimeDelta::seconds(1)),
            ..BorderStats::default()
        };
        let rule = BorderCriteria::SignupBefore {
            date: cutoff.date_naive(),
        };
        assert!(rule.is_met(&stats));
    }
}
