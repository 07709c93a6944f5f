//! PostgreSQL-backed `AchievementRepository` implementation using Diesel ORM.
//!
//! Aggregates are computed from raw check-in rows so the evaluators in the
//! domain layer own every threshold. Awards are idempotent: re-awarding a held
//! badge or border is ignored by `ON CONFLICT DO NOTHING`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Uuid as SqlUuid};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{AchievementRepository, AchievementRepositoryError};
use crate::domain::{
    AvatarBorder, Badge, BorderStats, CheckinStats, EarnedBadge, EarnedBorder, EventStatus,
    EventType, UserId,
};

use super::diesel_error_mapping::{collect_rows, map_diesel_error, map_pool_error};
use super::models::{AvatarBorderRow, BadgeRow, UserBadgeRow, UserBorderRow};
use super::pool::DbPool;
use super::schema::{
    avatar_borders, badges, event_checkins, event_mountains, events, mountains,
    organizer_profiles, user_avatar_borders, user_badges, users,
};

/// Diesel-backed implementation of the achievement repository port.
#[derive(Clone)]
pub struct DieselAchievementRepository {
    pool: DbPool,
}

impl DieselAchievementRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Events the user checked into, with their type.
async fn load_attended_events(
    conn: &mut AsyncPgConnection,
    user_id: &UserId,
) -> Result<Vec<(Uuid, EventType)>, AchievementRepositoryError> {
    let rows: Vec<(Uuid, String)> = event_checkins::table
        .inner_join(events::table)
        .filter(event_checkins::user_id.eq(user_id.as_uuid()))
        .select((event_checkins::event_id, events::event_type))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    collect_rows(rows.into_iter().map(|(event_id, event_type)| {
        event_type
            .parse::<EventType>()
            .map(|parsed| (event_id, parsed))
            .map_err(|err| err.to_string())
    }))
}

/// Users whose `(first check-in, user id)` sorts before the given user's.
const USERS_AHEAD_SQL: &str = "\
WITH firsts AS (
    SELECT user_id, MIN(checked_in_at) AS first_at
    FROM event_checkins
    GROUP BY user_id
)
SELECT COUNT(*) AS ahead
FROM firsts
JOIN firsts AS own ON own.user_id = $1
WHERE (firsts.first_at, firsts.user_id) < (own.first_at, own.user_id)";

#[derive(QueryableByName)]
struct UsersAheadRow {
    #[diesel(sql_type = BigInt)]
    ahead: i64,
}

/// Rank of the user's first check-in among every user's first check-in.
async fn load_pioneer_rank(
    conn: &mut AsyncPgConnection,
    user_id: &UserId,
) -> Result<Option<u32>, AchievementRepositoryError> {
    let row: UsersAheadRow = sql_query(USERS_AHEAD_SQL)
        .bind::<SqlUuid, _>(user_id.as_uuid())
        .get_result(conn)
        .await
        .map_err(map_diesel_error)?;

    Ok(u32::try_from(row.ahead).ok().map(|ahead| ahead.saturating_add(1)))
}

async fn load_checkin_stats_with(
    conn: &mut AsyncPgConnection,
    user_id: &UserId,
) -> Result<(CheckinStats, Vec<Uuid>), AchievementRepositoryError> {
    let attended = load_attended_events(conn, user_id).await?;
    let rank = if attended.is_empty() {
        None
    } else {
        load_pioneer_rank(conn, user_id).await?
    };
    let event_ids = attended.iter().map(|(id, _)| *id).collect();
    let stats = CheckinStats::from_event_types(attended.into_iter().map(|(_, kind)| kind), rank);
    Ok((stats, event_ids))
}

#[async_trait]
impl AchievementRepository for DieselAchievementRepository {
    async fn load_checkin_stats(
        &self,
        user_id: &UserId,
    ) -> Result<CheckinStats, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (stats, _) = load_checkin_stats_with(&mut conn, user_id).await?;
        Ok(stats)
    }

    async fn load_border_stats(
        &self,
        user_id: &UserId,
    ) -> Result<BorderStats, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (checkins, event_ids) = load_checkin_stats_with(&mut conn, user_id).await?;

        let signed_up_at: Option<DateTime<Utc>> = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(users::created_at)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let region_rows: Vec<(Uuid, String)> = if event_ids.is_empty() {
            Vec::new()
        } else {
            event_mountains::table
                .inner_join(mountains::table)
                .filter(event_mountains::event_id.eq_any(&event_ids))
                .select((event_mountains::event_id, mountains::region))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?
        };
        let mut regions_by_event: BTreeMap<Uuid, Vec<String>> = BTreeMap::new();
        for (event_id, region) in region_rows {
            regions_by_event.entry(event_id).or_default().push(region);
        }

        let organized: i64 = events::table
            .inner_join(organizer_profiles::table)
            .filter(organizer_profiles::user_id.eq(user_id.as_uuid()))
            .filter(events::status.ne(EventStatus::Draft.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut stats = BorderStats {
            signed_up_at,
            checkins,
            organized_events: u32::try_from(organized).unwrap_or(u32::MAX),
            ..BorderStats::default()
        };
        for regions in regions_by_event.values() {
            stats.record_event_regions(regions.iter().map(String::as_str));
        }
        Ok(stats)
    }

    async fn list_badges(&self) -> Result<Vec<Badge>, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BadgeRow> = badges::table
            .order(badges::title.asc())
            .select(BadgeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Badge::from).collect())
    }

    async fn list_user_badges(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EarnedBadge>, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(BadgeRow, DateTime<Utc>)> = user_badges::table
            .inner_join(badges::table)
            .filter(user_badges::user_id.eq(user_id.as_uuid()))
            .order(user_badges::awarded_at.desc())
            .select((BadgeRow::as_select(), user_badges::awarded_at))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(badge, awarded_at)| EarnedBadge {
                badge: Badge::from(badge),
                awarded_at,
            })
            .collect())
    }

    async fn award_badges(
        &self,
        user_id: &UserId,
        badge_ids: &[Uuid],
        awarded_at: DateTime<Utc>,
    ) -> Result<(), AchievementRepositoryError> {
        if badge_ids.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserBadgeRow> = badge_ids
            .iter()
            .map(|badge_id| UserBadgeRow {
                user_id: *user_id.as_uuid(),
                badge_id: *badge_id,
                awarded_at,
            })
            .collect();

        diesel::insert_into(user_badges::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_borders(&self) -> Result<Vec<AvatarBorder>, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AvatarBorderRow> = avatar_borders::table
            .order((avatar_borders::sort_order.asc(), avatar_borders::slug.asc()))
            .select(AvatarBorderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows.into_iter().map(AvatarBorder::try_from))
    }

    async fn list_user_borders(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<EarnedBorder>, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserBorderRow> = user_avatar_borders::table
            .filter(user_avatar_borders::user_id.eq(user_id.as_uuid()))
            .select(UserBorderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| EarnedBorder {
                border_id: row.border_id,
                awarded_at: row.awarded_at,
            })
            .collect())
    }

    async fn award_borders(
        &self,
        user_id: &UserId,
        border_ids: &[Uuid],
        awarded_at: DateTime<Utc>,
    ) -> Result<(), AchievementRepositoryError> {
        if border_ids.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserBorderRow> = border_ids
            .iter()
            .map(|border_id| UserBorderRow {
                user_id: *user_id.as_uuid(),
                border_id: *border_id,
                awarded_at,
            })
            .collect();

        diesel::insert_into(user_avatar_borders::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
