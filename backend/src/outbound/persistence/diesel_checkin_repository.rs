//! PostgreSQL-backed `CheckinRepository` implementation using Diesel ORM.
//!
//! The `(event_id, user_id)` key on `event_checkins` rejects a second
//! check-in; the mapper reports that as a duplicate. Companion attendance is
//! stamped only while `checked_in_at` is still null.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CheckinRepository, CheckinRepositoryError};
use crate::domain::{Checkin, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::CheckinRow;
use super::pool::DbPool;
use super::schema::{booking_companions, event_checkins};

/// Diesel-backed implementation of the check-in repository port.
#[derive(Clone)]
pub struct DieselCheckinRepository {
    pool: DbPool,
}

impl DieselCheckinRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckinRepository for DieselCheckinRepository {
    async fn find(
        &self,
        event_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Checkin>, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = event_checkins::table
            .filter(event_checkins::event_id.eq(event_id))
            .filter(event_checkins::user_id.eq(user_id.as_uuid()))
            .select(CheckinRow::as_select())
            .first::<CheckinRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Checkin::try_from)
            .transpose()
            .map_err(CheckinRepositoryError::query)
    }

    async fn insert(&self, checkin: &Checkin) -> Result<(), CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(event_checkins::table)
            .values(CheckinRow::from(checkin))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn mark_companion_checked_in(
        &self,
        companion_id: &Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, CheckinRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            booking_companions::table
                .filter(booking_companions::id.eq(companion_id))
                .filter(booking_companions::checked_in_at.is_null()),
        )
        .set(booking_companions::checked_in_at.eq(Some(at)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }
}
