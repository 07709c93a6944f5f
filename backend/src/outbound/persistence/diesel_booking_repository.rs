//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! Bookings and their companions live in separate tables. Reads load the
//! companions of every returned booking in one follow-up query.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{Booking, BookingStatus, Companion, Event, PaymentStatus, UserId};

use super::diesel_error_mapping::{collect_rows, map_diesel_error, map_pool_error};
use super::models::{BookingRow, CompanionRow, EventRow};
use super::pool::DbPool;
use super::schema::{booking_companions, bookings, events};

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn active_statuses() -> Vec<&'static str> {
    BookingStatus::ACTIVE
        .iter()
        .map(|status| status.as_str())
        .collect()
}

/// Attach companions to booking rows, preserving row order.
async fn with_companions(
    conn: &mut AsyncPgConnection,
    rows: Vec<BookingRow>,
) -> Result<Vec<Booking>, BookingRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let booking_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let companion_rows: Vec<CompanionRow> = booking_companions::table
        .filter(booking_companions::booking_id.eq_any(&booking_ids))
        .order((booking_companions::booking_id, booking_companions::full_name))
        .select(CompanionRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut by_booking: HashMap<Uuid, Vec<Companion>> = HashMap::new();
    for row in companion_rows {
        by_booking
            .entry(row.booking_id)
            .or_default()
            .push(Companion::from(row));
    }

    collect_rows(rows.into_iter().map(|row| {
        let companions = by_booking.remove(&row.id).unwrap_or_default();
        row.into_booking(companions)
    }))
}

async fn first_with_companions(
    conn: &mut AsyncPgConnection,
    row: Option<BookingRow>,
) -> Result<Option<Booking>, BookingRepositoryError> {
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(with_companions(conn, vec![row]).await?.into_iter().next())
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn count_taken_seats(&self, event_id: &Uuid) -> Result<u32, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let active = active_statuses();

        let holders: i64 = bookings::table
            .filter(bookings::event_id.eq(event_id))
            .filter(bookings::status.eq_any(&active))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let companions: i64 = booking_companions::table
            .inner_join(bookings::table)
            .filter(bookings::event_id.eq(event_id))
            .filter(bookings::status.eq_any(&active))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u32::try_from(holders.saturating_add(companions))
            .map_err(|_| BookingRepositoryError::query("seat count out of range"))
    }

    async fn find_active_for_user(
        &self,
        event_id: &Uuid,
        user_id: &UserId,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = bookings::table
            .filter(bookings::event_id.eq(event_id))
            .filter(bookings::user_id.eq(user_id.as_uuid()))
            .filter(bookings::status.eq_any(active_statuses()))
            .order(bookings::booked_at.desc())
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        first_with_companions(&mut conn, row).await
    }

    async fn find_by_id(
        &self,
        booking_id: &Uuid,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = bookings::table
            .filter(bookings::id.eq(booking_id))
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        first_with_companions(&mut conn, row).await
    }

    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let booking_row = BookingRow::from(booking);
        let companion_rows: Vec<CompanionRow> =
            booking.companions.iter().map(CompanionRow::from).collect();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(bookings::table)
                    .values(&booking_row)
                    .execute(conn)
                    .await?;
                if !companion_rows.is_empty() {
                    diesel::insert_into(booking_companions::table)
                        .values(&companion_rows)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update_status(
        &self,
        booking_id: &Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(bookings::table.filter(bookings::id.eq(booking_id)))
            .set((
                bookings::status.eq(status.as_str()),
                bookings::payment_status.eq(payment_status.as_str()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::user_id.eq(user_id.as_uuid()))
            .order((bookings::booked_at.desc(), bookings::id.desc()))
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        with_companions(&mut conn, rows).await
    }

    async fn list_active_events_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Event>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<EventRow> = bookings::table
            .inner_join(events::table)
            .filter(bookings::user_id.eq(user_id.as_uuid()))
            .filter(bookings::status.eq_any(active_statuses()))
            .order(events::starts_at.asc())
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows.into_iter().map(Event::try_from))
    }

    async fn find_active_companion(
        &self,
        event_id: &Uuid,
        companion_id: &Uuid,
    ) -> Result<Option<Companion>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        booking_companions::table
            .inner_join(bookings::table)
            .filter(booking_companions::id.eq(companion_id))
            .filter(bookings::event_id.eq(event_id))
            .filter(bookings::status.eq_any(active_statuses()))
            .select(CompanionRow::as_select())
            .first::<CompanionRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Companion::from))
            .map_err(map_diesel_error)
    }
}
