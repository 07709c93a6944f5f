//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::ports::{EventListFilter, EventRepository, EventRepositoryError};
use crate::domain::{Event, EventReview, EventStatus, OrganizerProfile, UserId};

use super::diesel_error_mapping::{collect_rows, map_diesel_error, map_pool_error};
use super::models::{EventMountainRow, EventRow, NewEventReviewRow, OrganizerRow};
use super::pool::DbPool;
use super::schema::{event_mountains, event_reviews, events, organizer_profiles};

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn find_by_id(&self, event_id: &Uuid) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = events::table
            .filter(events::id.eq(event_id))
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Event::try_from)
            .transpose()
            .map_err(EventRepositoryError::query)
    }

    async fn list_published(
        &self,
        filter: &EventListFilter,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = events::table
            .filter(events::status.eq(EventStatus::Published.as_str()))
            .into_boxed();
        if let Some(event_type) = filter.event_type {
            query = query.filter(events::event_type.eq(event_type.as_str()));
        }

        let rows: Vec<EventRow> = query
            .order((events::starts_at.asc(), events::id.asc()))
            .limit(i64::from(filter.limit))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows.into_iter().map(Event::try_from))
    }

    async fn find_organizer_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<OrganizerProfile>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        organizer_profiles::table
            .filter(organizer_profiles::user_id.eq(user_id.as_uuid()))
            .select(OrganizerRow::as_select())
            .first::<OrganizerRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(OrganizerProfile::from))
            .map_err(map_diesel_error)
    }

    async fn find_organizer(
        &self,
        organizer_id: &Uuid,
    ) -> Result<Option<OrganizerProfile>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        organizer_profiles::table
            .filter(organizer_profiles::id.eq(organizer_id))
            .select(OrganizerRow::as_select())
            .first::<OrganizerRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(OrganizerProfile::from))
            .map_err(map_diesel_error)
    }

    async fn insert(
        &self,
        event: &Event,
        mountain_ids: &[Uuid],
    ) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let event_row = EventRow::from(event);
        let mountain_rows: Vec<EventMountainRow> = mountain_ids
            .iter()
            .map(|mountain_id| EventMountainRow {
                event_id: event.id,
                mountain_id: *mountain_id,
            })
            .collect();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(events::table)
                    .values(&event_row)
                    .execute(conn)
                    .await?;
                if !mountain_rows.is_empty() {
                    diesel::insert_into(event_mountains::table)
                        .values(&mountain_rows)
                        .on_conflict_do_nothing()
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
        event_id: &Uuid,
        status: EventStatus,
    ) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(events::table.filter(events::id.eq(event_id)))
            .set(events::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn insert_review(&self, review: &EventReview) -> Result<(), EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(event_reviews::table)
            .values(NewEventReviewRow::from(review))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
