//! PostgreSQL-backed `UserDirectory` implementation using Diesel ORM.
//!
//! Rows in `users` mirror identity-provider accounts. `ensure_profile`
//! upserts the email and name but keeps the original `created_at`, which
//! border criteria treat as the sign-up instant.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{UserContact, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user directory port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_contact(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserContact>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(UserContact::from))
            .map_err(map_diesel_error)
    }

    async fn ensure_profile(
        &self,
        contact: &UserContact,
        signed_up_at: DateTime<Utc>,
    ) -> Result<(), UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = UserRow {
            id: *contact.id.as_uuid(),
            email: contact.email.clone(),
            full_name: contact.full_name.clone(),
            created_at: signed_up_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::id)
            .do_update()
            .set((
                users::email.eq(excluded(users::email)),
                users::full_name.eq(excluded(users::full_name)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
