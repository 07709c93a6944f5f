//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one domain port over a shared [`DbPool`].
//! Adapters only translate between Diesel rows and domain types; booking,
//! check-in and achievement rules stay in the domain services.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) never leave
//!   this module.
//! - Enum columns hold the same lowercase strings the HTTP API uses.
//! - Database errors are mapped to the port's error enum, with uniqueness
//!   violations surfacing as duplicates or conflicts where the port models
//!   them.
//!
//! ```ignore
//! use eventtara::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/eventtara")).await?;
//! let events = DieselEventRepository::new(pool);
//! ```

mod diesel_achievement_repository;
mod diesel_booking_repository;
mod diesel_checkin_repository;
mod diesel_error_mapping;
mod diesel_event_repository;
mod diesel_social_repository;
mod diesel_user_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_achievement_repository::DieselAchievementRepository;
pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_checkin_repository::DieselCheckinRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use diesel_social_repository::DieselSocialRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
