//! # RoomRepository over SQLite
//!
//! Plugs [`Database`] into `kost_core::AvailabilityChecker`. Every
//! [`DbError`](crate::DbError) surfaces as `RepositoryError::Unavailable`,
//! which the checker turns into a fail-open answer.

use async_trait::async_trait;
use kost_core::{DateRange, RepositoryResult, ReservationSpan, RoomInstance, RoomRepository};

use crate::pool::Database;

#[async_trait]
impl RoomRepository for Database {
    async fn list_available_rooms(&self, category_id: &str) -> RepositoryResult<Vec<RoomInstance>> {
        Ok(self.rooms().list_instances(category_id).await?)
    }

    async fn list_active_reservations(
        &self,
        room_ids: &[String],
        range: &DateRange,
    ) -> RepositoryResult<Vec<ReservationSpan>> {
        Ok(self.bookings().list_active_overlapping(room_ids, range).await?)
    }
}
