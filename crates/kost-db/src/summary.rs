//! Owner dashboard figures read from SQLite.

use tracing::debug;

use crate::error::DbResult;
use crate::pool::Database;
use kost_core::dashboard::OwnerSummary;

impl Database {
    /// Builds the dashboard for one owner.
    ///
    /// Property and room counts cover the owner's listings only. Active
    /// bookings and pending orders are counted over the whole tables, and
    /// the recent lists hold at most `recent_limit` rows, newest first.
    pub async fn owner_summary(&self, owner_id: &str, recent_limit: usize) -> DbResult<OwnerSummary> {
        debug!(owner_id = %owner_id, recent_limit, "Building owner summary");

        let limit = u32::try_from(recent_limit).unwrap_or(u32::MAX);

        let properties = self.properties().list_by_owner(owner_id).await?;
        let rooms = self.rooms().list_by_owner(owner_id).await?;
        let active_bookings = self.bookings().count_active().await?;
        let pending_orders = self.orders().count_pending().await?;
        let recent_orders = self.orders().list_recent(limit).await?;
        let recent_bookings = self.bookings().list_recent(limit).await?;

        Ok(OwnerSummary::from_records(
            &properties,
            &rooms,
            active_bookings,
            pending_orders,
            recent_orders,
            recent_bookings,
            recent_limit,
        ))
    }
}
