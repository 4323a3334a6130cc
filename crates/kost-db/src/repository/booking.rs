//! # Booking Repository
//!
//! Database operations for reservations (table `bookings`).
//!
//! ## Reservation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Reservation Lifecycle                               │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── insert() → Reservation { status: Active }                      │
//! │         (blocks the room for check_in..=check_out)                     │
//! │                                                                         │
//! │  2a. COMPLETE                                                          │
//! │     └── complete() → Reservation { status: Completed }                 │
//! │                                                                         │
//! │  2b. CANCEL                                                            │
//! │     └── cancel() → Reservation { status: Cancelled }                   │
//! │         (also when OrderStore::cancel() withdraws the linked order)    │
//! │                                                                         │
//! │  Only Active reservations count against availability, and only         │
//! │  Active reservations can move to another status.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kost_core::{CheckoutSummary, DateRange, Reservation, ReservationSpan, ReservationStatus};

const RESERVATION_COLUMNS: &str = "id, room_id, category_id, renter_id, order_id, check_in, \
                                   check_out, duration_months, total_price, status, created_at";

/// Repository for reservation database operations.
#[derive(Debug, Clone)]
pub struct BookingStore {
    pool: SqlitePool,
}

impl BookingStore {
    /// Creates a new BookingStore.
    pub fn new(pool: SqlitePool) -> Self {
        BookingStore { pool }
    }

    /// Inserts a reservation.
    pub async fn insert(&self, reservation: &Reservation) -> DbResult<()> {
        insert_reservation(&self.pool, reservation).await
    }

    /// Gets a reservation by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM bookings WHERE id = ?1",
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Reservations placed by one order.
    pub async fn list_by_order(&self, order_id: &str) -> DbResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM bookings WHERE order_id = ?1 ORDER BY created_at",
            RESERVATION_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Lists active reservations on `room_ids` overlapping `range`.
    ///
    /// Overlap is boundary-inclusive: a stay ending on the requested
    /// check-in day still blocks the room.
    pub async fn list_active_overlapping(
        &self,
        room_ids: &[String],
        range: &DateRange,
    ) -> DbResult<Vec<ReservationSpan>> {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT room_id, check_in, check_out FROM bookings \
             WHERE status = 'active' AND room_id IN (",
        );
        {
            let mut ids = query.separated(", ");
            for id in room_ids {
                ids.push_bind(id.clone());
            }
        }
        query.push(") AND check_out >= ");
        query.push_bind(range.check_in());
        query.push(" AND check_in <= ");
        query.push_bind(range.check_out());

        let spans = query
            .build_query_as::<ReservationSpan>()
            .fetch_all(&self.pool)
            .await?;

        debug!(
            rooms = room_ids.len(),
            conflicts = spans.len(),
            "Loaded overlapping reservations"
        );
        Ok(spans)
    }

    /// Most recent reservations, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC LIMIT ?1",
            RESERVATION_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Counts reservations that currently hold a room.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Marks an active reservation completed.
    pub async fn complete(&self, id: &str) -> DbResult<()> {
        self.transition(id, ReservationStatus::Completed).await
    }

    /// Cancels an active reservation, freeing its room.
    pub async fn cancel(&self, id: &str) -> DbResult<()> {
        self.transition(id, ReservationStatus::Cancelled).await
    }

    async fn transition(&self, id: &str, to: ReservationStatus) -> DbResult<()> {
        debug!(id = %id, to = %to, "Updating reservation status");

        let result = sqlx::query("UPDATE bookings SET status = ?2 WHERE id = ?1 AND status = 'active'")
            .bind(id)
            .bind(to)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Reservation (active)", id));
        }

        Ok(())
    }
}

/// Builds an active reservation of `room_id` for a priced stay.
pub fn new_reservation(
    room_id: &str,
    renter_id: Option<&str>,
    order_id: Option<&str>,
    summary: &CheckoutSummary,
) -> Reservation {
    Reservation {
        id: Uuid::new_v4().to_string(),
        room_id: room_id.to_string(),
        category_id: summary.category_id.clone(),
        renter_id: renter_id.map(str::to_string),
        order_id: order_id.map(str::to_string),
        check_in: summary.check_in,
        check_out: summary.check_out,
        duration_months: summary.billing_months as i64,
        total_price: summary.total_price.rupiah(),
        status: ReservationStatus::Active,
        created_at: Utc::now(),
    }
}

/// Inserts a reservation on any executor (pool or open transaction).
pub(crate) async fn insert_reservation<'e, E>(executor: E, reservation: &Reservation) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    debug!(id = %reservation.id, room = %reservation.room_id, "Inserting reservation");

    sqlx::query(
        r#"
        INSERT INTO bookings (
            id, room_id, category_id, renter_id, order_id, check_in, check_out,
            duration_months, total_price, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&reservation.id)
    .bind(&reservation.room_id)
    .bind(&reservation.category_id)
    .bind(&reservation.renter_id)
    .bind(&reservation.order_id)
    .bind(reservation.check_in)
    .bind(reservation.check_out)
    .bind(reservation.duration_months)
    .bind(reservation.total_price)
    .bind(reservation.status)
    .bind(reservation.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::room::NewRoom;
    use chrono::NaiveDate;
    use kost_core::calculator::PricingStrategy;
    use kost_core::{Money, RoomRate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let property = db
            .properties()
            .create("owner-1", "Kost Melati", "Jl. Kenanga 5", "Bandung", None)
            .await
            .unwrap();
        let room = db
            .rooms()
            .create(&NewRoom {
                property_id: property.id,
                room_number: "101".to_string(),
                category_id: "Type 1".to_string(),
                monthly_price: Money::from_rupiah(800_000),
                facilities: None,
            })
            .await
            .unwrap();
        (db, room.id)
    }

    fn summary(from: NaiveDate, to: NaiveDate) -> CheckoutSummary {
        let range = DateRange::new(from, to).unwrap();
        let rate = RoomRate::new("Type 1", Money::from_rupiah(800_000));
        CheckoutSummary::from_quote(&rate, &range, PricingStrategy::MonthlyUnits).unwrap()
    }

    async fn book(db: &Database, room_id: &str, from: NaiveDate, to: NaiveDate) -> Reservation {
        let reservation = new_reservation(room_id, Some("renter-1"), None, &summary(from, to));
        db.bookings().insert(&reservation).await.unwrap();
        reservation
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let (db, room_id) = setup().await;
        let created = book(&db, &room_id, date(2024, 1, 15), date(2024, 4, 15)).await;

        let fetched = db.bookings().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.check_in, date(2024, 1, 15));
        assert_eq!(fetched.duration_months, 3);
        assert_eq!(fetched.total_price().rupiah(), 2_400_000);
        assert_eq!(fetched.status, ReservationStatus::Active);
        assert_eq!(fetched.renter_id.as_deref(), Some("renter-1"));
    }

    #[tokio::test]
    async fn test_overlap_is_boundary_inclusive() {
        let (db, room_id) = setup().await;
        book(&db, &room_id, date(2024, 1, 1), date(2024, 3, 1)).await;
        let ids = vec![room_id.clone()];

        let touching = DateRange::new(date(2024, 3, 1), date(2024, 4, 1)).unwrap();
        assert_eq!(
            db.bookings().list_active_overlapping(&ids, &touching).await.unwrap().len(),
            1
        );

        let after = DateRange::new(date(2024, 3, 2), date(2024, 4, 1)).unwrap();
        assert!(db
            .bookings()
            .list_active_overlapping(&ids, &after)
            .await
            .unwrap()
            .is_empty());

        assert!(db
            .bookings()
            .list_active_overlapping(&[], &touching)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_reservation_stops_blocking() {
        let (db, room_id) = setup().await;
        let reservation = book(&db, &room_id, date(2024, 1, 1), date(2024, 3, 1)).await;
        let range = DateRange::new(date(2024, 2, 1), date(2024, 2, 20)).unwrap();

        db.bookings().cancel(&reservation.id).await.unwrap();

        let spans = db
            .bookings()
            .list_active_overlapping(&[room_id], &range)
            .await
            .unwrap();
        assert!(spans.is_empty());
        assert_eq!(db.bookings().count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_active_reservations_transition() {
        let (db, room_id) = setup().await;
        let reservation = book(&db, &room_id, date(2024, 1, 1), date(2024, 3, 1)).await;

        db.bookings().complete(&reservation.id).await.unwrap();
        let fetched = db.bookings().get_by_id(&reservation.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ReservationStatus::Completed);

        let again = db.bookings().cancel(&reservation.id).await;
        assert!(matches!(again, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let (db, room_id) = setup().await;
        let latest = book(&db, &room_id, date(2023, 5, 1), date(2023, 6, 1)).await;

        let mut older = new_reservation(&room_id, None, None, &summary(date(2023, 1, 1), date(2023, 2, 1)));
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        db.bookings().insert(&older).await.unwrap();

        let recent = db.bookings().list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, latest.id);
        assert_eq!(recent[1].id, older.id);

        assert_eq!(db.bookings().list_recent(1).await.unwrap().len(), 1);
        assert_eq!(db.bookings().count_active().await.unwrap(), 2);
    }
}
