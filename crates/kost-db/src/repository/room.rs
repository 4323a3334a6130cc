//! # Room Repository
//!
//! Database operations for rooms.
//!
//! ## Listing Flag vs. Occupancy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rooms.is_available   owner switch: is this room offered at all?       │
//! │  bookings (active)    occupancy: is it taken for these dates?          │
//! │                                                                         │
//! │  list_available(category) filters on the switch only. Date conflicts   │
//! │  are the availability checker's job.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kost_core::validation::{validate_category, validate_monthly_price, validate_room_number};
use kost_core::{Money, Room, RoomInstance, RoomRate};

/// A room as entered by an owner, before it has an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub property_id: String,
    pub room_number: String,
    pub category_id: String,
    pub monthly_price: Money,
    pub facilities: Option<String>,
}

/// Repository for room database operations.
#[derive(Debug, Clone)]
pub struct RoomStore {
    pool: SqlitePool,
}

const ROOM_COLUMNS: &str = "id, property_id, room_number, category_id, monthly_price, \
                            facilities, is_available, created_at, updated_at";

impl RoomStore {
    /// Creates a new RoomStore.
    pub fn new(pool: SqlitePool) -> Self {
        RoomStore { pool }
    }

    /// Inserts a room, listed as available.
    ///
    /// ## Returns
    /// * `Err(DbError::Invalid)` - Empty number/category or non-positive price
    /// * `Err(DbError::UniqueViolation)` - Room number already used in the property
    /// * `Err(DbError::ForeignKeyViolation)` - Property doesn't exist
    pub async fn create(&self, new_room: &NewRoom) -> DbResult<Room> {
        validate_room_number(&new_room.room_number)?;
        validate_category(&new_room.category_id)?;
        validate_monthly_price(new_room.monthly_price.rupiah())?;

        let now = Utc::now();
        let room = Room {
            id: Uuid::new_v4().to_string(),
            property_id: new_room.property_id.clone(),
            room_number: new_room.room_number.trim().to_string(),
            category_id: new_room.category_id.trim().to_string(),
            monthly_price: new_room.monthly_price.rupiah(),
            facilities: new_room.facilities.clone(),
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %room.id, category = %room.category_id, "Creating room");

        sqlx::query(
            r#"
            INSERT INTO rooms (
                id, property_id, room_number, category_id, monthly_price,
                facilities, is_available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&room.id)
        .bind(&room.property_id)
        .bind(&room.room_number)
        .bind(&room.category_id)
        .bind(room.monthly_price)
        .bind(&room.facilities)
        .bind(room.is_available)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(room)
    }

    /// Gets a room by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(&format!(
            "SELECT {} FROM rooms WHERE id = ?1",
            ROOM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Lists the rooms of one property by room number.
    pub async fn list_by_property(&self, property_id: &str) -> DbResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(&format!(
            "SELECT {} FROM rooms WHERE property_id = ?1 ORDER BY room_number",
            ROOM_COLUMNS
        ))
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Lists every room in the properties of `owner_id`.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT r.id, r.property_id, r.room_number, r.category_id, r.monthly_price,
                   r.facilities, r.is_available, r.created_at, r.updated_at
            FROM rooms r
            INNER JOIN properties p ON p.id = r.property_id
            WHERE p.owner_id = ?1
            ORDER BY p.name, r.room_number
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Lists listed rooms of a category, oldest first.
    pub async fn list_available(&self, category_id: &str) -> DbResult<Vec<Room>> {
        debug!(category = %category_id, "Listing available rooms");

        let rooms = sqlx::query_as::<_, Room>(&format!(
            "SELECT {} FROM rooms WHERE category_id = ?1 AND is_available = 1 \
             ORDER BY created_at, room_number",
            ROOM_COLUMNS
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Same as [`list_available`](Self::list_available), reduced to ids.
    pub async fn list_instances(&self, category_id: &str) -> DbResult<Vec<RoomInstance>> {
        let rooms = sqlx::query_as::<_, RoomInstance>(
            r#"
            SELECT id, category_id
            FROM rooms
            WHERE category_id = ?1 AND is_available = 1
            ORDER BY created_at, room_number
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Reads the rate of a category from its first listed room.
    ///
    /// ## Returns
    /// * `Ok(None)` - No room of the category is listed
    pub async fn category_rate(&self, category_id: &str) -> DbResult<Option<RoomRate>> {
        let price: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT monthly_price
            FROM rooms
            WHERE category_id = ?1 AND is_available = 1
            ORDER BY created_at, room_number
            LIMIT 1
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(price.map(|p| RoomRate::new(category_id, Money::from_rupiah(p))))
    }

    /// Turns the listing flag of a room on or off.
    pub async fn set_availability(&self, id: &str, is_available: bool) -> DbResult<()> {
        debug!(id = %id, is_available, "Setting room availability");

        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET is_available = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(is_available)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", id));
        }

        Ok(())
    }
}
