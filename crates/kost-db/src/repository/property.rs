//! # Property Repository
//!
//! Database operations for kost buildings.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kost_core::validation::validate_name;
use kost_core::Property;

/// Repository for property database operations.
#[derive(Debug, Clone)]
pub struct PropertyStore {
    pool: SqlitePool,
}

impl PropertyStore {
    /// Creates a new PropertyStore.
    pub fn new(pool: SqlitePool) -> Self {
        PropertyStore { pool }
    }

    /// Creates an active property for `owner_id`.
    pub async fn create(
        &self,
        owner_id: &str,
        name: &str,
        address: &str,
        city: &str,
        description: Option<&str>,
    ) -> DbResult<Property> {
        validate_name(name)?;

        let property = Property {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            city: city.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            is_active: true,
            created_at: Utc::now(),
        };

        debug!(id = %property.id, owner = %owner_id, "Creating property");

        sqlx::query(
            r#"
            INSERT INTO properties (
                id, owner_id, name, address, city, description, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&property.id)
        .bind(&property.owner_id)
        .bind(&property.name)
        .bind(&property.address)
        .bind(&property.city)
        .bind(&property.description)
        .bind(property.is_active)
        .bind(property.created_at)
        .execute(&self.pool)
        .await?;

        Ok(property)
    }

    /// Gets a property by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, owner_id, name, address, city, description, is_active, created_at
            FROM properties
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    /// Lists an owner's properties, oldest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<Property>> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, owner_id, name, address, city, description, is_active, created_at
            FROM properties
            WHERE owner_id = ?1
            ORDER BY created_at, name
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(owner = %owner_id, count = properties.len(), "Listed properties");
        Ok(properties)
    }
}
