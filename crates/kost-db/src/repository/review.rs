//! # Review Repository
//!
//! Database operations for renter reviews.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kost_core::review::{NewReview, RatingSummary};
use kost_core::Review;

/// Repository for review database operations.
#[derive(Debug, Clone)]
pub struct ReviewStore {
    pool: SqlitePool,
}

impl ReviewStore {
    /// Creates a new ReviewStore.
    pub fn new(pool: SqlitePool) -> Self {
        ReviewStore { pool }
    }

    /// Stores a validated review.
    pub async fn add(&self, review: &NewReview) -> DbResult<Review> {
        let review = Review {
            id: Uuid::new_v4().to_string(),
            user_id: review.user_id.clone(),
            name: review.name.clone(),
            rating: review.rating,
            body: review.body.clone(),
            created_at: Utc::now(),
        };

        debug!(id = %review.id, rating = review.rating, "Adding review");

        sqlx::query(
            r#"
            INSERT INTO reviews (id, user_id, name, rating, body, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&review.id)
        .bind(&review.user_id)
        .bind(&review.name)
        .bind(review.rating)
        .bind(&review.body)
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;

        Ok(review)
    }

    /// Lists all reviews, newest first.
    pub async fn list(&self) -> DbResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, name, rating, body, created_at
            FROM reviews
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Lists one user's reviews, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, name, rating, body, created_at
            FROM reviews
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Count and one-decimal average over all reviews.
    pub async fn summary(&self) -> DbResult<RatingSummary> {
        let reviews = self.list().await?;
        Ok(RatingSummary::from_reviews(&reviews))
    }
}
