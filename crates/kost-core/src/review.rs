//! # Reviews
//!
//! Validated review input and rating aggregation.
//!
//! The average is shown with one decimal, rounded half up on the tenths:
//! ratings `[5, 4, 4]` average `4.333…` and display as `4.3`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Review;
use crate::validation::{validate_name, validate_rating, validate_review_body, ValidationResult};

/// A review as submitted, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReview {
    pub user_id: String,
    pub name: String,
    pub rating: i64,
    pub body: String,
}

impl NewReview {
    /// Validates and trims the submitted fields.
    ///
    /// ## Rules
    /// - `user_id` and `name` are required
    /// - `rating` is between 1 and 5
    /// - `body` is non-empty and at most 1000 characters
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        rating: i64,
        body: impl Into<String>,
    ) -> ValidationResult<Self> {
        let user_id = user_id.into().trim().to_string();
        let name = name.into().trim().to_string();
        let body = body.into().trim().to_string();

        if user_id.is_empty() {
            return Err(ValidationError::Required {
                field: "user_id".to_string(),
            });
        }
        validate_name(&name)?;
        validate_rating(rating)?;
        validate_review_body(&body)?;

        Ok(NewReview {
            user_id,
            name,
            rating,
            body,
        })
    }
}

/// Count and one-decimal average of a set of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub count: usize,
    pub average: f64,
}

impl RatingSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let ratings: Vec<i64> = reviews.iter().map(|r| r.rating).collect();
        RatingSummary {
            count: ratings.len(),
            average: average_rating(&ratings),
        }
    }
}

/// Averages star ratings to one decimal place. Empty input averages 0.0.
///
/// ## Example
/// ```rust
/// use kost_core::review::average_rating;
///
/// assert_eq!(average_rating(&[5, 4, 4]), 4.3);
/// assert_eq!(average_rating(&[]), 0.0);
/// ```
pub fn average_rating(ratings: &[i64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let sum: i128 = ratings.iter().map(|&r| r as i128).sum();
    let count = ratings.len() as i128;
    // tenths, rounded half up: floor((20 * sum + count) / (2 * count))
    let tenths = (20 * sum + count).div_euclid(2 * count);

    tenths as f64 / 10.0
}
