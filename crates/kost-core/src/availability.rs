//! # Availability Checker
//!
//! Answers "is there a free room of this category for these dates?"
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   check_availability(category, range)                   │
//! │                                                                         │
//! │  1. repo.list_available_rooms(category)                                │
//! │       │  Err ──► FAIL OPEN { available: true, free_count: 0 }          │
//! │       │  []  ──► { available: false, free_count: 0 }                   │
//! │       ▼                                                                 │
//! │  2. repo.list_active_reservations(room_ids, range)                     │
//! │       │  Err ──► FAIL OPEN { available: true, free_count: rooms }      │
//! │       ▼                                                                 │
//! │  3. drop rooms holding a conflicting reservation                       │
//! │     (boundary-inclusive overlap, re-checked here)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { available: free_count > 0, free_count, free_room_ids }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fail-Open Policy
//! A failed read never blocks a sale: the checker logs the failure at WARN,
//! records it in [`AvailabilityResult::degraded`], and reports the category
//! as available. During a backend outage this can overbook a category.
//! That risk is accepted by the product, and confirmation flows should
//! treat a degraded result as unverified.
//!
//! ## Stale Results
//! The checker keeps no state and does not order concurrent calls. A caller
//! that fires a new check before the previous one resolves must discard the
//! older answer itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::RepositoryResult;
use crate::types::{DateRange, ReservationSpan, RoomInstance};

// =============================================================================
// Repository Seam
// =============================================================================

/// Read access to rooms and reservations, injected into the checker.
///
/// Implemented over SQLite by `kost-db`, and by in-memory fakes in tests.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Rooms of `category_id` whose listing flag is set.
    async fn list_available_rooms(&self, category_id: &str) -> RepositoryResult<Vec<RoomInstance>>;

    /// Active reservations on `room_ids` that overlap `range`.
    ///
    /// Implementations may return extra rows; the checker filters again.
    async fn list_active_reservations(
        &self,
        room_ids: &[String],
        range: &DateRange,
    ) -> RepositoryResult<Vec<ReservationSpan>>;
}

#[async_trait]
impl<R: RoomRepository + ?Sized> RoomRepository for std::sync::Arc<R> {
    async fn list_available_rooms(&self, category_id: &str) -> RepositoryResult<Vec<RoomInstance>> {
        (**self).list_available_rooms(category_id).await
    }

    async fn list_active_reservations(
        &self,
        room_ids: &[String],
        range: &DateRange,
    ) -> RepositoryResult<Vec<ReservationSpan>> {
        (**self).list_active_reservations(room_ids, range).await
    }
}

// =============================================================================
// Result
// =============================================================================

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    /// Whether the caller may proceed with the booking.
    pub available: bool,

    /// Rooms of the category with no conflicting reservation.
    pub free_count: usize,

    /// Ids of those rooms, in repository order. Empty when degraded.
    pub free_room_ids: Vec<String>,

    /// Set when the answer is a fail-open default rather than a real check.
    pub degraded: Option<String>,
}

impl AvailabilityResult {
    /// True when the result came from a real check, not the fail-open path.
    #[inline]
    pub fn is_verified(&self) -> bool {
        self.degraded.is_none()
    }

    fn fail_open(free_count: usize, reason: String) -> Self {
        AvailabilityResult {
            available: true,
            free_count,
            free_room_ids: Vec::new(),
            degraded: Some(reason),
        }
    }
}

// =============================================================================
// Checker
// =============================================================================

/// Availability checker over an injected [`RoomRepository`].
#[derive(Debug, Clone)]
pub struct AvailabilityChecker<R> {
    repo: R,
}

impl<R: RoomRepository> AvailabilityChecker<R> {
    pub fn new(repo: R) -> Self {
        AvailabilityChecker { repo }
    }

    /// Returns the injected repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Checks whether `category_id` has a free room for `range`.
    ///
    /// Never fails: repository errors produce a fail-open result.
    pub async fn check_availability(&self, category_id: &str, range: &DateRange) -> AvailabilityResult {
        let rooms = match self.repo.list_available_rooms(category_id).await {
            Ok(rooms) => rooms,
            Err(err) => {
                warn!(category = %category_id, error = %err, "Room listing failed, failing open");
                return AvailabilityResult::fail_open(0, err.to_string());
            }
        };

        if rooms.is_empty() {
            debug!(category = %category_id, "No listed rooms in category");
            return AvailabilityResult {
                available: false,
                free_count: 0,
                free_room_ids: Vec::new(),
                degraded: None,
            };
        }

        let room_ids: Vec<String> = rooms.iter().map(|r| r.id.clone()).collect();

        let reservations = match self.repo.list_active_reservations(&room_ids, range).await {
            Ok(reservations) => reservations,
            Err(err) => {
                warn!(
                    category = %category_id,
                    rooms = room_ids.len(),
                    error = %err,
                    "Reservation lookup failed, failing open"
                );
                return AvailabilityResult::fail_open(room_ids.len(), err.to_string());
            }
        };

        let booked: HashSet<&str> = reservations
            .iter()
            .filter(|r| r.conflicts_with(range))
            .map(|r| r.room_id.as_str())
            .collect();

        let free_room_ids: Vec<String> = room_ids
            .into_iter()
            .filter(|id| !booked.contains(id.as_str()))
            .collect();

        debug!(
            category = %category_id,
            check_in = %range.check_in(),
            check_out = %range.check_out(),
            free = free_room_ids.len(),
            "Availability checked"
        );

        AvailabilityResult {
            available: !free_room_ids.is_empty(),
            free_count: free_room_ids.len(),
            free_room_ids,
            degraded: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(from: NaiveDate, to: NaiveDate) -> DateRange {
        DateRange::new(from, to).unwrap()
    }

    /// In-memory repository with switchable failures.
    #[derive(Default)]
    struct FakeRepo {
        rooms: Vec<RoomInstance>,
        reservations: Vec<ReservationSpan>,
        fail_rooms: bool,
        fail_reservations: bool,
    }

    impl FakeRepo {
        fn with_rooms(category: &str, ids: &[&str]) -> Self {
            FakeRepo {
                rooms: ids
                    .iter()
                    .map(|id| RoomInstance {
                        id: id.to_string(),
                        category_id: category.to_string(),
                    })
                    .collect(),
                ..Default::default()
            }
        }

        fn reserve(mut self, room_id: &str, from: NaiveDate, to: NaiveDate) -> Self {
            self.reservations.push(ReservationSpan {
                room_id: room_id.to_string(),
                check_in: from,
                check_out: to,
            });
            self
        }
    }

    #[async_trait]
    impl RoomRepository for FakeRepo {
        async fn list_available_rooms(&self, category_id: &str) -> RepositoryResult<Vec<RoomInstance>> {
            if self.fail_rooms {
                return Err(RepositoryError::Unavailable("connection refused".to_string()));
            }
            Ok(self
                .rooms
                .iter()
                .filter(|r| r.category_id == category_id)
                .cloned()
                .collect())
        }

        // Returns every reservation on the rooms, overlapping or not, so the
        // checker's own overlap filter is exercised.
        async fn list_active_reservations(
            &self,
            room_ids: &[String],
            _range: &DateRange,
        ) -> RepositoryResult<Vec<ReservationSpan>> {
            if self.fail_reservations {
                return Err(RepositoryError::Unavailable("timeout".to_string()));
            }
            Ok(self
                .reservations
                .iter()
                .filter(|r| room_ids.contains(&r.room_id))
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_all_rooms_booked() {
        let repo = FakeRepo::with_rooms("Type 1", &["r1", "r2"])
            .reserve("r1", date(2024, 1, 1), date(2024, 6, 1))
            .reserve("r2", date(2024, 2, 1), date(2024, 3, 1));
        let checker = AvailabilityChecker::new(repo);

        let result = checker
            .check_availability("Type 1", &range(date(2024, 2, 10), date(2024, 3, 10)))
            .await;

        assert!(!result.available);
        assert_eq!(result.free_count, 0);
        assert!(result.is_verified());
    }

    #[tokio::test]
    async fn test_counts_free_rooms() {
        let repo = FakeRepo::with_rooms("Type 1", &["r1", "r2", "r3"])
            .reserve("r2", date(2024, 2, 1), date(2024, 3, 1))
            // outside the requested stay
            .reserve("r3", date(2023, 1, 1), date(2023, 6, 1));
        let checker = AvailabilityChecker::new(repo);

        let result = checker
            .check_availability("Type 1", &range(date(2024, 2, 10), date(2024, 3, 10)))
            .await;

        assert!(result.available);
        assert_eq!(result.free_count, 2);
        assert_eq!(result.free_room_ids, vec!["r1".to_string(), "r3".to_string()]);
    }

    #[tokio::test]
    async fn test_touching_boundary_conflicts() {
        let repo = FakeRepo::with_rooms("Type 2", &["r1"])
            .reserve("r1", date(2024, 1, 1), date(2024, 3, 1));
        let checker = AvailabilityChecker::new(repo);

        let result = checker
            .check_availability("Type 2", &range(date(2024, 3, 1), date(2024, 4, 1)))
            .await;

        assert!(!result.available);
        assert_eq!(result.free_count, 0);
    }

    #[tokio::test]
    async fn test_empty_category_is_unavailable() {
        let checker = AvailabilityChecker::new(FakeRepo::with_rooms("Type 1", &["r1"]));

        let result = checker
            .check_availability("Type 9", &range(date(2024, 1, 1), date(2024, 2, 1)))
            .await;

        assert!(!result.available);
        assert_eq!(result.free_count, 0);
        assert!(result.is_verified());
    }

    #[tokio::test]
    async fn test_room_listing_failure_fails_open() {
        let repo = FakeRepo {
            fail_rooms: true,
            ..FakeRepo::with_rooms("Type 1", &["r1"])
        };
        let checker = AvailabilityChecker::new(repo);

        let result = checker
            .check_availability("Type 1", &range(date(2024, 1, 1), date(2024, 2, 1)))
            .await;

        assert!(result.available);
        assert_eq!(result.free_count, 0);
        assert!(!result.is_verified());
        assert!(result.degraded.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_reservation_failure_fails_open_with_room_count() {
        let repo = FakeRepo {
            fail_reservations: true,
            ..FakeRepo::with_rooms("Type 1", &["r1", "r2"])
        };
        let checker = AvailabilityChecker::new(Arc::new(repo));

        let result = checker
            .check_availability("Type 1", &range(date(2024, 1, 1), date(2024, 2, 1)))
            .await;

        assert!(result.available);
        assert_eq!(result.free_count, 2);
        assert!(result.free_room_ids.is_empty());
        assert!(!result.is_verified());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = AvailabilityResult {
            available: true,
            free_count: 1,
            free_room_ids: vec!["r1".to_string()],
            degraded: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["freeCount"], 1);
        assert_eq!(json["freeRoomIds"][0], "r1");
    }
}
