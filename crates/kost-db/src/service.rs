//! # Booking Service
//!
//! The order confirmation flow of the payment page.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        confirm_order(request)                           │
//! │                                                                         │
//! │  1. validate contact details ─────────────► ServiceError::Validation   │
//! │  2. rate = first listed room of category ─► ServiceError::Unavailable  │
//! │  3. CheckoutSummary::from_quote ──────────► ServiceError::Booking      │
//! │  4. check_availability (fail-open)                                     │
//! │       available = false ──────────────────► ServiceError::Unavailable  │
//! │  5. BEGIN                                                              │
//! │       INSERT order (pending)                                           │
//! │       if a free room is known:                                         │
//! │         re-check that room inside the transaction                      │
//! │         INSERT reservation (active, linked by order_id)                │
//! │     COMMIT                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! When the availability answer was degraded (fail-open) there is no
//! verified room to hold, so only the order is written and a warning is
//! logged. The owner assigns a room when confirming payment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DbError, ServiceError, ServiceResult};
use crate::pool::Database;
use crate::repository::booking::{insert_reservation, new_reservation};
use crate::repository::order::{insert_order, new_order};
use kost_core::validation::validate_category;
use kost_core::{
    AvailabilityChecker, AvailabilityResult, CheckoutSummary, ContactDetails, DateRange, Order,
    PricingStrategy, Reservation,
};

/// Everything the payment page submits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub category_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub strategy: PricingStrategy,
    pub contact: ContactDetails,
    #[serde(default)]
    pub renter_id: Option<String>,
}

/// A stored order, with the reservation that holds a room when one could
/// be assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub order: Order,
    pub reservation: Option<Reservation>,
    pub summary: CheckoutSummary,
    pub availability: AvailabilityResult,
}

/// Quotes, checks and confirms bookings against one [`Database`].
#[derive(Debug, Clone)]
pub struct BookingService {
    db: Database,
    checker: AvailabilityChecker<Database>,
}

impl BookingService {
    pub fn new(db: Database) -> Self {
        BookingService {
            checker: AvailabilityChecker::new(db.clone()),
            db,
        }
    }

    /// Prices a stay at the category's current rate.
    pub async fn quote(
        &self,
        category_id: &str,
        range: &DateRange,
        strategy: PricingStrategy,
    ) -> ServiceResult<CheckoutSummary> {
        validate_category(category_id)?;

        let rate = self
            .db
            .rooms()
            .category_rate(category_id)
            .await?
            .ok_or_else(|| ServiceError::Unavailable {
                category: category_id.to_string(),
            })?;

        Ok(CheckoutSummary::from_quote(&rate, range, strategy)?)
    }

    /// Availability of a category for a stay. Never fails.
    pub async fn check(&self, category_id: &str, range: &DateRange) -> AvailabilityResult {
        self.checker.check_availability(category_id, range).await
    }

    /// Validates, prices and stores an order.
    ///
    /// ## Returns
    /// * `Err(ServiceError::Validation)` - Bad contact details or category
    /// * `Err(ServiceError::Booking)` - Bad dates or an unpriceable rate
    /// * `Err(ServiceError::Unavailable)` - Category unlisted or fully booked
    /// * `Err(ServiceError::Db)` - Storage failed
    pub async fn confirm_order(&self, request: &OrderRequest) -> ServiceResult<Confirmation> {
        let contact = request.contact.validated()?;
        let range = DateRange::new(request.check_in, request.check_out)?;
        let category = request.category_id.trim();

        let summary = self.quote(category, &range, request.strategy).await?;
        let availability = self.check(category, &range).await;

        if !availability.available {
            info!(category = %category, "Order refused, no free room");
            return Err(ServiceError::Unavailable {
                category: category.to_string(),
            });
        }

        let order = new_order(&summary, &contact);

        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        insert_order(&mut *tx, &order).await?;

        let mut reservation = None;
        for room_id in &availability.free_room_ids {
            if room_is_free(&mut tx, room_id, &range).await? {
                let held = new_reservation(
                    room_id,
                    request.renter_id.as_deref(),
                    Some(&order.id),
                    &summary,
                );
                insert_reservation(&mut *tx, &held).await?;
                reservation = Some(held);
                break;
            }
        }

        if reservation.is_none() {
            if availability.is_verified() {
                // every verified room was taken between check and insert
                return Err(ServiceError::Unavailable {
                    category: category.to_string(),
                });
            }
            warn!(
                order_number = %order.order_number,
                reason = availability.degraded.as_deref().unwrap_or("unknown"),
                "Order stored without a room, availability unverified"
            );
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_number = %order.order_number,
            total = %summary.total_price,
            room_held = reservation.is_some(),
            "Order confirmed"
        );

        Ok(Confirmation {
            order,
            reservation,
            summary,
            availability,
        })
    }
}

async fn room_is_free(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    room_id: &str,
    range: &DateRange,
) -> ServiceResult<bool> {
    let conflicts: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM bookings
        WHERE room_id = ?1 AND status = 'active'
          AND check_out >= ?2 AND check_in <= ?3
        "#,
    )
    .bind(room_id)
    .bind(range.check_in())
    .bind(range.check_out())
    .fetch_one(&mut **tx)
    .await
    .map_err(DbError::from)?;

    Ok(conflicts == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use crate::repository::room::NewRoom;
    use kost_core::{Money, OrderStatus, PaymentMethod, ReservationStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn service_with_rooms(count: usize) -> BookingService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let property = db
            .properties()
            .create("owner-1", "Kost Melati", "Jl. Kenanga 5", "Bandung", None)
            .await
            .unwrap();
        for n in 0..count {
            db.rooms()
                .create(&NewRoom {
                    property_id: property.id.clone(),
                    room_number: format!("10{}", n + 1),
                    category_id: "Type 1".to_string(),
                    monthly_price: Money::from_rupiah(800_000),
                    facilities: None,
                })
                .await
                .unwrap();
        }
        BookingService::new(db)
    }

    fn request(check_in: NaiveDate, check_out: NaiveDate) -> OrderRequest {
        OrderRequest {
            category_id: "Type 1".to_string(),
            check_in,
            check_out,
            strategy: PricingStrategy::MonthlyUnits,
            contact: ContactDetails {
                name: "Rina".to_string(),
                email: "rina@example.com".to_string(),
                phone: "081234567890".to_string(),
                payment_method: PaymentMethod::Qris,
            },
            renter_id: Some("renter-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_confirm_persists_pending_order_with_quoted_total() {
        let service = service_with_rooms(1).await;

        let confirmation = service
            .confirm_order(&request(date(2024, 1, 15), date(2024, 4, 15)))
            .await
            .unwrap();

        let stored = service
            .db
            .orders()
            .get_by_number(&confirmation.order.order_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.total_payment().rupiah(), 2_400_000);
        assert_eq!(stored.duration_months, 3);

        let held = confirmation.reservation.unwrap();
        assert_eq!(held.status, ReservationStatus::Active);
        assert_eq!(held.total_price, 2_400_000);
        assert!(service.db.bookings().get_by_id(&held.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_order_for_last_room_is_refused() {
        let service = service_with_rooms(1).await;
        service
            .confirm_order(&request(date(2024, 1, 1), date(2024, 3, 1)))
            .await
            .unwrap();

        // starts on the day the first stay ends
        let result = service
            .confirm_order(&request(date(2024, 3, 1), date(2024, 5, 1)))
            .await;

        assert!(matches!(result, Err(ServiceError::Unavailable { .. })));
        assert_eq!(service.db.orders().count_pending().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cancelling_order_releases_its_room() {
        let service = service_with_rooms(1).await;
        let stay = request(date(2024, 1, 1), date(2024, 2, 1));
        let range = DateRange::new(stay.check_in, stay.check_out).unwrap();

        let confirmation = service.confirm_order(&stay).await.unwrap();
        let held = confirmation.reservation.unwrap();
        assert_eq!(held.order_id.as_deref(), Some(confirmation.order.id.as_str()));
        assert!(!service.check("Type 1", &range).await.available);

        let released = service
            .db
            .orders()
            .cancel(&confirmation.order.order_number)
            .await
            .unwrap();
        assert_eq!(released, 1);

        let after = service.check("Type 1", &range).await;
        assert!(after.available);
        assert_eq!(after.free_count, 1);
        assert_eq!(service.db.bookings().count_active().await.unwrap(), 0);

        let linked = service
            .db
            .bookings()
            .list_by_order(&confirmation.order.id)
            .await
            .unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_invalid_contact_is_rejected_before_storage() {
        let service = service_with_rooms(1).await;
        let mut bad = request(date(2024, 1, 1), date(2024, 2, 1));
        bad.contact.email = "not-an-email".to_string();

        let result = service.confirm_order(&bad).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(service.db.orders().count_pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bad_range_and_unknown_category() {
        let service = service_with_rooms(1).await;

        let reversed = service
            .confirm_order(&request(date(2024, 2, 1), date(2024, 1, 1)))
            .await;
        assert!(matches!(reversed, Err(ServiceError::Booking(_))));

        let mut unknown = request(date(2024, 1, 1), date(2024, 2, 1));
        unknown.category_id = "Type 9".to_string();
        let result = service.confirm_order(&unknown).await;
        assert!(matches!(result, Err(ServiceError::Unavailable { .. })));
    }

    #[test]
    fn test_order_request_from_payment_form() {
        let json = r#"{
            "category_id": "Type 2",
            "check_in": "2024-07-01",
            "check_out": "2024-09-01",
            "contact": {
                "name": "Budi",
                "email": "budi@example.com",
                "phone": "+62 812-3456-7890",
                "payment_method": "e_wallet"
            }
        }"#;

        let request: OrderRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.strategy, PricingStrategy::MonthlyUnits);
        assert_eq!(request.contact.payment_method, PaymentMethod::EWallet);
        assert!(request.renter_id.is_none());
    }

    #[tokio::test]
    async fn test_daily_strategy_order() {
        let service = service_with_rooms(1).await;
        let mut daily = request(date(2024, 1, 1), date(2024, 1, 16));
        daily.strategy = PricingStrategy::DailyProrated;

        let confirmation = service.confirm_order(&daily).await.unwrap();

        assert_eq!(confirmation.order.total_payment, 400_000);
        assert_eq!(confirmation.order.duration_months, 1);
        assert_eq!(confirmation.summary.duration_units, 15);
    }
}
