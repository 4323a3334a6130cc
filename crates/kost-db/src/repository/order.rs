//! # Order Repository
//!
//! Database operations for payment-page orders.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pending ──mark_paid()──► Paid                                          │
//! │     │                                                                   │
//! │     └─────cancel()──────► Cancelled                                     │
//! │                 (active reservations of the order are cancelled too)   │
//! │                                                                         │
//! │  Paid and Cancelled are final.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kost_core::checkout::generate_order_number;
use kost_core::{CheckoutSummary, ContactDetails, Order, OrderStatus, ReservationStatus};

const ORDER_COLUMNS: &str = "id, order_number, category_id, total_payment, name, phone, email, \
                             payment_method, duration_months, check_in, check_out, status, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderStore {
    pool: SqlitePool,
}

impl OrderStore {
    /// Creates a new OrderStore.
    pub fn new(pool: SqlitePool) -> Self {
        OrderStore { pool }
    }

    /// Inserts an order.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Order number already taken
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        insert_order(&self.pool, order).await
    }

    /// Gets an order by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = ?1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by its human-facing number (`ORD-...`).
    pub async fn get_by_number(&self, order_number: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE order_number = ?1",
            ORDER_COLUMNS
        ))
        .bind(order_number.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Most recent orders, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders ORDER BY created_at DESC LIMIT ?1",
            ORDER_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders awaiting payment.
    pub async fn count_pending(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = 'pending'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Marks a pending order paid. Its reservation stays active.
    pub async fn mark_paid(&self, order_number: &str) -> DbResult<()> {
        debug!(order_number = %order_number, "Marking order paid");

        let result = sqlx::query(
            "UPDATE orders SET status = ?2 WHERE order_number = ?1 AND status = 'pending'",
        )
        .bind(order_number.trim())
        .bind(OrderStatus::Paid)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order (pending)", order_number));
        }

        Ok(())
    }

    /// Cancels a pending order and releases the room it holds.
    ///
    /// The order and its active reservations change in one transaction.
    ///
    /// ## Returns
    /// * `Ok(n)` - Number of reservations released (0 if no room was held)
    /// * `Err(DbError::NotFound)` - No pending order with that number
    pub async fn cancel(&self, order_number: &str) -> DbResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let order_id: Option<String> = sqlx::query_scalar(
            "SELECT id FROM orders WHERE order_number = ?1 AND status = 'pending'",
        )
        .bind(order_number.trim())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order_id) = order_id else {
            return Err(DbError::not_found("Order (pending)", order_number));
        };

        sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(&order_id)
            .bind(OrderStatus::Cancelled)
            .execute(&mut *tx)
            .await?;

        let released = sqlx::query(
            "UPDATE bookings SET status = ?2 WHERE order_id = ?1 AND status = 'active'",
        )
        .bind(&order_id)
        .bind(ReservationStatus::Cancelled)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(order_number = %order_number, released, "Order cancelled");
        Ok(released)
    }
}

/// Builds a pending order from a priced stay and validated contact details.
///
/// `total_payment` is the summary's total, taken as is.
pub fn new_order(summary: &CheckoutSummary, contact: &ContactDetails) -> Order {
    let now = Utc::now();
    let suffix = (Uuid::new_v4().as_u128() % 10_000) as u16;

    Order {
        id: Uuid::new_v4().to_string(),
        order_number: generate_order_number(now, suffix),
        category_id: summary.category_id.clone(),
        total_payment: summary.total_price.rupiah(),
        name: contact.name.clone(),
        phone: contact.phone.clone(),
        email: contact.email.clone(),
        payment_method: contact.payment_method,
        duration_months: summary.billing_months as i64,
        check_in: summary.check_in,
        check_out: summary.check_out,
        status: OrderStatus::Pending,
        created_at: now,
    }
}

/// Inserts an order on any executor (pool or open transaction).
pub(crate) async fn insert_order<'e, E>(executor: E, order: &Order) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    debug!(order_number = %order.order_number, total = order.total_payment, "Inserting order");

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, order_number, category_id, total_payment, name, phone, email,
            payment_method, duration_months, check_in, check_out, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(&order.id)
    .bind(&order.order_number)
    .bind(&order.category_id)
    .bind(order.total_payment)
    .bind(&order.name)
    .bind(&order.phone)
    .bind(&order.email)
    .bind(order.payment_method)
    .bind(order.duration_months)
    .bind(order.check_in)
    .bind(order.check_out)
    .bind(order.status)
    .bind(order.created_at)
    .execute(executor)
    .await?;

    Ok(())
}
