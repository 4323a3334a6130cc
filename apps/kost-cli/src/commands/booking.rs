//! # Booking Commands
//!
//! Ends an active reservation, either as a finished stay or a cancellation.
//! Either way the room becomes free again for those dates.

use clap::Subcommand;
use tracing::info;

use super::Context;
use crate::error::{CliError, CliResult};
use kost_core::validation::validate_uuid;
use kost_core::Reservation;

#[derive(Debug, Clone, Subcommand)]
pub enum BookingCommand {
    /// Mark an active reservation completed
    Complete { id: String },

    /// Cancel an active reservation
    Cancel { id: String },
}

pub async fn run(ctx: &Context, command: BookingCommand) -> CliResult<Reservation> {
    let (BookingCommand::Complete { id } | BookingCommand::Cancel { id }) = &command;
    validate_uuid("reservation", id)?;

    let id = match command {
        BookingCommand::Complete { id } => {
            ctx.db.bookings().complete(&id).await?;
            info!(id = %id, "Reservation completed");
            id
        }
        BookingCommand::Cancel { id } => {
            ctx.db.bookings().cancel(&id).await?;
            info!(id = %id, "Reservation cancelled");
            id
        }
    };

    ctx.db
        .bookings()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| CliError::not_found("Reservation", &id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, date};
    use crate::error::ErrorCode;
    use kost_core::{ContactDetails, PaymentMethod, PricingStrategy, ReservationStatus};
    use kost_db::OrderRequest;

    #[tokio::test]
    async fn test_cancel_frees_the_room() {
        let ctx = context(1).await;
        let request = OrderRequest {
            category_id: "Type 1".to_string(),
            check_in: date(2024, 1, 1),
            check_out: date(2024, 2, 1),
            strategy: PricingStrategy::MonthlyUnits,
            contact: ContactDetails {
                name: "Rina".to_string(),
                email: "rina@example.com".to_string(),
                phone: "081234567890".to_string(),
                payment_method: PaymentMethod::Cash,
            },
            renter_id: None,
        };
        let confirmation = ctx.service.confirm_order(&request).await.unwrap();
        let held = confirmation.reservation.unwrap();

        let cancelled = run(&ctx, BookingCommand::Cancel { id: held.id.clone() })
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        // a second order for the same dates now gets the room
        assert!(ctx.service.confirm_order(&request).await.is_ok());

        let again = run(&ctx, BookingCommand::Complete { id: held.id }).await.unwrap_err();
        assert_eq!(again.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_id_rejected() {
        let ctx = context(0).await;

        let err = run(
            &ctx,
            BookingCommand::Cancel {
                id: "ORD-1718000000001234".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
