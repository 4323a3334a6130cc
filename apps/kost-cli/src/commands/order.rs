//! # Order Commands
//!
//! ## Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kost order place ──► BookingService::confirm_order ──► Pending         │
//! │  kost order pay ORD-... ─────────────────────────────► Paid             │
//! │  kost order cancel ORD-... ──────────────────────────► Cancelled        │
//! │                                   (room released for the same dates)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use super::{Context, PricingArgs, StayArgs};
use crate::error::{CliError, CliResult};
use kost_core::{ContactDetails, Order, PaymentMethod};
use kost_db::{Confirmation, OrderRequest};

#[derive(Debug, Clone, Subcommand)]
pub enum OrderCommand {
    /// Confirm a booking and store a pending order
    Place(PlaceArgs),

    /// Mark a pending order paid
    Pay { order_number: String },

    /// Cancel a pending order
    Cancel { order_number: String },

    /// Show one order
    Show { order_number: String },
}

#[derive(Debug, Clone, Args)]
pub struct PlaceArgs {
    #[command(flatten)]
    pub stay: StayArgs,

    #[command(flatten)]
    pub pricing: PricingArgs,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    /// bank_transfer, qris, e_wallet or cash
    #[arg(long, default_value = "bank_transfer")]
    pub payment: PaymentMethod,

    /// Account id of the renter, when signed in
    #[arg(long)]
    pub renter: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_number: String,
    pub total_payment_text: String,
    pub room_id: Option<String>,
    #[serde(flatten)]
    pub confirmation: Confirmation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrderResponse {
    Placed(Box<PlacedOrder>),
    Order(Order),
}

pub async fn run(ctx: &Context, command: OrderCommand) -> CliResult<OrderResponse> {
    match command {
        OrderCommand::Place(args) => Ok(OrderResponse::Placed(Box::new(place(ctx, args).await?))),
        OrderCommand::Pay { order_number } => {
            ctx.db.orders().mark_paid(&order_number).await?;
            info!(order_number = %order_number, "Order marked paid");
            Ok(OrderResponse::Order(fetch(ctx, &order_number).await?))
        }
        OrderCommand::Cancel { order_number } => {
            let released = ctx.db.orders().cancel(&order_number).await?;
            info!(order_number = %order_number, released, "Order cancelled");
            Ok(OrderResponse::Order(fetch(ctx, &order_number).await?))
        }
        OrderCommand::Show { order_number } => Ok(OrderResponse::Order(fetch(ctx, &order_number).await?)),
    }
}

async fn place(ctx: &Context, args: PlaceArgs) -> CliResult<PlacedOrder> {
    debug!(category = %args.stay.category, "order place command");

    let request = OrderRequest {
        category_id: args.stay.category.clone(),
        check_in: args.stay.check_in,
        check_out: args.stay.check_out,
        strategy: args.pricing.strategy(),
        contact: ContactDetails {
            name: args.name,
            email: args.email,
            phone: args.phone,
            payment_method: args.payment,
        },
        renter_id: args.renter,
    };

    let confirmation = ctx.service.confirm_order(&request).await?;

    Ok(PlacedOrder {
        order_number: confirmation.order.order_number.clone(),
        total_payment_text: ctx.config.format_currency(confirmation.order.total_payment),
        room_id: confirmation.reservation.as_ref().map(|r| r.room_id.clone()),
        confirmation,
    })
}

async fn fetch(ctx: &Context, order_number: &str) -> CliResult<Order> {
    ctx.db
        .orders()
        .get_by_number(order_number)
        .await?
        .ok_or_else(|| CliError::not_found("Order", order_number))
}
