//! # Quote Command
//!
//! Prices a stay. The rate comes from the category's first listed room,
//! or from `--price` when the caller already has the displayed price text.

use clap::Args;
use serde::Serialize;
use tracing::debug;

use super::{Context, PricingArgs, StayArgs};
use crate::error::CliResult;
use kost_core::calculator::parse_price_text;
use kost_core::{CheckoutSummary, RoomRate};

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub stay: StayArgs,

    #[command(flatten)]
    pub pricing: PricingArgs,

    /// Monthly price as displayed, e.g. "Rp 800.000"; skips the rate lookup
    #[arg(long)]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub summary: CheckoutSummary,
    pub monthly_price_text: String,
    pub total_price_text: String,
}

pub async fn run(ctx: &Context, args: QuoteArgs) -> CliResult<QuoteResponse> {
    debug!(category = %args.stay.category, "quote command");

    let range = args.stay.range()?;
    let strategy = args.pricing.strategy();

    let summary = match &args.price {
        Some(text) => {
            let rate = RoomRate::new(args.stay.category.trim(), parse_price_text(text)?);
            CheckoutSummary::from_quote(&rate, &range, strategy)?
        }
        None => ctx.service.quote(args.stay.category.trim(), &range, strategy).await?,
    };

    Ok(QuoteResponse {
        monthly_price_text: ctx.config.format_currency(summary.monthly_price.rupiah()),
        total_price_text: ctx.config.format_currency(summary.total_price.rupiah()),
        summary,
    })
}
