//! # Summary Command
//!
//! Dashboard figures for one owner.

use clap::Args;
use tracing::debug;

use super::Context;
use crate::error::CliResult;
use kost_core::dashboard::OwnerSummary;

#[derive(Debug, Clone, Args)]
pub struct SummaryArgs {
    #[arg(long)]
    pub owner: String,

    /// Rows in the recent lists; defaults to `recent_limit` from config
    #[arg(long)]
    pub limit: Option<usize>,
}

pub async fn run(ctx: &Context, args: SummaryArgs) -> CliResult<OwnerSummary> {
    let limit = args.limit.unwrap_or(ctx.config.recent_limit);
    debug!(owner = %args.owner, limit, "summary command");

    Ok(ctx.db.owner_summary(&args.owner, limit).await?)
}
