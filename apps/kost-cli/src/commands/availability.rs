//! # Check Command
//!
//! Reports whether a category has a free room for a stay. Storage
//! failures do not fail the command; the answer comes back marked
//! `degraded` instead.

use tracing::{debug, warn};

use super::{Context, StayArgs};
use crate::error::CliResult;
use kost_core::AvailabilityResult;

pub async fn run(ctx: &Context, args: StayArgs) -> CliResult<AvailabilityResult> {
    debug!(category = %args.category, "check command");

    let range = args.range()?;
    let result = ctx.service.check(args.category.trim(), &range).await;

    if let Some(reason) = &result.degraded {
        warn!(reason = %reason, "Availability could not be verified");
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, date, stay};

    #[tokio::test]
    async fn test_check_reports_free_rooms() {
        let ctx = context(2).await;

        let result = run(&ctx, stay(date(2024, 1, 1), date(2024, 2, 1))).await.unwrap();

        assert!(result.available);
        assert_eq!(result.free_count, 2);
        assert!(result.degraded.is_none());
    }

    #[tokio::test]
    async fn test_check_empty_category() {
        let ctx = context(0).await;

        let result = run(&ctx, stay(date(2024, 1, 1), date(2024, 2, 1))).await.unwrap();

        assert!(!result.available);
        assert_eq!(result.free_count, 0);
    }

    #[tokio::test]
    async fn test_check_closed_database_is_degraded() {
        let ctx = context(1).await;
        ctx.db.close().await;

        let result = run(&ctx, stay(date(2024, 1, 1), date(2024, 2, 1))).await.unwrap();

        assert!(result.available);
        assert!(result.degraded.is_some());
    }
}
