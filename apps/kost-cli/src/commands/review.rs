//! # Review Commands

use clap::Subcommand;
use serde::Serialize;
use tracing::debug;

use super::Context;
use crate::error::CliResult;
use kost_core::review::{NewReview, RatingSummary};
use kost_core::Review;

#[derive(Debug, Clone, Subcommand)]
pub enum ReviewCommand {
    /// Add a review
    Add {
        #[arg(long)]
        user: String,

        /// Display name shown with the review
        #[arg(long)]
        name: String,

        /// Stars, 1 to 5
        #[arg(long)]
        rating: i64,

        #[arg(long)]
        body: String,
    },

    /// List reviews, newest first, with the average rating
    List {
        /// Only this user's reviews
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewList {
    pub summary: RatingSummary,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReviewResponse {
    Added(Review),
    List(ReviewList),
}

pub async fn run(ctx: &Context, command: ReviewCommand) -> CliResult<ReviewResponse> {
    match command {
        ReviewCommand::Add {
            user,
            name,
            rating,
            body,
        } => {
            let review = NewReview::new(user, name, rating, body)?;
            Ok(ReviewResponse::Added(ctx.db.reviews().add(&review).await?))
        }
        ReviewCommand::List { user } => {
            debug!(user = ?user, "review list command");
            let reviews = match user {
                Some(user) => ctx.db.reviews().list_by_user(&user).await?,
                None => ctx.db.reviews().list().await?,
            };
            Ok(ReviewResponse::List(ReviewList {
                summary: RatingSummary::from_reviews(&reviews),
                reviews,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use crate::error::ErrorCode;

    fn add(user: &str, rating: i64) -> ReviewCommand {
        ReviewCommand::Add {
            user: user.to_string(),
            name: "Rina".to_string(),
            rating,
            body: "Bersih dan dekat kampus".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_with_average() {
        let ctx = context(0).await;
        for (user, rating) in [("u1", 5), ("u2", 4), ("u1", 4)] {
            run(&ctx, add(user, rating)).await.unwrap();
        }

        let all = match run(&ctx, ReviewCommand::List { user: None }).await.unwrap() {
            ReviewResponse::List(list) => list,
            ReviewResponse::Added(_) => panic!("expected a list"),
        };
        assert_eq!(all.summary.count, 3);
        assert_eq!(all.summary.average, 4.3);

        let mine = match run(&ctx, ReviewCommand::List { user: Some("u1".to_string()) })
            .await
            .unwrap()
        {
            ReviewResponse::List(list) => list,
            ReviewResponse::Added(_) => panic!("expected a list"),
        };
        assert_eq!(mine.reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_rating_out_of_range() {
        let ctx = context(0).await;
        let err = run(&ctx, add("u1", 6)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
