//! # Property Commands

use clap::Subcommand;
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::error::CliResult;
use kost_core::Property;

#[derive(Debug, Clone, Subcommand)]
pub enum PropertyCommand {
    /// Register a kost building
    Add {
        #[arg(long)]
        owner: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// List an owner's buildings
    List {
        #[arg(long)]
        owner: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PropertyResponse {
    Added(Property),
    List(Vec<Property>),
}

pub async fn run(ctx: &Context, command: PropertyCommand) -> CliResult<PropertyResponse> {
    match command {
        PropertyCommand::Add {
            owner,
            name,
            address,
            city,
            description,
        } => {
            let property = ctx
                .db
                .properties()
                .create(&owner, &name, &address, &city, description.as_deref())
                .await?;
            info!(id = %property.id, "Property registered");
            Ok(PropertyResponse::Added(property))
        }
        PropertyCommand::List { owner } => {
            Ok(PropertyResponse::List(ctx.db.properties().list_by_owner(&owner).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;

    #[tokio::test]
    async fn test_add_then_list() {
        let ctx = context(0).await;
        run(
            &ctx,
            PropertyCommand::Add {
                owner: "owner-1".to_string(),
                name: "Kost Mawar".to_string(),
                address: "Jl. Dahlia 9".to_string(),
                city: "Depok".to_string(),
                description: Some("Dekat stasiun".to_string()),
            },
        )
        .await
        .unwrap();

        let listed = run(
            &ctx,
            PropertyCommand::List {
                owner: "owner-1".to_string(),
            },
        )
        .await
        .unwrap();

        // one from the test context, one added here
        match listed {
            PropertyResponse::List(properties) => assert_eq!(properties.len(), 2),
            PropertyResponse::Added(_) => panic!("expected a list"),
        }
    }
}
