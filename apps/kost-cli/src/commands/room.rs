//! # Room Commands
//!
//! Owners register rooms with the price text they advertise
//! ("Rp 800.000"); the first listed room of a category sets the rate
//! that category is quoted at.

use clap::{ArgAction, Subcommand};
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::error::{CliError, CliResult};
use kost_core::calculator::parse_price_text;
use kost_core::validation::validate_uuid;
use kost_core::Room;
use kost_db::NewRoom;

#[derive(Debug, Clone, Subcommand)]
pub enum RoomCommand {
    /// Register a room in a property
    Add {
        #[arg(long)]
        property: String,

        /// Door number, e.g. "101"
        #[arg(long)]
        number: String,

        #[arg(long)]
        category: String,

        /// Monthly price, e.g. "Rp 800.000" or 800000
        #[arg(long)]
        price: String,

        /// Facility list, e.g. "Kasur, Lemari, AC"
        #[arg(long)]
        facilities: Option<String>,
    },

    /// List the rooms of a property, or the listed rooms of a category
    List {
        #[arg(long, conflicts_with = "category")]
        property: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Turn a room's listing on or off
    SetAvailability {
        id: String,

        #[arg(action = ArgAction::Set)]
        available: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RoomResponse {
    Room(Room),
    List(Vec<Room>),
}

pub async fn run(ctx: &Context, command: RoomCommand) -> CliResult<RoomResponse> {
    match command {
        RoomCommand::Add {
            property,
            number,
            category,
            price,
            facilities,
        } => {
            validate_uuid("property", &property)?;
            let new_room = NewRoom {
                property_id: property,
                room_number: number,
                category_id: category,
                monthly_price: parse_price_text(&price)?,
                facilities,
            };
            let room = ctx.db.rooms().create(&new_room).await?;
            info!(id = %room.id, category = %room.category_id, "Room registered");
            Ok(RoomResponse::Room(room))
        }
        RoomCommand::List { property, category } => {
            let rooms = match (property, category) {
                (Some(property), _) => {
                    validate_uuid("property", &property)?;
                    ctx.db.rooms().list_by_property(&property).await?
                }
                (None, Some(category)) => ctx.db.rooms().list_available(category.trim()).await?,
                (None, None) => {
                    return Err(CliError::validation("Pass --property or --category"));
                }
            };
            Ok(RoomResponse::List(rooms))
        }
        RoomCommand::SetAvailability { id, available } => {
            validate_uuid("room", &id)?;
            ctx.db.rooms().set_availability(&id, available).await?;
            let room = ctx
                .db
                .rooms()
                .get_by_id(&id)
                .await?
                .ok_or_else(|| CliError::not_found("Room", &id))?;
            Ok(RoomResponse::Room(room))
        }
    }
}
