//! # CLI Commands
//!
//! One module per subcommand group. Each `run` takes the shared
//! [`Context`] and its parsed arguments, and returns a serializable
//! response that `main` prints as JSON.
//!
//! ## Command Categories
//! - [`quote`] - Price a stay
//! - [`availability`] - Check free rooms of a category
//! - [`order`] - Place, pay, cancel and show orders
//! - [`booking`] - Complete or cancel reservations
//! - [`review`] - Add and list reviews
//! - [`property`] - Register and list properties
//! - [`room`] - Register, list and (un)list rooms
//! - [`summary`] - Owner dashboard figures

pub mod availability;
pub mod booking;
pub mod order;
pub mod property;
pub mod quote;
pub mod review;
pub mod room;
pub mod summary;

use chrono::NaiveDate;
use clap::Args;

use crate::config::AppConfig;
use crate::error::CliResult;
use kost_core::{DateRange, PricingStrategy};
use kost_db::{BookingService, Database};

/// Everything a command may need.
pub struct Context {
    pub db: Database,
    pub service: BookingService,
    pub config: AppConfig,
}

impl Context {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Context {
            service: BookingService::new(db.clone()),
            db,
            config,
        }
    }
}

/// Category and dates of a stay.
#[derive(Debug, Clone, Args)]
pub struct StayArgs {
    /// Room category, e.g. "Type 1"
    #[arg(long)]
    pub category: String,

    /// First night, YYYY-MM-DD
    #[arg(long)]
    pub check_in: NaiveDate,

    /// Departure day, YYYY-MM-DD
    #[arg(long)]
    pub check_out: NaiveDate,
}

impl StayArgs {
    pub fn range(&self) -> CliResult<DateRange> {
        Ok(DateRange::new(self.check_in, self.check_out)?)
    }
}

/// How a priced stay is billed. Only commands that price take it.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct PricingArgs {
    /// Price by calendar day (monthly rate / 30) instead of whole months
    #[arg(long)]
    pub daily: bool,
}

impl PricingArgs {
    pub fn strategy(&self) -> PricingStrategy {
        if self.daily {
            PricingStrategy::DailyProrated
        } else {
            PricingStrategy::MonthlyUnits
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use kost_core::Money;
    use kost_db::{DbConfig, NewRoom};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn stay(check_in: NaiveDate, check_out: NaiveDate) -> StayArgs {
        StayArgs {
            category: "Type 1".to_string(),
            check_in,
            check_out,
        }
    }

    /// In-memory context with one owner-1 property and `rooms` Type 1 rooms
    /// at Rp 800.000.
    pub async fn context(rooms: usize) -> Context {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let property = db
            .properties()
            .create("owner-1", "Kost Melati", "Jl. Kenanga 5", "Bandung", None)
            .await
            .unwrap();
        for n in 0..rooms {
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
        Context::new(db, AppConfig::default())
    }
}
