//! # kost-db: Storage Layer for the Kost Booking Site
//!
//! SQLite storage for properties, rooms, bookings, orders and reviews,
//! plus the order confirmation flow that ties them together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kost Booking Data Flow                           │
//! │                                                                         │
//! │  kost-cli (order / check / summary)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kost-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ BookingService│    │    Stores     │    │  Migrations  │  │   │
//! │  │   │ (service.rs)  │───►│ RoomStore     │    │  (embedded)  │  │   │
//! │  │   │               │    │ BookingStore  │    │              │  │   │
//! │  │   │ Availability  │    │ OrderStore    │    │ 001_init.sql │  │   │
//! │  │   │ Checker<Db>   │    │ ReviewStore   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (kost.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the database, pool size and timeouts
//! - [`migrations`] - Embedded schema migrations and their status
//! - [`error`] - Database and service error types
//! - [`repository`] - Stores for each table
//! - [`availability`] - `RoomRepository` implementation for [`Database`]
//! - [`service`] - Quote, check and order confirmation
//! - [`summary`] - Owner dashboard figures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kost_db::{BookingService, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kost.db")).await?;
//! let service = BookingService::new(db.clone());
//!
//! let answer = service.check("Type 1", &range).await;
//! let confirmation = service.confirm_order(&request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;
pub mod summary;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use migrations::SchemaStatus;
pub use pool::{Database, DbConfig};
pub use service::{BookingService, Confirmation, OrderRequest};

// Store re-exports for convenience
pub use repository::booking::BookingStore;
pub use repository::order::OrderStore;
pub use repository::property::PropertyStore;
pub use repository::review::ReviewStore;
pub use repository::room::{NewRoom, RoomStore};
