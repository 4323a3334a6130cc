//! # Repository Module
//!
//! SQLite repositories for the kost booking site.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  kost-cli / BookingService                                             │
//! │       │                                                                 │
//! │       │  db.rooms().list_available("Type 1")                           │
//! │       ▼                                                                 │
//! │  RoomStore                                                             │
//! │  ├── create(&self, new_room)                                           │
//! │  ├── list_available(&self, category)                                   │
//! │  ├── category_rate(&self, category)                                    │
//! │  └── set_availability(&self, id, flag)                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each store is named `*Store` so it does not collide with the
//! `RoomRepository` trait it helps implement.
//!
//! ## Available Repositories
//!
//! - [`PropertyStore`](property::PropertyStore) - Kost buildings
//! - [`RoomStore`](room::RoomStore) - Rooms, listing flag, category rates
//! - [`BookingStore`](booking::BookingStore) - Reservations and their lifecycle
//! - [`OrderStore`](order::OrderStore) - Payment-page orders
//! - [`ReviewStore`](review::ReviewStore) - Reviews and rating summary

pub mod booking;
pub mod order;
pub mod property;
pub mod review;
pub mod room;
