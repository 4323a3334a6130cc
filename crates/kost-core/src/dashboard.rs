//! # Owner Summary
//!
//! Headline counts for a kost owner: properties, rooms, rooms listed as
//! available, active bookings and pending orders, plus the most recent
//! orders and bookings. Data only; rendering belongs to the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::types::{Order, Property, Reservation, Room};

/// Dashboard data for one owner.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub total_properties: usize,
    pub total_rooms: usize,
    pub available_rooms: usize,
    pub active_bookings: i64,
    pub pending_orders: i64,
    pub recent_orders: Vec<Order>,
    pub recent_bookings: Vec<Reservation>,
}

impl OwnerSummary {
    /// Builds the summary from the owner's properties and a room listing.
    ///
    /// Rooms that belong to other owners' properties are ignored. The
    /// recent lists are truncated to `recent_limit` in the order given.
    pub fn from_records(
        properties: &[Property],
        rooms: &[Room],
        active_bookings: i64,
        pending_orders: i64,
        mut recent_orders: Vec<Order>,
        mut recent_bookings: Vec<Reservation>,
        recent_limit: usize,
    ) -> Self {
        let owned: HashSet<&str> = properties.iter().map(|p| p.id.as_str()).collect();
        let own_rooms: Vec<&Room> = rooms
            .iter()
            .filter(|r| owned.contains(r.property_id.as_str()))
            .collect();

        recent_orders.truncate(recent_limit);
        recent_bookings.truncate(recent_limit);

        OwnerSummary {
            total_properties: properties.len(),
            total_rooms: own_rooms.len(),
            available_rooms: own_rooms.iter().filter(|r| r.is_available).count(),
            active_bookings,
            pending_orders,
            recent_orders,
            recent_bookings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn property(id: &str) -> Property {
        Property {
            id: id.to_string(),
            owner_id: "owner-1".to_string(),
            name: "Kost Melati".to_string(),
            address: "Jl. Kenanga 5".to_string(),
            city: "Bandung".to_string(),
            description: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn room(property_id: &str, is_available: bool) -> Room {
        Room {
            id: uuid::Uuid::new_v4().to_string(),
            property_id: property_id.to_string(),
            room_number: "101".to_string(),
            category_id: "Type 1".to_string(),
            monthly_price: 800_000,
            facilities: None,
            is_available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_counts_only_owned_rooms() {
        let properties = vec![property("p1"), property("p2")];
        let rooms = vec![
            room("p1", true),
            room("p1", false),
            room("p2", true),
            room("other", true),
        ];

        let summary = OwnerSummary::from_records(&properties, &rooms, 3, 1, vec![], vec![], 10);

        assert_eq!(summary.total_properties, 2);
        assert_eq!(summary.total_rooms, 3);
        assert_eq!(summary.available_rooms, 2);
        assert_eq!(summary.active_bookings, 3);
        assert_eq!(summary.pending_orders, 1);
    }

    #[test]
    fn test_no_properties_means_no_rooms() {
        let summary = OwnerSummary::from_records(&[], &[room("p1", true)], 0, 0, vec![], vec![], 10);
        assert_eq!(summary.total_rooms, 0);
        assert_eq!(summary.available_rooms, 0);
    }
}
