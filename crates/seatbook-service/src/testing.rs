//! Fixtures for service tests.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use seatbook_auth::codes::RandomCodeIssuer;
use seatbook_core::traits::ManualClock;
use seatbook_core::types::{SeatId, TripId};
use seatbook_database::store::{MemoryStore, SeatFilter, SeatStore, TripCatalog};
use seatbook_entity::seat::NewSeat;
use seatbook_entity::trip::NewTrip;

use crate::context::ServiceContext;

pub(crate) struct Fixture {
    pub ctx: ServiceContext,
    pub store: MemoryStore,
    pub clock: Arc<ManualClock>,
    pub trip_id: TripId,
    pub seat_ids: Vec<SeatId>,
}

impl Fixture {
    /// A trip with `count` seats coded `A1..A{count}`.
    pub async fn with_seats(count: usize) -> Self {
        let store = MemoryStore::new();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        ));

        let trip = store
            .create_trip(NewTrip {
                title: "Jakarta - Bandung".to_string(),
                origin: "Jakarta".to_string(),
                destination: "Bandung".to_string(),
                departs_at: Utc::now() + Duration::days(2),
                bus_type: "EXEC".to_string(),
                price: 150_000,
                admin_contact: Some("+6281100000000".to_string()),
            })
            .await
            .unwrap();

        let new_seats: Vec<NewSeat> = (1..=count)
            .map(|n| NewSeat {
                trip_id: trip.id,
                code: format!("A{n}"),
            })
            .collect();
        store.insert_seats(&new_seats).await.unwrap();

        let mut seats = store.scan(&SeatFilter::new().trip(trip.id)).await.unwrap();
        seats.sort_by_key(|s| s.code[1..].parse::<u32>().unwrap());
        let seat_ids = seats.iter().map(|s| s.id).collect();

        let ctx = ServiceContext::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            clock.clone(),
            Arc::new(RandomCodeIssuer::new()),
        );

        Self {
            ctx,
            store,
            clock,
            trip_id: trip.id,
            seat_ids,
        }
    }
}
