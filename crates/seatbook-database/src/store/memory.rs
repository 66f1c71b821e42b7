//! In-memory seat store for single-node deployments and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::{SeatId, TripId};
use seatbook_entity::seat::{NewSeat, Seat, SeatCommand};
use seatbook_entity::trip::{NewTrip, Trip};

use super::{CasOutcome, SeatFilter, SeatStore, TripCatalog};

/// Process-local seat store.
///
/// Each seat lives in its own `DashMap` entry; a compare-and-set holds the
/// entry's write lock while it checks the guard and writes, so two writers
/// on the same seat are serialized and writers on different seats never
/// block each other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    seats: Arc<DashMap<SeatId, Seat>>,
    codes: Arc<DashMap<(TripId, String), SeatId>>,
    trips: Arc<DashMap<TripId, Trip>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of seats stored.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether the store holds no seats.
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

#[async_trait]
impl SeatStore for MemoryStore {
    async fn get(&self, seat_id: SeatId) -> AppResult<Option<Seat>> {
        Ok(self.seats.get(&seat_id).map(|entry| entry.value().clone()))
    }

    async fn compare_and_set(
        &self,
        seat_id: SeatId,
        command: &SeatCommand,
    ) -> AppResult<CasOutcome> {
        let mut entry = self
            .seats
            .get_mut(&seat_id)
            .ok_or_else(|| AppError::not_found(format!("Seat {seat_id} not found")))?;

        match command.apply(entry.value()) {
            Ok(next) => {
                *entry.value_mut() = next.clone();
                Ok(CasOutcome::Applied(next))
            }
            Err(violation) => {
                debug!(seat_id = %seat_id, %violation, "Compare-and-set rejected");
                Ok(CasOutcome::Rejected {
                    current: entry.value().clone(),
                    violation,
                })
            }
        }
    }

    async fn scan(&self, filter: &SeatFilter) -> AppResult<Vec<Seat>> {
        let mut seats: Vec<Seat> = self
            .seats
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        seats.sort_by(|a, b| (a.trip_id, &a.code).cmp(&(b.trip_id, &b.code)));
        if let Some(limit) = filter.limit {
            seats.truncate(limit);
        }
        Ok(seats)
    }

    async fn insert_seats(&self, seats: &[NewSeat]) -> AppResult<u64> {
        let now = Utc::now();
        let mut created = 0;

        for new_seat in seats {
            let key = (new_seat.trip_id, new_seat.code.clone());
            if let Entry::Vacant(slot) = self.codes.entry(key) {
                let seat = Seat::available(new_seat.trip_id, new_seat.code.clone(), now);
                slot.insert(seat.id);
                self.seats.insert(seat.id, seat);
                created += 1;
            }
        }

        Ok(created)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl TripCatalog for MemoryStore {
    async fn get_trip(&self, trip_id: TripId) -> AppResult<Option<Trip>> {
        Ok(self.trips.get(&trip_id).map(|entry| entry.value().clone()))
    }

    async fn list_trips(&self) -> AppResult<Vec<Trip>> {
        let mut trips: Vec<Trip> = self.trips.iter().map(|e| e.value().clone()).collect();
        trips.sort_by_key(|t| t.departs_at);
        Ok(trips)
    }

    async fn create_trip(&self, trip: NewTrip) -> AppResult<Trip> {
        let trip = Trip {
            id: TripId::new(),
            title: trip.title,
            origin: trip.origin,
            destination: trip.destination,
            departs_at: trip.departs_at,
            bus_type: trip.bus_type,
            price: trip.price,
            capacity_total: 0,
            admin_contact: trip.admin_contact,
            is_active: true,
            created_at: Utc::now(),
        };
        self.trips.insert(trip.id, trip.clone());
        Ok(trip)
    }

    async fn set_capacity(&self, trip_id: TripId, capacity: i32) -> AppResult<Trip> {
        let mut entry = self
            .trips
            .get_mut(&trip_id)
            .ok_or_else(|| AppError::not_found(format!("Trip {trip_id} not found")))?;
        entry.capacity_total = capacity;
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use seatbook_core::error::ErrorKind;
    use seatbook_entity::seat::{ClaimCode, GuardViolation, HoldLock, HoldToken, SeatStatus};

    async fn store_with_seat() -> (MemoryStore, SeatId) {
        let store = MemoryStore::new();
        let trip = TripId::new();
        store
            .insert_seats(&[NewSeat {
                trip_id: trip,
                code: "A1".to_string(),
            }])
            .await
            .expect("insert");
        let seat = store.scan(&SeatFilter::new()).await.expect("scan")[0].id;
        (store, seat)
    }

    fn hold_command(token: &str) -> SeatCommand {
        let now = Utc::now();
        SeatCommand::hold(
            HoldLock {
                hold_token: HoldToken::new(token),
                claim_code: ClaimCode::parse("AAAA-BBBB").expect("valid"),
                expires_at: now + Duration::minutes(10),
                contact: None,
            },
            now,
        )
    }

    #[tokio::test]
    async fn test_insert_skips_existing_codes() {
        let store = MemoryStore::new();
        let trip = TripId::new();
        let seats: Vec<NewSeat> = ["A1", "A2", "A1"]
            .iter()
            .map(|c| NewSeat {
                trip_id: trip,
                code: c.to_string(),
            })
            .collect();
        assert_eq!(store.insert_seats(&seats).await.expect("insert"), 2);
        assert_eq!(store.insert_seats(&seats).await.expect("insert"), 0);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_cas_applies_then_rejects() {
        let (store, seat_id) = store_with_seat().await;

        let first = store
            .compare_and_set(seat_id, &hold_command("one"))
            .await
            .expect("cas");
        assert!(first.is_applied());

        let second = store
            .compare_and_set(seat_id, &hold_command("two"))
            .await
            .expect("cas");
        match second {
            CasOutcome::Rejected { current, violation } => {
                assert_eq!(current.status(), SeatStatus::Hold);
                assert!(matches!(violation, GuardViolation::StatusMismatch { .. }));
            }
            CasOutcome::Applied(_) => panic!("second hold must not apply"),
        }
    }

    #[tokio::test]
    async fn test_cas_unknown_seat_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .compare_and_set(SeatId::new(), &hold_command("t"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_holds_have_one_winner() {
        let (store, seat_id) = store_with_seat().await;

        let attempts = (0..32).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .compare_and_set(seat_id, &hold_command(&format!("token-{i}")))
                    .await
                    .expect("cas")
            })
        });
        let outcomes = futures::future::join_all(attempts).await;

        let winners = outcomes
            .into_iter()
            .map(|r| r.expect("task"))
            .filter(CasOutcome::is_applied)
            .count();
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_trip_catalog() {
        let store = MemoryStore::new();
        let trip = store
            .create_trip(NewTrip {
                title: "Jakarta - Bandung".to_string(),
                origin: "Jakarta".to_string(),
                destination: "Bandung".to_string(),
                departs_at: Utc::now() + Duration::days(1),
                bus_type: "EXEC".to_string(),
                price: 150_000,
                admin_contact: Some("+6281200000000".to_string()),
            })
            .await
            .expect("create");
        assert_eq!(trip.capacity_total, 0);
        let found = store.get_trip(trip.id).await.expect("get");
        assert_eq!(found, Some(trip.clone()));
        assert_eq!(store.list_trips().await.expect("list").len(), 1);

        let updated = store.set_capacity(trip.id, 40).await.expect("capacity");
        assert_eq!(updated.capacity_total, 40);
        assert_eq!(updated.price, 150_000);

        let err = store.set_capacity(TripId::new(), 1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
