use std::collections::BTreeMap;

use crate::entities::{Booking, Train};

/// In-memory set of trains keyed by train id.
#[derive(Clone, Debug, Default)]
pub struct TrainInventory {
    trains: BTreeMap<String, Train>,
}

impl TrainInventory {
    pub fn new(trains: impl IntoIterator<Item = Train>) -> Self {
        Self {
            trains: trains
                .into_iter()
                .map(|t| (t.train_id.clone(), t))
                .collect(),
        }
    }

    pub fn find_train(&self, train_id: &str) -> Option<&Train> {
        if train_id.is_empty() {
            return None;
        }
        self.trains.get(train_id)
    }

    pub fn find_train_mut(&mut self, train_id: &str) -> Option<&mut Train> {
        if train_id.is_empty() {
            return None;
        }
        self.trains.get_mut(train_id)
    }

    /// Removes a train from service. Bookings that reference it keep their seats
    /// on record but can no longer release them.
    pub fn withdraw(&mut self, train_id: &str) -> Option<Train> {
        self.trains.remove(train_id)
    }

    pub fn trains(&self) -> impl Iterator<Item = &Train> {
        self.trains.values()
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// Trains that serve `from` before `to`, in train id order.
    pub fn trains_for_leg<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> impl Iterator<Item = &'a Train> + 'a {
        self.trains.values().filter(move |t| t.is_reachable(from, to))
    }

    /// Re-marks the seats held by already persisted bookings.
    ///
    /// The seed data always starts with empty grids, so this has to run once at
    /// startup before any allocation. Returns the number of seats marked.
    pub fn restore_occupancy<'a>(
        &mut self,
        bookings: impl IntoIterator<Item = &'a Booking>,
    ) -> usize {
        let mut restored = 0;
        for booking in bookings {
            match self.trains.get_mut(&booking.train_id) {
                Some(train) => restored += train.seats.occupy(&booking.seats).len(),
                None => tracing::warn!(
                    booking_id = %booking.booking_id,
                    train_id = %booking.train_id,
                    "Booking references an unknown train, seats not restored"
                ),
            }
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{SeatGrid, SeatLabel};
    use chrono::Utc;
    use uuid::Uuid;

    fn train(id: &str, stations: &[&str]) -> Train {
        Train {
            train_id: id.to_string(),
            train_no: "100".to_string(),
            stations: stations.iter().map(|s| s.to_string()).collect(),
            station_times: Default::default(),
            seats: SeatGrid::new(2, 2),
        }
    }

    #[test]
    fn test_find_train() {
        let inventory = TrainInventory::new([train("rats", &["a", "b"])]);
        assert!(inventory.find_train("rats").is_some());
        assert!(inventory.find_train("nope").is_none());
        assert!(inventory.find_train("").is_none());
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_trains_for_leg() {
        let inventory = TrainInventory::new([
            train("b", &["x", "y", "z"]),
            train("a", &["z", "y", "x"]),
            train("c", &["x", "z"]),
        ]);

        let ids: Vec<&str> = inventory
            .trains_for_leg("x", "z")
            .map(|t| t.train_id.as_str())
            .collect();
        assert_eq!(ids, ["b", "c"]);
        assert_eq!(inventory.trains_for_leg("y", "y").count(), 0);
    }

    #[test]
    fn test_restore_occupancy() {
        let mut inventory = TrainInventory::new([train("rats", &["a", "b"])]);
        let booking = Booking {
            booking_id: Uuid::new_v4(),
            train_id: "rats".to_string(),
            train_no: "100".to_string(),
            from: "a".to_string(),
            to: "b".to_string(),
            seats: vec![SeatLabel { row: 2, col: 1 }],
            num_seats: 1,
            booking_date: Utc::now(),
        };
        let orphan = Booking {
            train_id: "gone".to_string(),
            ..booking.clone()
        };

        assert_eq!(inventory.restore_occupancy([&booking, &orphan]), 1);
        let t = inventory.find_train("rats").unwrap();
        assert!(!t.seats.is_free(1, 0));
        assert_eq!(t.count_available(), 3);
    }
}
