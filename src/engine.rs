use chrono::Utc;
use uuid::Uuid;

use crate::entities::{Booking, SeatLabel, User};
use crate::inventory::TrainInventory;

pub const DEFAULT_MAX_SEATS_PER_BOOKING: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Train {train_id} does not run from {from} to {to}")]
    Route {
        train_id: String,
        from: String,
        to: String,
    },
    #[error("Not enough seats available: requested {requested}, available {available}")]
    Capacity { requested: usize, available: usize },
    #[error("Booking {0} not found")]
    NotFound(Uuid),
    #[error("Train {0} not found")]
    TrainNotFound(String),
    #[error("Seat count must be between 1 and {max}, got {requested}")]
    InvalidSeatCount { requested: usize, max: usize },
}

#[derive(Clone, Debug)]
pub struct BookingRequest {
    pub train_id: String,
    pub from: String,
    pub to: String,
    pub seats: usize,
}

/// Result of a cancellation, kept so the caller can undo it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cancellation {
    pub booking: Booking,
    /// Position the booking held in the user's collection.
    pub position: usize,
    pub released: Vec<SeatLabel>,
}

impl Cancellation {
    /// Seats that stayed marked occupied because the train was gone or the
    /// label fell outside the grid.
    pub fn leaked(&self) -> Vec<SeatLabel> {
        self.booking
            .seats
            .iter()
            .filter(|s| !self.released.contains(s))
            .copied()
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BookingEngine {
    max_seats_per_booking: usize,
}

impl Default for BookingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEATS_PER_BOOKING)
    }
}

impl BookingEngine {
    pub fn new(max_seats_per_booking: usize) -> Self {
        Self {
            max_seats_per_booking,
        }
    }

    pub fn max_seats_per_booking(&self) -> usize {
        self.max_seats_per_booking
    }

    /// Allocates seats first-fit and appends the booking to `user`.
    ///
    /// Either every requested seat is taken or nothing changes.
    pub fn allocate(
        &self,
        inventory: &mut TrainInventory,
        user: &mut User,
        request: &BookingRequest,
    ) -> Result<Booking, BookingError> {
        let route_error = || BookingError::Route {
            train_id: request.train_id.clone(),
            from: request.from.clone(),
            to: request.to.clone(),
        };

        if request.from == request.to {
            return Err(route_error());
        }

        if request.seats == 0 || request.seats > self.max_seats_per_booking {
            return Err(BookingError::InvalidSeatCount {
                requested: request.seats,
                max: self.max_seats_per_booking,
            });
        }

        let train = inventory
            .find_train_mut(&request.train_id)
            .ok_or_else(|| BookingError::TrainNotFound(request.train_id.clone()))?;

        if !train.is_reachable(&request.from, &request.to) {
            return Err(route_error());
        }

        let available = train.count_available();
        let seats = train
            .seats
            .occupy_first_free(request.seats)
            .ok_or(BookingError::Capacity {
                requested: request.seats,
                available,
            })?;

        let booking = Booking {
            booking_id: Uuid::new_v4(),
            train_id: train.train_id.clone(),
            train_no: train.train_no.clone(),
            from: request.from.clone(),
            to: request.to.clone(),
            num_seats: seats.len(),
            seats,
            booking_date: Utc::now(),
        };

        tracing::info!(
            booking_id = %booking.booking_id,
            user_id = %user.user_id,
            train_id = %booking.train_id,
            seats = ?booking.seats,
            "Seats allocated"
        );

        user.tickets_booked.push(booking.clone());
        Ok(booking)
    }

    /// Releases the booking's seats and removes it from `user`.
    ///
    /// When the train is no longer in the inventory the booking is still
    /// removed and its seats are reported in [`Cancellation::leaked`].
    pub fn cancel(
        &self,
        inventory: &mut TrainInventory,
        user: &mut User,
        booking_id: Uuid,
    ) -> Result<Cancellation, BookingError> {
        let position = user
            .tickets_booked
            .iter()
            .position(|b| b.booking_id == booking_id)
            .ok_or(BookingError::NotFound(booking_id))?;

        let booking = user.tickets_booked.remove(position);
        let released = match inventory.find_train_mut(&booking.train_id) {
            Some(train) => train.seats.release(&booking.seats),
            None => Vec::new(),
        };

        let cancellation = Cancellation {
            booking,
            position,
            released,
        };

        let leaked = cancellation.leaked();
        if leaked.is_empty() {
            tracing::info!(
                booking_id = %booking_id,
                user_id = %user.user_id,
                "Booking cancelled"
            );
        } else {
            tracing::warn!(
                booking_id = %booking_id,
                user_id = %user.user_id,
                train_id = %cancellation.booking.train_id,
                leaked = ?leaked,
                "Booking cancelled but seats could not be released"
            );
        }

        Ok(cancellation)
    }

    /// Undoes a successful [`allocate`](Self::allocate).
    pub fn revert_allocation(
        &self,
        inventory: &mut TrainInventory,
        user: &mut User,
        booking: &Booking,
    ) {
        if let Some(position) = user
            .tickets_booked
            .iter()
            .rposition(|b| b.booking_id == booking.booking_id)
        {
            user.tickets_booked.remove(position);
        }
        if let Some(train) = inventory.find_train_mut(&booking.train_id) {
            train.seats.release(&booking.seats);
        }
    }

    /// Undoes a successful [`cancel`](Self::cancel).
    pub fn revert_cancellation(
        &self,
        inventory: &mut TrainInventory,
        user: &mut User,
        cancellation: Cancellation,
    ) {
        if let Some(train) = inventory.find_train_mut(&cancellation.booking.train_id) {
            train.seats.occupy(&cancellation.released);
        }
        let position = cancellation.position.min(user.tickets_booked.len());
        user.tickets_booked.insert(position, cancellation.booking);
    }
}
