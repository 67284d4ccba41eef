use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::BookingRequest;
use crate::entities::{Booking, SeatLabel, User};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub train_id: String,
    pub from: String,
    pub to: String,
    pub seats: usize,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub train_id: String,
    pub train_no: String,
    pub from: String,
    pub to: String,
    pub seats: Vec<SeatLabel>,
    pub num_seats: usize,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.booking_id,
            train_id: b.train_id,
            train_no: b.train_no,
            from: b.from,
            to: b.to,
            seats: b.seats,
            num_seats: b.num_seats,
            created_at: b.booking_date,
        }
    }
}

async fn current_user(state: &AppState, claims: &Claims) -> AppResult<User> {
    state
        .store
        .load_user(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
}

/// Book seats on a train
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    // Held until the user record is saved so allocations never interleave
    let mut inventory = state.inventory.lock().await;
    let mut user = current_user(&state, &claims).await?;

    let request = BookingRequest {
        train_id: payload.train_id,
        from: payload.from,
        to: payload.to,
        seats: payload.seats,
    };
    let booking = state.engine.allocate(&mut inventory, &mut user, &request)?;

    if let Err(e) = state.store.save_user(&user).await {
        state
            .engine
            .revert_allocation(&mut inventory, &mut user, &booking);
        return Err(e);
    }

    Ok(Json(booking.into()))
}

/// List the caller's bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let user = current_user(&state, &claims).await?;

    Ok(Json(
        user.tickets_booked
            .into_iter()
            .map(BookingResponse::from)
            .collect(),
    ))
}

/// Cancel a booking and free its seats
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let mut inventory = state.inventory.lock().await;
    let mut user = current_user(&state, &claims).await?;

    let cancellation = state.engine.cancel(&mut inventory, &mut user, booking_id)?;

    if let Err(e) = state.store.save_user(&user).await {
        state
            .engine
            .revert_cancellation(&mut inventory, &mut user, cancellation);
        return Err(e);
    }

    Ok(Json(serde_json::json!({
        "message": "Booking cancelled",
        "released_seats": cancellation.released,
        "leaked_seats": cancellation.leaked(),
    })))
}
