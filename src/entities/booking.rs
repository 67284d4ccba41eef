use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::train::SeatLabel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: Uuid,
    pub train_id: String,
    pub train_no: String,
    pub from: String,
    pub to: String,
    pub seats: Vec<SeatLabel>,
    pub num_seats: usize,
    pub booking_date: DateTime<Utc>,
}
