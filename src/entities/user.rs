use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::booking::Booking;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub password_hash: String,
    #[serde(default)]
    pub tickets_booked: Vec<Booking>,
}

impl User {
    pub fn new(name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name: name.into(),
            password_hash: password_hash.into(),
            tickets_booked: Vec::new(),
        }
    }

    pub fn booking(&self, booking_id: Uuid) -> Option<&Booking> {
        self.tickets_booked
            .iter()
            .find(|b| b.booking_id == booking_id)
    }
}
