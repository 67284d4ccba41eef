pub mod booking;
pub mod train;
pub mod user;

pub use booking::Booking;
pub use train::{SeatGrid, SeatLabel, Train};
pub use user::User;
