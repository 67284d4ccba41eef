pub mod config;
pub mod db;
pub mod engine;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod inventory;
pub mod middleware;
pub mod routes;
pub mod utils;

use std::sync::Arc;

use tokio::sync::Mutex;

use db::UserStore;
use engine::BookingEngine;
use inventory::TrainInventory;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
    /// Every allocation and cancellation runs under this lock.
    pub inventory: Arc<Mutex<TrainInventory>>,
    pub engine: BookingEngine,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn UserStore>, inventory: TrainInventory) -> Self {
        let engine = BookingEngine::new(config.max_seats_per_booking);
        Self {
            config,
            store,
            inventory: Arc::new(Mutex::new(inventory)),
            engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MEMORY_STORE;
    use crate::db::MemoryStore;

    #[test]
    fn test_state_uses_configured_seat_limit() {
        let config = Config {
            jwt_secret: "secret".to_string(),
            jwt_expiration_hours: 1,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            users_path: MEMORY_STORE.to_string(),
            trains_path: None,
            max_seats_per_booking: 6,
        };

        let state = AppState::new(
            config,
            Arc::new(MemoryStore::default()),
            TrainInventory::default(),
        );
        assert_eq!(state.engine.max_seats_per_booking(), 6);
    }
}
