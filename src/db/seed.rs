use std::path::Path;

use tokio::fs;

use super::UserStore;
use crate::entities::Train;
use crate::error::AppResult;
use crate::inventory::TrainInventory;

const DEFAULT_TRAINS: &str = r#"[
    {
        "trainId": "bacs",
        "trainNo": "12345",
        "seats": [
            [0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0]
        ],
        "stationTimes": {
            "bangalore": "13:50:00",
            "jaipur": "13:50:00",
            "delhi": "13:50:00"
        },
        "stations": ["bangalore", "jaipur", "delhi"]
    },
    {
        "trainId": "rats",
        "trainNo": "34522",
        "seats": [
            [0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0]
        ],
        "stationTimes": {
            "bangalore": "21:50:00",
            "jaipur": "22:50:00",
            "delhi": "24:35:00"
        },
        "stations": ["bangalore", "jaipur", "delhi"]
    }
]"#;

/// Loads train records from `path`, or the built-in set when no path is given.
pub async fn load_trains(path: Option<&Path>) -> AppResult<Vec<Train>> {
    let trains: Vec<Train> = match path {
        Some(path) => {
            let bytes = fs::read(path).await?;
            serde_json::from_slice(&bytes)?
        }
        None => serde_json::from_str(DEFAULT_TRAINS)?,
    };
    Ok(trains)
}

/// Builds the inventory and re-marks seats held by stored bookings.
pub async fn build_inventory(
    path: Option<&Path>,
    store: &dyn UserStore,
) -> AppResult<TrainInventory> {
    let mut inventory = TrainInventory::new(load_trains(path).await?);
    if inventory.is_empty() {
        tracing::warn!("No trains loaded, every booking will be rejected");
    }

    let users = store.list_users().await?;
    let restored = inventory.restore_occupancy(users.iter().flat_map(|u| &u.tickets_booked));

    tracing::info!(
        trains = inventory.len(),
        restored_seats = restored,
        "Train inventory ready"
    );
    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::engine::{BookingEngine, BookingRequest};
    use crate::entities::User;

    #[tokio::test]
    async fn test_default_trains() {
        let trains = load_trains(None).await.unwrap();
        assert_eq!(trains.len(), 2);
        assert!(trains.iter().all(|t| t.count_available() == 24));
    }

    #[tokio::test]
    async fn test_trains_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trains.json");
        std::fs::write(
            &path,
            r#"[{"trainId":"x1","trainNo":"1","seats":[[0,1]],"stations":["a","b"]}]"#,
        )
        .unwrap();

        let trains = load_trains(Some(&path)).await.unwrap();
        assert_eq!(trains[0].train_id, "x1");
        assert_eq!(trains[0].count_available(), 1);
    }

    #[tokio::test]
    async fn test_empty_train_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trains.json");
        std::fs::write(&path, "[]").unwrap();

        let inventory = build_inventory(Some(&path), &MemoryStore::default())
            .await
            .unwrap();
        assert!(inventory.is_empty());
    }

    #[tokio::test]
    async fn test_build_inventory_restores_bookings() {
        let store = MemoryStore::default();
        let mut user = store.create_user(User::new("gagan", "hash")).await.unwrap();

        // Book against a throwaway inventory, then persist the user
        let mut scratch = TrainInventory::new(load_trains(None).await.unwrap());
        BookingEngine::default()
            .allocate(
                &mut scratch,
                &mut user,
                &BookingRequest {
                    train_id: "rats".to_string(),
                    from: "bangalore".to_string(),
                    to: "delhi".to_string(),
                    seats: 3,
                },
            )
            .unwrap();
        store.save_user(&user).await.unwrap();

        let inventory = build_inventory(None, &store).await.unwrap();
        assert_eq!(inventory.find_train("rats").unwrap().count_available(), 21);
        assert_eq!(inventory.find_train("bacs").unwrap().count_available(), 24);
    }
}
