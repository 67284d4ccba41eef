use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::{SeatGrid, Train};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TrainSearchQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrainSummary {
    pub train_id: String,
    pub train_no: String,
    pub stations: Vec<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub available_seats: usize,
    pub total_seats: usize,
}

#[derive(Debug, Serialize)]
pub struct TrainDetail {
    pub train_id: String,
    pub train_no: String,
    pub stations: Vec<String>,
    pub station_times: BTreeMap<String, String>,
    pub seats: SeatGrid,
    pub available_seats: usize,
}

fn summarize(train: &Train, from: Option<&str>, to: Option<&str>) -> TrainSummary {
    TrainSummary {
        train_id: train.train_id.clone(),
        train_no: train.train_no.clone(),
        stations: train.stations.clone(),
        departure: from.and_then(|s| train.time_at(s)).map(str::to_string),
        arrival: to.and_then(|s| train.time_at(s)).map(str::to_string),
        available_seats: train.count_available(),
        total_seats: train.seats.capacity(),
    }
}

/// Search trains serving a route leg, or list all trains without a query
pub async fn list_trains(
    State(state): State<AppState>,
    Query(query): Query<TrainSearchQuery>,
) -> AppResult<Json<Vec<TrainSummary>>> {
    let inventory = state.inventory.lock().await;

    let trains: Vec<TrainSummary> = match (query.from.as_deref(), query.to.as_deref()) {
        (None, None) => inventory
            .trains()
            .map(|t| summarize(t, None, None))
            .collect(),
        (Some(from), Some(to)) => {
            if from == to {
                return Err(AppError::BadRequest(
                    "Source and destination cannot be the same".to_string(),
                ));
            }
            inventory
                .trains_for_leg(from, to)
                .map(|t| summarize(t, Some(from), Some(to)))
                .collect()
        }
        _ => {
            return Err(AppError::BadRequest(
                "Both from and to are required".to_string(),
            ))
        }
    };

    Ok(Json(trains))
}

/// Get a train with its seat map
pub async fn get_train(
    State(state): State<AppState>,
    Path(train_id): Path<String>,
) -> AppResult<Json<TrainDetail>> {
    let inventory = state.inventory.lock().await;
    let train = inventory
        .find_train(&train_id)
        .ok_or_else(|| AppError::NotFound("Train not found".to_string()))?;

    Ok(Json(TrainDetail {
        train_id: train.train_id.clone(),
        train_no: train.train_no.clone(),
        stations: train.stations.clone(),
        station_times: train.station_times.clone(),
        seats: train.seats.clone(),
        available_seats: train.count_available(),
    }))
}
