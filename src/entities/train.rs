use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const FREE: u8 = 0;
pub const OCCUPIED: u8 = 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Seat grid row {row} has {found} seats, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Seat ({row}, {col}) has invalid value {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid seat label '{0}', expected row-column")]
pub struct SeatLabelError(pub String);

/// Fixed-size occupancy grid. Rows and columns never change after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct SeatGrid {
    cells: Vec<Vec<u8>>,
}

impl SeatGrid {
    /// An all-free grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![FREE; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn capacity(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn count_free(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == FREE)
            .count()
    }

    /// Cell value at a 0-based position, `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn is_free(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(FREE)
    }

    /// Takes the first `count` free cells in row-major order.
    ///
    /// Returns `None` without touching the grid when fewer than `count` cells
    /// are free.
    pub fn occupy_first_free(&mut self, count: usize) -> Option<Vec<SeatLabel>> {
        if self.count_free() < count {
            return None;
        }

        let mut taken = Vec::with_capacity(count);
        'scan: for (i, row) in self.cells.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                if taken.len() == count {
                    break 'scan;
                }
                if *cell == FREE {
                    *cell = OCCUPIED;
                    taken.push(SeatLabel::from_index(i, j));
                }
            }
        }

        Some(taken)
    }

    /// Frees every in-bounds seat in `labels`, returning those that were freed.
    pub fn release(&mut self, labels: &[SeatLabel]) -> Vec<SeatLabel> {
        self.set_all(labels, FREE)
    }

    /// Marks every in-bounds seat in `labels` occupied, returning those that were marked.
    pub fn occupy(&mut self, labels: &[SeatLabel]) -> Vec<SeatLabel> {
        self.set_all(labels, OCCUPIED)
    }

    fn set_all(&mut self, labels: &[SeatLabel], value: u8) -> Vec<SeatLabel> {
        let mut touched = Vec::with_capacity(labels.len());
        for label in labels {
            let Some((row, col)) = label.to_index() else {
                continue;
            };
            if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = value;
                touched.push(*label);
            }
        }
        touched
    }
}

impl TryFrom<Vec<Vec<u8>>> for SeatGrid {
    type Error = GridError;

    fn try_from(cells: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let expected = cells.first().map_or(0, Vec::len);
        for (row, seats) in cells.iter().enumerate() {
            if seats.len() != expected {
                return Err(GridError::Ragged {
                    row,
                    expected,
                    found: seats.len(),
                });
            }
            if let Some((col, &value)) = seats
                .iter()
                .enumerate()
                .find(|&(_, &v)| v != FREE && v != OCCUPIED)
            {
                return Err(GridError::InvalidCell { row, col, value });
            }
        }
        Ok(Self { cells })
    }
}

impl From<SeatGrid> for Vec<Vec<u8>> {
    fn from(grid: SeatGrid) -> Self {
        grid.cells
    }
}

/// A seat position printed as "row-column", both 1-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatLabel {
    pub row: usize,
    pub col: usize,
}

impl SeatLabel {
    pub fn from_index(row: usize, col: usize) -> Self {
        Self {
            row: row + 1,
            col: col + 1,
        }
    }

    /// 0-based grid position. `None` for a label with a zero component.
    pub fn to_index(self) -> Option<(usize, usize)> {
        Some((self.row.checked_sub(1)?, self.col.checked_sub(1)?))
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for SeatLabel {
    type Err = SeatLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeatLabelError(s.to_string());
        let (row, col) = s.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            row: row.trim().parse().map_err(|_| invalid())?,
            col: col.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for SeatLabel {
    type Error = SeatLabelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SeatLabel> for String {
    fn from(label: SeatLabel) -> Self {
        label.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    pub train_id: String,
    pub train_no: String,
    pub stations: Vec<String>,
    /// Station name to "HH:MM:SS". Kept as text, the source data runs past 24:00.
    #[serde(default)]
    pub station_times: BTreeMap<String, String>,
    pub seats: SeatGrid,
}

impl Train {
    pub fn count_available(&self) -> usize {
        self.seats.count_free()
    }

    pub fn route_index(&self, station: &str) -> Option<usize> {
        self.stations.iter().position(|s| s == station)
    }

    /// True when both stations are on the route and `from` comes strictly first.
    pub fn is_reachable(&self, from: &str, to: &str) -> bool {
        match (self.route_index(from), self.route_index(to)) {
            (Some(f), Some(t)) => f < t,
            _ => false,
        }
    }

    pub fn time_at(&self, station: &str) -> Option<&str> {
        self.station_times.get(station).map(String::as_str)
    }
}
