use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinate;

/// One sample from the device location service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackingSession {
    pub id: Uuid,
    pub user_position: Coordinate,
    pub counterparty_position: Coordinate,
    pub eta_seconds: u64,
    pub active: bool,
    pub arrived: bool,
}

impl TrackingSession {
    pub fn new(user_position: Coordinate, counterparty_position: Coordinate, eta_seconds: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_position,
            counterparty_position,
            eta_seconds,
            active: true,
            arrived: false,
        }
    }
}
