use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid_input_error());
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    // great-circle (haversine) distance
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }

    // one interpolation step: advance the given fraction of the remaining
    // offset toward the target, in coordinate space
    pub fn move_toward(&self, target: &Self, fraction: f64) -> Self {
        Self {
            latitude: self.latitude + (target.latitude - self.latitude) * fraction,
            longitude: self.longitude + (target.longitude - self.longitude) * fraction,
        }
    }
}
