use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub coordinates: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Viewport rectangle for fitting a map to a route, in the
/// center-plus-deltas convention map surfaces expect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

// breathing room around the fitted route
const REGION_PADDING: f64 = 1.2;

impl Route {
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    // None for degenerate routes, which must never be rendered as a line
    pub fn bounds(&self) -> Option<Region> {
        if self.coordinates.len() < 2 {
            return None;
        }

        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lon = f64::MAX;
        let mut max_lon = f64::MIN;

        for point in &self.coordinates {
            min_lat = min_lat.min(point.latitude);
            max_lat = max_lat.max(point.latitude);
            min_lon = min_lon.min(point.longitude);
            max_lon = max_lon.max(point.longitude);
        }

        Some(Region {
            center: Coordinate {
                latitude: (min_lat + max_lat) / 2.0,
                longitude: (min_lon + max_lon) / 2.0,
            },
            latitude_delta: (max_lat - min_lat) * REGION_PADDING,
            longitude_delta: (max_lon - min_lon) * REGION_PADDING,
        })
    }
}
