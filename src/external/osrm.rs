use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    api::RoutingAPI,
    config::Config,
    entities::{Coordinate, Route},
    error::{service_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OsrmGeometry {
    // GeoJSON pairs, [longitude, latitude]
    coordinates: Vec<[f64; 2]>,
}

impl OsrmRoute {
    fn into_route(self) -> Route {
        let coordinates = self
            .geometry
            .coordinates
            .into_iter()
            .map(|[longitude, latitude]| Coordinate {
                latitude,
                longitude,
            })
            .collect();

        Route {
            coordinates,
            distance_meters: self.distance,
            duration_seconds: self.duration,
        }
    }
}

#[derive(Debug)]
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.contact.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.osrm_base.clone(),
        })
    }
}

#[async_trait]
impl RoutingAPI for OsrmClient {
    #[tracing::instrument(skip(self))]
    async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Option<Route>, Error> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude,
        );

        let res = self
            .client
            .get(url)
            .query(&[("overview", "full")])
            .query(&[("geometries", "geojson")])
            .query(&[("alternatives", "false")])
            .query(&[("steps", "false")])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(service_error(res.status()));
        }

        let data: OsrmResponse = res.json().await?;

        // a 200 is necessary but not sufficient: the code must be Ok and the
        // geometry non-empty, otherwise there is no drivable path
        if data.code != "Ok" {
            return Ok(None);
        }

        let route = match data.routes.into_iter().next() {
            Some(route) => route.into_route(),
            None => return Ok(None),
        };

        if route.coordinates.len() < 2 {
            return Ok(None);
        }

        Ok(Some(route))
    }
}
