use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    api::GeocodingAPI,
    config::Config,
    entities::{AddressSuggestion, Coordinate},
    error::{blank_input_error, service_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct NominatimPlace {
    place_id: u64,
    display_name: String,
    lat: String,
    lon: String,
    address: Option<NominatimAddress>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    neighbourhood: Option<String>,
    suburb: Option<String>,
    city: Option<String>,
    state: Option<String>,
}

impl NominatimAddress {
    // street, neighbourhood, city and state, skipping absent fields
    fn subtitle(&self) -> String {
        let neighbourhood = self.neighbourhood.as_ref().or(self.suburb.as_ref());

        [
            self.road.as_ref(),
            neighbourhood,
            self.city.as_ref(),
            self.state.as_ref(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl NominatimPlace {
    fn into_suggestion(self) -> Result<AddressSuggestion, Error> {
        let latitude: f64 = self.lat.parse().map_err(service_error)?;
        let longitude: f64 = self.lon.parse().map_err(service_error)?;
        let coordinate = Coordinate::new(latitude, longitude)?;

        let title = self
            .display_name
            .split(',')
            .next()
            .unwrap_or(&self.display_name)
            .trim()
            .to_string();

        let subtitle = self.address.unwrap_or_default().subtitle();

        Ok(AddressSuggestion::new(
            self.place_id.to_string(),
            title,
            subtitle,
            coordinate,
        ))
    }
}

#[derive(Debug)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    country_codes: String,
}

impl NominatimClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.contact.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.nominatim_base.clone(),
            country_codes: config.country_codes.clone(),
        })
    }

    async fn lookup(&self, text: &str, limit: u8) -> Result<Vec<NominatimPlace>, Error> {
        let url = format!("{}/search", self.base_url);

        let res = self
            .client
            .get(url)
            .query(&[("q", text)])
            .query(&[("format", "json")])
            .query(&[("addressdetails", "1")])
            .query(&[("limit", limit.to_string().as_str())])
            .query(&[("countrycodes", self.country_codes.as_str())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(service_error(res.status()));
        }

        Ok(res.json().await?)
    }
}

#[async_trait]
impl GeocodingAPI for NominatimClient {
    #[tracing::instrument(skip(self))]
    async fn search(&self, text: &str, limit: u8) -> Result<Vec<AddressSuggestion>, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(blank_input_error());
        }

        let places = self.lookup(text, limit).await?;

        places
            .into_iter()
            .map(NominatimPlace::into_suggestion)
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn forward_geocode(&self, text: &str) -> Result<Option<Coordinate>, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(blank_input_error());
        }

        let places = self.lookup(text, 1).await?;

        // first result is the highest-confidence one; zero results is an
        // ordinary empty outcome, not an error
        match places.into_iter().next() {
            Some(place) => Ok(Some(place.into_suggestion()?.coordinate)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn reverse_geocode(&self, position: Coordinate) -> Result<AddressSuggestion, Error> {
        let url = format!("{}/reverse", self.base_url);

        let res = self
            .client
            .get(url)
            .query(&[("lat", position.latitude.to_string().as_str())])
            .query(&[("lon", position.longitude.to_string().as_str())])
            .query(&[("format", "json")])
            .query(&[("addressdetails", "1")])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(service_error(res.status()));
        }

        let place: NominatimPlace = res.json().await?;
        place.into_suggestion()
    }
}
