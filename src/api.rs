use async_channel::Receiver;
use async_trait::async_trait;

use crate::engine::SearchOutcome;
use crate::entities::{
    AddressSuggestion, Coordinate, EmergencyContact, FareQuote, PositionFix, Route,
};
use crate::error::Error;

/// Forward and reverse geocoding against an external address-lookup service.
///
/// `Ok(None)` from `forward_geocode` means the service returned zero results,
/// an ordinary outcome callers handle with an empty state. Only transport
/// level failures come back as errors.
#[async_trait]
pub trait GeocodingAPI: Send + Sync {
    async fn search(&self, text: &str, limit: u8) -> Result<Vec<AddressSuggestion>, Error>;

    async fn forward_geocode(&self, text: &str) -> Result<Option<Coordinate>, Error>;

    async fn reverse_geocode(&self, position: Coordinate) -> Result<AddressSuggestion, Error>;
}

/// Driving-route lookup against an external routing service. `Ok(None)`
/// means no path was found between the two points.
#[async_trait]
pub trait RoutingAPI: Send + Sync {
    async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Option<Route>, Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// The device location service: permission request, one-shot fix, and a
/// continuous as-available subscription.
#[async_trait]
pub trait DeviceLocationAPI: Send + Sync {
    async fn request_permission(&self) -> Result<Permission, Error>;

    async fn current_position(&self) -> Result<PositionFix, Error>;

    fn watch_position(&self) -> Receiver<PositionFix>;
}

/// External key-value persistence, used only for the search-history list.
#[async_trait]
pub trait StorageAPI: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn set(&self, key: &str, value: String) -> Result<(), Error>;
}

/// Notification fan-out for the panic trigger. Fire-and-forget, best-effort.
#[async_trait]
pub trait NotificationAPI: Send + Sync {
    async fn notify(&self, contacts: &[EmergencyContact], message: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait SearchAPI {
    async fn submit_search(&self, origin: Coordinate, text: &str) -> SearchOutcome;

    async fn submit_coordinate(
        &self,
        origin: Coordinate,
        destination: AddressSuggestion,
    ) -> SearchOutcome;

    async fn recent_searches(&self) -> Vec<String>;
}

pub trait FareAPI {
    fn quote_fares(&self, route: &Route) -> Vec<FareQuote>;
}

pub trait API: SearchAPI + FareAPI {}
