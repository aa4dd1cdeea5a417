mod fare_api;
mod history;
mod search_api;
mod suggestions;

pub use fare_api::price;
pub use suggestions::{SuggestionEngine, SuggestionStatus};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{GeocodingAPI, RoutingAPI, StorageAPI, API};
use crate::entities::{Coordinate, FareQuote, Region, Route, ServiceTier};

/// The closed set of user-facing failure states. The shell localizes these;
/// raw error text never reaches the end user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    AddressNotFound,
    NoRoute,
    ServiceUnavailable,
}

/// Everything the map surface renders: destination marker, route polyline,
/// fitted viewport, fare quotes and the current failure notice. Published
/// atomically; a failed search never leaves a partial update behind.
#[derive(Clone, Debug, Default)]
pub struct MapView {
    pub destination: Option<Coordinate>,
    pub route: Option<Route>,
    pub region: Option<Region>,
    pub quotes: Vec<FareQuote>,
    pub notice: Option<Notice>,
}

#[derive(Clone, Debug)]
pub enum SearchOutcome {
    Routed {
        destination: Coordinate,
        route: Route,
        quotes: Vec<FareQuote>,
    },
    /// Destination resolved but no drivable path; the marker is still shown.
    NoRoute { destination: Coordinate },
    AddressNotFound,
    /// Transport-level failure, surfaced as a generic retry prompt.
    Failed,
    /// A newer submission claimed the generation while this one was in
    /// flight; nothing was published.
    Superseded,
    /// Blank input, rejected before any network call.
    Rejected,
}

pub struct Engine {
    geocoder: Arc<dyn GeocodingAPI>,
    router: Arc<dyn RoutingAPI>,
    storage: Arc<dyn StorageAPI>,
    tiers: Vec<ServiceTier>,
    generation: AtomicU64,
    view: Mutex<MapView>,
}

impl Engine {
    pub fn new(
        geocoder: Arc<dyn GeocodingAPI>,
        router: Arc<dyn RoutingAPI>,
        storage: Arc<dyn StorageAPI>,
    ) -> Self {
        Self::with_tiers(geocoder, router, storage, ServiceTier::default_table())
    }

    pub fn with_tiers(
        geocoder: Arc<dyn GeocodingAPI>,
        router: Arc<dyn RoutingAPI>,
        storage: Arc<dyn StorageAPI>,
        tiers: Vec<ServiceTier>,
    ) -> Self {
        Self {
            geocoder,
            router,
            storage,
            tiers,
            generation: AtomicU64::new(0),
            view: Mutex::new(MapView::default()),
        }
    }

    pub fn tiers(&self) -> &[ServiceTier] {
        &self.tiers
    }

    pub async fn map_view(&self) -> MapView {
        self.view.lock().await.clone()
    }

    // a new submission invalidates all previous ones
    fn claim_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

impl API for Engine {}
