mod coordinate;
mod route;
mod service_tier;
mod suggestion;
mod tracking;

pub use coordinate::Coordinate;
pub use route::{Region, Route};
pub use service_tier::{FareQuote, ServiceTier};
pub use suggestion::AddressSuggestion;
pub use tracking::{EmergencyContact, PositionFix, TrackingSession};
