use super::Engine;

use crate::api::FareAPI;
use crate::entities::{FareQuote, Route, ServiceTier};

/// Price for one tier over a route distance. The first
/// `minimum_billable_km` are covered by the base rate.
pub fn price(tier: &ServiceTier, distance_meters: f64) -> f64 {
    let billable_km = (distance_meters / 1000.0 - tier.minimum_billable_km).max(0.0);

    tier.base_rate + tier.per_km_rate * billable_km
}

impl FareAPI for Engine {
    fn quote_fares(&self, route: &Route) -> Vec<FareQuote> {
        self.tiers()
            .iter()
            .map(|tier| FareQuote {
                service_id: tier.id.clone(),
                price: price(tier, route.distance_meters),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(base_rate: f64, per_km_rate: f64, minimum_billable_km: f64) -> ServiceTier {
        ServiceTier {
            id: "guincho".into(),
            label: "Guincho 24h".into(),
            base_rate,
            per_km_rate,
            minimum_billable_km,
        }
    }

    #[test]
    fn worked_example() {
        // 12 km on a 20 + 5/km tier with 3 km included
        let t = tier(20.0, 5.0, 3.0);
        assert!((price(&t, 12_000.0) - 65.0).abs() < 1e-9);
    }

    #[test]
    fn price_is_monotonic_in_distance() {
        for t in ServiceTier::default_table() {
            let mut previous = f64::MIN;
            for km in 0..50 {
                let p = price(&t, km as f64 * 1000.0);
                assert!(p >= previous, "{}: price dropped at {} km", t.id, km);
                previous = p;
            }
        }
    }

    #[test]
    fn price_never_drops_below_base_rate() {
        for t in ServiceTier::default_table() {
            assert!((price(&t, 0.0) - t.base_rate).abs() < 1e-9);
            assert!((price(&t, t.minimum_billable_km * 1000.0) - t.base_rate).abs() < 1e-9);
            assert!(price(&t, 500.0) >= t.base_rate);
        }
    }

    #[test]
    fn zero_distance_quotes_every_tier_at_base_rate() {
        // origin == destination is valid, not an error
        for t in ServiceTier::default_table() {
            assert!((price(&t, 0.0) - t.base_rate).abs() < 1e-9);
        }
    }
}
