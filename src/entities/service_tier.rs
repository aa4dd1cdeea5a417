use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceTier {
    pub id: String,
    pub label: String,
    pub base_rate: f64,
    pub per_km_rate: f64,
    pub minimum_billable_km: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    pub service_id: String,
    pub price: f64,
}

impl ServiceTier {
    /// The static service catalogue. Loaded once, read-only thereafter;
    /// quote output preserves this order.
    pub fn default_table() -> Vec<ServiceTier> {
        vec![
            ServiceTier {
                id: "guincho".into(),
                label: "Guincho 24h".into(),
                base_rate: 20.0,
                per_km_rate: 5.0,
                minimum_billable_km: 3.0,
            },
            ServiceTier {
                id: "bateria".into(),
                label: "Bateria".into(),
                base_rate: 35.0,
                per_km_rate: 2.0,
                minimum_billable_km: 5.0,
            },
            ServiceTier {
                id: "sos-estrada".into(),
                label: "SOS Estrada".into(),
                base_rate: 50.0,
                per_km_rate: 6.5,
                minimum_billable_km: 2.0,
            },
            ServiceTier {
                id: "chaveiro".into(),
                label: "Chaveiro".into(),
                base_rate: 40.0,
                per_km_rate: 1.5,
                minimum_billable_km: 5.0,
            },
            ServiceTier {
                id: "combustivel".into(),
                label: "Combustível".into(),
                base_rate: 15.0,
                per_km_rate: 3.0,
                minimum_billable_km: 4.0,
            },
            ServiceTier {
                id: "reparos".into(),
                label: "Reparos Leves".into(),
                base_rate: 30.0,
                per_km_rate: 2.5,
                minimum_billable_km: 5.0,
            },
        ]
    }
}
