use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub nominatim_base: String,
    pub osrm_base: String,
    pub country_codes: String,
    pub contact: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nominatim_base: "https://nominatim.openstreetmap.org".into(),
            osrm_base: "https://router.project-osrm.org".into(),
            country_codes: "br".into(),
            contact: "reboque/0.1 (suporte@reboque.app)".into(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            nominatim_base: env::var("NOMINATIM_API_BASE").unwrap_or(defaults.nominatim_base),
            osrm_base: env::var("OSRM_API_BASE").unwrap_or(defaults.osrm_base),
            country_codes: env::var("GEO_COUNTRY_CODES").unwrap_or(defaults.country_codes),
            contact: env::var("GEO_CONTACT").unwrap_or(defaults.contact),
            timeout_secs: env::var("GEO_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}
