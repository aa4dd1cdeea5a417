use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddressSuggestion {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub coordinate: Coordinate,
}

impl AddressSuggestion {
    pub fn new(id: String, title: String, subtitle: String, coordinate: Coordinate) -> Self {
        Self {
            id,
            title,
            subtitle,
            coordinate,
        }
    }
}
