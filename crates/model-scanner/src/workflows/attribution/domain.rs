use serde::{Deserialize, Serialize};

/// A fixed marketing territory with a canonical short code and a reference
/// coordinate in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub name: String,
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Territory {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            latitude,
            longitude,
        }
    }
}

/// Resolved geography for one submission. Produced by the geocode lookup and
/// consumed immediately by the territory matcher; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLookupResult {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
    /// Two-letter region/state abbreviation when the upstream response carries
    /// one. Absence is not a lookup failure.
    pub region_code: Option<String>,
}

/// The derived attribution value attached to a lead at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignAssignment {
    pub territory_code: String,
    pub age_code: char,
    pub gender_code: char,
    pub composed_code: String,
    pub resolved_city: String,
}
