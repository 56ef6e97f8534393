use super::domain::{GeoLookupResult, Territory};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Routes every postal code in a region to one territory, ahead of any
/// distance comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalOverride {
    pub region: String,
    pub territory_code: String,
}

impl RegionalOverride {
    pub fn new(region: impl Into<String>, territory_code: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            territory_code: territory_code.into(),
        }
    }
}

/// The fixed set of target territories plus the regional override rules.
///
/// Constructed once at startup and read-only afterwards; iteration order of
/// the territory table is significant because equidistant candidates resolve
/// to the first entry.
#[derive(Debug, Clone)]
pub struct TerritoryCatalog {
    territories: Vec<Territory>,
    overrides: Vec<RegionalOverride>,
    default_code: String,
}

impl TerritoryCatalog {
    pub fn new(
        territories: Vec<Territory>,
        overrides: Vec<RegionalOverride>,
        default_code: impl Into<String>,
    ) -> Self {
        Self {
            territories,
            overrides,
            default_code: default_code.into(),
        }
    }

    /// The production table: seven metro territories, the New England states
    /// routed to Boston regardless of distance, and New York as the fallback.
    pub fn standard() -> Self {
        let territories = vec![
            Territory::new("Boston", "#BOIG2", 42.3601, -71.0589),
            Territory::new("New York", "#NYIG2", 40.7128, -74.0060),
            Territory::new("Dallas", "#DAL3DE", 32.7767, -96.7970),
            Territory::new("Houston", "#HOU3DE", 29.7604, -95.3698),
            Territory::new("Nashville", "#NAIG2", 36.1627, -86.7816),
            Territory::new("Miami", "#FL4IG3", 25.7617, -80.1918),
            Territory::new("Chicago", "#CHIIG2", 41.8781, -87.6298),
        ];

        let overrides = ["CT", "RI", "MA", "NH", "VT", "ME"]
            .into_iter()
            .map(|region| RegionalOverride::new(region, "#BOIG2"))
            .collect();

        Self::new(territories, overrides, "#NYIG2")
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    /// Select the territory code for a resolved coordinate.
    ///
    /// A region-override match wins outright. Otherwise the nearest territory
    /// by great-circle distance is chosen, keeping the first table entry on a
    /// tie. An empty table or degenerate distances yield the default code, so
    /// this never fails.
    pub fn match_code(&self, geo: &GeoLookupResult) -> &str {
        if let Some(region) = geo.region_code.as_deref() {
            if let Some(rule) = self.overrides.iter().find(|rule| rule.region == region) {
                return &rule.territory_code;
            }
        }

        let mut nearest: Option<(&Territory, f64)> = None;
        for territory in &self.territories {
            let distance = haversine_km(
                geo.latitude,
                geo.longitude,
                territory.latitude,
                territory.longitude,
            );
            if distance.is_nan() {
                continue;
            }
            let closer = match nearest {
                Some((_, best)) => distance < best,
                None => true,
            };
            if closer {
                nearest = Some((territory, distance));
            }
        }

        match nearest {
            Some((territory, _)) => &territory.code,
            None => &self.default_code,
        }
    }
}

/// Great-circle distance between two coordinates in kilometers. Used only for
/// relative ordering of candidate territories.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin() * (d_lon / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
