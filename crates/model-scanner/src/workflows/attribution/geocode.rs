use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use super::domain::GeoLookupResult;

/// Error raised when a postal code cannot be resolved to a usable coordinate.
/// Callers never receive a partially populated lookup result.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeFailure {
    #[error("postal code {0} could not be resolved")]
    UnknownPostalCode(String),
    #[error("geocoding service responded with status {status}")]
    UpstreamStatus { status: u16 },
    #[error("geocoding response is missing {field}")]
    MalformedResponse { field: &'static str },
    #[error("geocoding request failed: {0}")]
    Transport(String),
}

/// Postal-code lookup seam so the attribution pipeline can be exercised with
/// fixed fixtures in tests.
pub trait GeocodeClient: Send + Sync {
    fn resolve(
        &self,
        postal_code: &str,
    ) -> impl Future<Output = Result<GeoLookupResult, GeocodeFailure>> + Send;
}

/// Client for the zippopotam.us postal-code API.
#[derive(Debug, Clone)]
pub struct ZippopotamClient {
    http: reqwest::Client,
    base_url: String,
}

impl ZippopotamClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    places: Vec<LookupPlace>,
}

// Upstream field names contain spaces; coordinates arrive string-encoded.
#[derive(Debug, Deserialize)]
struct LookupPlace {
    #[serde(rename = "place name")]
    place_name: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    #[serde(rename = "state abbreviation")]
    state_abbreviation: Option<String>,
}

impl GeocodeClient for ZippopotamClient {
    async fn resolve(&self, postal_code: &str) -> Result<GeoLookupResult, GeocodeFailure> {
        let url = format!("{}/us/{}", self.base_url, postal_code);
        debug!(%url, "resolving postal code");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| GeocodeFailure::Transport(err.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(GeocodeFailure::UnknownPostalCode(postal_code.to_string()));
        }
        if !response.status().is_success() {
            return Err(GeocodeFailure::UpstreamStatus {
                status: response.status().as_u16(),
            });
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|err| GeocodeFailure::Transport(err.to_string()))?;

        let place = body
            .places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeFailure::UnknownPostalCode(postal_code.to_string()))?;

        place_to_lookup(place)
    }
}

fn place_to_lookup(place: LookupPlace) -> Result<GeoLookupResult, GeocodeFailure> {
    let latitude = parse_coordinate(place.latitude.as_deref(), "latitude")?;
    let longitude = parse_coordinate(place.longitude.as_deref(), "longitude")?;

    let city_name = place
        .place_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(GeocodeFailure::MalformedResponse { field: "place name" })?;

    let region_code = place
        .state_abbreviation
        .map(|abbr| abbr.trim().to_string())
        .filter(|abbr| !abbr.is_empty());

    Ok(GeoLookupResult {
        latitude,
        longitude,
        city_name,
        region_code,
    })
}

fn parse_coordinate(
    raw: Option<&str>,
    field: &'static str,
) -> Result<f64, GeocodeFailure> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .ok_or(GeocodeFailure::MalformedResponse { field })
}
