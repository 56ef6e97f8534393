//! Campaign-code attribution: postal-code geocoding, territory matching, and
//! code composition.
//!
//! The pipeline is deterministic for a fixed territory catalog: the same zip,
//! age, and gender always produce the same composed code. The only fallible
//! stage is the external geocode lookup, and a lookup failure aborts the whole
//! assignment rather than falling back to partial geographic data.

pub mod composer;
pub mod domain;
pub mod geocode;
pub mod matcher;
pub mod service;

pub use domain::{CampaignAssignment, GeoLookupResult, Territory};
pub use geocode::{GeocodeClient, GeocodeFailure, ZippopotamClient};
pub use matcher::{haversine_km, RegionalOverride, TerritoryCatalog};
pub use service::CampaignCodeService;
