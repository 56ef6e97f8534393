use super::composer;
use super::domain::CampaignAssignment;
use super::geocode::{GeocodeClient, GeocodeFailure};
use super::matcher::TerritoryCatalog;

/// Orchestrates the three attribution stages: geocode lookup, territory
/// matching, and code composition.
///
/// The assignment is all-or-nothing: a failed lookup aborts the computation
/// and no code is derived from partial or default geography.
pub struct CampaignCodeService<G> {
    geocode: G,
    catalog: TerritoryCatalog,
}

impl<G> CampaignCodeService<G>
where
    G: GeocodeClient,
{
    pub fn new(geocode: G, catalog: TerritoryCatalog) -> Self {
        Self { geocode, catalog }
    }

    pub fn catalog(&self) -> &TerritoryCatalog {
        &self.catalog
    }

    pub async fn assign(
        &self,
        postal_code: &str,
        age: u8,
        gender: &str,
    ) -> Result<CampaignAssignment, GeocodeFailure> {
        let geo = self.geocode.resolve(postal_code).await?;

        let territory_code = self.catalog.match_code(&geo).to_string();
        let age_code = composer::age_code(age);
        let gender_code = composer::gender_code(gender);
        let composed_code = composer::compose(&territory_code, age, gender);

        Ok(CampaignAssignment {
            territory_code,
            age_code,
            gender_code,
            composed_code,
            resolved_city: geo.city_name,
        })
    }
}
