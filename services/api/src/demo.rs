use clap::Args;
use std::time::Duration;

use model_scanner::config::AppConfig;
use model_scanner::error::AppError;
use model_scanner::workflows::attribution::{
    composer, CampaignCodeService, GeoLookupResult, TerritoryCatalog, ZippopotamClient,
};

#[derive(Args, Debug)]
pub(crate) struct AssignArgs {
    /// 5-digit US zip code to resolve
    #[arg(long)]
    pub(crate) zip: String,
    /// Visitor age
    #[arg(long)]
    pub(crate) age: u8,
    /// Visitor gender as submitted on the form
    #[arg(long, default_value = "")]
    pub(crate) gender: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Age used for the sample assignments
    #[arg(long, default_value_t = 30)]
    pub(crate) age: u8,
    /// Gender used for the sample assignments
    #[arg(long, default_value = "Female")]
    pub(crate) gender: String,
}

/// Live assignment: resolves the zip through the configured geocoding
/// service, then prints the full attribution breakdown.
pub(crate) async fn run_assign(args: AssignArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent("ModelScanner/1.0")
        .build()?;

    let geocode = ZippopotamClient::new(http, config.geocode.base_url.clone());
    let service = CampaignCodeService::new(geocode, TerritoryCatalog::standard());

    let assignment = service.assign(&args.zip, args.age, &args.gender).await?;

    println!("Campaign assignment for zip {}", args.zip);
    println!("Resolved city:  {}", assignment.resolved_city);
    println!("Territory code: {}", assignment.territory_code);
    println!("Age code:       {}", assignment.age_code);
    println!("Gender code:    {}", assignment.gender_code);
    println!("Campaign code:  {}", assignment.composed_code);

    Ok(())
}

/// Offline walkthrough of the territory matcher against fixed sample
/// coordinates, no network calls involved.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = TerritoryCatalog::standard();

    let samples = [
        sample("Midtown Manhattan", 40.7484, -73.9967, Some("NY")),
        sample("Stamford (CT override)", 41.0534, -73.5387, Some("CT")),
        sample("Fort Worth", 32.7555, -97.3308, Some("TX")),
        sample("Miami Beach", 25.7907, -80.1300, Some("FL")),
        sample("Providence (RI override)", 41.8240, -71.4128, Some("RI")),
    ];

    println!("Territory matching demo");
    println!(
        "Catalog: {} territories, default {}",
        catalog.territories().len(),
        catalog.default_code()
    );

    for (label, geo) in &samples {
        let territory = catalog.match_code(geo);
        let code = composer::compose(territory, args.age, &args.gender);
        println!("- {label}: territory {territory}, campaign code {code}");
    }

    Ok(())
}

fn sample(
    label: &'static str,
    latitude: f64,
    longitude: f64,
    region: Option<&str>,
) -> (&'static str, GeoLookupResult) {
    (
        label,
        GeoLookupResult {
            latitude,
            longitude,
            city_name: label.to_string(),
            region_code: region.map(str::to_string),
        },
    )
}
