//! Integration specifications for the campaign-code attribution pipeline.
//!
//! Scenarios cover the three cooperating stages end to end: geocode
//! resolution (stubbed with fixtures), territory matching with the regional
//! override rule, and code composition.

mod common {
    use std::collections::HashMap;

    use model_scanner::workflows::attribution::{
        GeoLookupResult, GeocodeClient, GeocodeFailure,
    };

    /// Geocode stub resolving only the zips it was seeded with.
    #[derive(Default, Clone)]
    pub(super) struct FixtureGeocode {
        places: HashMap<String, GeoLookupResult>,
    }

    impl FixtureGeocode {
        pub(super) fn with_place(mut self, zip: &str, place: GeoLookupResult) -> Self {
            self.places.insert(zip.to_string(), place);
            self
        }
    }

    impl GeocodeClient for FixtureGeocode {
        async fn resolve(&self, postal_code: &str) -> Result<GeoLookupResult, GeocodeFailure> {
            self.places
                .get(postal_code)
                .cloned()
                .ok_or_else(|| GeocodeFailure::UnknownPostalCode(postal_code.to_string()))
        }
    }

    pub(super) fn place(
        latitude: f64,
        longitude: f64,
        city: &str,
        region: Option<&str>,
    ) -> GeoLookupResult {
        GeoLookupResult {
            latitude,
            longitude,
            city_name: city.to_string(),
            region_code: region.map(str::to_string),
        }
    }
}

mod matching {
    use super::common::place;
    use model_scanner::workflows::attribution::{
        GeoLookupResult, RegionalOverride, Territory, TerritoryCatalog,
    };

    #[test]
    fn every_standard_territory_wins_its_own_reference_point() {
        let catalog = TerritoryCatalog::standard();
        for territory in catalog.territories().to_vec() {
            let geo = place(territory.latitude, territory.longitude, &territory.name, None);
            assert_eq!(catalog.match_code(&geo), territory.code);
        }
    }

    #[test]
    fn override_beats_a_strictly_nearer_territory() {
        // Stamford CT: roughly 60 km from Manhattan, 250 km from Boston.
        let catalog = TerritoryCatalog::standard();
        let stamford = place(41.0534, -73.5387, "Stamford", Some("CT"));
        assert_eq!(catalog.match_code(&stamford), "#BOIG2");

        // Without the region code the same coordinate goes to New York.
        let anonymous = place(41.0534, -73.5387, "Stamford", None);
        assert_eq!(catalog.match_code(&anonymous), "#NYIG2");
    }

    #[test]
    fn all_new_england_regions_route_to_boston() {
        let catalog = TerritoryCatalog::standard();
        for region in ["CT", "RI", "MA", "NH", "VT", "ME"] {
            let geo = place(41.0, -72.0, "Somewhere", Some(region));
            assert_eq!(catalog.match_code(&geo), "#BOIG2", "region {region}");
        }
    }

    #[test]
    fn non_override_region_uses_distance() {
        let catalog = TerritoryCatalog::standard();
        // Memphis is Nashville country despite the TN abbreviation not
        // appearing in any override rule.
        let memphis = place(35.1495, -90.0490, "Memphis", Some("TN"));
        assert_eq!(catalog.match_code(&memphis), "#NAIG2");
    }

    #[test]
    fn synthetic_catalog_is_honored() {
        let catalog = TerritoryCatalog::new(
            vec![
                Territory::new("Alpha", "#ALPHA", 10.0, 10.0),
                Territory::new("Beta", "#BETA", -10.0, -10.0),
            ],
            vec![RegionalOverride::new("ZZ", "#BETA")],
            "#FALLBACK",
        );

        let near_alpha = place(9.0, 9.0, "Near Alpha", None);
        assert_eq!(catalog.match_code(&near_alpha), "#ALPHA");

        let overridden = place(9.0, 9.0, "Near Alpha", Some("ZZ"));
        assert_eq!(catalog.match_code(&overridden), "#BETA");
    }

    #[test]
    fn matching_is_deterministic_for_identical_inputs() {
        let catalog = TerritoryCatalog::standard();
        let geo: GeoLookupResult = place(39.9526, -75.1652, "Philadelphia", Some("PA"));
        let first = catalog.match_code(&geo).to_string();
        let second = catalog.match_code(&geo).to_string();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}

mod assignment {
    use super::common::{place, FixtureGeocode};
    use model_scanner::workflows::attribution::{
        CampaignCodeService, GeocodeFailure, TerritoryCatalog,
    };

    fn service(geocode: FixtureGeocode) -> CampaignCodeService<FixtureGeocode> {
        CampaignCodeService::new(geocode, TerritoryCatalog::standard())
    }

    #[tokio::test]
    async fn new_york_female_thirty_composes_nyig21f() {
        let geocode = FixtureGeocode::default().with_place(
            "10001",
            place(40.7484, -73.9967, "New York City", Some("NY")),
        );

        let assignment = service(geocode)
            .assign("10001", 30, "Female")
            .await
            .expect("assignment succeeds");

        assert_eq!(assignment.territory_code, "#NYIG2");
        assert_eq!(assignment.age_code, '1');
        assert_eq!(assignment.gender_code, 'F');
        assert_eq!(assignment.composed_code, "#NYIG21F");
        assert_eq!(assignment.resolved_city, "New York City");
    }

    #[tokio::test]
    async fn connecticut_male_fifty_composes_boig23m() {
        // Hartford is in the override set, so Boston wins no matter which
        // territory is geographically nearest.
        let geocode = FixtureGeocode::default().with_place(
            "06103",
            place(41.7658, -72.6734, "Hartford", Some("CT")),
        );

        let assignment = service(geocode)
            .assign("06103", 50, "Male")
            .await
            .expect("assignment succeeds");

        assert_eq!(assignment.composed_code, "#BOIG23M");
        assert_eq!(assignment.resolved_city, "Hartford");
    }

    #[tokio::test]
    async fn unknown_zip_aborts_with_geocode_failure() {
        let result = service(FixtureGeocode::default())
            .assign("99999", 30, "Female")
            .await;

        assert!(matches!(
            result,
            Err(GeocodeFailure::UnknownPostalCode(zip)) if zip == "99999"
        ));
    }

    #[tokio::test]
    async fn repeated_assignment_is_idempotent() {
        let geocode = FixtureGeocode::default().with_place(
            "60601",
            place(41.8853, -87.6216, "Chicago", Some("IL")),
        );
        let service = service(geocode);

        let first = service
            .assign("60601", 44, "Female")
            .await
            .expect("first assignment");
        let second = service
            .assign("60601", 44, "Female")
            .await
            .expect("second assignment");

        assert_eq!(first, second);
        assert_eq!(first.composed_code, "#CHIIG22F");
    }
}

mod haversine_properties {
    use model_scanner::workflows::attribution::haversine_km;
    use rand::Rng;

    #[test]
    fn distance_is_symmetric_for_random_coordinate_pairs() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let lat1 = rng.gen_range(-90.0..=90.0);
            let lon1 = rng.gen_range(-180.0..=180.0);
            let lat2 = rng.gen_range(-90.0..=90.0);
            let lon2 = rng.gen_range(-180.0..=180.0);

            let forward = haversine_km(lat1, lon1, lat2, lon2);
            let reverse = haversine_km(lat2, lon2, lat1, lon1);
            assert!(
                (forward - reverse).abs() < 1e-9,
                "asymmetric distance for ({lat1},{lon1}) <-> ({lat2},{lon2})"
            );
        }
    }

    #[test]
    fn distance_is_non_negative_and_zero_on_identity() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let lat = rng.gen_range(-90.0..=90.0);
            let lon = rng.gen_range(-180.0..=180.0);
            assert!(haversine_km(lat, lon, lat, lon).abs() < 1e-9);

            let lat2 = rng.gen_range(-90.0..=90.0);
            let lon2 = rng.gen_range(-180.0..=180.0);
            assert!(haversine_km(lat, lon, lat2, lon2) >= 0.0);
        }
    }

    #[test]
    fn known_city_pair_distance_is_plausible() {
        // Boston to New York is a bit over 300 km.
        let distance = haversine_km(42.3601, -71.0589, 40.7128, -74.0060);
        assert!((290.0..330.0).contains(&distance), "got {distance}");
    }
}
