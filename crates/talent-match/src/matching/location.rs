use serde::{Deserialize, Serialize};

use super::domain::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Score used when neither coordinates nor usable city names are available.
pub const UNKNOWN_LOCATION_SCORE: f64 = 50.0;

/// Upper distance bound (inclusive, km) paired with the score it earns.
const DISTANCE_BANDS: &[(f64, f64)] = &[(10.0, 100.0), (30.0, 80.0), (50.0, 60.0), (100.0, 40.0)];
const BEYOND_BANDS_SCORE: f64 = 20.0;

/// Which branch of the location rules produced the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationBasis {
    Remote,
    Coordinates,
    CityName,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationAssessment {
    pub score: f64,
    pub basis: LocationBasis,
    pub distance_km: Option<f64>,
}

/// Side of the match contributing a location: free text plus optional coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place<'a> {
    pub text: &'a str,
    pub coordinates: Option<Coordinates>,
}

/// Great-circle distance in kilometers.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn distance_score(distance_km: f64) -> f64 {
    DISTANCE_BANDS
        .iter()
        .find(|(limit, _)| distance_km <= *limit)
        .map(|(_, score)| *score)
        .unwrap_or(BEYOND_BANDS_SCORE)
}

/// Lowercase, letters only.
pub fn normalize_city(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect()
}

pub fn is_remote(offer_location: &str) -> bool {
    offer_location.to_lowercase().contains("remote")
}

pub fn assess_location(candidate: Place<'_>, offer: Place<'_>) -> LocationAssessment {
    if is_remote(offer.text) {
        return LocationAssessment {
            score: 100.0,
            basis: LocationBasis::Remote,
            distance_km: None,
        };
    }

    if let (Some(from), Some(to)) = (candidate.coordinates, offer.coordinates) {
        let distance = haversine_km(from, to);
        return LocationAssessment {
            score: distance_score(distance),
            basis: LocationBasis::Coordinates,
            distance_km: Some(distance),
        };
    }

    let candidate_city = normalize_city(candidate.text);
    let offer_city = normalize_city(offer.text);

    let city_score = if candidate_city.is_empty() || offer_city.is_empty() {
        None
    } else if candidate_city == offer_city {
        Some(100.0)
    } else if candidate_city.contains(&offer_city) || offer_city.contains(&candidate_city) {
        Some(80.0)
    } else {
        None
    };

    match city_score {
        Some(score) => LocationAssessment {
            score,
            basis: LocationBasis::CityName,
            distance_km: None,
        },
        // Unrelated names say nothing about distance.
        None => LocationAssessment {
            score: UNKNOWN_LOCATION_SCORE,
            basis: LocationBasis::Unknown,
            distance_km: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TUNIS: Coordinates = Coordinates {
        latitude: 36.8065,
        longitude: 10.1815,
    };

    fn place(text: &str, coordinates: Option<Coordinates>) -> Place<'_> {
        Place { text, coordinates }
    }

    #[test]
    fn remote_offers_score_full_regardless_of_case() {
        for text in ["Remote", "FULL REMOTE", "Tunis (remote possible)"] {
            let result = assess_location(place("Sfax", Some(TUNIS)), place(text, None));
            assert_eq!(result.score, 100.0);
            assert_eq!(result.basis, LocationBasis::Remote);
        }
    }

    #[test]
    fn tunis_reference_distance_falls_in_thirty_km_band() {
        let ariana = Coordinates {
            latitude: 36.8989,
            longitude: 10.1658,
        };

        let distance = haversine_km(TUNIS, ariana);
        assert!((distance - 10.3).abs() < 0.2, "distance was {distance}");

        let result = assess_location(place("Tunis", Some(TUNIS)), place("Ariana", Some(ariana)));
        assert_eq!(result.score, 80.0);
        assert_eq!(result.basis, LocationBasis::Coordinates);
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(distance_score(0.0), 100.0);
        assert_eq!(distance_score(10.0), 100.0);
        assert_eq!(distance_score(10.0001), 80.0);
        assert_eq!(distance_score(30.0), 80.0);
        assert_eq!(distance_score(50.0), 60.0);
        assert_eq!(distance_score(100.0), 40.0);
        assert_eq!(distance_score(100.5), 20.0);
    }

    #[test]
    fn nearby_point_within_ten_km() {
        let bardo = Coordinates {
            latitude: 36.8092,
            longitude: 10.1406,
        };

        let result = assess_location(place("", Some(TUNIS)), place("", Some(bardo)));
        assert_eq!(result.score, 100.0);
        assert!(result.distance_km.expect("distance computed") < 10.0);
    }

    #[test]
    fn coordinates_take_precedence_over_city_names() {
        let sfax = Coordinates {
            latitude: 34.7406,
            longitude: 10.7603,
        };

        let result = assess_location(place("Tunis", Some(TUNIS)), place("Tunis", Some(sfax)));
        assert_eq!(result.score, 20.0);
    }

    #[test]
    fn city_names_compare_after_normalization() {
        let exact = assess_location(place("  tunis ", None), place("TUNIS", None));
        assert_eq!(exact.score, 100.0);
        assert_eq!(exact.basis, LocationBasis::CityName);

        let contained = assess_location(place("La Marsa", None), place("Marsa", None));
        assert_eq!(contained.score, 80.0);

    }

    #[test]
    fn unrelated_city_names_stay_neutral() {
        let different = assess_location(place("Sousse", None), place("Bizerte", None));
        assert_eq!(different.score, UNKNOWN_LOCATION_SCORE);
        assert_eq!(different.basis, LocationBasis::Unknown);
        assert!(different.distance_km.is_none());
    }

    #[test]
    fn missing_data_is_neutral() {
        let result = assess_location(place("", None), place("Tunis", None));
        assert_eq!(result.score, 50.0);
        assert_eq!(result.basis, LocationBasis::Unknown);

        let digits_only = assess_location(place("1000", None), place("Tunis", None));
        assert_eq!(digits_only.score, 50.0);

        let one_sided = assess_location(place("Tunis", Some(TUNIS)), place("", None));
        assert_eq!(one_sided.score, 50.0);
    }
}
