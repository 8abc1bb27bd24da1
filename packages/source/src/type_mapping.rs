//! Crime type label normalization.
//!
//! Maps a source's crime type label onto the shared [`CrimeSubcategory`]
//! taxonomy. Boston publishes title-case offense groups (`"Larceny From
//! Motor Vehicle"`), Denver publishes slugs (`"theft-from-motor-vehicle"`),
//! so labels are lowercased and de-slugged before keyword matching.

use crime_analysis_crime_models::CrimeSubcategory;

/// Keyword rules, checked in order. Earlier rules win, so more specific
/// phrases (vehicle accidents, vehicle theft) sit above the generic words
/// they contain.
const RULES: &[(CrimeSubcategory, &[&str])] = &[
    (
        CrimeSubcategory::Traffic,
        &["accident", "traffic", "motor vehicle response"],
    ),
    (
        CrimeSubcategory::Homicide,
        &["homicide", "murder", "manslaughter"],
    ),
    (
        CrimeSubcategory::SexualAssault,
        &["sexual", "rape", "sex offense"],
    ),
    (CrimeSubcategory::Robbery, &["robbery"]),
    (
        CrimeSubcategory::AggravatedAssault,
        &["aggravated assault", "agg assault"],
    ),
    (
        CrimeSubcategory::SimpleAssault,
        &["assault", "battery", "crimes against persons"],
    ),
    (
        CrimeSubcategory::Burglary,
        &["burglary", "breaking and entering"],
    ),
    (
        CrimeSubcategory::MotorVehicleTheft,
        &["auto theft", "vehicle theft", "stolen vehicle"],
    ),
    (
        CrimeSubcategory::LarcenyTheft,
        &["larceny", "theft", "shoplifting", "pickpocket"],
    ),
    (CrimeSubcategory::Arson, &["arson"]),
    (
        CrimeSubcategory::Vandalism,
        &["vandalism", "criminal mischief", "graffiti"],
    ),
    (CrimeSubcategory::DrugViolation, &["drug", "narcotic"]),
    (
        CrimeSubcategory::WeaponsViolation,
        &["firearm", "weapon", "ballistics"],
    ),
    (
        CrimeSubcategory::Dui,
        &["under the influence", "dui", "oui"],
    ),
    (
        CrimeSubcategory::DisorderlyConduct,
        &[
            "disorderly",
            "public disorder",
            "liquor",
            "verbal dispute",
            "harassment",
            "prostitution",
        ],
    ),
    (CrimeSubcategory::Trespassing, &["trespass"]),
    (CrimeSubcategory::WarrantArrest, &["warrant"]),
    (
        CrimeSubcategory::Fraud,
        &["fraud", "confidence game", "white collar"],
    ),
    (CrimeSubcategory::Forgery, &["counterfeit", "forgery"]),
    (CrimeSubcategory::Embezzlement, &["embezzle"]),
    (CrimeSubcategory::MissingPerson, &["missing person"]),
    (
        CrimeSubcategory::ServiceCall,
        &[
            "medical",
            "investigate",
            "towed",
            "property lost",
            "property found",
            "assistance",
            "police service",
        ],
    ),
];

/// Maps a raw crime type label to the canonical subcategory.
///
/// Matching is case-insensitive and treats `-` and `_` as spaces. Returns
/// [`CrimeSubcategory::Unknown`] when no rule matches.
#[must_use]
pub fn map_crime_type(raw: &str) -> CrimeSubcategory {
    let label: String = raw
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| label.contains(k)))
        .map_or(CrimeSubcategory::Unknown, |(sub, _)| *sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_boston_offense_groups() {
        assert_eq!(map_crime_type("Larceny"), CrimeSubcategory::LarcenyTheft);
        assert_eq!(
            map_crime_type("Larceny From Motor Vehicle"),
            CrimeSubcategory::LarcenyTheft
        );
        assert_eq!(
            map_crime_type("Motor Vehicle Accident Response"),
            CrimeSubcategory::Traffic
        );
        assert_eq!(map_crime_type("Auto Theft"), CrimeSubcategory::MotorVehicleTheft);
        assert_eq!(
            map_crime_type("Warrant Arrests"),
            CrimeSubcategory::WarrantArrest
        );
        assert_eq!(
            map_crime_type("Medical Assistance"),
            CrimeSubcategory::ServiceCall
        );
        assert_eq!(
            map_crime_type("Residential Burglary"),
            CrimeSubcategory::Burglary
        );
        assert_eq!(
            map_crime_type("Operating Under the Influence"),
            CrimeSubcategory::Dui
        );
        assert_eq!(
            map_crime_type("Firearm Violations"),
            CrimeSubcategory::WeaponsViolation
        );
        assert_eq!(map_crime_type("Confidence Games"), CrimeSubcategory::Fraud);
    }

    #[test]
    fn maps_denver_slugs() {
        assert_eq!(
            map_crime_type("theft-from-motor-vehicle"),
            CrimeSubcategory::LarcenyTheft
        );
        assert_eq!(map_crime_type("auto-theft"), CrimeSubcategory::MotorVehicleTheft);
        assert_eq!(
            map_crime_type("traffic-accident"),
            CrimeSubcategory::Traffic
        );
        assert_eq!(
            map_crime_type("drug-alcohol"),
            CrimeSubcategory::DrugViolation
        );
        assert_eq!(
            map_crime_type("public-disorder"),
            CrimeSubcategory::DisorderlyConduct
        );
        assert_eq!(
            map_crime_type("white-collar-crime"),
            CrimeSubcategory::Fraud
        );
        assert_eq!(map_crime_type("murder"), CrimeSubcategory::Homicide);
    }

    #[test]
    fn unknown_fallback() {
        assert_eq!(map_crime_type("all-other-crimes"), CrimeSubcategory::Unknown);
        assert_eq!(map_crime_type(""), CrimeSubcategory::Unknown);
    }
}
