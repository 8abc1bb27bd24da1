#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime taxonomy, building typology, and the loaded crime record type.
//!
//! Every city dataset names its offenses differently (Boston's
//! `OFFENSE_CODE_GROUP`, Denver's `OFFENSE_CATEGORY_ID`, ...). The raw label
//! is kept verbatim on each [`CrimeRecord`] as its `crime_type`, and is also
//! classified into the shared [`CrimeSubcategory`] taxonomy so that
//! cross-city comparisons can group on a common vocabulary.

use chrono::{Datelike as _, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Top-level crime category groupings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CrimeCategory {
    /// Crimes against persons
    Violent,
    /// Crimes against property
    Property,
    /// Drug and narcotics offenses
    DrugNarcotics,
    /// Public order and quality-of-life offenses
    PublicOrder,
    /// Fraud, forgery, embezzlement
    FraudFinancial,
    /// Police service calls and anything unclassified
    Other,
}

impl CrimeCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Violent,
            Self::Property,
            Self::DrugNarcotics,
            Self::PublicOrder,
            Self::FraudFinancial,
            Self::Other,
        ]
    }
}

/// Specific crime subcategories within each top-level [`CrimeCategory`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CrimeSubcategory {
    // ── Violent ──────────────────────────────────────────
    Homicide,
    SexualAssault,
    Robbery,
    AggravatedAssault,
    SimpleAssault,

    // ── Property ────────────────────────────────────────
    Burglary,
    LarcenyTheft,
    MotorVehicleTheft,
    Arson,
    Vandalism,

    // ── Drug/Narcotics ──────────────────────────────────
    DrugViolation,

    // ── Public Order ────────────────────────────────────
    WeaponsViolation,
    Dui,
    DisorderlyConduct,
    Trespassing,
    WarrantArrest,

    // ── Fraud/Financial ─────────────────────────────────
    Fraud,
    Forgery,
    Embezzlement,

    // ── Other ───────────────────────────────────────────
    /// Medical assistance, investigate person/property, towed vehicle, ...
    ServiceCall,
    /// Motor vehicle accident response and other traffic incidents
    Traffic,
    MissingPerson,
    /// Labels that don't map to any other subcategory
    Unknown,
}

impl CrimeSubcategory {
    /// Returns the parent [`CrimeCategory`] for this subcategory.
    #[must_use]
    pub const fn category(self) -> CrimeCategory {
        match self {
            Self::Homicide
            | Self::SexualAssault
            | Self::Robbery
            | Self::AggravatedAssault
            | Self::SimpleAssault => CrimeCategory::Violent,

            Self::Burglary
            | Self::LarcenyTheft
            | Self::MotorVehicleTheft
            | Self::Arson
            | Self::Vandalism => CrimeCategory::Property,

            Self::DrugViolation => CrimeCategory::DrugNarcotics,

            Self::WeaponsViolation
            | Self::Dui
            | Self::DisorderlyConduct
            | Self::Trespassing
            | Self::WarrantArrest => CrimeCategory::PublicOrder,

            Self::Fraud | Self::Forgery | Self::Embezzlement => CrimeCategory::FraudFinancial,

            Self::ServiceCall | Self::Traffic | Self::MissingPerson | Self::Unknown => {
                CrimeCategory::Other
            }
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Homicide,
            Self::SexualAssault,
            Self::Robbery,
            Self::AggravatedAssault,
            Self::SimpleAssault,
            Self::Burglary,
            Self::LarcenyTheft,
            Self::MotorVehicleTheft,
            Self::Arson,
            Self::Vandalism,
            Self::DrugViolation,
            Self::WeaponsViolation,
            Self::Dui,
            Self::DisorderlyConduct,
            Self::Trespassing,
            Self::WarrantArrest,
            Self::Fraud,
            Self::Forgery,
            Self::Embezzlement,
            Self::ServiceCall,
            Self::Traffic,
            Self::MissingPerson,
            Self::Unknown,
        ]
    }
}

/// Usage classification of the building nearest to an incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Typology {
    Residential,
    Retail,
    Office,
    Industrial,
    Institutional,
    MixedUse,
    OpenSpace,
    Other,
}

impl Typology {
    /// Classifies a free-form building use label.
    ///
    /// Assessor datasets use labels like `"Residential Condo"`,
    /// `"Commercial - Retail"` or `"Exempt (Education)"`, so this matches on
    /// keywords rather than exact names.
    #[must_use]
    pub fn classify(label: &str) -> Self {
        const KEYWORDS: &[(Typology, &[&str])] = &[
            (Typology::MixedUse, &["mixed"]),
            (
                Typology::Residential,
                &["residential", "condo", "apartment", "family", "dwelling"],
            ),
            (Typology::Retail, &["retail", "store", "restaurant", "shop"]),
            (Typology::Office, &["office"]),
            (
                Typology::Industrial,
                &["industrial", "warehouse", "manufactur"],
            ),
            (
                Typology::Institutional,
                &[
                    "institution",
                    "government",
                    "education",
                    "school",
                    "hospital",
                    "church",
                    "exempt",
                ],
            ),
            (Typology::OpenSpace, &["open", "park", "vacant"]),
            (Typology::Retail, &["commercial"]),
        ];

        let lower = label.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map_or(Self::Other, |(typology, _)| *typology)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Residential,
            Self::Retail,
            Self::Office,
            Self::Industrial,
            Self::Institutional,
            Self::MixedUse,
            Self::OpenSpace,
            Self::Other,
        ]
    }
}

/// A single crime incident as loaded from a city dataset.
///
/// Records are never modified after loading. Enrichment steps (such as
/// typology attribution) produce new records via the `with_*` builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeRecord {
    /// Incident number from the source dataset.
    pub incident_id: String,
    /// Calendar date the incident occurred on.
    pub occurred_on: NaiveDate,
    /// Hour of day (0-23) the incident occurred in.
    pub hour: u8,
    /// Offense code as published by the source.
    pub offense_code: String,
    /// Source crime type label (e.g. `"Larceny"`).
    pub crime_type: String,
    /// Crime type mapped onto the shared taxonomy.
    pub subcategory: CrimeSubcategory,
    /// Police district, if the source reports one.
    pub district: Option<String>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Typology of the building at or nearest to the incident location.
    pub typology: Option<Typology>,
}

impl CrimeRecord {
    /// Parent category of this record's subcategory.
    #[must_use]
    pub const fn category(&self) -> CrimeCategory {
        self.subcategory.category()
    }

    /// Calendar year the incident occurred in.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.occurred_on.year()
    }

    /// Day of week the incident occurred on.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.occurred_on.weekday()
    }

    /// Returns `(latitude, longitude)` when both are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Returns a copy of this record attributed to `typology`.
    #[must_use]
    pub fn with_typology(&self, typology: Typology) -> Self {
        Self {
            typology: Some(typology),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_subcategory() {
        for category in CrimeCategory::all() {
            assert!(
                CrimeSubcategory::all()
                    .iter()
                    .any(|sub| sub.category() == *category),
                "{category:?} has no subcategories"
            );
        }
    }

    #[test]
    fn typology_classifies_assessor_labels() {
        assert_eq!(Typology::classify("Residential Condo"), Typology::Residential);
        assert_eq!(Typology::classify("Commercial - Retail"), Typology::Retail);
        assert_eq!(Typology::classify("COMMERCIAL"), Typology::Retail);
        assert_eq!(Typology::classify("Office Building"), Typology::Office);
        assert_eq!(Typology::classify("Mixed Use Res/Com"), Typology::MixedUse);
        assert_eq!(Typology::classify("Exempt (Education)"), Typology::Institutional);
        assert_eq!(Typology::classify("Park"), Typology::OpenSpace);
        assert_eq!(Typology::classify("???"), Typology::Other);
    }

    #[test]
    fn typology_parses_case_insensitively() {
        assert_eq!("mixed_use".parse::<Typology>().unwrap(), Typology::MixedUse);
        assert_eq!("RETAIL".parse::<Typology>().unwrap(), Typology::Retail);
    }

    #[test]
    fn with_typology_leaves_original_untouched() {
        let record = CrimeRecord {
            incident_id: "I1".to_string(),
            occurred_on: NaiveDate::from_ymd_opt(2020, 11, 26).unwrap(),
            hour: 14,
            offense_code: "00619".to_string(),
            crime_type: "Larceny".to_string(),
            subcategory: CrimeSubcategory::LarcenyTheft,
            district: None,
            latitude: Some(42.35),
            longitude: Some(-71.06),
            typology: None,
        };

        let tagged = record.with_typology(Typology::Retail);
        assert_eq!(record.typology, None);
        assert_eq!(tagged.typology, Some(Typology::Retail));
        assert_eq!(tagged.weekday(), Weekday::Thu);
        assert_eq!(tagged.year(), 2020);
        assert_eq!(tagged.category(), CrimeCategory::Property);
    }
}
