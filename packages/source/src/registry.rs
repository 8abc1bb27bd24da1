//! Crime schema registry: column layouts embedded from TOML.
//!
//! Each `.toml` file in `packages/source/schemas/` is baked into the binary
//! at compile time via [`include_str!`]. Supporting another city's export
//! means adding a TOML file and listing it below.

use crime_analysis_source_models::CrimeSchema;

use crate::SourceError;

/// TOML schemas embedded at compile time.
const SCHEMA_TOMLS: &[(&str, &str)] = &[
    ("boston", include_str!("../schemas/boston.toml")),
    (
        "boston_typology",
        include_str!("../schemas/boston_typology.toml"),
    ),
    ("denver", include_str!("../schemas/denver.toml")),
];

/// Parses a crime schema from a TOML document.
///
/// # Errors
///
/// Returns [`SourceError::Schema`] if the document is malformed or lacks a
/// required key.
pub fn parse_schema_toml(toml: &str) -> Result<CrimeSchema, SourceError> {
    Ok(toml::from_str(toml)?)
}

/// Returns every built-in schema.
///
/// # Panics
///
/// Panics if an embedded TOML file is malformed.
#[must_use]
pub fn all_schemas() -> Vec<CrimeSchema> {
    SCHEMA_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_schema_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a built-in schema by id.
///
/// # Errors
///
/// Returns [`SourceError::UnknownSchema`] if no schema has that id.
pub fn schema(id: &str) -> Result<CrimeSchema, SourceError> {
    let (_, toml) = SCHEMA_TOMLS
        .iter()
        .find(|(name, _)| *name == id)
        .ok_or_else(|| SourceError::UnknownSchema { id: id.to_string() })?;
    parse_schema_toml(toml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_schemas() {
        let schemas = all_schemas();
        assert_eq!(schemas.len(), SCHEMA_TOMLS.len());
        for schema in &schemas {
            assert!(!schema.crime_type.is_empty(), "{}: no crime_type columns", schema.id);
        }
    }

    #[test]
    fn file_names_match_ids() {
        for (name, toml) in SCHEMA_TOMLS {
            assert_eq!(parse_schema_toml(toml).unwrap().id, *name);
        }
    }

    #[test]
    fn looks_up_by_id() {
        let boston = schema("boston").unwrap();
        assert_eq!(boston.occurred_on, "OCCURRED_ON_DATE");
        assert_eq!(boston.hour.as_deref(), Some("HOUR"));

        let denver = schema("denver").unwrap();
        assert!(denver.hour.is_none());

        assert!(matches!(
            schema("gotham"),
            Err(SourceError::UnknownSchema { .. })
        ));
    }
}
