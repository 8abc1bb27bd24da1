//! Building parcel CSV loader.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crime_analysis_crime_models::Typology;
use crime_analysis_source_models::{BuildingColumns, BuildingParcel, DatasetKind};

use crate::parsing::parse_lat_lng;
use crate::progress::{ProgressCallback, REPORT_EVERY};
use crate::table::{Header, Row};
use crate::{SourceError, open};

/// Reads building parcels with their typology.
///
/// Assessor exports carry many parcels without a geocoded centroid; those
/// rows cannot take part in nearest-building attribution and are skipped
/// (the count is logged). Non-numeric coordinates are still an error.
///
/// # Errors
///
/// Returns [`SourceError`] if a column is missing or a coordinate is not
/// numeric.
pub fn read_buildings<R: Read>(
    reader: R,
    columns: &BuildingColumns,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<BuildingParcel>, SourceError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = Header::new(DatasetKind::Buildings, csv.headers()?);

    let parcel_id = header.require(&columns.parcel_id)?;
    let latitude = header.require(&columns.latitude)?;
    let longitude = header.require(&columns.longitude)?;
    let typology = header.require(&columns.typology)?;

    let mut parcels = Vec::new();
    let mut unlocated = 0_u64;
    let mut raw = csv::StringRecord::new();
    while csv.read_record(&mut raw)? {
        let row = Row::new(DatasetKind::Buildings, &raw);

        let lat = row.text(&latitude);
        let coordinates = parse_lat_lng(lat, row.text(&longitude)).map_err(|bad| {
            let column = if lat == Some(bad.as_str()) {
                &latitude
            } else {
                &longitude
            };
            row.invalid(column, &bad, "expected a coordinate")
        })?;
        let Some((lat, lng)) = coordinates else {
            unlocated += 1;
            continue;
        };

        parcels.push(BuildingParcel {
            parcel_id: row.required_text(&parcel_id)?.to_string(),
            latitude: lat,
            longitude: lng,
            typology: row.text(&typology).map_or(Typology::Other, Typology::classify),
        });

        if parcels.len() as u64 % REPORT_EVERY == 0 {
            progress.set_position(csv.position().byte());
        }
    }

    if unlocated > 0 {
        log::warn!("Skipped {unlocated} building parcels without coordinates");
    }
    log::info!("Loaded {} building parcels", parcels.len());
    progress.finish(format!("{} building parcels", parcels.len()));

    Ok(parcels)
}

/// Loads building parcels from a CSV file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or parsed.
pub fn load_buildings(
    path: &Path,
    columns: &BuildingColumns,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<BuildingParcel>, SourceError> {
    log::info!("Reading building parcels from {}", path.display());
    let (file, len) = open(path)?;
    progress.set_total(len);
    read_buildings(file, columns, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    #[test]
    fn reads_parcels_and_skips_unlocated() {
        let csv = "\
PID,LATITUDE,LONGITUDE,TYPOLOGY
0100001000,42.3796,-71.0322,Residential Condo
0100002000,,,Commercial
0100003000,42.3801,-71.0330,Office
0100004000,42.3802,-71.0331,
";
        let parcels =
            read_buildings(csv.as_bytes(), &BuildingColumns::default(), &null_progress()).unwrap();
        assert_eq!(parcels.len(), 3);
        assert_eq!(parcels[0].typology, Typology::Residential);
        assert_eq!(parcels[1].typology, Typology::Office);
        assert_eq!(parcels[2].typology, Typology::Other);
    }

    #[test]
    fn rejects_bad_coordinate() {
        let csv = "PID,LATITUDE,LONGITUDE,TYPOLOGY\n1,north,-71.0,Office\n";
        let err = read_buildings(csv.as_bytes(), &BuildingColumns::default(), &null_progress())
            .unwrap_err();
        assert!(
            matches!(err, SourceError::InvalidField { ref column, .. } if column == "LATITUDE"),
            "{err}"
        );
    }
}
