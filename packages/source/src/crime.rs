//! Crime incident CSV loader.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::Timelike as _;
use crime_analysis_crime_models::{CrimeRecord, Typology};
use crime_analysis_source_models::{CrimeSchema, DatasetKind};

use crate::parsing::{parse_lat_lng, parse_timestamp};
use crate::progress::{ProgressCallback, REPORT_EVERY};
use crate::table::{Column, Header, Row};
use crate::type_mapping::map_crime_type;
use crate::{SourceError, open};

/// Resolved column indexes for one crime CSV.
struct CrimeColumns {
    incident_id: Column,
    offense_code: Column,
    crime_type: Vec<Column>,
    occurred_on: Column,
    hour: Option<Column>,
    district: Option<Column>,
    /// Latitude and longitude, resolved only when the schema names both.
    coordinates: Option<(Column, Column)>,
    typology: Option<Column>,
}

impl CrimeColumns {
    fn resolve(header: &Header, schema: &CrimeSchema) -> Result<Self, SourceError> {
        // At least one label column must exist; the rest are fallbacks.
        let crime_type: Vec<Column> = schema
            .crime_type
            .iter()
            .filter_map(|c| header.optional(c))
            .collect();
        if crime_type.is_empty() {
            return Err(SourceError::MissingColumn {
                dataset: DatasetKind::Crime,
                column: schema.crime_type.join(" | "),
            });
        }

        Ok(Self {
            incident_id: header.require(&schema.incident_id)?,
            offense_code: header.require(&schema.offense_code)?,
            crime_type,
            occurred_on: header.require(&schema.occurred_on)?,
            hour: header.configured(schema.hour.as_ref())?,
            district: header.configured(schema.district.as_ref())?,
            coordinates: header
                .configured(schema.latitude.as_ref())?
                .zip(header.configured(schema.longitude.as_ref())?),
            typology: header.configured(schema.typology.as_ref())?,
        })
    }

    fn parse(&self, row: &Row<'_>) -> Result<CrimeRecord, SourceError> {
        let raw_date = row.required_text(&self.occurred_on)?;
        let occurred = parse_timestamp(raw_date).ok_or_else(|| {
            row.invalid(&self.occurred_on, raw_date, "unrecognised date/time format")
        })?;

        let hour = match &self.hour {
            Some(column) => {
                let hour = row
                    .number::<u8>(column)?
                    .ok_or_else(|| row.invalid(column, "", "value is required"))?;
                if hour > 23 {
                    return Err(row.invalid(column, &hour.to_string(), "hour must be 0-23"));
                }
                hour
            }
            // chrono guarantees 0-23
            None => u8::try_from(occurred.hour()).unwrap_or_default(),
        };

        let crime_type = self
            .crime_type
            .iter()
            .find_map(|c| row.text(c))
            .ok_or_else(|| row.invalid(&self.crime_type[0], "", "no crime type label"))?;

        let coordinates = match &self.coordinates {
            Some((lat_column, lng_column)) => {
                let lat = row.text(lat_column);
                parse_lat_lng(lat, row.text(lng_column)).map_err(|bad| {
                    let column = if lat == Some(bad.as_str()) {
                        lat_column
                    } else {
                        lng_column
                    };
                    row.invalid(column, &bad, "expected a coordinate")
                })?
            }
            None => None,
        };

        Ok(CrimeRecord {
            incident_id: row.required_text(&self.incident_id)?.to_string(),
            occurred_on: occurred.date(),
            hour,
            offense_code: row.text(&self.offense_code).unwrap_or_default().to_string(),
            crime_type: crime_type.to_string(),
            subcategory: map_crime_type(crime_type),
            district: self
                .district
                .as_ref()
                .and_then(|c| row.text(c))
                .map(str::to_string),
            latitude: coordinates.map(|(lat, _)| lat),
            longitude: coordinates.map(|(_, lng)| lng),
            typology: self
                .typology
                .as_ref()
                .and_then(|c| row.text(c))
                .map(Typology::classify),
        })
    }
}

/// Reads crime incidents from CSV laid out per `schema`.
///
/// # Errors
///
/// Returns [`SourceError`] if a schema column is missing from the header or
/// any row holds an unparseable date, hour, or coordinate.
pub fn read_crimes<R: Read>(
    reader: R,
    schema: &CrimeSchema,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<CrimeRecord>, SourceError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = Header::new(DatasetKind::Crime, csv.headers()?);
    let columns = CrimeColumns::resolve(&header, schema)?;

    let mut records = Vec::new();
    let mut raw = csv::StringRecord::new();
    while csv.read_record(&mut raw)? {
        let row = Row::new(DatasetKind::Crime, &raw);
        records.push(columns.parse(&row)?);

        if records.len() as u64 % REPORT_EVERY == 0 {
            progress.set_position(csv.position().byte());
        }
    }

    log::info!(
        "[{}] Loaded {} crime records",
        schema.id,
        records.len()
    );
    progress.finish(format!("[{}] {} crime records", schema.id, records.len()));

    Ok(records)
}

/// Loads crime incidents from a CSV file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or parsed.
pub fn load_crimes(
    path: &Path,
    schema: &CrimeSchema,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<CrimeRecord>, SourceError> {
    log::info!("[{}] Reading {}", schema.id, path.display());
    let (file, len) = open(path)?;
    progress.set_total(len);
    read_crimes(file, schema, progress)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crime_analysis_crime_models::CrimeSubcategory;

    use super::*;
    use crate::progress::null_progress;
    use crate::registry::schema;

    const BOSTON: &str = "\
INCIDENT_NUMBER,OFFENSE_CODE,OFFENSE_CODE_GROUP,OFFENSE_DESCRIPTION,DISTRICT,OCCURRED_ON_DATE,HOUR,Lat,Long
I182070945,619,Larceny,LARCENY ALL OTHERS,D14,2018-09-02 13:00:00,13,42.35779134,-71.13937053
I182070943,1402,,VANDALISM,C11,2018-08-21 00:00:00,0,0,0
I182070941,3410,Towed,TOWED MOTOR VEHICLE,,2018-09-03 19:27:00,19,-1,-1
";

    #[test]
    fn reads_boston_extract() {
        let records =
            read_crimes(BOSTON.as_bytes(), &schema("boston").unwrap(), &null_progress()).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.incident_id, "I182070945");
        assert_eq!(first.crime_type, "Larceny");
        assert_eq!(first.subcategory, CrimeSubcategory::LarcenyTheft);
        assert_eq!(first.occurred_on, NaiveDate::from_ymd_opt(2018, 9, 2).unwrap());
        assert_eq!(first.hour, 13);
        assert_eq!(first.district.as_deref(), Some("D14"));
        assert!(first.coordinates().is_some());

        // Empty OFFENSE_CODE_GROUP falls back to the description column.
        assert_eq!(records[1].crime_type, "VANDALISM");
        assert_eq!(records[1].subcategory, CrimeSubcategory::Vandalism);
        assert!(records[1].coordinates().is_none());

        assert_eq!(records[2].district, None);
        assert!(records[2].coordinates().is_none());
    }

    #[test]
    fn derives_hour_from_timestamp_when_no_hour_column() {
        let csv = "\
INCIDENT_ID,OFFENSE_CODE,OFFENSE_CATEGORY_ID,FIRST_OCCURRENCE_DATE,DISTRICT_ID,GEO_LAT,GEO_LON
2016376978,2399,larceny,6/15/2016 11:31:00 PM,5,39.7732,-104.8080
";
        let records =
            read_crimes(csv.as_bytes(), &schema("denver").unwrap(), &null_progress()).unwrap();
        assert_eq!(records[0].hour, 23);
        assert_eq!(records[0].crime_type, "larceny");
    }

    #[test]
    fn reads_typology_column() {
        let csv = "\
INCIDENT_NUMBER,OFFENSE_CODE,OFFENSE_CODE_GROUP,OFFENSE_DESCRIPTION,DISTRICT,OCCURRED_ON_DATE,HOUR,Lat,Long,TYPOLOGY
I1,619,Larceny,,D14,2019-03-01 10:00:00,10,42.35,-71.13,Commercial - Retail
";
        let records = read_crimes(
            csv.as_bytes(),
            &schema("boston_typology").unwrap(),
            &null_progress(),
        )
        .unwrap();
        assert_eq!(records[0].typology, Some(Typology::Retail));
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "INCIDENT_NUMBER,OFFENSE_CODE,OFFENSE_CODE_GROUP\nI1,619,Larceny\n";
        let err =
            read_crimes(csv.as_bytes(), &schema("boston").unwrap(), &null_progress()).unwrap_err();
        assert!(
            matches!(err, SourceError::MissingColumn { ref column, .. } if column == "OCCURRED_ON_DATE"),
            "{err}"
        );
    }

    #[test]
    fn out_of_range_hour_fails() {
        let csv = "\
INCIDENT_NUMBER,OFFENSE_CODE,OFFENSE_CODE_GROUP,OFFENSE_DESCRIPTION,DISTRICT,OCCURRED_ON_DATE,HOUR,Lat,Long
I1,619,Larceny,,D14,2018-09-02 13:00:00,24,,
";
        let err =
            read_crimes(csv.as_bytes(), &schema("boston").unwrap(), &null_progress()).unwrap_err();
        assert!(
            matches!(err, SourceError::InvalidField { line: 2, ref column, .. } if column == "HOUR"),
            "{err}"
        );
    }

    #[test]
    fn bad_date_fails() {
        let csv = "\
INCIDENT_NUMBER,OFFENSE_CODE,OFFENSE_CODE_GROUP,OFFENSE_DESCRIPTION,DISTRICT,OCCURRED_ON_DATE,HOUR,Lat,Long
I1,619,Larceny,,D14,yesterday,1,,
";
        let err =
            read_crimes(csv.as_bytes(), &schema("boston").unwrap(), &null_progress()).unwrap_err();
        assert!(matches!(err, SourceError::InvalidField { .. }), "{err}");
    }

    #[test]
    fn missing_file_fails_with_path() {
        let err = load_crimes(
            Path::new("/nonexistent/crime.csv"),
            &schema("boston").unwrap(),
            &null_progress(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/crime.csv"));
    }
}
