//! Daily weather observation CSV loader (NOAA GHCN-Daily export).

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crime_analysis_source_models::{DatasetKind, WeatherColumns, WeatherObservation};

use crate::parsing::parse_date;
use crate::progress::ProgressCallback;
use crate::table::{Column, Header, Row};
use crate::{SourceError, open};

/// Reads daily weather observations.
///
/// Stations that do not report `TAVG` for a day get the midpoint of `TMAX`
/// and `TMIN` when both are present.
///
/// # Errors
///
/// Returns [`SourceError`] if the date column is missing or a row has an
/// unparseable date or measurement.
pub fn read_weather<R: Read>(
    reader: R,
    columns: &WeatherColumns,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<WeatherObservation>, SourceError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = Header::new(DatasetKind::Weather, csv.headers()?);

    let date = header.require(&columns.date)?;
    let precipitation = header.optional(&columns.precipitation);
    let snowfall = header.optional(&columns.snowfall);
    let avg = header.optional(&columns.avg_temperature);
    let max = header.optional(&columns.max_temperature);
    let min = header.optional(&columns.min_temperature);
    if avg.is_none() && (max.is_none() || min.is_none()) {
        return Err(SourceError::MissingColumn {
            dataset: DatasetKind::Weather,
            column: columns.avg_temperature.clone(),
        });
    }

    let mut observations = Vec::new();
    for result in csv.records() {
        let raw = result?;
        let row = Row::new(DatasetKind::Weather, &raw);

        let raw_date = row.required_text(&date)?;
        let day =
            parse_date(raw_date).ok_or_else(|| row.invalid(&date, raw_date, "expected a date"))?;

        let measure = |column: Option<&Column>| -> Result<Option<f64>, SourceError> {
            column.map_or(Ok(None), |c| row.number::<f64>(c))
        };

        let avg_temperature = match measure(avg.as_ref())? {
            Some(t) => Some(t),
            None => match (measure(max.as_ref())?, measure(min.as_ref())?) {
                (Some(hi), Some(lo)) => Some((hi + lo) / 2.0),
                _ => None,
            },
        };

        observations.push(WeatherObservation {
            date: day,
            precipitation: measure(precipitation.as_ref())?,
            snowfall: measure(snowfall.as_ref())?,
            avg_temperature,
        });
    }

    log::info!("Loaded {} daily weather observations", observations.len());
    progress.finish(format!("{} weather observations", observations.len()));

    Ok(observations)
}

/// Loads daily weather observations from a CSV file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or parsed.
pub fn load_weather(
    path: &Path,
    columns: &WeatherColumns,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<WeatherObservation>, SourceError> {
    log::info!("Reading weather observations from {}", path.display());
    let (file, len) = open(path)?;
    progress.set_total(len);
    read_weather(file, columns, progress)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::progress::null_progress;

    #[test]
    fn reads_noaa_export() {
        let csv = "\
\"STATION\",\"NAME\",\"DATE\",\"PRCP\",\"SNOW\",\"TAVG\",\"TMAX\",\"TMIN\"
\"USW00014739\",\"BOSTON, MA US\",\"2016-08-09\",\"0.00\",\"0.0\",\"26\",\"30\",\"22\"
\"USW00014739\",\"BOSTON, MA US\",\"2016-08-10\",\"0.40\",,,\"80\",\"70\"
";
        let obs = read_weather(csv.as_bytes(), &WeatherColumns::default(), &null_progress())
            .unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2016, 8, 9).unwrap());
        assert_eq!(obs[0].avg_temperature, Some(26.0));
        assert_eq!(obs[0].precipitation, Some(0.0));
        assert_eq!(obs[1].snowfall, None);
        assert_eq!(obs[1].avg_temperature, Some(75.0));
    }

    #[test]
    fn requires_some_temperature_column() {
        let csv = "DATE,PRCP\n2016-08-09,0.1\n";
        let err = read_weather(csv.as_bytes(), &WeatherColumns::default(), &null_progress())
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { .. }));
    }

    #[test]
    fn rejects_non_numeric_measurement() {
        let csv = "DATE,PRCP,TAVG\n2016-08-09,T,50\n";
        let err = read_weather(csv.as_bytes(), &WeatherColumns::default(), &null_progress())
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidField { .. }));
    }
}
