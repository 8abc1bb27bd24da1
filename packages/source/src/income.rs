//! Income-by-area CSV loader.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crime_analysis_source_models::{DatasetKind, IncomeArea, IncomeColumns};

use crate::progress::ProgressCallback;
use crate::table::{Header, Row};
use crate::{SourceError, open};

/// Reads median household income per area.
///
/// # Errors
///
/// Returns [`SourceError`] if a column is missing or a row lacks an area or
/// a numeric income.
pub fn read_income<R: Read>(
    reader: R,
    columns: &IncomeColumns,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<IncomeArea>, SourceError> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = Header::new(DatasetKind::Income, csv.headers()?);

    let area = header.require(&columns.area)?;
    let median_income = header.require(&columns.median_income)?;
    let population = header.configured(columns.population.as_ref())?;

    let mut areas = Vec::new();
    for result in csv.records() {
        let raw = result?;
        let row = Row::new(DatasetKind::Income, &raw);

        let income = row
            .number::<f64>(&median_income)?
            .ok_or_else(|| row.invalid(&median_income, "", "value is required"))?;

        areas.push(IncomeArea {
            area: row.required_text(&area)?.to_string(),
            median_income: income,
            population: population
                .as_ref()
                .map(|c| row.number::<u64>(c))
                .transpose()?
                .flatten(),
        });
    }

    log::info!("Loaded income statistics for {} areas", areas.len());
    progress.finish(format!("{} income areas", areas.len()));

    Ok(areas)
}

/// Loads income statistics from a CSV file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or parsed.
pub fn load_income(
    path: &Path,
    columns: &IncomeColumns,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<IncomeArea>, SourceError> {
    log::info!("Reading income statistics from {}", path.display());
    let (file, len) = open(path)?;
    progress.set_total(len);
    read_income(file, columns, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    #[test]
    fn reads_currency_formatted_income() {
        let csv = "\
DISTRICT,MEDIAN_HOUSEHOLD_INCOME,POPULATION
D14,\"$78,512\",\"71,216\"
B2,41250,
";
        let areas = read_income(csv.as_bytes(), &IncomeColumns::default(), &null_progress())
            .unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].area, "D14");
        assert!((areas[0].median_income - 78_512.0).abs() < f64::EPSILON);
        assert_eq!(areas[0].population, Some(71_216));
        assert_eq!(areas[1].population, None);
    }

    #[test]
    fn income_is_required() {
        let csv = "DISTRICT,MEDIAN_HOUSEHOLD_INCOME,POPULATION\nD14,,100\n";
        assert!(
            read_income(csv.as_bytes(), &IncomeColumns::default(), &null_progress()).is_err()
        );
    }

    #[test]
    fn custom_columns() {
        let csv = "Neighborhood,Income\nRoxbury,32000\n";
        let columns = IncomeColumns {
            area: "Neighborhood".to_string(),
            median_income: "Income".to_string(),
            population: None,
        };
        let areas = read_income(csv.as_bytes(), &columns, &null_progress()).unwrap();
        assert_eq!(areas[0].area, "Roxbury");
    }
}
