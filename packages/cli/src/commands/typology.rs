//! Where crime happens: the building-type mix before and after.

use std::collections::BTreeMap;

use crime_analysis_analytics::bucketing::{CrimeLabel, aggregate_by};
use crime_analysis_analytics::comparison::compare;
use crime_analysis_analytics_models::{BucketedSeries, ComparisonTable};
use crime_analysis_chart::heatmap::{write_count_heatmap, write_shift_heatmap};
use crime_analysis_crime_models::{CrimeRecord, Typology};
use crime_analysis_spatial::{BuildingIndex, assign_typology};
use serde::Serialize;

use super::{Context, Label};
use crate::data::{self, City};
use crate::report;

/// Options for [`run`].
#[derive(Debug, Clone, Copy)]
pub struct TypologyOptions {
    pub before_year: i32,
    pub after_year: i32,
    pub label: Label,
}

/// One typology's share of a year's located incidents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct MixEntry {
    typology: Typology,
    before: u64,
    after: u64,
    share_before_pct: f64,
    share_after_pct: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TypologySummary {
    before_year: i32,
    after_year: i32,
    /// Incidents without a typology, per year.
    unattributed: BTreeMap<i32, usize>,
    mix: Vec<MixEntry>,
    table: ComparisonTable<Typology>,
}

/// Compares the building typologies incidents occurred at in two years.
///
/// Incidents take their typology from the crime CSV when it has one,
/// otherwise from the nearest building parcel.
///
/// # Errors
///
/// Returns an error if the years are equal, a dataset cannot be loaded, or
/// an output cannot be written.
pub fn run(ctx: &Context, options: TypologyOptions) -> Result<(), Box<dyn std::error::Error>> {
    let TypologyOptions {
        before_year,
        after_year,
        label,
    } = options;
    if before_year == after_year {
        return Err(format!("before and after year are both {before_year}").into());
    }

    let crimes: Vec<CrimeRecord> = data::crimes(&ctx.config, &ctx.multi, City::Boston)?
        .into_iter()
        .filter(|r| r.year() == before_year || r.year() == after_year)
        .collect();
    let crimes = attribute(ctx, crimes)?;

    let mut unattributed = BTreeMap::new();
    let mut series = |year: i32| {
        let records: Vec<&CrimeRecord> = crimes
            .iter()
            .filter(|r| r.year() == year)
            .filter(|r| r.typology.is_some())
            .collect();
        let missing = crimes
            .iter()
            .filter(|r| r.year() == year && r.typology.is_none())
            .count();
        unattributed.insert(year, missing);
        aggregate_by(
            records,
            Typology::all().iter().copied(),
            "typology",
            CrimeLabel::from(label),
            |r| r.typology.unwrap_or(Typology::Other),
        )
    };
    let before = series(before_year)?;
    let after = series(after_year)?;

    let mix = typology_mix(&before, &after);
    println!(
        "Boston incidents by building typology, {before_year} vs {after_year}"
    );
    println!(
        "{:<14} {:>8} {:>8} {:>9} {:>9}",
        "TYPOLOGY", before_year, after_year, "SHARE", "SHARE"
    );
    for entry in &mix {
        println!(
            "{:<14} {:>8} {:>8} {:>8.1}% {:>8.1}%",
            entry.typology.to_string(),
            entry.before,
            entry.after,
            entry.share_before_pct,
            entry.share_after_pct,
        );
    }

    let (before_label, after_label) = (before_year.to_string(), after_year.to_string());
    let table = compare(&before, &after, &before_label, &after_label);

    let top: Vec<String> = {
        let mut merged = before.clone();
        merged.merge(&after);
        merged.top_crime_types(ctx.config.report.top_crime_types)
    };
    let stem = format!("typology_{before_year}_{after_year}");
    write_count_heatmap(
        &ctx.output_path(&format!("{stem}_counts.svg")),
        &format!("Incidents by building typology, {after_year}"),
        &after.restricted_to(&top),
    )?;
    write_shift_heatmap(
        &ctx.output_path(&format!("{stem}.svg")),
        &format!("Share shift by building typology, {before_year} to {after_year} (pp)"),
        &compare(
            &before.restricted_to(&top),
            &after.restricted_to(&top),
            &before_label,
            &after_label,
        ),
    )?;

    report::write_summary(
        ctx.output_dir(),
        &stem,
        &TypologySummary {
            before_year,
            after_year,
            unattributed,
            mix,
            table,
        },
    )?;
    Ok(())
}

/// Fills in missing typologies from the nearest building parcel.
///
/// The parcel file is only read when some incident lacks a typology.
fn attribute(
    ctx: &Context,
    crimes: Vec<CrimeRecord>,
) -> Result<Vec<CrimeRecord>, Box<dyn std::error::Error>> {
    if crimes.iter().all(|r| r.typology.is_some()) {
        log::info!("Every incident already carries a building typology");
        return Ok(crimes);
    }

    let parcels = data::buildings(&ctx.config, &ctx.multi)?;
    let index = BuildingIndex::new(&parcels);
    if index.is_empty() {
        log::warn!("Building parcel file is empty; incidents stay unattributed");
        return Ok(crimes);
    }

    let assignment = assign_typology(&crimes, &index, ctx.config.typology.max_distance_m);
    Ok(assignment.records)
}

/// Per-typology totals and shares for both years.
#[allow(clippy::cast_precision_loss)]
fn typology_mix(before: &BucketedSeries<Typology>, after: &BucketedSeries<Typology>) -> Vec<MixEntry> {
    let share = |n: u64, total: u64| {
        if total == 0 {
            0.0
        } else {
            n as f64 / total as f64 * 100.0
        }
    };
    Typology::all()
        .iter()
        .map(|&typology| {
            let b = before.bucket_total(&typology);
            let a = after.bucket_total(&typology);
            MixEntry {
                typology,
                before: b,
                after: a,
                share_before_pct: share(b, before.total()),
                share_after_pct: share(a, after.total()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_shares_sum_per_year() {
        let domain = Typology::all().iter().copied();
        let mut before = BucketedSeries::new(domain.clone());
        before.try_add("Larceny", Typology::Retail, 3).unwrap();
        before.try_add("Assault", Typology::Residential, 1).unwrap();
        let mut after = BucketedSeries::new(domain);
        after.try_add("Larceny", Typology::Residential, 2).unwrap();

        let mix = typology_mix(&before, &after);
        assert_eq!(mix.len(), Typology::all().len());

        let retail = mix.iter().find(|m| m.typology == Typology::Retail).unwrap();
        assert_eq!((retail.before, retail.after), (3, 0));
        assert!((retail.share_before_pct - 75.0).abs() < 1e-9);

        let residential = mix
            .iter()
            .find(|m| m.typology == Typology::Residential)
            .unwrap();
        assert!((residential.share_after_pct - 100.0).abs() < 1e-9);

        let total: f64 = mix.iter().map(|m| m.share_before_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
