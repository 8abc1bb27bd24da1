use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Incident counts keyed by `(crime_type, bucket)` over a declared bucket
/// domain.
///
/// Pairs that were never counted read as zero, so [`BucketedSeries::grid`]
/// always produces the complete crime type × bucket matrix. Storage is
/// ordered, which makes the series independent of record order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketedSeries<K: Ord + Clone> {
    domain: BTreeSet<K>,
    crime_types: BTreeSet<String>,
    counts: BTreeMap<(String, K), u64>,
}

/// Returned when a count is added for a bucket outside the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfDomain<K> {
    /// Crime type of the rejected count.
    pub crime_type: String,
    /// The offending bucket.
    pub bucket: K,
}

/// One non-zero cell of a series, used for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCell<K> {
    pub crime_type: String,
    pub bucket: K,
    pub count: u64,
}

impl<K: Ord + Clone> BucketedSeries<K> {
    /// Creates an empty series over `domain`.
    pub fn new(domain: impl IntoIterator<Item = K>) -> Self {
        Self {
            domain: domain.into_iter().collect(),
            crime_types: BTreeSet::new(),
            counts: BTreeMap::new(),
        }
    }

    /// Adds `n` incidents of `crime_type` to `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfDomain`] if `bucket` is not part of the domain; the
    /// series is left unchanged.
    pub fn try_add(&mut self, crime_type: &str, bucket: K, n: u64) -> Result<(), OutOfDomain<K>> {
        if !self.domain.contains(&bucket) {
            return Err(OutOfDomain {
                crime_type: crime_type.to_string(),
                bucket,
            });
        }
        self.crime_types.insert(crime_type.to_string());
        *self
            .counts
            .entry((crime_type.to_string(), bucket))
            .or_insert(0) += n;
        Ok(())
    }

    /// Count for one cell; zero when never observed.
    #[must_use]
    pub fn count(&self, crime_type: &str, bucket: &K) -> u64 {
        self.counts
            .get(&(crime_type.to_string(), bucket.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of every cell.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Sum over all crime types for one bucket.
    #[must_use]
    pub fn bucket_total(&self, bucket: &K) -> u64 {
        self.counts
            .iter()
            .filter(|((_, b), _)| b == bucket)
            .map(|(_, n)| n)
            .sum()
    }

    /// Sum over all buckets for one crime type.
    #[must_use]
    pub fn crime_type_total(&self, crime_type: &str) -> u64 {
        self.counts
            .iter()
            .filter(|((t, _), _)| t == crime_type)
            .map(|(_, n)| n)
            .sum()
    }

    /// The bucket domain in order.
    pub fn buckets(&self) -> impl Iterator<Item = &K> {
        self.domain.iter()
    }

    /// Crime types with at least one counted incident, sorted.
    pub fn crime_types(&self) -> impl Iterator<Item = &str> {
        self.crime_types.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Complete matrix: one row per crime type (sorted), one column per
    /// domain bucket (in order), zero-filled.
    #[must_use]
    pub fn grid(&self) -> Vec<(String, Vec<u64>)> {
        self.crime_types
            .iter()
            .map(|t| {
                let row = self.domain.iter().map(|b| self.count(t, b)).collect();
                (t.clone(), row)
            })
            .collect()
    }

    /// Adds every cell of `other` into `self`, widening the domain to the
    /// union of both.
    pub fn merge(&mut self, other: &Self) {
        self.domain.extend(other.domain.iter().cloned());
        self.crime_types.extend(other.crime_types.iter().cloned());
        for (key, n) in &other.counts {
            *self.counts.entry(key.clone()).or_insert(0) += n;
        }
    }

    /// The `n` crime types with the highest totals, ties broken by name.
    #[must_use]
    pub fn top_crime_types(&self, n: usize) -> Vec<String> {
        let mut totals: Vec<(String, u64)> = self
            .crime_types
            .iter()
            .map(|t| (t.clone(), self.crime_type_total(t)))
            .collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        totals.into_iter().take(n).map(|(t, _)| t).collect()
    }

    /// A copy holding only the given crime types. The domain is kept.
    #[must_use]
    pub fn restricted_to(&self, crime_types: &[String]) -> Self {
        let keep: BTreeSet<&String> = crime_types.iter().collect();
        Self {
            domain: self.domain.clone(),
            crime_types: self
                .crime_types
                .iter()
                .filter(|t| keep.contains(t))
                .cloned()
                .collect(),
            counts: self
                .counts
                .iter()
                .filter(|((t, _), _)| keep.contains(t))
                .map(|(k, n)| (k.clone(), *n))
                .collect(),
        }
    }

    /// Non-zero cells in `(crime_type, bucket)` order.
    #[must_use]
    pub fn cells(&self) -> Vec<SeriesCell<K>> {
        self.counts
            .iter()
            .map(|((t, b), n)| SeriesCell {
                crime_type: t.clone(),
                bucket: b.clone(),
                count: *n,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> BucketedSeries<u8> {
        let mut s = BucketedSeries::new(0..4);
        s.try_add("Larceny", 0, 2).unwrap();
        s.try_add("Larceny", 3, 1).unwrap();
        s.try_add("Fraud", 1, 4).unwrap();
        s
    }

    #[test]
    fn missing_cells_read_as_zero() {
        let s = series();
        assert_eq!(s.count("Larceny", &1), 0);
        assert_eq!(s.count("Arson", &0), 0);
        assert_eq!(s.count("Fraud", &1), 4);
    }

    #[test]
    fn grid_is_complete() {
        let grid = series().grid();
        assert_eq!(
            grid,
            vec![
                ("Fraud".to_string(), vec![0, 4, 0, 0]),
                ("Larceny".to_string(), vec![2, 0, 0, 1]),
            ]
        );
    }

    #[test]
    fn rejects_out_of_domain_bucket() {
        let mut s = series();
        let err = s.try_add("Larceny", 9, 1).unwrap_err();
        assert_eq!(err.bucket, 9);
        assert_eq!(s.total(), 7);
    }

    #[test]
    fn totals() {
        let s = series();
        assert_eq!(s.total(), 7);
        assert_eq!(s.bucket_total(&0), 2);
        assert_eq!(s.crime_type_total("Larceny"), 3);
        assert_eq!(s.top_crime_types(1), vec!["Fraud".to_string()]);
    }

    #[test]
    fn merge_widens_domain_and_sums() {
        let mut a = series();
        let mut b = BucketedSeries::new(3..6);
        b.try_add("Larceny", 3, 2).unwrap();
        b.try_add("Arson", 5, 1).unwrap();
        a.merge(&b);
        assert_eq!(a.buckets().count(), 6);
        assert_eq!(a.count("Larceny", &3), 3);
        assert_eq!(a.count("Arson", &5), 1);
        assert_eq!(a.total(), 10);
    }

    #[test]
    fn restriction_keeps_domain() {
        let s = series().restricted_to(&["Fraud".to_string()]);
        assert_eq!(s.crime_types().collect::<Vec<_>>(), vec!["Fraud"]);
        assert_eq!(s.buckets().count(), 4);
        assert_eq!(s.total(), 4);
    }
}
