use serde::{Deserialize, Serialize};

/// One `(crime_type, bucket)` cell compared across two series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow<K> {
    pub crime_type: String,
    pub bucket: K,
    pub before: u64,
    pub after: u64,
    /// `after - before`.
    pub delta: i64,
    /// Relative change in percent; `None` when `before` is zero.
    pub percent_change: Option<f64>,
    /// The cell's share of the whole "before" series, in percent.
    pub share_before_pct: f64,
    /// The cell's share of the whole "after" series, in percent.
    pub share_after_pct: f64,
    /// `share_after_pct - share_before_pct`, in percentage points.
    pub share_delta_pp: f64,
}

/// Cell-by-cell comparison of two bucketed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTable<K> {
    pub before_label: String,
    pub after_label: String,
    pub before_total: u64,
    pub after_total: u64,
    /// Union of both bucket domains, in order.
    pub buckets: Vec<K>,
    /// One per crime type and bucket, sorted by crime type, then bucket.
    pub rows: Vec<ComparisonRow<K>>,
}

impl<K: PartialEq> ComparisonTable<K> {
    /// Finds the row for one cell.
    #[must_use]
    pub fn row(&self, crime_type: &str, bucket: &K) -> Option<&ComparisonRow<K>> {
        self.rows
            .iter()
            .find(|r| r.crime_type == crime_type && &r.bucket == bucket)
    }

    /// The `n` rows with the largest absolute share shift.
    #[must_use]
    pub fn largest_shifts(&self, n: usize) -> Vec<&ComparisonRow<K>> {
        let mut rows: Vec<&ComparisonRow<K>> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.share_delta_pp.abs().total_cmp(&a.share_delta_pp.abs()));
        rows.truncate(n);
        rows
    }
}
