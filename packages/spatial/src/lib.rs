#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for building typology attribution.
//!
//! Parcel centroids are projected onto a local flat plane (metres around
//! the mean latitude of the parcels) and bulk-loaded into an R-tree. Each
//! located crime takes the typology of its nearest parcel, provided that
//! parcel is within a maximum distance.

use crime_analysis_crime_models::{CrimeRecord, Typology};
use crime_analysis_source_models::BuildingParcel;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// Metres per degree of latitude.
const METERS_PER_DEGREE_LAT: f64 = 110_574.0;
/// Metres per degree of longitude at the equator.
const METERS_PER_DEGREE_LNG: f64 = 111_320.0;

/// A parcel centroid stored in the R-tree.
struct ParcelEntry {
    parcel_id: String,
    typology: Typology,
    point: [f64; 2],
}

impl RTreeObject for ParcelEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for ParcelEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx.mul_add(dx, dy * dy)
    }
}

/// The parcel nearest to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestBuilding<'a> {
    pub parcel_id: &'a str,
    pub typology: Typology,
    pub distance_m: f64,
}

/// Equirectangular projection centred on a reference latitude.
#[derive(Debug, Clone, Copy)]
struct LocalProjection {
    lng_scale: f64,
}

impl LocalProjection {
    fn centred_on(latitude: f64) -> Self {
        Self {
            lng_scale: METERS_PER_DEGREE_LNG * latitude.to_radians().cos(),
        }
    }

    fn project(self, lat: f64, lng: f64) -> [f64; 2] {
        [lng * self.lng_scale, lat * METERS_PER_DEGREE_LAT]
    }
}

/// Pre-built R-tree over building parcel centroids.
pub struct BuildingIndex {
    parcels: RTree<ParcelEntry>,
    projection: LocalProjection,
}

impl BuildingIndex {
    /// Builds the index from loaded parcels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(parcels: &[BuildingParcel]) -> Self {
        let reference_lat = if parcels.is_empty() {
            0.0
        } else {
            parcels.iter().map(|p| p.latitude).sum::<f64>() / parcels.len() as f64
        };
        let projection = LocalProjection::centred_on(reference_lat);

        let entries = parcels
            .iter()
            .map(|p| ParcelEntry {
                parcel_id: p.parcel_id.clone(),
                typology: p.typology,
                point: projection.project(p.latitude, p.longitude),
            })
            .collect();

        let parcels = RTree::bulk_load(entries);
        log::info!("Loaded {} building parcels into spatial index", parcels.size());

        Self {
            parcels,
            projection,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parcels.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parcels.size() == 0
    }

    /// The parcel closest to `(lat, lng)`, at any distance.
    #[must_use]
    pub fn nearest(&self, lat: f64, lng: f64) -> Option<NearestBuilding<'_>> {
        let query = self.projection.project(lat, lng);
        self.parcels.nearest_neighbor(&query).map(|entry| NearestBuilding {
            parcel_id: &entry.parcel_id,
            typology: entry.typology,
            distance_m: entry.distance_2(&query).sqrt(),
        })
    }

    /// The parcel closest to `(lat, lng)` if it lies within `max_distance_m`.
    #[must_use]
    pub fn nearest_within(
        &self,
        lat: f64,
        lng: f64,
        max_distance_m: f64,
    ) -> Option<NearestBuilding<'_>> {
        self.nearest(lat, lng)
            .filter(|n| n.distance_m <= max_distance_m)
    }
}

/// Outcome of [`assign_typology`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypologyAssignment {
    /// One output record per input record, in input order.
    pub records: Vec<CrimeRecord>,
    /// Records that took a typology from a nearby parcel.
    pub matched: usize,
    /// Records that already carried a typology.
    pub preassigned: usize,
    /// Records without coordinates.
    pub unlocated: usize,
    /// Records whose nearest parcel was beyond the distance limit.
    pub too_far: usize,
}

/// Attributes each located crime to its nearest building's typology.
///
/// Records that already have a typology are passed through. Records left
/// unmatched keep `typology: None`.
#[must_use]
pub fn assign_typology(
    records: &[CrimeRecord],
    index: &BuildingIndex,
    max_distance_m: f64,
) -> TypologyAssignment {
    let mut assignment = TypologyAssignment {
        records: Vec::with_capacity(records.len()),
        matched: 0,
        preassigned: 0,
        unlocated: 0,
        too_far: 0,
    };

    for record in records {
        if record.typology.is_some() {
            assignment.preassigned += 1;
            assignment.records.push(record.clone());
            continue;
        }
        let Some((lat, lng)) = record.coordinates() else {
            assignment.unlocated += 1;
            assignment.records.push(record.clone());
            continue;
        };
        match index.nearest_within(lat, lng, max_distance_m) {
            Some(building) => {
                assignment.matched += 1;
                assignment.records.push(record.with_typology(building.typology));
            }
            None => {
                assignment.too_far += 1;
                assignment.records.push(record.clone());
            }
        }
    }

    log::info!(
        "Typology attribution: {} matched, {} preassigned, {} unlocated, {} beyond {max_distance_m} m",
        assignment.matched,
        assignment.preassigned,
        assignment.unlocated,
        assignment.too_far,
    );
    assignment
}
