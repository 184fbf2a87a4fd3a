#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for point-radius lookups.
//!
//! Incident positions are bulk-loaded into an R-tree keyed by their index in
//! the caller's slice. Radius queries use degree-space Euclidean distance,
//! which is what hotspot detection uses to decide zone membership.

use patrol_map_geography_models::Coordinate;
use rstar::RTree;
use rstar::primitives::GeomWithData;

/// A point in the R-tree tagged with the index of the source item.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree over a set of coordinates.
///
/// Built once per analysis pass and borrowed by every centroid query.
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Builds an index over `points`. Query results refer back to positions
    /// in this iterator.
    #[must_use]
    pub fn build<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let entries: Vec<IndexedPoint> = points
            .into_iter()
            .enumerate()
            .map(|(idx, c)| GeomWithData::new([c.lat, c.lng], idx))
            .collect();

        log::debug!("Building point index over {} entries", entries.len());

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices of all points within `radius` degrees of `center`
    /// (inclusive), in ascending index order.
    ///
    /// The R-tree returns matches in arbitrary order; sorting restores the
    /// caller's original ordering so "first encountered" tie-breaks stay
    /// stable.
    #[must_use]
    pub fn within_radius(&self, center: Coordinate, radius: f64) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .tree
            .locate_within_distance([center.lat, center.lng], radius * radius)
            .map(|entry| entry.data)
            .collect();
        hits.sort_unstable();
        hits
    }
}
