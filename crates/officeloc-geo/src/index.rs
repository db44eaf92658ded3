//! R-tree over office bounding boxes

use std::collections::HashMap;

use geo::{BoundingRect, Point, Polygon};
use officeloc_core::models::OfficeId;
use rstar::{RTree, RTreeObject, AABB};

/// An office bounding box stored in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedOffice {
    pub id: OfficeId,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedOffice {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Candidate lookup for point-in-office queries.
///
/// Only prefilters by bounding box; callers still run the exact predicate.
pub struct OfficeIndex {
    tree: RTree<IndexedOffice>,
    envelopes: HashMap<OfficeId, AABB<[f64; 2]>>,
}

impl OfficeIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new(), envelopes: HashMap::new() }
    }

    /// Insert or replace the entry for `id`
    pub fn insert(&mut self, id: OfficeId, polygon: &Polygon<f64>) {
        self.remove(id);

        let Some(rect) = polygon.bounding_rect() else {
            return;
        };
        let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

        self.tree.insert(IndexedOffice { id, envelope });
        self.envelopes.insert(id, envelope);
    }

    /// Remove the entry for `id`, returning whether there was one
    pub fn remove(&mut self, id: OfficeId) -> bool {
        match self.envelopes.remove(&id) {
            Some(envelope) => self.tree.remove(&IndexedOffice { id, envelope }).is_some(),
            None => false,
        }
    }

    /// Ids whose box lies within `tolerance` of the point, ascending
    pub fn candidates(&self, point: &Point<f64>, tolerance: f64) -> Vec<OfficeId> {
        let search = AABB::from_corners(
            [point.x() - tolerance, point.y() - tolerance],
            [point.x() + tolerance, point.y() + tolerance],
        );

        let mut ids: Vec<OfficeId> =
            self.tree.locate_in_envelope_intersecting(&search).map(|entry| entry.id).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }
}

impl Default for OfficeIndex {
    fn default() -> Self {
        Self::new()
    }
}
