//! Turn an invalid polygon into a valid single polygon
//!
//! Each ring is noded at its self-intersections and cut into simple loops.
//! The loops are unioned so area enclosed by any of them is kept; when the
//! union falls apart into several pieces the largest one becomes the repaired
//! shell. Holes survive only when the repaired polygon stays valid with them.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::orient::Direction;
use geo::{unary_union, Area, Coord, LineString, Orient, Polygon};
use officeloc_core::error::{OfficelocError, Result};

use crate::validation::{
    adjacent, is_finite, is_valid, open_ring, ring_segments, signed_area, validate_polygon,
};

/// Repair `polygon`, returning it untouched when it is already valid.
///
/// Fails with [`OfficelocError::InvalidGeometry`] when the coordinates are not
/// finite or nothing with a positive area is left of the exterior.
pub fn make_valid(polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
    if !is_finite(polygon) {
        return Err(OfficelocError::InvalidGeometry {
            reason: "Polygon contains non-finite coordinates".to_string(),
        });
    }

    if is_valid(polygon) {
        return Ok(polygon.clone());
    }

    let shell = repair_ring(polygon.exterior()).ok_or_else(|| {
        OfficelocError::InvalidGeometry {
            reason: "Exterior ring collapses to zero area".to_string(),
        }
    })?;

    let check = validate_polygon(&shell);
    if !check.is_valid {
        return Err(OfficelocError::InvalidGeometry {
            reason: check.first_reason().unwrap_or("Exterior ring is invalid").to_string(),
        });
    }

    let (exterior, mut holes) = shell.into_inner();
    for (i, interior) in polygon.interiors().iter().enumerate() {
        let Some(hole) = repair_ring(interior) else {
            tracing::debug!("Dropping collapsed interior ring {}", i);
            continue;
        };

        let mut candidate = holes.clone();
        candidate.push(hole.exterior().clone());
        if is_valid(&Polygon::new(exterior.clone(), candidate.clone())) {
            holes = candidate;
        } else {
            tracing::debug!("Dropping interior ring {} that does not fit the exterior", i);
        }
    }

    Ok(Polygon::new(exterior, holes))
}

/// The area a ring encloses, as one valid polygon, or `None` when every loop
/// is flat
fn repair_ring(ring: &LineString<f64>) -> Option<Polygon<f64>> {
    let coords = open_ring(ring);
    if coords.len() < 3 {
        return None;
    }

    let loops: Vec<Polygon<f64>> = split_loops(node_ring(&coords))
        .into_iter()
        .filter(|candidate| signed_area(candidate) != 0.0)
        .map(|candidate| Polygon::new(LineString::from(candidate), vec![]))
        .collect();

    match loops.len() {
        0 => None,
        1 => loops.into_iter().next(),
        _ => merge_loops(&loops).or_else(|| largest(loops)),
    }
}

/// Union of the loops, or `None` when the union yields nothing valid
fn merge_loops(loops: &[Polygon<f64>]) -> Option<Polygon<f64>> {
    // The union takes its fill rule from the first ring's winding
    let oriented: Vec<Polygon<f64>> =
        loops.iter().map(|p| p.orient(Direction::Default)).collect();

    let merged = unary_union(&oriented);
    if merged.0.len() > 1 {
        tracing::debug!("Ring repair split into {} pieces; keeping the largest", merged.0.len());
    }

    largest(merged.into_iter().filter(is_valid))
}

/// Strictly larger wins so the earliest polygon keeps ties
fn largest(polygons: impl IntoIterator<Item = Polygon<f64>>) -> Option<Polygon<f64>> {
    let mut best: Option<(f64, Polygon<f64>)> = None;
    for polygon in polygons {
        let area = polygon.unsigned_area();
        if area > 0.0 && best.as_ref().map_or(true, |(best_area, _)| area > *best_area) {
            best = Some((area, polygon));
        }
    }
    best.map(|(_, polygon)| polygon)
}

/// Insert every intersection point into the segments it lies on.
///
/// A node shared by two segments is the same `Coord` value in both, so the
/// loop split below can detect it with exact equality.
fn node_ring(coords: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let segments = ring_segments(coords);
    let n = segments.len();
    let mut nodes: Vec<Vec<Coord<f64>>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            match line_intersection(segments[i], segments[j]) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    if !adjacent(i, j, n) {
                        nodes[i].push(intersection);
                        nodes[j].push(intersection);
                    }
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    for end in [intersection.start, intersection.end] {
                        nodes[i].push(end);
                        nodes[j].push(end);
                    }
                }
                None => {}
            }
        }
    }

    let mut noded = Vec::with_capacity(n * 2);
    for (segment, mut extra) in segments.iter().zip(nodes) {
        noded.push(segment.start);

        extra.retain(|c| *c != segment.start && *c != segment.end);
        let param = |c: &Coord<f64>| {
            let d = segment.delta();
            let v = *c - segment.start;
            (v.x * d.x + v.y * d.y) / (d.x * d.x + d.y * d.y)
        };
        extra.sort_by(|a, b| param(a).total_cmp(&param(b)));
        extra.dedup();

        for c in extra {
            if noded.last() != Some(&c) {
                noded.push(c);
            }
        }
    }

    while noded.len() > 1 && noded.first() == noded.last() {
        noded.pop();
    }
    noded
}

/// Cut a noded ring into loops at every repeated coordinate
fn split_loops(coords: Vec<Coord<f64>>) -> Vec<Vec<Coord<f64>>> {
    let mut loops = Vec::new();
    let mut stack: Vec<Coord<f64>> = Vec::with_capacity(coords.len());

    for c in coords {
        if let Some(idx) = stack.iter().position(|s| *s == c) {
            let tail = stack.split_off(idx + 1);
            let mut closed = Vec::with_capacity(tail.len() + 1);
            closed.push(c);
            closed.extend(tail);
            if closed.len() >= 3 {
                loops.push(closed);
            }
        } else {
            stack.push(c);
        }
    }

    if stack.len() >= 3 {
        loops.push(stack);
    }
    loops
}
