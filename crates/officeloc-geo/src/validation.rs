//! OGC-style polygon validity checks
//!
//! A polygon is valid when every ring is closed, has at least four
//! coordinates, finite values and a non-zero area, no ring crosses or touches
//! itself, and every hole lies inside the exterior without crossing another
//! ring.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Contains, Coord, Intersects, Line, LineString, Point, Polygon};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// Reason of the first recorded error
    pub fn first_reason(&self) -> Option<&str> {
        self.errors.first().map(|e| e.reason.as_str())
    }
}

/// Shorthand for `validate_polygon(polygon).is_valid`
pub fn is_valid(polygon: &Polygon<f64>) -> bool {
    validate_polygon(polygon).is_valid
}

/// Whether every coordinate of the polygon is finite
pub fn is_finite(polygon: &Polygon<f64>) -> bool {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|ring| ring.coords())
        .all(|c| c.x.is_finite() && c.y.is_finite())
}

/// Validate a polygon, collecting every problem found
pub fn validate_polygon(polygon: &Polygon<f64>) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let exterior_ok = validate_ring(polygon.exterior(), "Polygon exterior", &mut result);

    let mut good_holes = Vec::new();
    for (i, interior) in polygon.interiors().iter().enumerate() {
        if validate_ring(interior, &format!("Polygon interior[{}]", i), &mut result) {
            good_holes.push((i, interior));
        }
    }

    // Ring relationships only make sense between individually sound rings
    if !exterior_ok {
        return result;
    }

    let shell = Polygon::new(polygon.exterior().clone(), vec![]);
    for &(i, hole) in &good_holes {
        let location = format!("Polygon interior[{}]", i);

        if rings_cross(hole, polygon.exterior()) {
            result.add_error(location, "Hole crosses the exterior ring".to_string());
            continue;
        }

        let inside = hole.coords().all(|c| shell.intersects(&Point::from(*c)))
            && hole.coords().any(|c| shell.contains(&Point::from(*c)));
        if !inside {
            result.add_error(location, "Hole lies outside the exterior ring".to_string());
        }
    }

    for (a, &(i, first)) in good_holes.iter().enumerate() {
        for &(j, second) in good_holes.iter().skip(a + 1) {
            if rings_cross(first, second) {
                result.add_error(
                    format!("Polygon interior[{}]", i),
                    format!("Hole crosses interior[{}]", j),
                );
            }
        }
    }

    result
}

/// Returns whether the ring passed its individual checks
fn validate_ring(ring: &LineString<f64>, location: &str, result: &mut ValidationResult) -> bool {
    let before = result.errors.len();

    if ring.0.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("Ring must have at least 4 points, found {}", ring.0.len()),
        );
        return false;
    }

    if let (Some(first), Some(last)) = (ring.0.first(), ring.0.last()) {
        if first != last {
            result.add_error(
                location.to_string(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }

    if let Some(bad) = ring.coords().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        result.add_error(
            location.to_string(),
            format!("Coordinates must be finite, found ({}, {})", bad.x, bad.y),
        );
        return false;
    }

    let open = open_ring(ring);
    if open.len() < 3 {
        result.add_error(location.to_string(), "Ring has zero area".to_string());
        return false;
    }

    if ring_self_intersects(&open) {
        result.add_error(location.to_string(), "Ring self-intersection".to_string());
    } else if signed_area(&open) == 0.0 {
        result.add_error(location.to_string(), "Ring has zero area".to_string());
    }

    result.errors.len() == before
}

/// Ring coordinates without consecutive duplicates and without the closing point
pub(crate) fn open_ring(ring: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for c in ring.coords() {
        if coords.last() != Some(c) {
            coords.push(*c);
        }
    }
    while coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

/// Segments of an open ring, wrapping from the last coordinate to the first
pub(crate) fn ring_segments(coords: &[Coord<f64>]) -> Vec<Line<f64>> {
    let n = coords.len();
    (0..n).map(|i| Line::new(coords[i], coords[(i + 1) % n])).collect()
}

/// Whether segments `i` and `j` of an `n`-segment ring share an endpoint
pub(crate) fn adjacent(i: usize, j: usize, n: usize) -> bool {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    hi == lo + 1 || (lo == 0 && hi == n - 1)
}

/// Shoelace area of an open ring, positive when counter-clockwise
pub(crate) fn signed_area(coords: &[Coord<f64>]) -> f64 {
    let Some(origin) = coords.first().copied() else {
        return 0.0;
    };
    let n = coords.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = coords[i] - origin;
            let b = coords[(i + 1) % n] - origin;
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

fn ring_self_intersects(coords: &[Coord<f64>]) -> bool {
    let segments = ring_segments(coords);
    let n = segments.len();

    for i in 0..n {
        for j in (i + 1)..n {
            match line_intersection(segments[i], segments[j]) {
                None => {}
                // Neighbours always meet at their shared vertex
                Some(LineIntersection::SinglePoint { .. }) if adjacent(i, j, n) => {}
                Some(_) => return true,
            }
        }
    }
    false
}

/// Whether two rings cross or overlap. Touching at isolated points is allowed.
fn rings_cross(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    let a = ring_segments(&open_ring(a));
    let b = ring_segments(&open_ring(b));

    a.iter().any(|sa| {
        b.iter().any(|sb| match line_intersection(*sa, *sb) {
            Some(LineIntersection::SinglePoint { is_proper, .. }) => is_proper,
            Some(LineIntersection::Collinear { intersection }) => {
                intersection.start != intersection.end
            }
            None => false,
        })
    })
}
