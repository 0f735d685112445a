use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};
use geo_buf::buffer_multi_polygon_rounded;
use serde::{Deserialize, Serialize};

/// A 2D point. Coordinates are f64 in the project's unit system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance_to(self, other: Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle. Origin is at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point2D,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Point2D, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    pub fn from_dimensions(width: f64, height: f64) -> Self {
        Self {
            origin: Point2D::origin(),
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.height
    }

    pub fn center(&self) -> Point2D {
        Point2D {
            x: self.origin.x + self.width / 2.0,
            y: self.origin.y + self.height / 2.0,
        }
    }

    /// The four corners: bottom-left, bottom-right, top-right, top-left.
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.origin,
            Point2D::new(self.max_x(), self.min_y()),
            Point2D::new(self.max_x(), self.max_y()),
            Point2D::new(self.min_x(), self.max_y()),
        ]
    }
}

/// A valid, possibly multi-piece, 2D polygon with holes. Backed by
/// `geo::MultiPolygon<f64>`; ring orientation is whatever `geo`'s boolean
/// ops and `geo-buf`'s offsetting produce, which is the only thing internal
/// offsetting relies on.
#[derive(Debug, Clone)]
pub struct Contour(MultiPolygon<f64>);

impl Contour {
    pub fn empty() -> Self {
        Contour(MultiPolygon::new(Vec::new()))
    }

    pub fn from_multi_polygon(mp: MultiPolygon<f64>) -> Self {
        Contour(mp)
    }

    pub fn as_multi_polygon(&self) -> &MultiPolygon<f64> {
        &self.0
    }

    /// A rectangle polygon from (x-min, y-min) to (x-max, y-max).
    pub fn rectangle(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        if x_max <= x_min || y_max <= y_min {
            return Self::empty();
        }
        let ring = LineString::new(vec![
            Coord { x: x_min, y: y_min },
            Coord { x: x_max, y: y_min },
            Coord { x: x_max, y: y_max },
            Coord { x: x_min, y: y_max },
            Coord { x: x_min, y: y_min },
        ]);
        Contour(MultiPolygon::new(vec![Polygon::new(ring, vec![])]))
    }

    /// Whether this contour has no positive-area polygon pieces.
    pub fn is_empty(&self) -> bool {
        self.0
            .0
            .iter()
            .all(|p| p.exterior().0.len() < 4 || polygon_area(p).abs() < 1e-12)
    }

    /// Signed buffer. Positive `d` grows the region, negative shrinks it.
    /// Uses a rounded join, which satisfies the "stays ≥ |d| from the
    /// source boundary" requirement without needing a mitre-limit
    /// parameter.
    pub fn offset(&self, d: f64) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        if d == 0.0 {
            return self.clone();
        }
        ensure_valid(Contour(buffer_multi_polygon_rounded(&self.0, d)))
    }

    /// A ∪ B, with both sides repaired (make-valid) before operating.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let a = ensure_valid(self.clone());
        let b = ensure_valid(other.clone());
        ensure_valid(Contour(a.0.union(&b.0)))
    }

    /// A \ B, with both sides repaired (make-valid) before operating.
    pub fn difference(&self, other: &Self) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        if other.is_empty() {
            return self.clone();
        }
        let a = ensure_valid(self.clone());
        let b = ensure_valid(other.clone());
        ensure_valid(Contour(a.0.difference(&b.0)))
    }

    /// The axis-aligned bounds of all pieces, or `None` if empty.
    pub fn bounds(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for poly in &self.0.0 {
            for coord in poly.exterior().coords() {
                min_x = min_x.min(coord.x);
                min_y = min_y.min(coord.y);
                max_x = max_x.max(coord.x);
                max_y = max_y.max(coord.y);
            }
        }
        if !min_x.is_finite() {
            return None;
        }
        Some(Rect::new(
            Point2D::new(min_x, min_y),
            max_x - min_x,
            max_y - min_y,
        ))
    }

    /// Yield each polygon piece's exterior ring then its interior rings, as
    /// closed sequences of points whose last point equals the first.
    pub fn rings(&self) -> Vec<Vec<Point2D>> {
        let mut out = Vec::new();
        for poly in &self.0.0 {
            out.push(ring_to_points(poly.exterior()));
            for interior in poly.interiors() {
                out.push(ring_to_points(interior));
            }
        }
        out
    }

    /// Intersect the segment `p0`-`p1` with this contour, returning the
    /// ordered list of disjoint sub-segments (as endpoint pairs) that lie
    /// inside it. Sub-segments are returned in the order encountered
    /// walking from `p0` to `p1`.
    pub fn clip_segment(&self, p0: Point2D, p1: Point2D) -> Vec<(Point2D, Point2D)> {
        if self.is_empty() {
            return Vec::new();
        }
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-12 {
            return Vec::new();
        }

        let mut ts = vec![0.0_f64, 1.0_f64];
        for poly in &self.0.0 {
            collect_ring_crossings(poly.exterior(), p0, p1, &mut ts);
            for interior in poly.interiors() {
                collect_ring_crossings(interior, p0, p1, &mut ts);
            }
        }
        ts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        ts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

        let mut segments = Vec::new();
        for window in ts.windows(2) {
            let (t0, t1) = (window[0], window[1]);
            if t1 - t0 < 1e-9 {
                continue;
            }
            let tm = (t0 + t1) / 2.0;
            let mid = Point2D::new(p0.x + dx * tm, p0.y + dy * tm);
            if contains_point(&self.0, mid) {
                let start = Point2D::new(p0.x + dx * t0, p0.y + dy * t0);
                let end = Point2D::new(p0.x + dx * t1, p0.y + dy * t1);
                segments.push((start, end));
            }
        }
        segments
    }
}

fn ring_to_points(ring: &LineString<f64>) -> Vec<Point2D> {
    ring.coords().map(|c| Point2D::new(c.x, c.y)).collect()
}

fn polygon_area(poly: &Polygon<f64>) -> f64 {
    let mut area = signed_ring_area(poly.exterior());
    for interior in poly.interiors() {
        area -= signed_ring_area(interior).abs();
    }
    area
}

fn signed_ring_area(ring: &LineString<f64>) -> f64 {
    let coords: Vec<Coord<f64>> = ring.coords().copied().collect();
    if coords.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..coords.len() - 1 {
        let a = coords[i];
        let b = coords[i + 1];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Best-effort repair: running a geometry through a self-union resolves
/// most self-touching/overlapping artefacts that arise from mesh slicing
/// and chained offsets.
fn ensure_valid(c: Contour) -> Contour {
    if c.0.0.is_empty() {
        return c;
    }
    Contour(c.0.union(&MultiPolygon::new(Vec::new())))
}

fn contains_point(mp: &MultiPolygon<f64>, p: Point2D) -> bool {
    use geo::algorithm::Contains;
    mp.contains(&geo::Point::new(p.x, p.y))
}

/// Find every parametric `t` (0..=1 along `p0`-`p1`) where the segment
/// crosses an edge of `ring`, appending to `ts`.
fn collect_ring_crossings(ring: &LineString<f64>, p0: Point2D, p1: Point2D, ts: &mut Vec<f64>) {
    let coords: Vec<Coord<f64>> = ring.coords().copied().collect();
    if coords.len() < 2 {
        return;
    }
    for pair in coords.windows(2) {
        let a = pair[0];
        let b = pair[1];
        if let Some(t) = segment_intersection_t(p0, p1, Point2D::new(a.x, a.y), Point2D::new(b.x, b.y)) {
            ts.push(t);
        }
    }
}

/// Parametric intersection of segment `p0`-`p1` against segment `q0`-`q1`,
/// returning `t` along `p0`-`p1` if they cross within both segments'
/// bounds.
fn segment_intersection_t(
    p0: Point2D,
    p1: Point2D,
    q0: Point2D,
    q1: Point2D,
) -> Option<f64> {
    let r = (p1.x - p0.x, p1.y - p0.y);
    let s = (q1.x - q0.x, q1.y - q0.y);
    let denom = r.0 * s.1 - r.1 * s.0;
    if denom.abs() < 1e-12 {
        return None;
    }
    let qp = (q0.x - p0.x, q0.y - p0.y);
    let t = (qp.0 * s.1 - qp.1 * s.0) / denom;
    let u = (qp.0 * r.1 - qp.1 * r.0) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rect_area() {
        let r = Rect::from_dimensions(36.0, 30.0);
        assert!((r.area() - 1080.0).abs() < 1e-10);
    }

    #[test]
    fn test_rect_corners() {
        let r = Rect::new(Point2D::new(1.0, 2.0), 10.0, 5.0);
        let c = r.corners();
        assert_eq!(c[0], Point2D::new(1.0, 2.0));
        assert_eq!(c[1], Point2D::new(11.0, 2.0));
        assert_eq!(c[2], Point2D::new(11.0, 7.0));
        assert_eq!(c[3], Point2D::new(1.0, 7.0));
    }

    #[test]
    fn test_contour_rectangle_area() {
        let c = Contour::rectangle(0.0, 0.0, 2.0, 2.0);
        assert!(!c.is_empty());
        let bounds = c.bounds().unwrap();
        assert!((bounds.area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_contour_empty_rectangle_is_empty() {
        let c = Contour::rectangle(2.0, 2.0, 1.0, 1.0);
        assert!(c.is_empty());
    }

    #[test]
    fn test_contour_offset_grows_area() {
        let c = Contour::rectangle(0.0, 0.0, 1.0, 1.0);
        let grown = c.offset(0.25);
        let bounds = grown.bounds().unwrap();
        assert!(bounds.area() > 1.0);
    }

    #[test]
    fn test_contour_difference_removes_overlap() {
        let stock = Contour::rectangle(0.0, 0.0, 2.0, 2.0);
        let part = Contour::rectangle(0.5, 0.5, 1.5, 1.5);
        let machinable = stock.difference(&part);
        assert!(!machinable.is_empty());
        let bounds = machinable.bounds().unwrap();
        // difference keeps the same overall bounds (a frame), area less than stock
        assert!((bounds.area() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_contour_difference_full_cover_is_empty() {
        let stock = Contour::rectangle(0.0, 0.0, 1.0, 1.0);
        let part = Contour::rectangle(-1.0, -1.0, 2.0, 2.0);
        let machinable = stock.difference(&part);
        assert!(machinable.is_empty());
    }

    #[test]
    fn test_contour_union_combines_pieces() {
        let a = Contour::rectangle(0.0, 0.0, 1.0, 1.0);
        let b = Contour::rectangle(2.0, 0.0, 3.0, 1.0);
        let combined = a.union(&b);
        assert!(!combined.is_empty());
        let bounds = combined.bounds().unwrap();
        assert!((bounds.width - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_contour_rings_exterior_closed() {
        let c = Contour::rectangle(0.0, 0.0, 2.0, 3.0);
        let rings = c.rings();
        assert_eq!(rings.len(), 1);
        let ring = &rings[0];
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_contour_clip_segment_horizontal_line() {
        let c = Contour::rectangle(0.0, 0.0, 2.0, 2.0);
        let segs = c.clip_segment(Point2D::new(-1.0, 1.0), Point2D::new(3.0, 1.0));
        assert_eq!(segs.len(), 1);
        let (s, e) = segs[0];
        assert!((s.x - 0.0).abs() < 1e-6);
        assert!((e.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_contour_clip_segment_missing_entirely() {
        let c = Contour::rectangle(0.0, 0.0, 2.0, 2.0);
        let segs = c.clip_segment(Point2D::new(-5.0, 10.0), Point2D::new(5.0, 10.0));
        assert!(segs.is_empty());
    }

    #[test]
    fn test_contour_clip_segment_two_pieces() {
        let left = Contour::rectangle(0.0, 0.0, 1.0, 1.0);
        let right = Contour::rectangle(2.0, 0.0, 3.0, 1.0);
        let both = left.union(&right);
        let segs = both.clip_segment(Point2D::new(-1.0, 0.5), Point2D::new(4.0, 0.5));
        assert_eq!(segs.len(), 2);
    }
}
