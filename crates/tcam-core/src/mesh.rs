//! A minimal triangle soup with exactly the operations the slicer needs:
//! bounds, translation, and batched Z-plane sectioning. Decoding an actual
//! mesh file (STL, OBJ, ...) is an external collaborator's job; this type
//! only ever sees triangles that are already in memory.

use crate::geometry::{Contour, Point2D};

/// One triangle, vertices in `[x, y, z]` order. Winding is assumed
/// consistent across the mesh (outward-facing normals), which is what lets
/// [`TriangleMesh::section_multiplane`] tell solid boundaries from holes by
/// the signed area of the stitched ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: [f64; 3],
    pub b: [f64; 3],
    pub c: [f64; 3],
}

impl Triangle {
    pub fn new(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Self {
        Self { a, b, c }
    }

    fn z_range(&self) -> (f64, f64) {
        let zs = [self.a[2], self.b[2], self.c[2]];
        (
            zs.iter().cloned().fold(f64::INFINITY, f64::min),
            zs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        )
    }

    fn vertices(&self) -> [[f64; 3]; 3] {
        [self.a, self.b, self.c]
    }

    fn translated(&self, dx: f64, dy: f64, dz: f64) -> Self {
        let shift = |v: [f64; 3]| [v[0] + dx, v[1] + dy, v[2] + dz];
        Self {
            a: shift(self.a),
            b: shift(self.b),
            c: shift(self.c),
        }
    }

    /// The single chord where a Z = `z` plane crosses this triangle's
    /// boundary, classifying each edge's endpoints by sign of `v.z - z` the
    /// same way a BSP plane-split does, and interpolating the crossing
    /// point on each sign-changing edge.
    fn intersect_plane(&self, z: f64) -> Option<(Point2D, Point2D)> {
        let verts = self.vertices();
        let mut crossings: Vec<Point2D> = Vec::with_capacity(2);
        for i in 0..3 {
            let v0 = verts[i];
            let v1 = verts[(i + 1) % 3];
            let d0 = v0[2] - z;
            let d1 = v1[2] - z;
            if d0.abs() < 1e-9 {
                push_unique(&mut crossings, Point2D::new(v0[0], v0[1]));
            }
            if (d0 < 0.0) != (d1 < 0.0) && d0.abs() >= 1e-9 && d1.abs() >= 1e-9 {
                let t = d0 / (d0 - d1);
                let x = v0[0] + t * (v1[0] - v0[0]);
                let y = v0[1] + t * (v1[1] - v0[1]);
                push_unique(&mut crossings, Point2D::new(x, y));
            }
        }
        if crossings.len() >= 2 {
            Some((crossings[0], crossings[1]))
        } else {
            None
        }
    }
}

fn push_unique(points: &mut Vec<Point2D>, p: Point2D) {
    if !points
        .iter()
        .any(|q| (q.x - p.x).abs() < 1e-9 && (q.y - p.y).abs() < 1e-9)
    {
        points.push(p);
    }
}

/// An opaque triangle soup. The core never inspects triangles directly
/// beyond this API.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
}

impl TriangleMesh {
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        if self.triangles.is_empty() {
            return None;
        }
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for tri in &self.triangles {
            for v in tri.vertices() {
                for axis in 0..3 {
                    min[axis] = min[axis].min(v[axis]);
                    max[axis] = max[axis].max(v[axis]);
                }
            }
        }
        Some((min, max))
    }

    /// Consume this mesh and return a translated copy. The mesh is mutated
    /// at most once this way (origin placement at job-load time); every
    /// downstream call treats the result as read-only.
    pub fn translate(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            triangles: self
                .triangles
                .iter()
                .map(|t| t.translated(dx, dy, dz))
                .collect(),
        }
    }

    /// Section the mesh at every height in `heights` in a single traversal
    /// of the triangle list — the planners call this with dozens of
    /// heights per job, so re-walking the mesh once per height is not
    /// acceptable. A height that misses the mesh entirely yields an empty
    /// contour at that position.
    pub fn section_multiplane(&self, heights: &[f64]) -> Vec<Contour> {
        let mut raw: Vec<Vec<(Point2D, Point2D)>> = vec![Vec::new(); heights.len()];
        for tri in &self.triangles {
            let (zmin, zmax) = tri.z_range();
            for (i, &z) in heights.iter().enumerate() {
                if z < zmin || z > zmax {
                    continue;
                }
                if let Some(seg) = tri.intersect_plane(z) {
                    raw[i].push(seg);
                }
            }
        }
        raw.into_iter().map(|segs| stitch_cross_section(segs)).collect()
    }
}

/// Chain unordered intersection chords into closed rings, then combine the
/// rings with the nonzero winding convention: positive-signed-area rings
/// are solid material, negative-signed-area rings are holes cut into it.
fn stitch_cross_section(segments: Vec<(Point2D, Point2D)>) -> Contour {
    let rings = chain_into_rings(segments);
    if rings.is_empty() {
        return Contour::empty();
    }

    let mut solid = Contour::empty();
    let mut holes = Contour::empty();
    for ring in rings {
        if ring.len() < 4 {
            continue;
        }
        let area = signed_area(&ring);
        let piece = Contour::from_multi_polygon(geo::MultiPolygon::new(vec![geo::Polygon::new(
            geo::LineString::new(ring.iter().map(|p| geo::Coord { x: p.x, y: p.y }).collect()),
            vec![],
        )]));
        if area >= 0.0 {
            solid = solid.union(&piece);
        } else {
            holes = holes.union(&piece);
        }
    }
    solid.difference(&holes)
}

fn signed_area(ring: &[Point2D]) -> f64 {
    let mut sum = 0.0;
    for w in ring.windows(2) {
        sum += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    sum / 2.0
}

/// Greedily chain chords sharing an endpoint (within epsilon) into closed
/// point loops. Chords that never close are dropped — an open chain cannot
/// become a valid ring and the failure is recovered locally.
fn chain_into_rings(mut segments: Vec<(Point2D, Point2D)>) -> Vec<Vec<Point2D>> {
    let eps = 1e-7;
    let close = |a: Point2D, b: Point2D| (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps;

    let mut rings = Vec::new();
    while let Some((start, next)) = segments.pop() {
        let mut ring = vec![start, next];
        loop {
            let tail = *ring.last().unwrap();
            if close(tail, ring[0]) && ring.len() > 2 {
                break;
            }
            let found = segments
                .iter()
                .position(|(a, b)| close(*a, tail) || close(*b, tail));
            match found {
                Some(idx) => {
                    let (a, b) = segments.remove(idx);
                    let appended = if close(a, tail) { b } else { a };
                    ring.push(appended);
                }
                None => break,
            }
        }
        if ring.len() >= 4 && close(*ring.last().unwrap(), ring[0]) {
            rings.push(ring);
        } else if ring.len() >= 3 {
            ring.push(ring[0]);
            rings.push(ring);
        }
    }
    rings
}
