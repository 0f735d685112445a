//! Minimal procedural solids for demonstration and test jobs. Decoding a
//! real mesh file (STL, OBJ, ...) is explicitly out of scope for this
//! workspace — the core only ever sees a [`tcam_core::TriangleMesh`]
//! that's already in memory. These two generators stand in for that
//! external collaborator when a job file names a procedural shape
//! instead of pointing at a file some other tool produced.

use tcam_core::{Triangle, TriangleMesh};

/// An axis-aligned box, `width` (x) by `depth` (y) by `height` (z), centred
/// on the origin in all three axes.
pub fn build_box(width: f64, depth: f64, height: f64) -> TriangleMesh {
    let hw = width / 2.0;
    let hd = depth / 2.0;
    let hh = height / 2.0;
    let corners = [
        [-hw, -hd, -hh],
        [hw, -hd, -hh],
        [hw, hd, -hh],
        [-hw, hd, -hh],
        [-hw, -hd, hh],
        [hw, -hd, hh],
        [hw, hd, hh],
        [-hw, hd, hh],
    ];
    let faces: [[usize; 3]; 12] = [
        [0, 1, 2],
        [0, 2, 3],
        [4, 6, 5],
        [4, 7, 6],
        [0, 5, 1],
        [0, 4, 5],
        [1, 6, 2],
        [1, 5, 6],
        [2, 7, 3],
        [2, 6, 7],
        [3, 4, 0],
        [3, 7, 4],
    ];
    let triangles = faces
        .iter()
        .map(|f| Triangle::new(corners[f[0]], corners[f[1]], corners[f[2]]))
        .collect();
    TriangleMesh::from_triangles(triangles)
}

/// A cylinder of the given radius and height, centred on the origin with
/// its axis along Z, approximated with `segments` flat-faceted sides.
pub fn build_cylinder(radius: f64, height: f64, segments: usize) -> TriangleMesh {
    let segments = segments.max(3);
    let hh = height / 2.0;
    let mut triangles = Vec::with_capacity(segments * 4);

    let point = |i: usize| {
        let theta = 2.0 * std::f64::consts::PI * (i as f64) / (segments as f64);
        (radius * theta.cos(), radius * theta.sin())
    };

    for i in 0..segments {
        let (x0, y0) = point(i);
        let (x1, y1) = point((i + 1) % segments);

        triangles.push(Triangle::new([x0, y0, -hh], [x1, y1, -hh], [x1, y1, hh]));
        triangles.push(Triangle::new([x0, y0, -hh], [x1, y1, hh], [x0, y0, hh]));

        triangles.push(Triangle::new([0.0, 0.0, -hh], [x1, y1, -hh], [x0, y0, -hh]));
        triangles.push(Triangle::new([0.0, 0.0, hh], [x0, y0, hh], [x1, y1, hh]));
    }

    TriangleMesh::from_triangles(triangles)
}
