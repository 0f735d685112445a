//! Z-planar mesh slicing: the Z-level generator and the thin wrapper that
//! hands a job's Z levels to [`tcam_core::TriangleMesh::section_multiplane`].

use tcam_core::{Contour, TriangleMesh};

use crate::error::CamError;

/// Produce a descending list of Z values from `z_top` down to `z_bottom`
/// in `step_down` increments, with the final value always exactly
/// `z_bottom` (the guaranteed floor pass) even if the previous step landed
/// very close to it.
pub fn z_levels(z_top: f64, z_bottom: f64, step_down: f64) -> Result<Vec<f64>, CamError> {
    if step_down <= 0.0 {
        return Err(CamError::InvalidParameter(format!(
            "step_down must be positive, got {step_down}"
        )));
    }
    if z_bottom >= z_top {
        return Err(CamError::InvalidParameter(format!(
            "z_bottom ({z_bottom}) must be less than z_top ({z_top})"
        )));
    }

    let mut levels = Vec::new();
    let mut z = z_top - step_down;
    while z > z_bottom + 1e-9 {
        levels.push(round10(z));
        z -= step_down;
    }
    levels.push(round10(z_bottom));
    Ok(levels)
}

fn round10(v: f64) -> f64 {
    (v * 1e10).round() / 1e10
}

/// Slice `mesh` at each Z value in `heights`, in a single batched traversal.
/// A height that misses the mesh yields an empty contour at that position.
pub fn slice_at_heights(mesh: &TriangleMesh, heights: &[f64]) -> Vec<Contour> {
    mesh.section_multiplane(heights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcam_core::Triangle;

    #[test]
    fn test_z_levels_basic_sequence() {
        let levels = z_levels(0.0, -0.25, 0.05).unwrap();
        let expected = vec![-0.05, -0.10, -0.15, -0.20, -0.25];
        assert_eq!(levels.len(), expected.len());
        for (a, b) in levels.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn test_z_levels_floor_pass_exact() {
        let levels = z_levels(0.0, -0.10, 0.03).unwrap();
        assert!((levels.last().unwrap() - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn test_z_levels_is_strictly_descending() {
        let levels = z_levels(0.0, -1.0, 0.07).unwrap();
        assert!(levels.len() >= 1);
        for w in levels.windows(2) {
            assert!(w[0] > w[1]);
        }
        assert!((levels[0] - (-0.07)).abs() < 1e-9);
        assert!((levels.last().unwrap() - (-1.0)).abs() < 1e-9);
        assert!(levels.iter().all(|z| *z >= -1.0 - 1e-9));
    }

    #[test]
    fn test_z_levels_rejects_nonpositive_step_down() {
        assert!(z_levels(0.0, -0.25, -0.1).is_err());
        assert!(z_levels(0.0, -0.25, 0.0).is_err());
    }

    #[test]
    fn test_z_levels_rejects_inverted_range() {
        assert!(z_levels(0.0, 0.5, 0.05).is_err());
        assert!(z_levels(0.0, 0.0, 0.05).is_err());
    }

    fn unit_cube() -> TriangleMesh {
        let half = 0.5_f64;
        let corners = [
            [-half, -half, -half], [half, -half, -half],
            [half, half, -half], [-half, half, -half],
            [-half, -half, half], [half, -half, half],
            [half, half, half], [-half, half, half],
        ];
        let faces: [[usize; 3]; 12] = [
            [0, 1, 2], [0, 2, 3],
            [4, 6, 5], [4, 7, 6],
            [0, 5, 1], [0, 4, 5],
            [1, 6, 2], [1, 5, 6],
            [2, 7, 3], [2, 6, 7],
            [3, 4, 0], [3, 7, 4],
        ];
        let triangles = faces
            .iter()
            .map(|f| Triangle::new(corners[f[0]], corners[f[1]], corners[f[2]]))
            .collect();
        TriangleMesh::from_triangles(triangles)
    }

    fn cylinder(radius: f64, height: f64, segments: usize) -> TriangleMesh {
        let half_h = height / 2.0;
        let mut triangles = Vec::new();
        let angle = |i: usize| 2.0 * std::f64::consts::PI * (i as f64) / (segments as f64);
        for i in 0..segments {
            let a0 = angle(i);
            let a1 = angle((i + 1) % segments);
            let (x0, y0) = (radius * a0.cos(), radius * a0.sin());
            let (x1, y1) = (radius * a1.cos(), radius * a1.sin());
            // side wall, two triangles
            triangles.push(Triangle::new(
                [x0, y0, -half_h], [x1, y1, -half_h], [x1, y1, half_h],
            ));
            triangles.push(Triangle::new(
                [x0, y0, -half_h], [x1, y1, half_h], [x0, y0, half_h],
            ));
            // caps
            triangles.push(Triangle::new([0.0, 0.0, -half_h], [x1, y1, -half_h], [x0, y0, -half_h]));
            triangles.push(Triangle::new([0.0, 0.0, half_h], [x0, y0, half_h], [x1, y1, half_h]));
        }
        TriangleMesh::from_triangles(triangles)
    }

    #[test]
    fn test_slice_cube_at_midplane_area() {
        let mesh = unit_cube();
        let sections = slice_at_heights(&mesh, &[0.0]);
        let bounds = sections[0].bounds().unwrap();
        assert!((bounds.area() - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_slice_cube_outside_bounds_is_empty() {
        let mesh = unit_cube();
        let sections = slice_at_heights(&mesh, &[-1.0, 1.0]);
        assert!(sections[0].is_empty());
        assert!(sections[1].is_empty());
    }

    #[test]
    fn test_slice_empty_heights_returns_empty_list() {
        let mesh = unit_cube();
        assert!(slice_at_heights(&mesh, &[]).is_empty());
    }

    #[test]
    fn test_slice_cylinder_area_and_centroid() {
        use geo::Centroid;
        let mesh = cylinder(0.5, 1.0, 64);
        let sections = slice_at_heights(&mesh, &[0.0]);
        let bounds = sections[0].bounds().unwrap();
        let expected_area = std::f64::consts::PI * 0.25;
        assert!((bounds.area() - (1.0 * 1.0)).abs() < 0.05);

        let mp = sections[0].as_multi_polygon();
        let area: f64 = mp.0.iter().map(|p| {
            let ext: Vec<_> = p.exterior().coords().collect();
            let mut a = 0.0;
            for w in ext.windows(2) {
                a += w[0].x * w[1].y - w[1].x * w[0].y;
            }
            a.abs() / 2.0
        }).sum();
        assert!((area - expected_area).abs() < 0.01, "area={area} expected={expected_area}");

        let centroid = mp.centroid().unwrap();
        assert!(centroid.x().abs() < 0.01);
        assert!(centroid.y().abs() < 0.01);
    }
}
