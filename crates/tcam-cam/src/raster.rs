//! Parallel raster lines covering a bounding box at a step-over and angle,
//! in the order the roughing planner's zig-zag chaining depends on.

use tcam_core::Point2D;

/// Generate raster lines over `[x_min, x_max] x [y_min, y_max]` at the given
/// `step_over` and `angle_deg`. At angle 0 the lines are horizontal,
/// `y_min`, `y_min + step_over`, ... up to and including `y_max`. At any
/// other angle the lines are rotated about the box centre and extended far
/// enough past the box (the diagonal) that clipping against any shape
/// inside the box is exact.
///
/// A non-positive `step_over` produces no lines rather than looping
/// forever — geometry failures here are recovered locally, matching the
/// rest of the core.
pub fn raster_lines(
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    step_over: f64,
    angle_deg: f64,
) -> Vec<(Point2D, Point2D)> {
    if step_over <= 0.0 || x_max <= x_min || y_max <= y_min {
        return Vec::new();
    }

    if angle_deg == 0.0 {
        let mut lines = Vec::new();
        let mut y = y_min;
        while y <= y_max + 1e-9 {
            lines.push((Point2D::new(x_min, y), Point2D::new(x_max, y)));
            y += step_over;
        }
        lines
    } else {
        let cx = (x_min + x_max) / 2.0;
        let cy = (y_min + y_max) / 2.0;
        let diagonal = ((x_max - x_min).powi(2) + (y_max - y_min).powi(2)).sqrt();
        let n = (diagonal / step_over).ceil() as i64 + 1;

        let theta = angle_deg.to_radians();
        let dir = (theta.cos(), theta.sin());
        let normal = (-theta.sin(), theta.cos());

        let mut lines = Vec::with_capacity((2 * n + 1) as usize);
        for i in -n..=n {
            let offset = i as f64 * step_over;
            let center = (cx + normal.0 * offset, cy + normal.1 * offset);
            let p0 = Point2D::new(center.0 - dir.0 * diagonal, center.1 - dir.1 * diagonal);
            let p1 = Point2D::new(center.0 + dir.0 * diagonal, center.1 + dir.1 * diagonal);
            lines.push((p0, p1));
        }
        lines
    }
}
