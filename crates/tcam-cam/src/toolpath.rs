//! The typed 3D polyline the rest of the pipeline is built from: points
//! tagged by motion class, grouped into per-level segments, grouped into an
//! operation's toolpath.

use serde::{Deserialize, Serialize};

/// Tag distinguishing cutting motion from clearance motion. Arcs are out of
/// scope — every motion here is linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveClass {
    /// Non-cutting lateral move at clearance height.
    Rapid,
    /// In-material lateral cutting move.
    Feed,
    /// Straight-down cutting move at the Z-axis feed rate.
    Plunge,
    /// Straight-up non-cutting move to clearance.
    Retract,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolpathPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub move_class: MoveClass,
    pub feed: Option<f64>,
}

impl ToolpathPoint {
    pub fn rapid(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, move_class: MoveClass::Rapid, feed: None }
    }

    pub fn retract(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, move_class: MoveClass::Retract, feed: None }
    }

    pub fn feed(x: f64, y: f64, z: f64, feed: f64) -> Self {
        Self { x, y, z, move_class: MoveClass::Feed, feed: Some(feed) }
    }

    pub fn plunge(x: f64, y: f64, z: f64, feed: f64) -> Self {
        Self { x, y, z, move_class: MoveClass::Plunge, feed: Some(feed) }
    }
}

/// An ordered list of points at (logically) one Z level.
///
/// Invariant: a non-empty segment begins with a rapid or a plunge, and ends
/// with a retract or a feed.
#[derive(Debug, Clone, Default)]
pub struct ToolpathSegment {
    pub z_level: f64,
    pub label: String,
    pub points: Vec<ToolpathPoint>,
}

impl ToolpathSegment {
    pub fn new(z_level: f64, label: impl Into<String>) -> Self {
        Self { z_level, label: label.into(), points: Vec::new() }
    }

    pub fn push(&mut self, point: ToolpathPoint) {
        self.points.push(point);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<&ToolpathPoint> {
        self.points.last()
    }
}

/// An ordered list of segments, plus the owning tool's slot number and the
/// operation's name.
#[derive(Debug, Clone, Default)]
pub struct Toolpath {
    pub tool_number: u32,
    pub operation_name: String,
    pub segments: Vec<ToolpathSegment>,
}

impl Toolpath {
    pub fn new(tool_number: u32, operation_name: impl Into<String>) -> Self {
        Self {
            tool_number,
            operation_name: operation_name.into(),
            segments: Vec::new(),
        }
    }

    /// Appends `segment`, unless it is empty — an empty segment carries no
    /// motion and would break the "begins with rapid/plunge" invariant.
    pub fn add_segment(&mut self, segment: ToolpathSegment) {
        if !segment.is_empty() {
            self.segments.push(segment);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.is_empty())
    }

    /// All points across all segments, in emission order.
    pub fn points(&self) -> impl Iterator<Item = &ToolpathPoint> {
        self.segments.iter().flat_map(|s| s.points.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_is_empty_when_no_points() {
        let seg = ToolpathSegment::new(-0.1, "test");
        assert!(seg.is_empty());
    }

    #[test]
    fn test_toolpath_add_segment_skips_empty() {
        let mut tp = Toolpath::new(1, "roughing");
        tp.add_segment(ToolpathSegment::new(-0.1, "empty"));
        assert!(tp.segments.is_empty());

        let mut seg = ToolpathSegment::new(-0.1, "has points");
        seg.push(ToolpathPoint::rapid(0.0, 0.0, 0.1));
        tp.add_segment(seg);
        assert_eq!(tp.segments.len(), 1);
        assert!(!tp.is_empty());
    }

    #[test]
    fn test_toolpath_points_iterates_across_segments() {
        let mut tp = Toolpath::new(1, "finishing");
        let mut seg1 = ToolpathSegment::new(-0.05, "a");
        seg1.push(ToolpathPoint::rapid(0.0, 0.0, 0.1));
        seg1.push(ToolpathPoint::plunge(0.0, 0.0, -0.05, 5.0));
        let mut seg2 = ToolpathSegment::new(-0.1, "b");
        seg2.push(ToolpathPoint::feed(1.0, 0.0, -0.1, 20.0));
        tp.add_segment(seg1);
        tp.add_segment(seg2);
        assert_eq!(tp.points().count(), 3);
    }

    #[test]
    fn test_empty_toolpath_has_no_points() {
        let tp = Toolpath::new(1, "roughing");
        assert!(tp.is_empty());
        assert_eq!(tp.points().count(), 0);
    }
}
