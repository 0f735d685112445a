//! Contour-offset finishing: one pass around the part's outline per Z
//! level, offset outward by the tool radius (plus any extra stock to
//! leave), traced once around and retracted.

use tcam_core::{Contour, Point2D};

use crate::toolpath::{Toolpath, ToolpathPoint, ToolpathSegment};

#[derive(Debug, Clone, Copy)]
pub struct FinishingParams {
    pub tool_radius: f64,
    pub feed_xy: f64,
    pub feed_z: f64,
    pub safe_z: f64,
    pub rapid_z: f64,
    pub extra_offset: f64,
}

/// `part_cross_sections` may be shorter than `z_levels` — the last
/// cross-section is reused for any deeper level, same convention as
/// roughing.
pub fn generate_finishing_toolpath(
    part_cross_sections: &[Contour],
    z_levels: &[f64],
    params: &FinishingParams,
    tool_number: u32,
) -> Toolpath {
    let mut toolpath = Toolpath::new(tool_number, "finishing");
    let offset = params.tool_radius + params.extra_offset;

    for (i, &z) in z_levels.iter().enumerate() {
        let part = cross_section_for_level(part_cross_sections, i);
        if part.is_empty() {
            continue;
        }
        let centerline = part.offset(offset);
        if centerline.is_empty() {
            continue;
        }

        for ring in centerline.rings() {
            let segment = trace_ring(&ring, z, params);
            toolpath.add_segment(segment);
        }
    }

    toolpath
}

fn cross_section_for_level(sections: &[Contour], level_index: usize) -> Contour {
    if sections.is_empty() {
        return Contour::empty();
    }
    let idx = level_index.min(sections.len() - 1);
    sections[idx].clone()
}

/// Rapid to the ring's first point, plunge, feed through every remaining
/// point, close back to the start if the ring wasn't already closed, then
/// retract.
fn trace_ring(ring: &[Point2D], z: f64, params: &FinishingParams) -> ToolpathSegment {
    let mut segment = ToolpathSegment::new(z, format!("finish z={z:.4}"));
    if ring.len() < 2 {
        return segment;
    }

    let start = ring[0];
    segment.push(ToolpathPoint::rapid(start.x, start.y, params.safe_z));
    segment.push(ToolpathPoint::plunge(start.x, start.y, z, params.feed_z));

    for p in &ring[1..] {
        segment.push(ToolpathPoint::feed(p.x, p.y, z, params.feed_xy));
    }

    let last = *ring.last().unwrap();
    let already_closed =
        (last.x - start.x).abs() < 1e-9 && (last.y - start.y).abs() < 1e-9;
    if !already_closed {
        segment.push(ToolpathPoint::feed(start.x, start.y, z, params.feed_xy));
    }

    segment.push(ToolpathPoint::retract(start.x, start.y, params.safe_z));
    segment
}
