//! Raster zig-zag pocket roughing.
//!
//! At each Z level: the part cross-section inflated by tool radius plus
//! finish allowance is subtracted from the stock footprint to get the
//! machinable region; that region is filled with parallel raster lines,
//! clipped, and chained zig-zag with retract/rapid/plunge transitions
//! between disconnected sub-segments.

use tcam_core::{Contour, Point2D};

use crate::raster::raster_lines;
use crate::toolpath::{Toolpath, ToolpathPoint, ToolpathSegment};

#[derive(Debug, Clone, Copy)]
pub struct RoughingParams {
    pub tool_radius: f64,
    pub step_over: f64,
    pub step_down: f64,
    pub feed_xy: f64,
    pub feed_z: f64,
    pub safe_z: f64,
    pub rapid_z: f64,
    pub finish_allowance: f64,
    pub raster_angle: f64,
}

/// `part_cross_sections` may be shorter than `z_levels` — the last
/// cross-section is reused for any deeper level.
pub fn generate_roughing_toolpath(
    stock_footprint: &Contour,
    part_cross_sections: &[Contour],
    z_levels: &[f64],
    params: &RoughingParams,
    tool_number: u32,
) -> Toolpath {
    let mut toolpath = Toolpath::new(tool_number, "roughing");
    let offset = params.tool_radius + params.finish_allowance;

    for (i, &z) in z_levels.iter().enumerate() {
        let part = cross_section_for_level(part_cross_sections, i);
        let exclusion = part.offset(offset);
        let machinable = stock_footprint.difference(&exclusion);
        if machinable.is_empty() {
            continue;
        }

        let segment = raster_fill_at_level(&machinable, z, params);
        toolpath.add_segment(segment);
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

fn raster_fill_at_level(machinable: &Contour, z: f64, params: &RoughingParams) -> ToolpathSegment {
    let mut segment = ToolpathSegment::new(z, format!("rough z={z:.4}"));

    let bounds = match machinable.bounds() {
        Some(b) => b,
        None => return segment,
    };
    let lines = raster_lines(
        bounds.min_x(),
        bounds.max_x(),
        bounds.min_y(),
        bounds.max_y(),
        params.step_over,
        params.raster_angle,
    );

    let mut first_move = true;
    for (i, (p0, p1)) in lines.iter().enumerate() {
        let sub_segments = machinable.clip_segment(*p0, *p1);
        for (start, end) in sub_segments {
            let (start, end): (Point2D, Point2D) = if i % 2 == 1 {
                (end, start)
            } else {
                (start, end)
            };

            if first_move {
                segment.push(ToolpathPoint::rapid(start.x, start.y, params.safe_z));
                segment.push(ToolpathPoint::plunge(start.x, start.y, z, params.feed_z));
                first_move = false;
            } else {
                let prev = *segment.last_point().expect("segment has a prior point");
                segment.push(ToolpathPoint::retract(prev.x, prev.y, params.safe_z));
                segment.push(ToolpathPoint::rapid(start.x, start.y, params.safe_z));
                segment.push(ToolpathPoint::plunge(start.x, start.y, z, params.feed_z));
            }

            segment.push(ToolpathPoint::feed(end.x, end.y, z, params.feed_xy));
        }
    }

    if !segment.is_empty() {
        let last = *segment.last_point().unwrap();
        segment.push(ToolpathPoint::retract(last.x, last.y, params.safe_z));
    }

    segment
}
