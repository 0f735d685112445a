//! Lowers a typed toolpath to PathPilot G-code text: fixed preamble, a
//! motion body that only emits axis words that changed and F words on
//! feed-rate changes, and a fixed postamble. `G28` must never appear — the
//! PathPilot convention for tool-change/return is `G30`.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use tcam_cam::toolpath::{MoveClass, Toolpath};
use tcam_core::Unit;

use crate::error::PostError;

/// Configuration for one post-processing run. `tool_number` is used only
/// when a toolpath doesn't carry its own (it always does, in practice —
/// the job orchestrator stamps every toolpath with its operation's tool).
#[derive(Debug, Clone, Copy)]
pub struct PostConfig {
    pub units: Unit,
    pub tool_number: u32,
    pub spindle_rpm: u32,
    pub safe_z: f64,
    pub rapid_z: f64,
    pub coolant_on: bool,
}

/// Format a float for G-code: fixed-point, trailing zeros and a trailing
/// decimal point stripped (`1.5`, `-0.05`, `2`).
fn fmt(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    let s = s.trim_end_matches('0');
    s.trim_end_matches('.').to_string()
}

/// Wrap `text` as a PathPilot parenthetical comment, stripping any
/// parentheses already present in `text`.
fn comment(text: &str) -> String {
    let cleaned: String = text.chars().filter(|&c| c != '(' && c != ')').collect();
    format!("({cleaned})")
}

/// Position tracked between emitted motion lines, so only axes that
/// actually changed are written.
#[derive(Debug, Clone, Copy, Default)]
struct Position {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
}

impl Position {
    /// Axis words for (x, y, z) that differ from the last emitted
    /// position (or have never been emitted).
    fn changed(&mut self, x: f64, y: f64, z: f64) -> String {
        let mut words = String::new();
        if self.x != Some(x) {
            words.push_str(&format!(" X{}", fmt(x, 4)));
            self.x = Some(x);
        }
        if self.y != Some(y) {
            words.push_str(&format!(" Y{}", fmt(y, 4)));
            self.y = Some(y);
        }
        if self.z != Some(z) {
            words.push_str(&format!(" Z{}", fmt(z, 4)));
            self.z = Some(z);
        }
        words
    }
}

/// Emit the preamble block: tool-identifying comment, modal words, unit
/// select, path blending, spindle stop, return-to-tool-change, tool
/// change, tool-length offset, spindle start, optional coolant.
fn emit_preamble(lines: &mut Vec<String>, config: &PostConfig, tool_name: &str) {
    lines.push(comment(&format!("Tool: T{} {tool_name}", config.tool_number)));
    lines.push("G17 G40 G49 G54 G80 G90 G94".to_string());
    lines.push(config.units.gcode().to_string());
    lines.push("G64".to_string());
    lines.push("M5".to_string());
    lines.push("G30".to_string());
    lines.push(format!("T{} M6", config.tool_number));
    lines.push(format!("G43 H{}", config.tool_number));
    lines.push(format!("S{} M3", config.spindle_rpm));
    if config.coolant_on {
        lines.push("M8".to_string());
    }
}

/// Emit the motion body for one toolpath: an operation-naming comment,
/// then each segment's points, tracking modal G-word, position, and feed.
fn emit_motion(lines: &mut Vec<String>, toolpath: &Toolpath, pos: &mut Position) {
    lines.push(comment(&toolpath.operation_name));

    let mut last_feed: Option<f64> = None;
    let mut in_feed_run = false;

    for segment in &toolpath.segments {
        for point in &segment.points {
            let words = pos.changed(point.x, point.y, point.z);
            match point.move_class {
                MoveClass::Rapid | MoveClass::Retract => {
                    in_feed_run = false;
                    if !words.is_empty() {
                        lines.push(format!("G0{words}"));
                    }
                }
                MoveClass::Feed | MoveClass::Plunge => {
                    let mut line = format!("G1{words}");
                    let feed_changed = !in_feed_run || last_feed != point.feed;
                    if feed_changed
                        && let Some(f) = point.feed
                    {
                        line.push_str(&format!(" F{}", fmt(f, 1)));
                        last_feed = Some(f);
                    }
                    lines.push(line);
                    in_feed_run = true;
                }
            }
        }
    }
}

/// Emit the postamble block: spindle off, coolant off, return, program
/// end, sentinel.
fn emit_postamble(lines: &mut Vec<String>) {
    lines.push("M5".to_string());
    lines.push("M9".to_string());
    lines.push("G30".to_string());
    lines.push("M30".to_string());
    lines.push("%".to_string());
}

/// Lower `toolpaths` to a PathPilot G-code program, one command per line.
pub fn emit(toolpaths: &[Toolpath], config: &PostConfig, tool_name: &str) -> Vec<String> {
    let mut lines = Vec::new();
    emit_preamble(&mut lines, config, tool_name);

    let mut pos = Position::default();
    for toolpath in toolpaths {
        emit_motion(&mut lines, toolpath, &mut pos);
    }

    emit_postamble(&mut lines);
    lines
}

/// Lower `toolpaths` and write them to `path`, newline-terminated with a
/// trailing newline, in a single scoped open/write/close.
pub fn write_to_file(
    toolpaths: &[Toolpath],
    config: &PostConfig,
    tool_name: &str,
    path: impl AsRef<Path>,
) -> Result<(), PostError> {
    let lines = emit(toolpaths, config, tool_name);
    let mut file = fs::File::create(path)?;
    for line in &lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}
