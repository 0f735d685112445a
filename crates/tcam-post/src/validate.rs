//! Safety validation: checks toolpath coordinates and feed/RPM settings
//! against a machine envelope. Advisory only — no fix-up is performed, and
//! an empty toolpath is a warning, never an error.

use serde::{Deserialize, Serialize};

use tcam_cam::toolpath::{Toolpath, ToolpathPoint};

use crate::machine::MachineEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding, mirroring the three-field shape
/// (severity, message, optional point) the rest of this corpus carries
/// through its validation passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    pub point: Option<ToolpathPoint>,
}

impl Issue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Checks performed, in order:
/// - spindle RPM within `envelope.min_rpm..=envelope.max_rpm` (error)
/// - every point's X/Y/Z within travel (error)
/// - every point's feed within `envelope.max_feed` (warning)
/// - every toolpath empty (warning)
pub fn validate_toolpaths(
    toolpaths: &[Toolpath],
    envelope: &MachineEnvelope,
    spindle_rpm: u32,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if spindle_rpm < envelope.min_rpm {
        issues.push(Issue {
            severity: Severity::Error,
            message: format!(
                "spindle speed {spindle_rpm} below machine minimum ({})",
                envelope.min_rpm
            ),
            point: None,
        });
    }
    if spindle_rpm > envelope.max_rpm {
        issues.push(Issue {
            severity: Severity::Error,
            message: format!(
                "spindle speed {spindle_rpm} above machine maximum ({})",
                envelope.max_rpm
            ),
            point: None,
        });
    }

    let mut all_empty = true;
    for tp in toolpaths {
        if tp.is_empty() {
            continue;
        }
        all_empty = false;

        for p in tp.points() {
            issues.extend(travel_issues(p, envelope));
            if let Some(feed) = p.feed
                && feed > envelope.max_feed
            {
                issues.push(Issue {
                    severity: Severity::Warning,
                    message: format!(
                        "feed {feed:.1} exceeds machine max ({:.1})",
                        envelope.max_feed
                    ),
                    point: Some(*p),
                });
            }
        }
    }

    if all_empty {
        issues.push(Issue {
            severity: Severity::Warning,
            message: "all toolpaths are empty — no G-code will be generated".into(),
            point: None,
        });
    }

    issues
}

fn travel_issues(p: &ToolpathPoint, envelope: &MachineEnvelope) -> Vec<Issue> {
    let mut out = Vec::new();
    if p.x < envelope.x_min || p.x > envelope.x_max {
        out.push(Issue {
            severity: Severity::Error,
            message: format!(
                "X={:.4} outside travel [{}, {}]",
                p.x, envelope.x_min, envelope.x_max
            ),
            point: Some(*p),
        });
    }
    if p.y < envelope.y_min || p.y > envelope.y_max {
        out.push(Issue {
            severity: Severity::Error,
            message: format!(
                "Y={:.4} outside travel [{}, {}]",
                p.y, envelope.y_min, envelope.y_max
            ),
            point: Some(*p),
        });
    }
    if p.z < envelope.z_min || p.z > envelope.z_max {
        out.push(Issue {
            severity: Severity::Error,
            message: format!(
                "Z={:.4} outside travel [{}, {}]",
                p.z, envelope.z_min, envelope.z_max
            ),
            point: Some(*p),
        });
    }
    out
}

/// Whether any issue in `issues` is an error (refusal-worthy).
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(Issue::is_error)
}
