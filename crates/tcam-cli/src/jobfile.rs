//! Deserializes a job TOML file into a [`tcam_pipeline::Job`] plus its
//! tool library. A job file's `[[operation]]` entries are flat records —
//! roughing- and finishing-only fields sit side by side, ignored outside
//! their own strategy — and are translated here into the orchestrator's
//! `Strategy` sum type.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use tcam_core::{Stock, Tool, ToolLibrary, TriangleMesh, Unit};
use tcam_pipeline::{Job, Operation, Strategy};

use crate::model;

/// The `[model]` table: a procedural shape built in-process, standing in
/// for a mesh a real loader would decode from a file.
#[derive(Debug, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
enum ModelFile {
    Box {
        width: f64,
        depth: f64,
        height: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
        #[serde(default = "default_segments")]
        segments: usize,
    },
}

fn default_segments() -> usize {
    48
}

impl ModelFile {
    fn build(&self) -> TriangleMesh {
        match *self {
            ModelFile::Box {
                width,
                depth,
                height,
            } => model::build_box(width, depth, height),
            ModelFile::Cylinder {
                radius,
                height,
                segments,
            } => model::build_cylinder(radius, height, segments),
        }
    }
}

/// One `[[operation]]` entry. Fields that only apply to one strategy
/// (`step_over_fraction`, `finish_allowance`, `raster_angle` for roughing;
/// `extra_offset` for finishing) default to zero and are ignored outside
/// their strategy, rather than forking the record into two shapes.
#[derive(Debug, Deserialize)]
struct OperationFile {
    name: String,
    tool: u32,
    strategy: String,
    z_top: f64,
    z_bottom: f64,
    step_down: f64,
    safe_z: f64,
    rapid_z: f64,
    spindle_rpm: u32,
    feed_xy: f64,
    feed_z: f64,
    #[serde(default)]
    step_over_fraction: f64,
    #[serde(default)]
    finish_allowance: f64,
    #[serde(default)]
    raster_angle: f64,
    #[serde(default)]
    extra_offset: f64,
}

#[derive(Debug, Deserialize)]
struct JobFile {
    name: String,
    units: Unit,
    stock: Stock,
    model: ModelFile,
    #[serde(default)]
    tool: Vec<Tool>,
    operation: Vec<OperationFile>,
}

#[derive(Debug, Error)]
pub enum JobFileError {
    #[error("I/O error reading job file: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("operation '{0}' references unknown tool number {1}")]
    UnknownTool(String, u32),

    #[error("operation '{0}' has unknown strategy '{1}' (expected 'roughing' or 'finishing')")]
    UnknownStrategy(String, String),

    #[error(transparent)]
    Pipeline(#[from] tcam_pipeline::PipelineError),
}

/// A job plus the tool library its operations were resolved against, so
/// the CLI can still print tool names the job itself only references by
/// number.
pub struct LoadedJob {
    pub job: Job,
    pub tools: ToolLibrary,
}

pub fn load(path: impl AsRef<Path>) -> Result<LoadedJob, JobFileError> {
    let text = std::fs::read_to_string(path)?;
    let file: JobFile = toml::from_str(&text)?;

    let mut tools = ToolLibrary::new();
    for tool in file.tool {
        tools.add(tool);
    }

    let mut job = Job::new(file.name, file.units);
    job.set_stock(file.stock);
    job.set_model(file.model.build())?;

    for op in file.operation {
        let tool = tools
            .get(op.tool)
            .cloned()
            .ok_or_else(|| JobFileError::UnknownTool(op.name.clone(), op.tool))?;

        let strategy = match op.strategy.as_str() {
            "roughing" => Strategy::Roughing {
                step_over_fraction: op.step_over_fraction,
                finish_allowance: op.finish_allowance,
                raster_angle: op.raster_angle,
            },
            "finishing" => Strategy::Finishing {
                extra_offset: op.extra_offset,
            },
            other => {
                return Err(JobFileError::UnknownStrategy(
                    op.name.clone(),
                    other.to_string(),
                ));
            }
        };

        let operation = Operation::new(
            op.name,
            tool,
            strategy,
            op.z_top,
            op.z_bottom,
            op.step_down,
            op.safe_z,
            op.rapid_z,
            op.spindle_rpm,
            op.feed_xy,
            op.feed_z,
        )?;
        job.add_operation(operation);
    }

    Ok(LoadedJob { job, tools })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(text: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tcam_jobfile_test_{}_{}.toml",
            std::process::id(),
            text.len()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        path
    }

    const SAMPLE: &str = r#"
name = "demo"
units = "inches"

[stock]
x_size = 2.0
y_size = 2.0
z_size = 1.0

[model]
shape = "box"
width = 1.0
depth = 1.0
height = 0.5

[[tool]]
number = 1
name = "1/4in endmill"
kind = "flat_endmill"
diameter = 0.25

[[operation]]
name = "rough"
tool = 1
strategy = "roughing"
z_top = 0.0
z_bottom = -0.3
step_down = 0.1
safe_z = 0.1
rapid_z = 0.5
spindle_rpm = 10000
feed_xy = 30.0
feed_z = 8.0
step_over_fraction = 0.4
finish_allowance = 0.02
"#;

    #[test]
    fn test_load_sample_job() {
        let path = write_temp(SAMPLE);
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.job.name, "demo");
        assert_eq!(loaded.job.operations.len(), 1);
        assert_eq!(loaded.job.operations[0].name, "rough");
        assert!(loaded.tools.get(1).is_some());
    }

    #[test]
    fn test_unknown_tool_number_rejected() {
        let text = SAMPLE.replace("tool = 1", "tool = 9");
        let path = write_temp(&text);
        let err = load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, Err(JobFileError::UnknownTool(_, 9))));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let text = SAMPLE.replace("strategy = \"roughing\"", "strategy = \"bogus\"");
        let path = write_temp(&text);
        let err = load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, Err(JobFileError::UnknownStrategy(_, _))));
    }
}
