//! The job orchestrator: binds a mesh, a stock, and an ordered list of
//! operations, and sequences the slicer and the roughing/finishing
//! planners to produce one toolpath per operation.

use tcam_cam::finishing::{generate_finishing_toolpath, FinishingParams};
use tcam_cam::roughing::{generate_roughing_toolpath, RoughingParams};
use tcam_cam::slicer::{slice_at_heights, z_levels};
use tcam_cam::toolpath::Toolpath;
use tcam_core::{Stock, Tool, TriangleMesh, Unit};

use crate::error::PipelineError;

/// Which planner an operation uses, carrying the parameters only that
/// planner needs. A sum type rather than a tag-plus-optional-fields
/// struct, since the source's `is`-comparison dispatch has no use for
/// runtime polymorphism once modelled this way.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    Roughing {
        /// Step-over as a fraction of tool diameter, in (0, 1].
        step_over_fraction: f64,
        /// Extra stock left for a later finishing pass.
        finish_allowance: f64,
        /// Raster direction, degrees.
        raster_angle: f64,
    },
    Finishing {
        /// Extra offset added to the tool radius (spring passes).
        extra_offset: f64,
    },
}

/// A single machining operation: a name, a strategy, a tool, a Z range
/// and step-down, clearance heights, and feeds/speed.
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub tool: Tool,
    pub strategy: Strategy,
    pub z_top: f64,
    pub z_bottom: f64,
    pub step_down: f64,
    pub safe_z: f64,
    pub rapid_z: f64,
    pub spindle_rpm: u32,
    pub feed_xy: f64,
    pub feed_z: f64,
}

impl Operation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        tool: Tool,
        strategy: Strategy,
        z_top: f64,
        z_bottom: f64,
        step_down: f64,
        safe_z: f64,
        rapid_z: f64,
        spindle_rpm: u32,
        feed_xy: f64,
        feed_z: f64,
    ) -> Result<Self, PipelineError> {
        if step_down <= 0.0 {
            return Err(tcam_core::Error::InvalidParameter(format!(
                "step_down must be positive, got {step_down}"
            ))
            .into());
        }
        if z_bottom >= z_top {
            return Err(tcam_core::Error::InvalidParameter(format!(
                "z_bottom ({z_bottom}) must be less than z_top ({z_top})"
            ))
            .into());
        }
        if safe_z <= z_top {
            return Err(tcam_core::Error::InvalidParameter(format!(
                "safe_z ({safe_z}) must be greater than z_top ({z_top})"
            ))
            .into());
        }
        if let Strategy::Roughing {
            step_over_fraction, ..
        } = strategy
            && !(step_over_fraction > 0.0 && step_over_fraction <= 1.0)
        {
            return Err(tcam_core::Error::InvalidParameter(format!(
                "step_over_fraction must be in (0, 1], got {step_over_fraction}"
            ))
            .into());
        }

        Ok(Self {
            name: name.into(),
            tool,
            strategy,
            z_top,
            z_bottom,
            step_down,
            safe_z,
            rapid_z,
            spindle_rpm,
            feed_xy,
            feed_z,
        })
    }

    /// Absolute radial step-over, ignored for finishing operations.
    pub fn step_over(&self) -> Option<f64> {
        match self.strategy {
            Strategy::Roughing {
                step_over_fraction, ..
            } => Some(self.tool.diameter * step_over_fraction),
            Strategy::Finishing { .. } => None,
        }
    }
}

/// Progress events the orchestrator can emit as it works through a job's
/// operations. Plain `println!`/`eprintln!` at the CLI boundary is the
/// only consumer in this workspace; no logging crate sits between them.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    OperationStarted { name: String },
    ZLevelsComputed { name: String, count: usize },
    ToolpathComplete { name: String, segment_count: usize },
    JobComplete { toolpath_count: usize },
}

pub trait ProgressReporter {
    fn report(&self, event: ProgressEvent);
}

/// A reporter that discards every event, for callers that don't want
/// progress output.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// A complete CAM job: a mesh, a stock, and an ordered list of operations.
/// The mesh and stock are shared by every operation; the mesh is mutated
/// exactly once, at [`Job::set_model`], to place its top face at the
/// stock's `z_top` and center its footprint within the stock margin.
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub units: Unit,
    mesh: Option<TriangleMesh>,
    stock: Option<Stock>,
    pub operations: Vec<Operation>,
}

impl Job {
    pub fn new(name: impl Into<String>, units: Unit) -> Self {
        Self {
            name: name.into(),
            units,
            mesh: None,
            stock: None,
            operations: Vec::new(),
        }
    }

    pub fn set_stock(&mut self, stock: Stock) {
        self.stock = Some(stock);
    }

    pub fn stock(&self) -> Option<&Stock> {
        self.stock.as_ref()
    }

    /// Place `mesh` on the job's stock (top face at `stock.z_top`, XY
    /// footprint centred within the stock margin) and store it. Requires
    /// the stock to already be set.
    pub fn set_model(&mut self, mesh: TriangleMesh) -> Result<(), PipelineError> {
        let stock = self.stock.as_ref().ok_or(PipelineError::MissingStock)?;
        self.mesh = Some(orient_mesh_to_stock(mesh, stock));
        Ok(())
    }

    pub fn mesh(&self) -> Option<&TriangleMesh> {
        self.mesh.as_ref()
    }

    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Run every operation and return the resulting toolpaths, in
    /// declaration order. Discards progress events.
    pub fn compute_toolpaths(&self) -> Result<Vec<Toolpath>, PipelineError> {
        self.compute_toolpaths_with_reporter(&NullReporter)
    }

    /// Run every operation and return the resulting toolpaths, in
    /// declaration order, reporting progress as it goes.
    pub fn compute_toolpaths_with_reporter(
        &self,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<Toolpath>, PipelineError> {
        let mesh = self.mesh.as_ref().ok_or(PipelineError::MissingMesh)?;
        let stock = self.stock.as_ref().ok_or(PipelineError::MissingStock)?;
        let stock_footprint = stock.footprint();

        let mut toolpaths = Vec::with_capacity(self.operations.len());

        for op in &self.operations {
            reporter.report(ProgressEvent::OperationStarted {
                name: op.name.clone(),
            });

            let levels = z_levels(op.z_top, op.z_bottom, op.step_down)?;
            reporter.report(ProgressEvent::ZLevelsComputed {
                name: op.name.clone(),
                count: levels.len(),
            });

            let sections = slice_at_heights(mesh, &levels);

            let mut toolpath = match op.strategy {
                Strategy::Roughing {
                    finish_allowance,
                    raster_angle,
                    ..
                } => {
                    let params = RoughingParams {
                        tool_radius: op.tool.radius(),
                        step_over: op.step_over().expect("roughing has a step-over"),
                        step_down: op.step_down,
                        feed_xy: op.feed_xy,
                        feed_z: op.feed_z,
                        safe_z: op.safe_z,
                        rapid_z: op.rapid_z,
                        finish_allowance,
                        raster_angle,
                    };
                    generate_roughing_toolpath(
                        &stock_footprint,
                        &sections,
                        &levels,
                        &params,
                        op.tool.number,
                    )
                }
                Strategy::Finishing { extra_offset } => {
                    let params = FinishingParams {
                        tool_radius: op.tool.radius(),
                        feed_xy: op.feed_xy,
                        feed_z: op.feed_z,
                        safe_z: op.safe_z,
                        rapid_z: op.rapid_z,
                        extra_offset,
                    };
                    generate_finishing_toolpath(&sections, &levels, &params, op.tool.number)
                }
            };

            toolpath.operation_name = op.name.clone();
            reporter.report(ProgressEvent::ToolpathComplete {
                name: op.name.clone(),
                segment_count: toolpath.segments.len(),
            });
            toolpaths.push(toolpath);
        }

        reporter.report(ProgressEvent::JobComplete {
            toolpath_count: toolpaths.len(),
        });
        Ok(toolpaths)
    }
}

/// Translate `mesh` so its Z-max sits at `stock.z_top` and its XY
/// bounding box is centred within the stock footprint's margin.
fn orient_mesh_to_stock(mesh: TriangleMesh, stock: &Stock) -> TriangleMesh {
    let Some((min, max)) = mesh.bounds() else {
        return mesh;
    };
    let dz = stock.z_top - max[2];

    let part_w = max[0] - min[0];
    let part_h = max[1] - min[1];
    let dx = stock.x_origin + (stock.x_size - part_w) / 2.0 - min[0];
    let dy = stock.y_origin + (stock.y_size - part_h) / 2.0 - min[1];

    mesh.translate(dx, dy, dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcam_core::{Triangle, ToolKind};

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

    fn endmill() -> Tool {
        Tool::new(1, "1/2in endmill", ToolKind::FlatEndmill, 0.5).unwrap()
    }

    fn roughing_op() -> Operation {
        Operation::new(
            "rough",
            endmill(),
            Strategy::Roughing {
                step_over_fraction: 0.4,
                finish_allowance: 0.0,
                raster_angle: 0.0,
            },
            0.0,
            -0.5,
            0.1,
            0.1,
            0.5,
            3000,
            20.0,
            5.0,
        )
        .unwrap()
    }

    #[test]
    fn test_operation_rejects_nonpositive_step_down() {
        let err = Operation::new(
            "bad",
            endmill(),
            Strategy::Finishing { extra_offset: 0.0 },
            0.0,
            -0.5,
            0.0,
            0.1,
            0.5,
            3000,
            20.0,
            5.0,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_operation_rejects_inverted_z_range() {
        let err = Operation::new(
            "bad",
            endmill(),
            Strategy::Finishing { extra_offset: 0.0 },
            -1.0,
            0.0,
            0.1,
            0.1,
            0.5,
            3000,
            20.0,
            5.0,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_operation_rejects_step_over_fraction_out_of_range() {
        let err = Operation::new(
            "bad",
            endmill(),
            Strategy::Roughing {
                step_over_fraction: 1.5,
                finish_allowance: 0.0,
                raster_angle: 0.0,
            },
            0.0,
            -0.5,
            0.1,
            0.1,
            0.5,
            3000,
            20.0,
            5.0,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_step_over_none_for_finishing() {
        let op = Operation::new(
            "finish",
            endmill(),
            Strategy::Finishing { extra_offset: 0.0 },
            0.0,
            -0.5,
            0.1,
            0.1,
            0.5,
            3000,
            20.0,
            5.0,
        )
        .unwrap();
        assert!(op.step_over().is_none());
    }

    #[test]
    fn test_step_over_computed_from_diameter() {
        let op = roughing_op();
        assert!((op.step_over().unwrap() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_compute_toolpaths_fails_without_mesh() {
        let mut job = Job::new("test", Unit::Inches);
        job.set_stock(Stock::new(2.0, 2.0, 1.0).unwrap());
        job.add_operation(roughing_op());
        assert!(matches!(
            job.compute_toolpaths(),
            Err(PipelineError::MissingMesh)
        ));
    }

    #[test]
    fn test_compute_toolpaths_fails_without_stock() {
        let mut job = Job::new("test", Unit::Inches);
        job.add_operation(roughing_op());
        let err = job.compute_toolpaths();
        assert!(matches!(err, Err(PipelineError::MissingStock)));
    }

    #[test]
    fn test_set_model_requires_stock_first() {
        let mut job = Job::new("test", Unit::Inches);
        assert!(matches!(
            job.set_model(unit_cube()),
            Err(PipelineError::MissingStock)
        ));
    }

    #[test]
    fn test_orient_mesh_centers_and_lands_top_at_zero() {
        let stock = Stock::new(2.0, 2.0, 1.0).unwrap();
        let mesh = orient_mesh_to_stock(unit_cube(), &stock);
        let (min, max) = mesh.bounds().unwrap();
        assert!((max[2] - 0.0).abs() < 1e-9);
        // Cube is 1x1, stock is 2x2: margin 0.5 on each side.
        assert!((min[0] - 0.5).abs() < 1e-9);
        assert!((min[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_compute_toolpaths_end_to_end() {
        let mut job = Job::new("cube job", Unit::Inches);
        job.set_stock(Stock::new(2.0, 2.0, 1.0).unwrap());
        job.set_model(unit_cube()).unwrap();
        job.add_operation(roughing_op());

        let toolpaths = job.compute_toolpaths().unwrap();
        assert_eq!(toolpaths.len(), 1);
        assert_eq!(toolpaths[0].operation_name, "rough");
        assert_eq!(toolpaths[0].tool_number, 1);
    }

    #[test]
    fn test_reporter_receives_events() {
        struct Collector(std::sync::Mutex<Vec<String>>);
        impl ProgressReporter for Collector {
            fn report(&self, event: ProgressEvent) {
                self.0.lock().unwrap().push(format!("{event:?}"));
            }
        }

        let mut job = Job::new("cube job", Unit::Inches);
        job.set_stock(Stock::new(2.0, 2.0, 1.0).unwrap());
        job.set_model(unit_cube()).unwrap();
        job.add_operation(roughing_op());

        let collector = Collector(std::sync::Mutex::new(Vec::new()));
        job.compute_toolpaths_with_reporter(&collector).unwrap();
        let events = collector.0.into_inner().unwrap();
        assert!(events.iter().any(|e| e.contains("OperationStarted")));
        assert!(events.iter().any(|e| e.contains("JobComplete")));
    }
}
