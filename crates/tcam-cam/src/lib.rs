pub mod error;
pub mod finishing;
pub mod raster;
pub mod roughing;
pub mod slicer;
pub mod toolpath;

pub use error::CamError;
pub use finishing::{generate_finishing_toolpath, FinishingParams};
pub use raster::raster_lines;
pub use roughing::{generate_roughing_toolpath, RoughingParams};
pub use slicer::{slice_at_heights, z_levels};
pub use toolpath::{MoveClass, Toolpath, ToolpathPoint, ToolpathSegment};
