pub mod error;
pub mod gcode;
pub mod machine;
pub mod validate;

pub use error::PostError;
pub use gcode::{emit, write_to_file, PostConfig};
pub use machine::{MachineEnvelope, MachineProfile};
pub use validate::{has_errors, validate_toolpaths, Issue, Severity};
