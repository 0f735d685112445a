use thiserror::Error;

/// Kinds raised by `tcam-core` itself: invalid parameters on construction
/// (bad Z ranges, non-positive step-downs, zero/negative tool diameters) and
/// I/O around the tool library. Geometry failures are never surfaced here —
/// they are recovered locally in `tcam-cam` by substituting the empty
/// contour.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("value out of range: {name} = {value} (expected {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
