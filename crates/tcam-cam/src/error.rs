use thiserror::Error;

#[derive(Debug, Error)]
pub enum CamError {
    /// Z-level generation given a non-positive step-down or inverted
    /// depths, or an operation constructed with an impossible range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Core(#[from] tcam_core::Error),
}
