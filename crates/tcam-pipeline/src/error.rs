use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no mesh has been set on this job")]
    MissingMesh,

    #[error("no stock has been set on this job")]
    MissingStock,

    #[error(transparent)]
    Core(#[from] tcam_core::Error),

    #[error(transparent)]
    Cam(#[from] tcam_cam::CamError),
}
