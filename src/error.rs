use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid chart spec: {0}")]
    InvalidSpec(String),

    #[error("primary renderer is not available in this environment")]
    RendererUnavailable,

    #[error("primary renderer failed: {0}")]
    RendererFailed(String),

    #[error("compute job failed: {0}")]
    JobFailed(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("export unavailable: {0}")]
    ExportUnavailable(String),
}
