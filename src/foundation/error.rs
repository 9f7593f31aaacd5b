pub type DotqrResult<T> = Result<T, DotqrError>;

#[derive(thiserror::Error, Debug)]
pub enum DotqrError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DotqrError {
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn capacity_exceeded(msg: impl Into<String>) -> Self {
        Self::CapacityExceeded(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
