use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("Unknown scope: {0}")]
    UnknownScope(String),

    #[error("Unknown scene type: {0}")]
    UnknownSceneType(String),

    #[error("Unknown session level: {0}")]
    UnknownSessionLevel(String),
}

pub type Result<T> = std::result::Result<T, TargetError>;
