use thiserror::Error;

/// Errors raised by maze construction, replay, solving and persistence.
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("invalid vertex id {vertex}: it must be in [0, {num_cells})")]
    InvalidVertex { vertex: usize, num_cells: usize },

    #[error("start and end vertices cannot be the same (both are {0})")]
    SameEndpoints(usize),

    #[error("cannot connect {a} to {b}: vertices are not next to each other")]
    IllegalAdjacency { a: usize, b: usize },

    #[error("event index {index} is out of range [0, {len}]")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid maze dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("the maze has no start or no end vertex")]
    MissingEndpoints,

    #[error("incompatible snapshot: expected {expected}, found {found}")]
    IncompatibleSnapshot { expected: String, found: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for MazeError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for MazeError {
    fn from(e: std::io::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
