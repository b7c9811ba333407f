use thiserror::Error;

/// Errors reported by the engine's handle API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("handle does not refer to a live object")]
    InvalidHandle,

    #[error("handle pool is full")]
    PoolExhausted,

    #[error("scene is already finalized")]
    AlreadyFinalized,

    #[error("scene must be finalized before it can be traced")]
    NotFinalized,

    #[error("{buffer} buffer length {len} is not a multiple of 3")]
    MalformedBuffer { buffer: &'static str, len: usize },

    #[error("index {index} of triangle {triangle} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Errors reported by the benchmark driver
#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("invalid benchmark configuration: {0}")]
    InvalidConfig(&'static str),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
