/// Contract violations surfaced by the engine's fallible entry points.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("cell ({x}, {y}) is outside the 4x4 board")]
    OutOfRange { x: usize, y: usize },
    #[error("cell ({x}, {y}) holds {value}, which is neither empty nor a power of two >= 2")]
    InvalidTile { x: usize, y: usize, value: u32 },
    #[error("spawn odds must be at least 1 in 1")]
    InvalidSpawnOdds,
    #[error("unknown move {0:?} (expected up/down/left/right or w/s/a/d)")]
    UnknownMove(String),
}
