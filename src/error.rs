use thiserror::Error;

/// Failures that abort a generation run.
#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),
    #[error("plate count must be at least 1")]
    NoPlates,
    #[error("color count must be at least 1")]
    NoColors,
    #[error("parameter `{name}` out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("can't find tile for tags {0:?}")]
    MissingTile(Vec<String>),
    #[error("bad coordinate key {0:?}")]
    BadKey(String),
    #[error("catalog parse error: {0}")]
    Catalog(#[from] serde_json::Error),
}
