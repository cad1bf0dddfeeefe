use formats::AssetError;

#[derive(Debug, thiserror::Error)]
pub enum GlobeError {
    #[error("asset load failed: {0}")]
    Asset(#[from] AssetError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("viewport must be non-empty and finite, got {width}x{height} @ {dpr}")]
    EmptyViewport { width: f64, height: f64, dpr: f64 },

    #[error("unknown focus region `{0}`")]
    UnknownRegion(String),

    #[error("input queue full ({max_len} pending commands)")]
    QueueFull { max_len: usize },
}
