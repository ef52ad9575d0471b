use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid map data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid layout config: {0}")]
    Config(serde_json::Error),
    #[error("Invalid layout config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: &'static str },
}
