mod input;
mod normalize;
mod types;

pub use input::{parse_map_file, Lenient, MapFile};
pub use normalize::normalize;
pub use types::*;

use serde::Deserialize;
use serde_json::Value;

use crate::error::LayoutError;
use crate::layout::LayoutConfig;

/// Parse and normalize a data file in one step, returning any embedded config alongside.
pub fn parse_map(input: &str) -> Result<(MapData, Option<LayoutConfig>), LayoutError> {
    let file = parse_map_file(input)?;
    let data = normalize(&file);
    let config = match &file.config {
        None | Some(Value::Null) => None,
        Some(raw) => Some(LayoutConfig::deserialize(raw).map_err(LayoutError::Config)?),
    };
    Ok((data, config))
}
