//! Raw shape of the cluster data file.
//!
//! Only the document structure is strict. Record fields are kept as raw JSON
//! values and records that are not objects are kept aside as `Invalid`;
//! deciding what is usable happens in `normalize`, so a partly broken file
//! still lays out what it can.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::LayoutError;

/// A list item that either has the expected record shape or does not.
#[derive(Debug, Clone, PartialEq)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(Value),
}

/// Accepts any JSON for a list field: an array is read item by item, `null`
/// is an empty list, and anything else becomes a single invalid item.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<Lenient<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };
    Ok(items
        .into_iter()
        .map(|item| match T::deserialize(&item) {
            Ok(record) => Lenient::Valid(record),
            Err(_) => Lenient::Invalid(item),
        })
        .collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapFile {
    #[serde(default, deserialize_with = "lenient_list")]
    pub clusters: Vec<Lenient<ClusterRecord>>,
    /// Optional layout settings embedded next to the data, read by `parse_map`.
    #[serde(default)]
    pub config: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub color: Option<Value>,
    pub grid_position: Option<Value>,
    // `hexCount` and `priority` are ignored: the application list is authoritative.
    #[serde(default, deserialize_with = "lenient_list")]
    pub applications: Vec<Lenient<ApplicationRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub status: Option<Value>,
    pub description: Option<Value>,
    /// A position that fails validation is demoted, not fatal.
    pub grid_position: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub connections: Vec<Lenient<ConnectionRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectionRecord {
    pub to: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub strength: Option<Value>,
}

/// Parse the data file. Only structurally invalid JSON is an error.
pub fn parse_map_file(input: &str) -> Result<MapFile, LayoutError> {
    serde_json::from_str(input).map_err(LayoutError::Parse)
}
