//! The JSON document sent once per page load

use crate::device::DeviceInfo;
use crate::timing::{NavigationReport, ResourceReport};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Epoch milliseconds captured when the reporter was initialized
    pub timestamp: u64,
    pub device: DeviceInfo,
    pub resource: Vec<ResourceReport>,
    /// Serialized as `{}` when the browser produced no navigation entry
    #[serde(serialize_with = "empty_object_if_none")]
    pub navigation: Option<NavigationReport>,
}

fn empty_object_if_none<S: Serializer>(
    navigation: &Option<NavigationReport>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match navigation {
        Some(report) => report.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

impl Payload {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
