use serde::{Deserialize, Serialize};

/// Runtime version descriptor as returned by `state_getRuntimeVersion`.
///
/// Only the fields this client acts on are kept; `apis` and anything newer
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    #[serde(default)]
    pub spec_name: String,
    #[serde(default)]
    pub impl_name: String,
    #[serde(default)]
    pub authoring_version: u32,
    pub spec_version: u32,
    #[serde(default)]
    pub impl_version: u32,
    #[serde(default)]
    pub transaction_version: u32,
}
