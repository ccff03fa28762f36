use serde::{Deserialize, Serialize};

/// Payload for appending an environment to a project's lifecycle.
///
/// Without `predecessor_label` the environment becomes the first in the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCreate {
    pub project_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor_label: Option<String>,
    pub label: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for renaming or re-describing an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentUpdate {
    pub project_label: String,
    pub label: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload identifying the environment to remove.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDelete {
    pub project_label: String,
    pub environment_label: String,
}
