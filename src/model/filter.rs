//! Content filter DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether matching content is kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterRule {
    Allow,
    Deny,
}

/// Kind of content a filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterEntity {
    Package,
    Erratum,
    Module,
}

impl FromStr for FilterRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(FilterRule::Allow),
            "deny" => Ok(FilterRule::Deny),
            other => Err(format!("unknown filter rule '{other}', expected allow or deny")),
        }
    }
}

impl FromStr for FilterEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "package" => Ok(FilterEntity::Package),
            "erratum" => Ok(FilterEntity::Erratum),
            "module" => Ok(FilterEntity::Module),
            other => Err(format!(
                "unknown filter entity '{other}', expected package, erratum or module"
            )),
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterRule::Allow => "allow",
            FilterRule::Deny => "deny",
        })
    }
}

/// Definition of a content filter, used for both create and update.
///
/// When `project_label` is set the server attaches the new filter to that project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_label: Option<String>,
    pub name: String,
    pub entity_type: FilterEntity,
    pub rule: FilterRule,
    pub matcher: String,
    pub criteria_key: String,
    pub criteria_value: String,
}
