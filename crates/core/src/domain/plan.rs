// Plan records

use super::capabilities::CapabilitiesMap;
use serde::{Deserialize, Serialize};

/// One environment file enabled for a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentPath {
    pub path: String,
}

/// Variables of the workflow environment backing a plan
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanVariables {
    pub environments: Vec<EnvironmentPath>,
    pub template: String,
}

impl PlanVariables {
    /// Initial variables of a new plan: only the root environment is enabled.
    /// Files listed under topics stay optional until selected.
    pub fn from_capabilities(map: &CapabilitiesMap) -> Self {
        Self {
            environments: vec![EnvironmentPath {
                path: map.root_environment.clone(),
            }],
            template: map.root_template.clone(),
        }
    }

    /// Variables document in the workflow's `{"key": value}` spacing
    pub fn to_json(&self) -> serde_json::Result<String> {
        super::json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_capabilities() {
        let map = CapabilitiesMap::parse(
            "capabilities-map.yaml",
            r#"
root_template: /path/to/overcloud.yaml
root_environment: /path/to/environment.yaml
topics:
  - environment_groups:
      - environments:
          - file: /path/to/network-isolation.json
"#,
        )
        .unwrap();

        let vars = PlanVariables::from_capabilities(&map);
        assert_eq!(
            vars.to_json().unwrap(),
            r#"{"environments": [{"path": "/path/to/environment.yaml"}], "template": "/path/to/overcloud.yaml"}"#
        );
    }
}
