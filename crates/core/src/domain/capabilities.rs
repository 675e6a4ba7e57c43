// Capabilities map - plan template/environment description
//
// Parsed by hand from a YAML value so every failure maps onto the exact
// message the plan actions report.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Failure to read a capabilities map. `Display` is the user-facing message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilitiesError {
    #[error("Error parsing the yaml file: {0}")]
    Parse(String),

    #[error("{object} missing key: '{key}'")]
    MissingKey { object: String, key: String },

    #[error("Error occurred creating plan: {0}")]
    Malformed(String),
}

type Result<T> = std::result::Result<T, CapabilitiesError>;

/// Capabilities map of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitiesMap {
    pub root_template: String,
    pub root_environment: String,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub title: Option<String>,
    pub description: Option<String>,
    pub environment_groups: Vec<EnvironmentGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentGroup {
    pub title: Option<String>,
    pub description: Option<String>,
    pub environments: Vec<EnvironmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentEntry {
    pub file: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl CapabilitiesMap {
    /// Parse a capabilities map document
    ///
    /// # Arguments
    /// * `object_name` - Object the document was read from (used in missing-key messages)
    /// * `document` - Raw YAML text
    pub fn parse(object_name: &str, document: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(document)
            .map_err(|e| CapabilitiesError::Parse(e.to_string()))?;

        let map = root.as_mapping().ok_or_else(|| {
            CapabilitiesError::Malformed(format!(
                "capabilities map must be a mapping, found {}",
                kind(&root)
            ))
        })?;

        let root_template = required_string(map, object_name, "root_template")?;
        let root_environment = required_string(map, object_name, "root_environment")?;
        let topics = parse_topics(map.get("topics"))?;

        Ok(Self {
            root_template,
            root_environment,
            topics,
        })
    }

    /// Environment files offered by the topics, in document order
    pub fn optional_environment_files(&self) -> Vec<&str> {
        self.topics
            .iter()
            .flat_map(|topic| topic.environment_groups.iter())
            .flat_map(|group| group.environments.iter())
            .map(|entry| entry.file.as_str())
            .collect()
    }
}

fn required_string(map: &Mapping, object_name: &str, key: &str) -> Result<String> {
    let value = map.get(key).ok_or_else(|| CapabilitiesError::MissingKey {
        object: object_name.to_string(),
        key: key.to_string(),
    })?;

    scalar_string(value).ok_or_else(|| {
        CapabilitiesError::Malformed(format!("{} must be a string, found {}", key, kind(value)))
    })
}

fn parse_topics(value: Option<&Value>) -> Result<Vec<Topic>> {
    sequence(value, "topics")?
        .iter()
        .filter(|item| !item.is_null())
        .map(|item| {
            let topic = mapping(item, "topic")?;
            Ok(Topic {
                title: optional_string(topic.get("title")),
                description: optional_string(topic.get("description")),
                environment_groups: parse_groups(topic.get("environment_groups"))?,
            })
        })
        .collect()
}

fn parse_groups(value: Option<&Value>) -> Result<Vec<EnvironmentGroup>> {
    sequence(value, "environment_groups")?
        .iter()
        .filter(|item| !item.is_null())
        .map(|item| {
            let group = mapping(item, "environment group")?;
            Ok(EnvironmentGroup {
                title: optional_string(group.get("title")),
                description: optional_string(group.get("description")),
                environments: parse_environments(group.get("environments"))?,
            })
        })
        .collect()
}

fn parse_environments(value: Option<&Value>) -> Result<Vec<EnvironmentEntry>> {
    let mut entries = Vec::new();

    for item in sequence(value, "environments")? {
        if item.is_null() {
            continue;
        }

        let entry = mapping(item, "environment")?;
        let file = match optional_string(entry.get("file")) {
            Some(file) if !file.is_empty() => file,
            _ => continue,
        };

        entries.push(EnvironmentEntry {
            file,
            title: optional_string(entry.get("title")),
            description: optional_string(entry.get("description")),
        });
    }

    Ok(entries)
}

// Missing and null sequences are empty
fn sequence<'a>(value: Option<&'a Value>, what: &str) -> Result<&'a [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Sequence(items)) => Ok(items.as_slice()),
        Some(other) => Err(CapabilitiesError::Malformed(format!(
            "{} must be a list, found {}",
            what,
            kind(other)
        ))),
    }
}

fn mapping<'a>(value: &'a Value, what: &str) -> Result<&'a Mapping> {
    value.as_mapping().ok_or_else(|| {
        CapabilitiesError::Malformed(format!("{} must be a mapping, found {}", what, kind(value)))
    })
}

fn optional_string(value: Option<&Value>) -> Option<String> {
    value.and_then(scalar_string)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
