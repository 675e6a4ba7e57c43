// Action Result - success payload or a user-facing error message

use serde::{Deserialize, Serialize};

/// Outcome of an action that completed without a propagated failure.
///
/// Serialized as `{"data": ...}` or `{"error": "..."}` so the workflow
/// engine can branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult<T> {
    Data(T),
    Error(String),
}

impl<T> ActionResult<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            Self::Data(_) => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            Self::Data(data) => ActionResult::Data(f(data)),
            Self::Error(message) => ActionResult::Error(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let ok: ActionResult<Vec<String>> = ActionResult::Data(vec!["overcloud".to_string()]);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"data": ["overcloud"]})
        );

        let err: ActionResult<Vec<String>> = ActionResult::error("boom");
        assert_eq!(serde_json::to_value(&err).unwrap(), json!({"error": "boom"}));
    }

    #[test]
    fn test_accessors() {
        let err: ActionResult<i32> = ActionResult::error("nope");
        assert!(err.is_error());
        assert_eq!(err.error_message(), Some("nope"));
        assert_eq!(err.data(), None);

        let ok = ActionResult::Data(2).map(|v| v * 2);
        assert!(!ok.is_error());
        assert_eq!(ok.into_data(), Some(4));
    }
}
