//! Active run record
//!
//! Owned by the run-management component. Only `runID` and
//! `customData.layout` are interpreted here; everything else is carried
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRun {
    #[serde(rename = "runID", deserialize_with = "lenient::id_string")]
    pub run_id: String,

    #[serde(
        rename = "customData",
        default,
        deserialize_with = "lenient::null_as_default"
    )]
    pub custom_data: RunCustomData,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunCustomData {
    #[serde(
        default,
        deserialize_with = "lenient::non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub layout: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActiveRun {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            custom_data: RunCustomData::default(),
            extra: Map::new(),
        }
    }

    pub fn with_layout(mut self, code: impl Into<String>) -> Self {
        self.custom_data.layout = Some(code.into());
        self
    }

    /// Layout code requested by this run, if any.
    pub fn layout_code(&self) -> Option<&str> {
        self.custom_data.layout.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_layout() {
        let run: ActiveRun = serde_json::from_str(
            r#"{"runID": 42, "game": "Celeste", "customData": {"layout": "16_9", "info": "x"}}"#,
        )
        .unwrap();
        assert_eq!(run.run_id, "42");
        assert_eq!(run.layout_code(), Some("16_9"));
        assert_eq!(run.extra.get("game"), Some(&Value::from("Celeste")));
        assert_eq!(run.custom_data.extra.get("info"), Some(&Value::from("x")));
    }

    #[test]
    fn test_parse_run_without_custom_data() {
        let missing: ActiveRun = serde_json::from_str(r#"{"runID": "abc"}"#).unwrap();
        let null: ActiveRun =
            serde_json::from_str(r#"{"runID": "abc", "customData": null}"#).unwrap();
        let empty: ActiveRun =
            serde_json::from_str(r#"{"runID": "abc", "customData": {"layout": ""}}"#).unwrap();
        assert!(missing.layout_code().is_none());
        assert!(null.layout_code().is_none());
        assert!(empty.layout_code().is_none());
    }
}
