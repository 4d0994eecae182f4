use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::control::FieldParameter;

/// Effective parameters of one print function invocation.
pub type PrintParams = Map<String, Value>;

/// Snapshot of one stored field handed over by the print pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldInfo {
    /// Name of the field definition; required for rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub field_id: String,
    pub json_config: FieldParameter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_value: Option<Value>,
}

/// Parameters the print pipeline passes for a single field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintCallerParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_info: Option<FieldInfo>,
    /// Caller-level parameter layer.
    #[serde(flatten)]
    pub params: PrintParams,
}

/// Override layers registered per print function id, one map per scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOverrides {
    pub customer: IndexMap<String, PrintParams>,
    pub project: IndexMap<String, PrintParams>,
    pub section: IndexMap<String, PrintParams>,
}

impl PrintOverrides {
    pub fn with_customer(mut self, function_id: impl Into<String>, params: PrintParams) -> Self {
        self.customer.insert(function_id.into(), params);
        self
    }

    pub fn with_project(mut self, function_id: impl Into<String>, params: PrintParams) -> Self {
        self.project.insert(function_id.into(), params);
        self
    }

    pub fn with_section(mut self, function_id: impl Into<String>, params: PrintParams) -> Self {
        self.section.insert(function_id.into(), params);
        self
    }
}
