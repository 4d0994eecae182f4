use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::deep_merge;

/// Viewing context the host renders a control in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlState {
    #[default]
    FormView,
    Print,
    Tooltip,
    HistoryView,
    Editable,
}

impl ControlState {
    /// States that never allow editing, regardless of rights or field configuration.
    pub fn forces_read_only(self) -> bool {
        matches!(
            self,
            ControlState::Print | ControlState::Tooltip | ControlState::HistoryView
        )
    }
}

/// One selectable entry of a field's choice set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Choice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Domain-specific choice set configured on a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceSet {
    pub choices: Vec<Choice>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChoiceSet {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self {
            choices,
            extra: Map::new(),
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.choices.iter().position(|choice| choice.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Field-type specific configuration saved with the field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldParameter {
    /// Admin override forcing read-only rendering.
    pub readonly: bool,
    pub allow_resize: bool,
    pub hide_fullscreen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChoiceSet>,
    /// Value used when nothing has been saved yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_content: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FieldParameter {
    fn default() -> Self {
        Self {
            readonly: false,
            allow_resize: true,
            hide_fullscreen: false,
            options: None,
            initial_content: None,
            extra: Map::new(),
        }
    }
}

/// Merged options driving one control instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlOptions {
    pub placeholder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub control_state: ControlState,
    pub can_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<u64>,
    pub parameter: FieldParameter,
    /// Value as stored by the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_value: Option<String>,
    pub is_item: bool,
    pub is_form: bool,
    pub is_print: bool,
    pub is_tooltip: bool,
    /// Version shown when rendering history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_history: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            help: None,
            control_state: ControlState::FormView,
            can_edit: false,
            field_type: None,
            field_id: None,
            parameter: FieldParameter::default(),
            field_value: None,
            is_item: false,
            is_form: false,
            is_print: false,
            is_tooltip: false,
            is_history: None,
            extra: Map::new(),
        }
    }
}

impl ControlOptions {
    /// Deep-merge caller options over the static defaults. Nested objects such as
    /// `parameter` merge key by key; caller values win on every shared key.
    pub fn merged(options: &Value) -> Result<Self, serde_json::Error> {
        let defaults = serde_json::to_value(Self::default())?;
        serde_json::from_value(deep_merge(defaults, options.clone()))
    }

    /// Options for a configuration that does not deserialize. Every engine flag keeps its
    /// default; only the entries that name the field are read from `options`.
    pub fn labels_only(options: &Map<String, Value>) -> Self {
        let text = |key: &str| options.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            placeholder: text("placeholder").unwrap_or_default(),
            help: text("help"),
            field_type: text("fieldType"),
            field_id: options.get("fieldId").and_then(Value::as_u64),
            ..Self::default()
        }
    }

    /// Label shown in the help block.
    pub fn field_label(&self) -> String {
        match (&self.help, self.field_id) {
            (Some(help), _) if !help.is_empty() => help.clone(),
            (_, Some(id)) => format!("field {id}"),
            _ => self.placeholder.clone(),
        }
    }

    pub fn field_id_label(&self) -> String {
        self.field_id
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_static_control_defaults() {
        let options = ControlOptions::merged(&json!({})).unwrap();
        assert_eq!(options.control_state, ControlState::FormView);
        assert!(!options.can_edit);
        assert!(!options.parameter.readonly);
        assert!(options.parameter.allow_resize);
        assert!(!options.parameter.hide_fullscreen);
    }

    #[test]
    fn labels_survive_a_broken_configuration() {
        let raw = json!({
            "help": "Prio",
            "fieldId": 9,
            "canEdit": true,
            "parameter": {"readonly": "no"}
        });
        assert!(ControlOptions::merged(&raw).is_err());
        let options = ControlOptions::labels_only(raw.as_object().unwrap());
        assert_eq!(options.field_label(), "Prio");
        assert_eq!(options.field_id, Some(9));
        assert!(!options.can_edit);
        assert_eq!(options.parameter, FieldParameter::default());
    }

    #[test]
    fn parameter_merges_key_by_key() {
        let options = ControlOptions::merged(&json!({
            "canEdit": true,
            "parameter": {"readonly": true, "options": {"choices": [{"id": "A"}]}}
        }))
        .unwrap();
        assert!(options.can_edit);
        assert!(options.parameter.readonly);
        assert!(options.parameter.allow_resize);
        assert_eq!(options.parameter.options.unwrap().choices[0].id, "A");
    }

    #[test]
    fn unknown_keys_survive_in_extra() {
        let options = ControlOptions::merged(&json!({
            "id": "REQ-1",
            "parameter": {"columns": 3}
        }))
        .unwrap();
        assert_eq!(options.extra["id"], json!("REQ-1"));
        assert_eq!(options.parameter.extra["columns"], json!(3));
    }

    #[test]
    fn read_only_states() {
        assert!(ControlState::Print.forces_read_only());
        assert!(ControlState::Tooltip.forces_read_only());
        assert!(ControlState::HistoryView.forces_read_only());
        assert!(!ControlState::FormView.forces_read_only());
        assert!(!ControlState::Editable.forces_read_only());
    }
}
