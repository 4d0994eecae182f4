use std::fmt;

use crossterm::event::KeyEvent;
use serde_json::Value;

use super::{error::ControlError, hooks::FieldControl};
use crate::domain::{ChoiceSet, ControlOptions, FieldValue, PrintParams};
use crate::presentation::{Markup, config_error, config_invalid, control_frame, help_block};

type ValueChanged = Box<dyn FnMut()>;

/// Lifecycle engine around one field instance.
///
/// `init` chooses between the read-only and the editable branch and records the
/// value seen at load time; `has_changed` later compares the live editor value with
/// that baseline using the field type's equality.
pub struct Control<F: FieldControl> {
    pub(super) field: F,
    pub(super) settings: ControlOptions,
    pub(super) original_value: Option<FieldValue>,
    editor: Option<Markup>,
    root: Markup,
    value_changed: Option<ValueChanged>,
}

impl<F: FieldControl> fmt::Debug for Control<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("field", &self.field)
            .field("settings", &self.settings)
            .field("original_value", &self.original_value)
            .field("editing", &self.editor.is_some())
            .finish()
    }
}

impl<F: FieldControl> Control<F> {
    pub fn new(field: F) -> Self {
        Self {
            field,
            settings: ControlOptions::default(),
            original_value: None,
            editor: None,
            root: Markup::default(),
            value_changed: None,
        }
    }

    /// Callback fired whenever the live editor value changes.
    pub fn with_value_changed(mut self, callback: impl FnMut() + 'static) -> Self {
        self.value_changed = Some(Box::new(callback));
        self
    }

    /// Merge `options` over the control defaults and render the field.
    ///
    /// Options that do not deserialize still render: the help block plus an inline
    /// configuration error, with no editor. Only non-object options are an error.
    pub fn init(&mut self, options: &Value) -> Result<(), ControlError> {
        let fields = options
            .as_object()
            .ok_or_else(|| ControlError::NotAnObject(json_kind(options)))?;
        self.editor = None;
        self.settings = match ControlOptions::merged(options) {
            Ok(settings) => settings,
            Err(err) => {
                self.settings = ControlOptions::labels_only(fields);
                self.original_value = None;
                tracing::warn!(
                    field_id = ?self.settings.field_id,
                    error = %err,
                    "control options are invalid; falling back to defaults"
                );
                self.root = control_frame(
                    help_block(&self.settings),
                    &config_invalid(&self.field_id()),
                );
                return Ok(());
            }
        };
        self.original_value = self
            .settings
            .field_value
            .as_deref()
            .and_then(|raw| self.field.value_kind().deserialize(raw));

        let help = help_block(&self.settings);
        let body = if self.is_read_only() {
            tracing::debug!(
                field_id = ?self.settings.field_id,
                state = ?self.settings.control_state,
                "rendering read-only control"
            );
            self.render_control(true, None)
        } else {
            match self.resolve_inputs() {
                Some((choices, value)) => {
                    let field_id = self.field_id();
                    let markup = self
                        .field
                        .render_editor(&field_id, value.as_ref(), &choices);
                    self.editor = Some(markup.clone());
                    self.field.init_editor();
                    tracing::debug!(field_id = ?self.settings.field_id, "editor initialized");
                    markup
                }
                None => config_error(&self.field_id()),
            }
        };
        self.root = control_frame(help, &body);
        Ok(())
    }

    /// Read-only wins on any qualifying condition: a non-editable view state,
    /// missing edit rights, or an admin `readonly` flag.
    pub fn is_read_only(&self) -> bool {
        self.settings.control_state.forces_read_only()
            || !self.settings.can_edit
            || self.settings.parameter.readonly
    }

    /// Resolve choices and value and dispatch to the matching rendering hook.
    /// A field without any choice set renders a configuration-error placeholder.
    pub fn render_control(&mut self, read_only: bool, params: Option<&PrintParams>) -> Markup {
        let Some((choices, value)) = self.resolve_inputs() else {
            return config_error(&self.field_id());
        };
        let field_id = self.field_id();
        if read_only {
            self.field
                .render_print(&field_id, value.as_ref(), &choices, params)
        } else {
            self.field.render_editor(&field_id, value.as_ref(), &choices)
        }
    }

    fn resolve_inputs(&self) -> Option<(ChoiceSet, Option<FieldValue>)> {
        let parameter = &self.settings.parameter;
        let Some(choices) = parameter
            .options
            .clone()
            .or_else(|| self.field.default_choices())
        else {
            tracing::warn!(field_id = ?self.settings.field_id, "field has no choice set");
            return None;
        };

        let value = self.original_value.clone().or_else(|| {
            parameter
                .initial_content
                .clone()
                .and_then(|raw| self.field.value_kind().decode(raw))
        });
        if value.is_none() {
            tracing::debug!(field_id = ?self.settings.field_id, "field has no default value");
        }
        Some((choices, value))
    }

    /// Serialized editor value as handed to the host for storage.
    pub fn get_value(&self) -> String {
        self.field.get_value()
    }

    /// True when an editor is active and its value differs from the load-time value.
    pub fn has_changed(&self) -> bool {
        if self.editor.is_none() {
            return false;
        }
        let current = self.field.value_kind().deserialize(&self.field.get_value());
        match (&self.original_value, current) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(original), Some(current)) => !self.field.is_same(original, &current),
        }
    }

    /// Route a key to the live editor. Returns true when the editor consumed it.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.editor.is_none() {
            return false;
        }
        let before = self.field.get_value();
        if !self.field.handle_key(key) {
            return false;
        }
        self.redraw_editor();
        if self.field.get_value() != before {
            self.notify_value_changed();
        }
        true
    }

    pub fn refresh(&mut self) {
        self.field.refresh();
    }

    /// Force a new editor value from outside the control.
    pub fn set_value(&mut self, value: &str, reset: bool) {
        if self.field.set_value(value, reset) && self.editor.is_some() {
            self.redraw_editor();
            self.notify_value_changed();
        }
    }

    pub fn resize_item(&mut self) {
        self.field.resize_item();
    }

    /// Tear down the editor. Later `has_changed` calls report false.
    pub fn destroy(&mut self) {
        self.field.destroy();
        self.editor = None;
    }

    pub fn settings(&self) -> &ControlOptions {
        &self.settings
    }

    pub fn original_value(&self) -> Option<&FieldValue> {
        self.original_value.as_ref()
    }

    /// Help block plus control body, as produced by the last `init`.
    pub fn markup(&self) -> &Markup {
        &self.root
    }

    pub fn editor(&self) -> Option<&Markup> {
        self.editor.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    pub(super) fn field_id(&self) -> String {
        self.settings.field_id_label()
    }

    pub(super) fn release_editor(&mut self) {
        self.editor = None;
    }

    fn redraw_editor(&mut self) {
        let field_id = self.field_id();
        let markup = match self.field.redraw(&field_id) {
            Some(markup) => markup,
            None => {
                let Some((choices, _)) = self.resolve_inputs() else {
                    return;
                };
                let current = self.field.value_kind().deserialize(&self.field.get_value());
                self.field
                    .render_editor(&field_id, current.as_ref(), &choices)
            }
        };
        self.root = control_frame(help_block(&self.settings), &markup);
        self.editor = Some(markup);
    }

    fn notify_value_changed(&mut self) {
        if let Some(callback) = self.value_changed.as_mut() {
            callback();
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
