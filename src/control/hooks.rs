use std::fmt;

use crossterm::event::KeyEvent;

use crate::domain::{ChoiceSet, FieldValue, PrintParams, ValueKind};
use crate::presentation::Markup;

/// Capabilities a concrete field type plugs into the control engine.
///
/// Rendering, serialization and equality are required; the lifecycle hooks default
/// to doing nothing.
pub trait FieldControl: fmt::Debug {
    /// Field type id this control renders.
    fn field_type(&self) -> &str;

    /// Human readable name used in print-function descriptions.
    fn title(&self) -> String {
        self.field_type().to_string()
    }

    /// Shape of the values this field stores.
    fn value_kind(&self) -> ValueKind;

    /// Choice set used when the field configuration carries none.
    fn default_choices(&self) -> Option<ChoiceSet> {
        None
    }

    /// Static markup for read-only contexts (history, tooltips, print).
    fn render_print(
        &self,
        field_id: &str,
        value: Option<&FieldValue>,
        choices: &ChoiceSet,
        params: Option<&PrintParams>,
    ) -> Markup;

    /// Seed the live editor from `value` and return its interactive markup.
    fn render_editor(
        &mut self,
        field_id: &str,
        value: Option<&FieldValue>,
        choices: &ChoiceSet,
    ) -> Markup;

    /// Editor wiring that runs once after the editable branch was rendered.
    fn init_editor(&mut self) {}

    /// Markup of the live editor without re-seeding it. Field types returning `None`
    /// are redrawn through `render_editor` with their current value.
    fn redraw(&self, field_id: &str) -> Option<Markup> {
        let _ = field_id;
        None
    }

    /// Feed a key to the live editor. Returns true when the editor consumed it.
    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let _ = key;
        false
    }

    /// Current editor value, serialized for storage.
    fn get_value(&self) -> String;

    /// Field-type specific equality of two values.
    fn is_same(&self, a: &FieldValue, b: &FieldValue) -> bool;

    fn refresh(&mut self) {}

    /// Replace the editor value from outside. Returns true when the editor changed.
    fn set_value(&mut self, value: &str, reset: bool) -> bool {
        let _ = (value, reset);
        false
    }

    fn resize_item(&mut self) {}

    fn destroy(&mut self) {}
}

impl FieldControl for Box<dyn FieldControl> {
    fn field_type(&self) -> &str {
        (**self).field_type()
    }

    fn title(&self) -> String {
        (**self).title()
    }

    fn value_kind(&self) -> ValueKind {
        (**self).value_kind()
    }

    fn default_choices(&self) -> Option<ChoiceSet> {
        (**self).default_choices()
    }

    fn render_print(
        &self,
        field_id: &str,
        value: Option<&FieldValue>,
        choices: &ChoiceSet,
        params: Option<&PrintParams>,
    ) -> Markup {
        (**self).render_print(field_id, value, choices, params)
    }

    fn render_editor(
        &mut self,
        field_id: &str,
        value: Option<&FieldValue>,
        choices: &ChoiceSet,
    ) -> Markup {
        (**self).render_editor(field_id, value, choices)
    }

    fn init_editor(&mut self) {
        (**self).init_editor()
    }

    fn redraw(&self, field_id: &str) -> Option<Markup> {
        (**self).redraw(field_id)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        (**self).handle_key(key)
    }

    fn get_value(&self) -> String {
        (**self).get_value()
    }

    fn is_same(&self, a: &FieldValue, b: &FieldValue) -> bool {
        (**self).is_same(a, b)
    }

    fn refresh(&mut self) {
        (**self).refresh()
    }

    fn set_value(&mut self, value: &str, reset: bool) -> bool {
        (**self).set_value(value, reset)
    }

    fn resize_item(&mut self) {
        (**self).resize_item()
    }

    fn destroy(&mut self) {
        (**self).destroy()
    }
}
