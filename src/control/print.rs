use super::{engine::Control, hooks::FieldControl};
use crate::config::{field_function_id, resolve_print_params};
use crate::domain::{ControlOptions, ControlState, PrintCallerParams, PrintOverrides};
use crate::presentation::Markup;

/// Function group under which field renderers are listed in the print catalogue.
pub const FIELD_FUNCTION_GROUP: &str = "Field Rendering";

impl<F: FieldControl> Control<F> {
    /// Identity of this control's print function; override layers are keyed by it.
    pub fn print_function_id(&self) -> String {
        field_function_id(self.field.field_type())
    }

    pub fn print_group(&self) -> &'static str {
        FIELD_FUNCTION_GROUP
    }

    pub fn print_name(&self) -> String {
        format!("{} field renderer", self.field.title())
    }

    pub fn print_help(&self) -> String {
        format!(
            "{}\n\nOptions: class (string) selects the print layout of the field.",
            self.field.title()
        )
    }

    /// Batch-print entry point.
    ///
    /// Resolves print parameters across the override scopes, takes configuration and
    /// value from the caller's field snapshot and renders read-only. A missing field
    /// is reported through `on_error` and yields empty markup.
    pub fn render(
        &mut self,
        overrides: &PrintOverrides,
        caller: &PrintCallerParams,
        on_error: &mut dyn FnMut(&str),
    ) -> Markup {
        let params = resolve_print_params(overrides, &self.print_function_id(), &caller.params);

        let Some(info) = caller
            .field_info
            .as_ref()
            .filter(|info| info.field.is_some())
        else {
            on_error("called a field rendering function without passing a field");
            return Markup::default();
        };

        self.settings = ControlOptions {
            field_id: info.field_id.trim().parse().ok(),
            parameter: info.json_config.clone(),
            control_state: ControlState::Print,
            is_print: true,
            ..ControlOptions::default()
        };
        self.original_value = info
            .json_value
            .clone()
            .and_then(|raw| self.field.value_kind().decode(raw));
        self.release_editor();

        self.render_control(true, Some(&params))
    }
}
