#![deny(rust_2018_idioms)]

pub mod config;
pub mod control;
pub mod domain;
pub mod io;
pub mod plugin;
pub mod presentation;
pub mod settings;


pub use config::{OverrideLayers, OverrideScope, field_function_id, resolve_print_params};
pub use control::{Control, ControlError, FieldControl};
pub use domain::{
    Choice, ChoiceSet, ControlOptions, ControlState, FieldInfo, FieldParameter, FieldValue,
    PrintCallerParams, PrintOverrides, PrintParams, ValueKind,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit_text, parse_document_str,
    serialize_document, text_to_plain,
};
pub use plugin::{FieldDescription, Plugin, PluginConfig, SettingsPageDescriptor};
pub use presentation::Markup;
pub use settings::{
    AdvancedEditor, CodeValidator, JsonSurface, MemoryHost, PageState, PersistError,
    SettingTarget, SettingsError, SettingsHost, SettingsPage, SettingsScope, SettingsSurface,
};

pub mod prelude {
    pub use super::{
        Control, ControlOptions, DocumentFormat, FieldControl, FieldValue, Plugin, PluginConfig,
        PrintCallerParams, PrintOverrides, SettingsHost, SettingsPage, SettingsScope,
        SettingsSurface,
    };
}
