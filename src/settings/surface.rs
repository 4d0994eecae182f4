use std::fmt;

use ratatui::text::Text;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::io::DocumentFormat;
use crate::presentation::{Markup, settings_lines};

/// Store a settings page reads its stored layer from and saves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsScope {
    Tenant,
    /// Per project; the project comes from the host's current item id.
    Project,
}

/// What distinguishes one settings page from another. Pages override only what they need.
pub trait SettingsSurface {
    type Settings: Serialize + DeserializeOwned + JsonSchema + Clone + Default + fmt::Debug;

    fn scope(&self) -> SettingsScope;

    /// Key the settings are stored under.
    fn setting_name(&self) -> &str;

    fn title(&self) -> String {
        self.setting_name().to_string()
    }

    fn help(&self) -> Option<&str> {
        None
    }

    fn help_url(&self) -> Option<&str> {
        None
    }

    fn show_advanced_button(&self) -> bool {
        true
    }

    fn default_settings(&self) -> Self::Settings {
        Self::Settings::default()
    }

    /// Simple (non-advanced) rendering of the working copy.
    fn settings_dom(&self, settings: &Self::Settings) -> Markup {
        match serde_json::to_value(settings) {
            Ok(value) => Text::from(settings_lines(&value)),
            Err(err) => {
                tracing::warn!(setting = self.setting_name(), error = %err, "settings are not serializable");
                Markup::default()
            }
        }
    }

    /// Format the advanced editor is seeded with and parses back.
    fn advanced_format(&self) -> DocumentFormat {
        DocumentFormat::Json
    }

    /// Schema an advanced edit must satisfy before it is applied.
    fn validation_schema(&self) -> Option<Value> {
        serde_json::to_value(schemars::schema_for!(Self::Settings)).ok()
    }
}

/// Untyped settings page described entirely by data, e.g. a plugin page feature.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSurface {
    pub scope: SettingsScope,
    pub setting_name: String,
    pub title: String,
    pub help: Option<String>,
    pub help_url: Option<String>,
    pub defaults: Value,
    pub format: DocumentFormat,
}

impl JsonSurface {
    pub fn new(scope: SettingsScope, setting_name: impl Into<String>) -> Self {
        let setting_name = setting_name.into();
        Self {
            scope,
            title: setting_name.clone(),
            setting_name,
            help: None,
            help_url: None,
            defaults: json!({}),
            format: DocumentFormat::Json,
        }
    }

    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }
}

impl SettingsSurface for JsonSurface {
    type Settings = Value;

    fn scope(&self) -> SettingsScope {
        self.scope
    }

    fn setting_name(&self) -> &str {
        &self.setting_name
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    fn help_url(&self) -> Option<&str> {
        self.help_url.as_deref()
    }

    fn default_settings(&self) -> Value {
        self.defaults.clone()
    }

    fn advanced_format(&self) -> DocumentFormat {
        self.format
    }

    fn validation_schema(&self) -> Option<Value> {
        Some(json!({"type": "object"}))
    }
}
