use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::io::{DocumentFormat, parse_document_str};
use crate::settings::{JsonSurface, SettingsScope};

/// Which plugin features are active and how they present themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    pub field: FieldFeature,
    pub customer_settings_page: PageFeature,
    pub project_settings_page: PageFeature,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            field: FieldFeature::default(),
            customer_settings_page: PageFeature {
                id: "fieldctlCustomerSettings".to_string(),
                title: "Field controls - server settings".to_string(),
                page_type: "fieldctlCustomerSettings".to_string(),
                setting_name: "fieldctlCustomerSettings".to_string(),
                ..PageFeature::default()
            },
            project_settings_page: PageFeature {
                id: "fieldctlProjectSettings".to_string(),
                title: "Field controls - project settings".to_string(),
                page_type: "fieldctlProjectSettings".to_string(),
                setting_name: "fieldctlProjectSettings".to_string(),
                ..PageFeature::default()
            },
        }
    }
}

impl PluginConfig {
    /// Load a configuration document. Missing keys keep their defaults.
    pub fn from_document_str(contents: &str, format: DocumentFormat) -> Result<Self> {
        let value = parse_document_str(contents, format)?;
        serde_json::from_value(value).context("invalid plugin configuration")
    }
}

/// Field rendering feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldFeature {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Field types to offer; empty means every registered type.
    pub field_types: Vec<String>,
    /// Descriptions replacing the registry's generated ones, matched by `id`.
    pub field_config_options: Vec<FieldDescription>,
}

impl Default for FieldFeature {
    fn default() -> Self {
        Self {
            enabled: true,
            id: None,
            title: None,
            field_types: Vec::new(),
            field_config_options: Vec::new(),
        }
    }
}

impl FieldFeature {
    pub fn offers(&self, field_type: &str) -> bool {
        self.field_types.is_empty() || self.field_types.iter().any(|ty| ty == field_type)
    }

    pub fn description_for(&self, field_type: &str) -> Option<&FieldDescription> {
        self.field_config_options
            .iter()
            .find(|description| description.id == field_type)
    }
}

/// Capabilities of one field type as listed in the host's field designer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDescription {
    /// The field type.
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub capabilities: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldDescription {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Self::default()
        }
    }
}

/// Tenant or project settings page feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageFeature {
    pub enabled: bool,
    pub id: String,
    pub title: String,
    /// Node type in the host's settings tree.
    #[serde(rename = "type")]
    pub page_type: String,
    /// Key the settings are persisted under.
    pub setting_name: String,
    pub default_settings: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
}

impl Default for PageFeature {
    fn default() -> Self {
        Self {
            enabled: true,
            id: String::new(),
            title: String::new(),
            page_type: String::new(),
            setting_name: String::new(),
            default_settings: json!({}),
            help: None,
            help_url: None,
        }
    }
}

impl PageFeature {
    /// Data-driven settings surface for this page.
    pub fn surface(&self, scope: SettingsScope) -> JsonSurface {
        let mut surface = JsonSurface::new(scope, self.setting_name.clone())
            .with_defaults(self.default_settings.clone());
        if !self.title.is_empty() {
            surface.title = self.title.clone();
        }
        surface.help = self.help.clone();
        surface.help_url = self.help_url.clone();
        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = PluginConfig::from_document_str(
            r#"{"projectSettingsPage": {"enabled": false}, "field": {"fieldTypes": ["choice"]}}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        assert!(config.field.enabled);
        assert!(config.field.offers("choice"));
        assert!(!config.field.offers("text"));
        assert!(config.customer_settings_page.enabled);
        assert!(!config.project_settings_page.enabled);
    }

    #[test]
    fn page_feature_reads_type_key() {
        let config = PluginConfig::from_document_str(
            r#"{"customerSettingsPage": {"type": "demo", "settingName": "demo", "helpUrl": "https://example.test"}}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        let page = &config.customer_settings_page;
        assert_eq!(page.page_type, "demo");
        let surface = page.surface(SettingsScope::Tenant);
        assert_eq!(surface.setting_name, "demo");
        assert_eq!(surface.help_url.as_deref(), Some("https://example.test"));
    }

    #[test]
    fn rejects_wrong_shapes() {
        let err = PluginConfig::from_document_str(r#"{"field": {"enabled": "yes"}}"#, DocumentFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("invalid plugin configuration"));
    }
}
