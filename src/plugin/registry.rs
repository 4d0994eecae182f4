use indexmap::IndexMap;
use serde_json::Value;

use super::{FieldDescription, PluginConfig};
use crate::control::components::{ChecklistControl, ChoiceControl, TextControl};
use crate::control::{Control, ControlError, FieldControl};
use crate::domain::{PrintCallerParams, PrintOverrides};
use crate::presentation::Markup;
use crate::settings::{JsonSurface, SettingsHost, SettingsPage, SettingsScope};

/// Builds a fresh field instance for one control.
pub type ControlFactory = Box<dyn Fn() -> Box<dyn FieldControl>>;

/// Entry for one settings page in the host's settings tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPageDescriptor {
    pub id: String,
    pub title: String,
    pub page_type: String,
    pub setting_name: String,
    pub scope: SettingsScope,
}

/// A plugin: feature configuration plus the field types it renders.
pub struct Plugin {
    name: String,
    version: String,
    config: PluginConfig,
    enabled_in_context: bool,
    factories: IndexMap<String, ControlFactory>,
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("config", &self.config)
            .field("enabled_in_context", &self.enabled_in_context)
            .field("field_types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Plugin {
    pub fn new(name: impl Into<String>, version: impl Into<String>, config: PluginConfig) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            config,
            enabled_in_context: true,
            factories: IndexMap::new(),
        }
    }

    /// Register the `choice`, `checklist` and `text` field types.
    pub fn with_builtin_fields(self) -> Self {
        self.with_field(|| Box::new(ChoiceControl::new()) as Box<dyn FieldControl>)
            .with_field(|| Box::new(ChecklistControl::new()) as Box<dyn FieldControl>)
            .with_field(|| Box::new(TextControl::new()) as Box<dyn FieldControl>)
    }

    /// Register a field type under the type its instances report.
    pub fn with_field(mut self, factory: impl Fn() -> Box<dyn FieldControl> + 'static) -> Self {
        let field_type = factory().field_type().to_string();
        tracing::debug!(plugin = %self.name, field_type = %field_type, "registering field type");
        self.factories.insert(field_type, Box::new(factory));
        self
    }

    /// Switch every feature off for the current context without touching the config.
    pub fn set_enabled_in_context(&mut self, enabled: bool) {
        self.enabled_in_context = enabled;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn supports_control(&self, field_type: &str) -> bool {
        self.enabled_in_context
            && self.config.field.enabled
            && self.config.field.offers(field_type)
            && self.factories.contains_key(field_type)
    }

    /// Instantiate and initialize a control. `None` when the type is not supported.
    pub fn create_control(
        &self,
        field_type: &str,
        options: &Value,
    ) -> Option<Result<Control<Box<dyn FieldControl>>, ControlError>> {
        let mut control = self.instantiate(field_type)?;
        Some(control.init(options).map(|()| control))
    }

    /// Uninitialized control for the print pipeline.
    pub fn print_control(&self, field_type: &str) -> Option<Control<Box<dyn FieldControl>>> {
        self.instantiate(field_type)
    }

    /// Render one field for batch printing. `None` when the type is not supported.
    pub fn print(
        &self,
        field_type: &str,
        overrides: &PrintOverrides,
        caller: &PrintCallerParams,
        on_error: &mut dyn FnMut(&str),
    ) -> Option<Markup> {
        let mut control = self.print_control(field_type)?;
        Some(control.render(overrides, caller, on_error))
    }

    /// Print function id for every supported field type.
    pub fn print_function_ids(&self) -> Vec<String> {
        self.supported_types()
            .filter_map(|field_type| self.print_function_id(field_type))
            .collect()
    }

    pub fn print_function_id(&self, field_type: &str) -> Option<String> {
        self.print_control(field_type)
            .map(|control| control.print_function_id())
    }

    /// One description per supported field type; configured descriptions win.
    pub fn field_config_options(&self) -> Vec<FieldDescription> {
        self.supported_types()
            .filter_map(|field_type| {
                if let Some(description) = self.config.field.description_for(field_type) {
                    return Some(description.clone());
                }
                let factory = self.factories.get(field_type)?;
                Some(FieldDescription::new(field_type, factory().title()))
            })
            .collect()
    }

    /// Tree entries for the enabled settings pages.
    pub fn settings_pages(&self) -> Vec<SettingsPageDescriptor> {
        if !self.enabled_in_context {
            return Vec::new();
        }
        [SettingsScope::Tenant, SettingsScope::Project]
            .into_iter()
            .filter_map(|scope| {
                let feature = self.page_feature(scope);
                feature.enabled.then(|| SettingsPageDescriptor {
                    id: feature.id.clone(),
                    title: feature.title.clone(),
                    page_type: feature.page_type.clone(),
                    setting_name: feature.setting_name.clone(),
                    scope,
                })
            })
            .collect()
    }

    /// Open the settings page of `scope` against `host`. `None` when the page is disabled.
    pub fn open_settings_page<H: SettingsHost>(
        &self,
        scope: SettingsScope,
        host: H,
    ) -> Option<SettingsPage<JsonSurface, H>> {
        let feature = self.page_feature(scope);
        if !self.enabled_in_context || !feature.enabled {
            return None;
        }
        Some(SettingsPage::new(feature.surface(scope), host))
    }

    fn page_feature(&self, scope: SettingsScope) -> &super::PageFeature {
        match scope {
            SettingsScope::Tenant => &self.config.customer_settings_page,
            SettingsScope::Project => &self.config.project_settings_page,
        }
    }

    fn supported_types(&self) -> impl Iterator<Item = &str> {
        self.factories
            .keys()
            .map(String::as_str)
            .filter(|field_type| self.supports_control(field_type))
    }

    fn instantiate(&self, field_type: &str) -> Option<Control<Box<dyn FieldControl>>> {
        if !self.supports_control(field_type) {
            tracing::debug!(plugin = %self.name, field_type, "field type not handled by this plugin");
            return None;
        }
        let factory = self.factories.get(field_type)?;
        Some(Control::new(factory()))
    }
}
