//! Plugin surface: feature configuration and the field-type registry.

mod config;
mod registry;

pub use config::{FieldDescription, FieldFeature, PageFeature, PluginConfig};
pub use registry::{ControlFactory, Plugin, SettingsPageDescriptor};
