use ratatui::text::{Line, Text};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::{
    AdvancedEditor, CodeValidator, SettingTarget, SettingsError, SettingsHost, SettingsScope,
    SettingsSurface, project_id,
};
use crate::config::overlay;
use crate::io::serialize_document;
use crate::presentation::{Markup, PageHeader, page_header};

/// Where a page is in its load/edit/save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Unloaded,
    Loaded,
    Dirty,
}

/// Dirty-tracked settings page shared by every [`SettingsSurface`].
///
/// `original` is the baseline taken at `show`, `changed` the working copy. Only a
/// successful save replaces the baseline; re-showing keeps an edit in progress.
#[derive(Debug)]
pub struct SettingsPage<S: SettingsSurface, H: SettingsHost> {
    surface: S,
    host: H,
    settings: S::Settings,
    original: Option<S::Settings>,
    changed: Option<S::Settings>,
    markup: Markup,
}

impl<S: SettingsSurface, H: SettingsHost> SettingsPage<S, H> {
    /// Settings start as the surface defaults overridden by the tenant store.
    pub fn new(surface: S, host: H) -> Self {
        let defaults = surface.default_settings();
        let stored = host.server_setting(surface.setting_name());
        let settings = overlay_settings(surface.setting_name(), &defaults, stored.as_ref());
        Self {
            surface,
            host,
            settings,
            original: None,
            changed: None,
            markup: Markup::default(),
        }
    }

    /// Page header followed by the simple view.
    pub fn render_setting_page(&mut self) -> &Markup {
        self.load();
        self.redraw();
        &self.markup
    }

    /// Take a fresh baseline and render the simple view bound to the working copy.
    pub fn show(&mut self) -> &Markup {
        self.load();
        self.markup = self.surface.settings_dom(self.working());
        &self.markup
    }

    /// Round-trip the working copy through a raw text editor. Returns `Ok(false)` when
    /// the editor was cancelled; an edit failing the syntax or schema check is rejected
    /// and leaves the working copy untouched.
    pub fn show_advanced(&mut self, editor: &mut impl AdvancedEditor) -> Result<bool, SettingsError> {
        let format = self.surface.advanced_format();
        let current = serde_json::to_value(self.working())?;
        let code = serialize_document(&current, format, true)?;
        let validator = CodeValidator::new(format, self.surface.validation_schema().as_ref());

        let Some(edited) = editor.edit(&code, &validator) else {
            tracing::debug!(setting = self.surface.setting_name(), "advanced edit cancelled");
            return Ok(false);
        };
        let value = validator.check(&edited).map_err(|errors| {
            tracing::warn!(
                setting = self.surface.setting_name(),
                issues = errors.len(),
                "rejecting advanced edit"
            );
            SettingsError::InvalidEdit(errors)
        })?;
        self.changed = Some(serde_json::from_value(value)?);
        tracing::debug!(setting = self.surface.setting_name(), "advanced edit applied");
        self.param_changed()?;
        self.render_setting_page();
        Ok(true)
    }

    /// Apply a simple-view edit to the working copy and report dirtiness.
    pub fn edit(&mut self, apply: impl FnOnce(&mut S::Settings)) -> Result<bool, SettingsError> {
        let mut working = self.working().clone();
        apply(&mut working);
        self.changed = Some(working);
        let dirty = self.param_changed()?;
        self.redraw();
        Ok(dirty)
    }

    /// Compare baseline and working copy and report the result to the host.
    pub fn param_changed(&mut self) -> Result<bool, SettingsError> {
        let dirty = self.is_dirty()?;
        self.host.item_changed(dirty);
        Ok(dirty)
    }

    /// Dirty when the canonical serializations of baseline and working copy differ.
    pub fn is_dirty(&self) -> Result<bool, SettingsError> {
        match (&self.original, &self.changed) {
            (Some(original), Some(changed)) => Ok(canonical(original)? != canonical(changed)?),
            (None, None) => Ok(false),
            _ => Ok(true),
        }
    }

    /// Persist the working copy. On success it becomes the new baseline; on failure the
    /// page stays dirty and the store error is returned.
    pub async fn save_async(&mut self) -> Result<(), SettingsError> {
        let name = self.surface.setting_name().to_string();
        let target = match self.surface.scope() {
            SettingsScope::Tenant => SettingTarget::Tenant { name: name.clone() },
            SettingsScope::Project => {
                let item_id = self
                    .host
                    .current_item_id()
                    .ok_or(SettingsError::NoCurrentItem)?;
                SettingTarget::Project {
                    project: project_id(&item_id).to_string(),
                    name: name.clone(),
                    item_id,
                }
            }
        };
        let working = self.working().clone();
        let payload = serde_json::to_string(&working)?;

        match self.host.save_setting(target, payload).await {
            Ok(()) => {
                tracing::debug!(setting = %name, "settings saved");
                if self.surface.scope() == SettingsScope::Tenant {
                    self.settings = working.clone();
                }
                self.original = Some(working.clone());
                self.changed = Some(working);
                self.param_changed()?;
                self.redraw();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(setting = %name, error = %err, "saving settings failed");
                self.param_changed()?;
                Err(err.into())
            }
        }
    }

    pub fn state(&self) -> PageState {
        if self.original.is_none() {
            return PageState::Unloaded;
        }
        match self.is_dirty() {
            Ok(false) => PageState::Loaded,
            _ => PageState::Dirty,
        }
    }

    /// Defaults overridden by the tenant store.
    pub fn settings(&self) -> &S::Settings {
        &self.settings
    }

    pub fn original(&self) -> Option<&S::Settings> {
        self.original.as_ref()
    }

    pub fn changed(&self) -> Option<&S::Settings> {
        self.changed.as_ref()
    }

    /// The working copy, or the effective settings before the first `show`.
    pub fn working(&self) -> &S::Settings {
        self.changed.as_ref().unwrap_or(&self.settings)
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn load(&mut self) {
        let name = self.surface.setting_name();
        let stored = match self.surface.scope() {
            SettingsScope::Tenant => None,
            SettingsScope::Project => match self.host.current_item_id() {
                Some(item_id) => self.host.project_setting(project_id(&item_id), name),
                None => {
                    tracing::debug!(setting = name, "no current item; skipping project layer");
                    None
                }
            },
        };
        let snapshot = overlay_settings(name, &self.settings, stored.as_ref());
        if self.changed.is_none() {
            self.changed = Some(snapshot.clone());
        }
        self.original = Some(snapshot);
    }

    fn redraw(&mut self) {
        let title = self.surface.title();
        let header = PageHeader {
            title: &title,
            help: self.surface.help(),
            help_url: self.surface.help_url(),
            show_advanced: self.surface.show_advanced_button(),
        };
        let mut lines = page_header(&header);
        lines.push(Line::default());
        lines.extend(self.surface.settings_dom(self.working()).lines);
        self.markup = Text::from(lines);
    }
}

fn canonical<T: Serialize>(value: &T) -> Result<Vec<u8>, SettingsError> {
    serde_json_canonicalizer::to_vec(value).map_err(|err| SettingsError::Canonicalize(err.to_string()))
}

/// Shallow override of `base` by a stored object. Anything unusable leaves `base` as is.
fn overlay_settings<T>(name: &str, base: &T, stored: Option<&Value>) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let Some(stored) = stored else {
        return base.clone();
    };
    let Some(layer) = stored.as_object() else {
        tracing::warn!(setting = name, "stored setting is not an object; using defaults");
        return base.clone();
    };
    let merged = match serde_json::to_value(base) {
        Ok(Value::Object(map)) => overlay(map, layer),
        Ok(Value::Null) => layer.clone(),
        Ok(_) | Err(_) => {
            tracing::warn!(setting = name, "settings are not an object; ignoring stored layer");
            return base.clone();
        }
    };
    match serde_json::from_value(Value::Object(merged)) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(setting = name, error = %err, "stored setting does not fit; using defaults");
            base.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::text_to_plain;
    use crate::settings::{JsonSurface, MemoryHost};
    use serde_json::json;

    fn tenant_page(host: MemoryHost) -> SettingsPage<JsonSurface, MemoryHost> {
        let surface = JsonSurface::new(SettingsScope::Tenant, "demo")
            .with_defaults(json!({"size": "m", "color": "red"}));
        SettingsPage::new(surface, host)
    }

    #[test]
    fn settings_are_defaults_overridden_by_store() {
        let host = MemoryHost::new().with_customer_setting("demo", r#"{"size":"l"}"#);
        let page = tenant_page(host);
        assert_eq!(page.settings(), &json!({"size": "l", "color": "red"}));
        assert_eq!(page.state(), PageState::Unloaded);
    }

    #[test]
    fn malformed_store_degrades_to_defaults() {
        let host = MemoryHost::new().with_customer_setting("demo", "{oops");
        let page = tenant_page(host);
        assert_eq!(page.settings(), &json!({"size": "m", "color": "red"}));
    }

    #[test]
    fn reshow_preserves_edit_in_progress() {
        let mut page = tenant_page(MemoryHost::new());
        page.show();
        assert_eq!(page.state(), PageState::Loaded);
        assert!(page.edit(|settings| settings["size"] = json!("s")).unwrap());
        page.show();
        assert_eq!(page.changed(), Some(&json!({"size": "s", "color": "red"})));
        assert_eq!(page.state(), PageState::Dirty);
    }

    #[test]
    fn key_order_does_not_make_dirty() {
        let mut page = tenant_page(MemoryHost::new());
        page.show();
        let dirty = page
            .edit(|settings| *settings = json!({"color": "red", "size": "m"}))
            .unwrap();
        assert!(!dirty);
        assert_eq!(page.host().last_dirty(), Some(false));
    }

    #[test]
    fn rendered_page_has_header_and_body() {
        let mut page = tenant_page(MemoryHost::new());
        let text = text_to_plain(page.render_setting_page());
        assert!(text.starts_with("demo  [advanced]\n"));
        assert!(text.contains("size: m"));
    }

    #[test]
    fn project_page_without_item_cannot_save() {
        let surface = JsonSurface::new(SettingsScope::Project, "demo");
        let mut page = SettingsPage::new(surface, MemoryHost::new());
        page.show();
        let err = pollster::block_on(page.save_async()).unwrap_err();
        assert!(matches!(err, SettingsError::NoCurrentItem));
    }
}
