use std::future::{self, Future};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PersistError;

/// Project identity encoded in an item id: the first `-`-separated segment.
pub fn project_id(item_id: &str) -> &str {
    item_id.split('-').next().unwrap_or(item_id)
}

/// Where a settings page persists its working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingTarget {
    Tenant {
        name: String,
    },
    Project {
        project: String,
        name: String,
        item_id: String,
    },
}

impl SettingTarget {
    pub fn setting_name(&self) -> &str {
        match self {
            SettingTarget::Tenant { name } | SettingTarget::Project { name, .. } => name,
        }
    }
}

/// Services the host application provides to settings pages.
pub trait SettingsHost {
    /// Id of the item currently shown in the host, if any.
    fn current_item_id(&self) -> Option<String>;

    /// Tenant-level stored setting. Absent or unreadable entries yield `None`.
    fn server_setting(&self, name: &str) -> Option<Value>;

    fn project_setting(&self, project: &str, name: &str) -> Option<Value>;

    /// Dirty signal consumed by the host (save button, leave-page guard).
    fn item_changed(&mut self, dirty: bool);

    fn save_setting(
        &mut self,
        target: SettingTarget,
        payload: String,
    ) -> impl Future<Output = Result<(), PersistError>>;
}

/// One entry of the tenant key/value settings list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSetting {
    pub key: String,
    pub value: String,
}

/// In-memory host store. Used by the CLI's file-backed store and by tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryHost {
    pub current_item: Option<String>,
    pub customer_settings: Vec<CustomerSetting>,
    pub project_settings: IndexMap<String, IndexMap<String, String>>,
    #[serde(skip)]
    fail_next_save: bool,
    #[serde(skip)]
    dirty_reports: Vec<bool>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_item(mut self, item_id: impl Into<String>) -> Self {
        self.current_item = Some(item_id.into());
        self
    }

    pub fn with_customer_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.customer_settings.push(CustomerSetting {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_project_setting(
        mut self,
        project: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.project_settings
            .entry(project.into())
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    /// Make the next `save_setting` call fail.
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }

    /// Every dirty value reported through `item_changed`, oldest first.
    pub fn dirty_reports(&self) -> &[bool] {
        &self.dirty_reports
    }

    pub fn last_dirty(&self) -> Option<bool> {
        self.dirty_reports.last().copied()
    }

    /// Raw stored text of a tenant setting.
    pub fn stored_server_setting(&self, name: &str) -> Option<&str> {
        self.customer_settings
            .iter()
            .rev()
            .find(|entry| entry.key == name)
            .map(|entry| entry.value.as_str())
    }

    fn store(&mut self, target: &SettingTarget, payload: String) {
        match target {
            SettingTarget::Tenant { name } => {
                match self
                    .customer_settings
                    .iter_mut()
                    .rev()
                    .find(|entry| &entry.key == name)
                {
                    Some(entry) => entry.value = payload,
                    None => self.customer_settings.push(CustomerSetting {
                        key: name.clone(),
                        value: payload,
                    }),
                }
            }
            SettingTarget::Project { project, name, .. } => {
                self.project_settings
                    .entry(project.clone())
                    .or_default()
                    .insert(name.clone(), payload);
            }
        }
    }
}

fn parse_stored(name: &str, raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(setting = name, error = %err, "ignoring malformed stored setting");
            None
        }
    }
}

impl SettingsHost for MemoryHost {
    fn current_item_id(&self) -> Option<String> {
        self.current_item.clone()
    }

    fn server_setting(&self, name: &str) -> Option<Value> {
        self.stored_server_setting(name)
            .and_then(|raw| parse_stored(name, raw))
    }

    fn project_setting(&self, project: &str, name: &str) -> Option<Value> {
        self.project_settings
            .get(project)
            .and_then(|settings| settings.get(name))
            .and_then(|raw| parse_stored(name, raw))
    }

    fn item_changed(&mut self, dirty: bool) {
        self.dirty_reports.push(dirty);
    }

    fn save_setting(
        &mut self,
        target: SettingTarget,
        payload: String,
    ) -> impl Future<Output = Result<(), PersistError>> {
        let result = if std::mem::take(&mut self.fail_next_save) {
            Err(PersistError::new(target.setting_name(), "store unavailable"))
        } else {
            self.store(&target, payload);
            Ok(())
        };
        future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_id_is_first_segment() {
        assert_eq!(project_id("WHY-12"), "WHY");
        assert_eq!(project_id("DOC-7-draft"), "DOC");
        assert_eq!(project_id("PLAIN"), "PLAIN");
    }

    #[test]
    fn last_matching_customer_setting_wins() {
        let host = MemoryHost::new()
            .with_customer_setting("demo", r#"{"a":1}"#)
            .with_customer_setting("other", r#"{"a":9}"#)
            .with_customer_setting("demo", r#"{"a":2}"#);
        assert_eq!(host.server_setting("demo"), Some(json!({"a": 2})));
    }

    #[test]
    fn malformed_or_empty_setting_is_absent() {
        let host = MemoryHost::new()
            .with_customer_setting("broken", "{not json")
            .with_customer_setting("empty", "")
            .with_project_setting("WHY", "page", "[");
        assert_eq!(host.server_setting("broken"), None);
        assert_eq!(host.server_setting("empty"), None);
        assert_eq!(host.server_setting("missing"), None);
        assert_eq!(host.project_setting("WHY", "page"), None);
    }

    #[test]
    fn failing_save_leaves_store_untouched() {
        let mut host = MemoryHost::new().with_customer_setting("demo", "{}");
        host.fail_next_save();
        let target = SettingTarget::Tenant {
            name: "demo".into(),
        };
        let first = pollster::block_on(host.save_setting(target.clone(), r#"{"a":1}"#.into()));
        assert!(first.is_err());
        assert_eq!(host.stored_server_setting("demo"), Some("{}"));

        let second = pollster::block_on(host.save_setting(target, r#"{"a":1}"#.into()));
        assert!(second.is_ok());
        assert_eq!(host.stored_server_setting("demo"), Some(r#"{"a":1}"#));
    }
}
