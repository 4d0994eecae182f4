//! Settings pages with a baseline, a working copy and a dirty signal.
//!
//! Tenant-level and project-level pages share [`SettingsPage`]; what differs between them
//! lives in a [`SettingsSurface`] implementation.

mod advanced;
mod error;
mod host;
mod page;
mod surface;

pub use advanced::{AdvancedEditor, CodeValidator};
pub use error::{PersistError, SettingsError};
pub use host::{CustomerSetting, MemoryHost, SettingTarget, SettingsHost, project_id};
pub use page::{PageState, SettingsPage};
pub use surface::{JsonSurface, SettingsScope, SettingsSurface};
