use fieldctl::{
    CodeValidator, JsonSurface, MemoryHost, PageState, Plugin, PluginConfig, SettingsError,
    SettingsPage, SettingsScope,
};
use serde_json::json;

fn tenant_page(host: MemoryHost) -> SettingsPage<JsonSurface, MemoryHost> {
    let surface = JsonSurface::new(SettingsScope::Tenant, "demo")
        .with_defaults(json!({"size": "m", "color": "red"}));
    SettingsPage::new(surface, host)
}

fn replace_with(code: &'static str) -> impl FnMut(&str, &CodeValidator) -> Option<String> {
    move |_seed: &str, _validator: &CodeValidator| Some(code.to_string())
}

#[test]
fn show_starts_clean() {
    let mut page = tenant_page(MemoryHost::new());
    assert_eq!(page.state(), PageState::Unloaded);
    page.show();
    assert_eq!(page.state(), PageState::Loaded);
    assert!(!page.param_changed().unwrap());
}

#[test]
fn unchanged_advanced_round_trip_keeps_dirty_flag() {
    let mut page = tenant_page(MemoryHost::new());
    page.show();
    let mut echo = |seed: &str, _validator: &CodeValidator| -> Option<String> { Some(seed.to_string()) };
    assert!(page.show_advanced(&mut echo).unwrap());
    assert_eq!(page.host().last_dirty(), Some(false));

    page.edit(|settings| settings["size"] = json!("xl")).unwrap();
    assert!(page.show_advanced(&mut echo).unwrap());
    assert_eq!(page.host().last_dirty(), Some(true));
}

#[test]
fn differing_advanced_edit_marks_dirty() {
    let mut page = tenant_page(MemoryHost::new());
    page.show();
    assert!(page
        .show_advanced(&mut replace_with(r#"{"size": "s", "color": "red"}"#))
        .unwrap());
    assert_eq!(page.host().last_dirty(), Some(true));
    assert_eq!(page.state(), PageState::Dirty);
    assert_eq!(page.changed(), Some(&json!({"size": "s", "color": "red"})));
}

#[test]
fn rejected_advanced_edit_keeps_working_copy() {
    let mut page = tenant_page(MemoryHost::new());
    page.show();
    let err = page
        .show_advanced(&mut replace_with("[1, 2]"))
        .unwrap_err();
    assert!(matches!(err, SettingsError::InvalidEdit(_)));
    let err = page
        .show_advanced(&mut replace_with("{\"size\":"))
        .unwrap_err();
    assert!(matches!(err, SettingsError::InvalidEdit(_)));
    assert_eq!(page.state(), PageState::Loaded);
}

#[test]
fn successful_save_promotes_working_copy() {
    let mut page = tenant_page(MemoryHost::new());
    page.show();
    page.edit(|settings| settings["color"] = json!("blue")).unwrap();

    pollster::block_on(page.save_async()).unwrap();
    assert!(!page.param_changed().unwrap());
    assert_eq!(page.state(), PageState::Loaded);
    assert_eq!(page.original(), Some(&json!({"size": "m", "color": "blue"})));
    let stored: serde_json::Value =
        serde_json::from_str(page.host().stored_server_setting("demo").unwrap()).unwrap();
    assert_eq!(stored, json!({"size": "m", "color": "blue"}));

    page.show();
    assert_eq!(page.state(), PageState::Loaded);
}

#[test]
fn failed_save_stays_dirty() {
    let mut page = tenant_page(MemoryHost::new());
    page.show();
    page.edit(|settings| settings["color"] = json!("blue")).unwrap();
    page.host_mut().fail_next_save();

    let err = pollster::block_on(page.save_async()).unwrap_err();
    assert!(matches!(err, SettingsError::Persist(_)));
    assert!(page.param_changed().unwrap());
    assert_eq!(page.state(), PageState::Dirty);
    assert_eq!(page.host().stored_server_setting("demo"), None);

    pollster::block_on(page.save_async()).unwrap();
    assert_eq!(page.state(), PageState::Loaded);
}

#[test]
fn plugin_opens_configured_tenant_page() {
    let config = PluginConfig::from_document_str(
        r#"{"customerSettingsPage": {"settingName": "demo", "title": "Demo", "defaultSettings": {"size": "m"}}}"#,
        fieldctl::DocumentFormat::Json,
    )
    .unwrap();
    let plugin = Plugin::new("fieldctl", "0.1.0", config);
    let host = MemoryHost::new().with_customer_setting("demo", r#"{"size":"l"}"#);
    let mut page = plugin
        .open_settings_page(SettingsScope::Tenant, host)
        .unwrap();
    let text = fieldctl::text_to_plain(page.render_setting_page());
    assert!(text.starts_with("Demo  [advanced]"));
    assert!(text.contains("size: l"));
}
