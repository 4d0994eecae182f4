use fieldctl::{OverrideLayers, OverrideScope, PrintOverrides, field_function_id, resolve_print_params};
use serde_json::{Map, Value, json};

fn map(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn highest_defining_layer_wins_for_every_combination() {
    let scopes = &OverrideScope::ORDER[1..];
    for mask in 0u32..(1 << scopes.len()) {
        let mut layers = OverrideLayers::new(map(json!({"class": "defaults"})));
        let mut expected = "defaults".to_string();
        for (bit, scope) in scopes.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                layers.set(*scope, map(json!({"class": scope.to_string()})));
                expected = scope.to_string();
            } else {
                layers.set(*scope, Map::new());
            }
        }
        let resolved = layers.resolve();
        assert_eq!(resolved["class"], json!(expected), "mask {mask:04b}");
    }
}

#[test]
fn section_override_beats_tenant_for_print() {
    let id = field_function_id("choice");
    let overrides = PrintOverrides::default()
        .with_customer(&id, map(json!({"class": "big"})))
        .with_project(&id, Map::new())
        .with_section(&id, map(json!({"class": "small"})));
    let params = resolve_print_params(&overrides, &id, &Map::new());
    assert_eq!(Value::Object(params), json!({"class": "small"}));
}

#[test]
fn caller_keys_survive_unless_project_or_section_override_them() {
    let id = field_function_id("text");
    let overrides = PrintOverrides::default()
        .with_customer(&id, map(json!({"width": 20, "class": "big"})))
        .with_project(&id, map(json!({"width": 40})));
    let caller = map(json!({"width": 30, "class": "inline"}));
    let params = resolve_print_params(&overrides, &id, &caller);
    assert_eq!(params["width"], json!(40));
    assert_eq!(params["class"], json!("inline"));
}
