//! Ordered override scopes.
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults
//! 2. Tenant (customer-wide) overrides
//! 3. Caller-supplied parameters
//! 4. Project overrides
//! 5. Section overrides

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::merge::overlay;
use crate::domain::{PrintOverrides, PrintParams};

const FIELD_FUNCTION_PREFIX: &str = "field_";

/// One configuration scope contributing an override layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverrideScope {
    Defaults,
    Tenant,
    Caller,
    Project,
    Section,
}

impl OverrideScope {
    /// Application order; later scopes win.
    pub const ORDER: [OverrideScope; 5] = [
        OverrideScope::Defaults,
        OverrideScope::Tenant,
        OverrideScope::Caller,
        OverrideScope::Project,
        OverrideScope::Section,
    ];
}

impl fmt::Display for OverrideScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OverrideScope::Defaults => "defaults",
            OverrideScope::Tenant => "tenant",
            OverrideScope::Caller => "caller",
            OverrideScope::Project => "project",
            OverrideScope::Section => "section",
        };
        f.write_str(label)
    }
}

/// Override layers keyed by scope. Layers may be registered in any order; they are
/// always applied in [`OverrideScope::ORDER`]. Missing scopes contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct OverrideLayers {
    layers: IndexMap<OverrideScope, Map<String, Value>>,
}

impl OverrideLayers {
    pub fn new(defaults: Map<String, Value>) -> Self {
        let mut layers = IndexMap::new();
        layers.insert(OverrideScope::Defaults, defaults);
        Self { layers }
    }

    pub fn with(mut self, scope: OverrideScope, layer: Option<&Map<String, Value>>) -> Self {
        if let Some(layer) = layer {
            self.set(scope, layer.clone());
        }
        self
    }

    pub fn set(&mut self, scope: OverrideScope, layer: Map<String, Value>) {
        self.layers.insert(scope, layer);
    }

    pub fn layer(&self, scope: OverrideScope) -> Option<&Map<String, Value>> {
        self.layers.get(&scope)
    }

    /// Produce a fresh effective map; inputs are never shared with the result.
    pub fn resolve(&self) -> Map<String, Value> {
        OverrideScope::ORDER
            .iter()
            .filter_map(|scope| self.layers.get(scope))
            .fold(Map::new(), overlay)
    }

    /// Highest-precedence scope that defines `key`.
    pub fn origin_of(&self, key: &str) -> Option<OverrideScope> {
        OverrideScope::ORDER
            .iter()
            .rev()
            .copied()
            .find(|scope| {
                self.layers
                    .get(scope)
                    .is_some_and(|layer| layer.contains_key(key))
            })
    }
}

/// Identity under which print overrides for a field type are registered.
pub fn field_function_id(field_type: &str) -> String {
    format!("{FIELD_FUNCTION_PREFIX}{field_type}")
}

/// Built-in defaults of every field print function.
pub fn default_print_params() -> PrintParams {
    let mut params = Map::new();
    params.insert("class".to_string(), Value::String(String::new()));
    params
}

/// Resolve the effective print parameters of one print function invocation.
pub fn resolve_print_params(
    overrides: &PrintOverrides,
    function_id: &str,
    caller: &PrintParams,
) -> PrintParams {
    let layers = OverrideLayers::new(default_print_params())
        .with(OverrideScope::Tenant, overrides.customer.get(function_id))
        .with(OverrideScope::Caller, Some(caller))
        .with(OverrideScope::Project, overrides.project.get(function_id))
        .with(OverrideScope::Section, overrides.section.get(function_id));
    let resolved = layers.resolve();
    tracing::debug!(
        function_id,
        keys = resolved.len(),
        class_from = ?layers.origin_of("class"),
        "resolved print parameters"
    );
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn section_wins_over_tenant() {
        let id = field_function_id("choice");
        let overrides = PrintOverrides::default()
            .with_customer(&id, map(json!({"class": "big"})))
            .with_project(&id, map(json!({})))
            .with_section(&id, map(json!({"class": "small"})));
        let params = resolve_print_params(&overrides, &id, &map(json!({})));
        assert_eq!(params["class"], json!("small"));
    }

    #[test]
    fn defaults_survive_without_overrides() {
        let params = resolve_print_params(&PrintOverrides::default(), "field_x", &Map::new());
        assert_eq!(Value::Object(params), json!({"class": ""}));
    }

    #[test]
    fn registration_order_does_not_matter() {
        let mut layers = OverrideLayers::new(map(json!({"a": 0})));
        layers.set(OverrideScope::Section, map(json!({"a": 5})));
        layers.set(OverrideScope::Tenant, map(json!({"a": 1, "b": 1})));
        let resolved = layers.resolve();
        assert_eq!(resolved["a"], json!(5));
        assert_eq!(resolved["b"], json!(1));
        assert_eq!(layers.origin_of("a"), Some(OverrideScope::Section));
        assert_eq!(layers.origin_of("b"), Some(OverrideScope::Tenant));
        assert_eq!(layers.origin_of("c"), None);
    }

    #[test]
    fn overrides_for_other_functions_are_ignored() {
        let overrides =
            PrintOverrides::default().with_section("field_other", map(json!({"class": "x"})));
        let params = resolve_print_params(&overrides, "field_choice", &map(json!({"class": "c"})));
        assert_eq!(params["class"], json!("c"));
    }

    #[test]
    fn mutating_result_leaves_layers_untouched() {
        let tenant = map(json!({"class": "big"}));
        let layers = OverrideLayers::new(Map::new()).with(OverrideScope::Tenant, Some(&tenant));
        let mut resolved = layers.resolve();
        resolved.insert("class".into(), json!("mutated"));
        assert_eq!(layers.layer(OverrideScope::Tenant), Some(&tenant));
    }
}
