//! Binding map construction and reference resolution
//!
//! Bindings are keyed by block name. Each entry starts from the declared
//! attributes and is topped up with whatever the server reported, so a
//! `${binding.id}` reference resolves once its block has been read,
//! looked up, or created.

use std::collections::HashMap;

use puppis_core::resource::{Resource, State, Value};

pub type BindingMap = HashMap<String, HashMap<String, Value>>;

/// Register a block before anything runs. Declared attributes win;
/// attributes only the server knows (like `id`) fill the gaps from the
/// current remote state when one exists.
pub fn bind(bindings: &mut BindingMap, resource: &Resource, current: Option<&State>) {
    let mut attrs = resource.attributes.clone();
    if let Some(state) = current
        && state.exists
    {
        for (key, value) in &state.attributes {
            if !attrs.contains_key(key) {
                attrs.insert(key.clone(), value.clone());
            }
        }
    }
    bindings.insert(resource.id.name.clone(), attrs);
}

/// Re-register a block after its effect ran. The server's values overlay
/// the resolved declaration so computed attributes are current.
pub fn rebind_applied(bindings: &mut BindingMap, resource: &Resource, state: &State) {
    let mut attrs = resource.attributes.clone();
    for (key, value) in &state.attributes {
        attrs.insert(key.clone(), value.clone());
    }
    bindings.insert(resource.id.name.clone(), attrs);
}

/// Resolve references in a value against the binding map. A reference
/// that cannot be resolved is left in place for the caller to diagnose.
pub fn resolve_value(value: &Value, bindings: &BindingMap) -> Value {
    match value {
        Value::Ref(binding, attribute) => {
            if let Some(attrs) = bindings.get(binding)
                && let Some(resolved) = attrs.get(attribute)
            {
                return resolve_value(resolved, bindings);
            }
            value.clone()
        }
        Value::List(items) => {
            Value::List(items.iter().map(|v| resolve_value(v, bindings)).collect())
        }
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, bindings)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Resolve references in every attribute of a resource
pub fn resolve_resource(resource: &Resource, bindings: &BindingMap) -> Resource {
    let mut resolved = resource.clone();
    for (key, value) in &resource.attributes {
        resolved
            .attributes
            .insert(key.clone(), resolve_value(value, bindings));
    }
    resolved
}

/// References that survived resolution, rendered for diagnostics
pub fn unresolved_refs(resource: &Resource) -> Vec<String> {
    let mut found = Vec::new();
    for value in resource.attributes.values() {
        collect_refs(value, &mut found);
    }
    found.sort();
    found
}

fn collect_refs(value: &Value, found: &mut Vec<String>) {
    match value {
        Value::Ref(binding, attribute) => {
            found.push(format!("${{{}.{}}}", binding, attribute));
        }
        Value::List(items) => {
            for item in items {
                collect_refs(item, found);
            }
        }
        Value::Map(map) => {
            for value in map.values() {
                collect_refs(value, found);
            }
        }
        _ => {}
    }
}
