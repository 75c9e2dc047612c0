//! Differ - Compare desired state with current state to generate a Plan
//!
//! Compares the desired state declared in the manifest with the current
//! state fetched from the Provider, and generates a list of required
//! Effects (Plan).

use std::collections::HashMap;

use crate::effect::Effect;
use crate::plan::Plan;
use crate::resource::{Resource, ResourceId, State, Value};
use crate::schema::ResourceSchema;

/// Result of a diff operation
#[derive(Debug, Clone)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create(Resource),
    /// Resource exists with differences -> needs update
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// A force-new attribute changed -> needs delete and recreate
    Replace {
        id: ResourceId,
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// Resource exists with no differences -> no action needed
    NoChange(ResourceId),
    /// Resource exists but not in desired state -> needs deletion
    Delete(ResourceId),
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange(_))
    }
}

/// Compare desired state with current state to compute a Diff
pub fn diff(desired: &Resource, current: &State, schema: Option<&ResourceSchema>) -> Diff {
    if !current.exists {
        return Diff::Create(desired.clone());
    }

    let changed = find_changed_attributes(&desired.attributes, &current.attributes);

    if changed.is_empty() {
        return Diff::NoChange(desired.id.clone());
    }

    let force_new = schema
        .map(|s| s.force_new_attributes())
        .unwrap_or_default();
    let needs_replace = changed.iter().any(|name| force_new.contains(&name.as_str()));

    if needs_replace {
        Diff::Replace {
            id: desired.id.clone(),
            from: current.clone(),
            to: desired.clone(),
            changed_attributes: changed,
        }
    } else {
        Diff::Update {
            id: desired.id.clone(),
            from: current.clone(),
            to: desired.clone(),
            changed_attributes: changed,
        }
    }
}

/// Find changed attributes between desired and current state
fn find_changed_attributes(
    desired: &HashMap<String, Value>,
    current: &HashMap<String, Value>,
) -> Vec<String> {
    let mut changed = Vec::new();

    for (key, desired_value) in desired {
        // Skip internal attributes (starting with _)
        if key.starts_with('_') {
            continue;
        }

        match current.get(key) {
            Some(current_value) if current_value == desired_value => {}
            _ => changed.push(key.clone()),
        }
    }

    changed.sort();
    changed
}

/// Compute Diff for multiple resources and generate a Plan
///
/// Data sources always produce a Read effect; they are resolved on every
/// run and never mutated.
pub fn create_plan(
    desired: &[Resource],
    current_states: &HashMap<ResourceId, State>,
    schemas: &HashMap<String, ResourceSchema>,
) -> Plan {
    let mut plan = Plan::new();

    for resource in desired {
        if resource.is_data_source() {
            plan.add(Effect::Read(resource.clone()));
            continue;
        }

        let current = current_states
            .get(&resource.id)
            .cloned()
            .unwrap_or_else(|| State::not_found(resource.id.clone()));

        let schema = schemas.get(&resource.id.resource_type);
        let d = diff(resource, &current, schema);

        match d {
            Diff::Create(r) => plan.add(Effect::Create(r)),
            Diff::Update { id, from, to, .. } => {
                plan.add(Effect::Update { id, from, to });
            }
            Diff::Replace { id, from, to, .. } => {
                plan.add(Effect::Replace { id, from, to });
            }
            Diff::NoChange(_) => {}
            Diff::Delete(id) => plan.add(Effect::Delete(id)),
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeSchema, AttributeType};

    fn schedule_schema() -> ResourceSchema {
        ResourceSchema::new("schedule")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("rrule", AttributeType::String).required())
            .attribute(
                AttributeSchema::new("unified_job_template_id", AttributeType::Int)
                    .required()
                    .force_new(),
            )
    }

    #[test]
    fn diff_create_when_not_exists() {
        let desired = Resource::new("schedule", "nightly");
        let current = State::not_found(ResourceId::new("schedule", "nightly"));

        let result = diff(&desired, &current, None);
        assert!(matches!(result, Diff::Create(_)));
    }

    #[test]
    fn diff_no_change_when_same() {
        let desired = Resource::new("schedule", "nightly")
            .with_attribute("name", Value::String("Nightly".to_string()));

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("Nightly".to_string()));
        let current = State::existing(ResourceId::new("schedule", "nightly"), attrs);

        let result = diff(&desired, &current, None);
        assert!(matches!(result, Diff::NoChange(_)));
    }

    #[test]
    fn diff_update_when_different() {
        let desired = Resource::new("schedule", "nightly")
            .with_attribute("name", Value::String("Nightly build".to_string()));

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("Nightly".to_string()));
        let current = State::existing(ResourceId::new("schedule", "nightly"), attrs);

        let result = diff(&desired, &current, Some(&schedule_schema()));
        match result {
            Diff::Update {
                changed_attributes, ..
            } => {
                assert!(changed_attributes.contains(&"name".to_string()));
            }
            _ => panic!("Expected Update"),
        }
    }

    #[test]
    fn diff_replace_when_force_new_changes() {
        let desired = Resource::new("schedule", "nightly")
            .with_attribute("name", Value::String("Nightly".to_string()))
            .with_attribute("unified_job_template_id", Value::Int(8));

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("Nightly".to_string()));
        attrs.insert("unified_job_template_id".to_string(), Value::Int(7));
        let current = State::existing(ResourceId::new("schedule", "nightly"), attrs);

        let result = diff(&desired, &current, Some(&schedule_schema()));
        assert!(matches!(result, Diff::Replace { .. }));
    }

    #[test]
    fn internal_attributes_do_not_trigger_updates() {
        let desired = Resource::new("schedule", "nightly")
            .with_attribute("name", Value::String("Nightly".to_string()))
            .with_attribute("_binding", Value::String("nightly".to_string()));

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("Nightly".to_string()));
        let current = State::existing(ResourceId::new("schedule", "nightly"), attrs);

        let result = diff(&desired, &current, None);
        assert!(matches!(result, Diff::NoChange(_)));
    }

    #[test]
    fn create_plan_from_resources() {
        let resources = vec![
            Resource::new("schedule", "new-schedule")
                .with_attribute("name", Value::String("New".to_string())),
            Resource::new("schedule", "existing-schedule")
                .with_attribute("enabled", Value::Bool(true)),
        ];

        let mut current_states = HashMap::new();
        let mut attrs = HashMap::new();
        attrs.insert("enabled".to_string(), Value::Bool(false));
        current_states.insert(
            ResourceId::new("schedule", "existing-schedule"),
            State::existing(ResourceId::new("schedule", "existing-schedule"), attrs),
        );

        let plan = create_plan(&resources, &current_states, &HashMap::new());

        assert_eq!(plan.effects().len(), 2);
        assert!(matches!(plan.effects()[0], Effect::Create(_)));
        assert!(matches!(plan.effects()[1], Effect::Update { .. }));
    }

    #[test]
    fn create_plan_reads_data_sources() {
        let resources = vec![
            Resource::new("organization", "acme")
                .with_attribute("name", Value::String("Acme".to_string()))
                .with_read_only(true),
        ];

        let plan = create_plan(&resources, &HashMap::new(), &HashMap::new());

        assert_eq!(plan.effects().len(), 1);
        assert!(matches!(plan.effects()[0], Effect::Read(_)));
        assert_eq!(plan.mutation_count(), 0);
    }
}
