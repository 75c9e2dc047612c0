//! Schedule lifecycle, standalone and under a workflow job template
//!
//! The two variants share the payload build and projection; they differ in
//! which endpoint creates them and which parent attribute they carry.

use std::collections::HashMap;

use puppis_awx::AwxClient;
use puppis_awx::models::{Schedule, SchedulePayload};
use puppis_core::provider::{ProviderError, ProviderResult};
use puppis_core::resource::{Resource, ResourceId, State, Value};

use crate::provider::{numeric_identifier, remote_error, required_int, required_str};
use crate::transform;

/// Which flavor of schedule a resource block declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Standalone,
    UnderWorkflow,
}

impl Variant {
    fn template_attribute(&self) -> &'static str {
        match self {
            Variant::Standalone => "unified_job_template_id",
            Variant::UnderWorkflow => "workflow_job_template_id",
        }
    }
}

pub async fn create(
    client: &AwxClient,
    resource: &Resource,
    variant: Variant,
) -> ProviderResult<State> {
    let payload = build_payload(resource, variant)?;

    let created = match variant {
        Variant::Standalone => client.schedules().create(&payload).await,
        Variant::UnderWorkflow => {
            client
                .workflow_job_templates()
                .create_schedule(payload.unified_job_template, &payload)
                .await
        }
    }
    .map_err(|e| {
        remote_error(format!("Failed to create schedule {}", payload.name), e)
            .for_resource(resource.id.clone())
    })?;

    Ok(project(resource.id.clone(), created, variant))
}

pub async fn read(
    client: &AwxClient,
    id: &ResourceId,
    identifier: &str,
    variant: Variant,
) -> ProviderResult<State> {
    let schedule_id = numeric_identifier(id, identifier)?;

    match client.schedules().get(schedule_id).await {
        Ok(schedule) => Ok(project(id.clone(), schedule, variant)),
        Err(e) if e.is_not_found() => Ok(State::not_found(id.clone())),
        Err(e) => Err(remote_error("Failed to read schedule", e).for_resource(id.clone())),
    }
}

/// Full-replace update: confirm the schedule still exists, then PUT the
/// complete rebuilt payload.
pub async fn update(
    client: &AwxClient,
    id: &ResourceId,
    identifier: &str,
    to: &Resource,
    variant: Variant,
) -> ProviderResult<State> {
    let schedule_id = numeric_identifier(id, identifier)?;

    client.schedules().get(schedule_id).await.map_err(|e| {
        remote_error(format!("Schedule {} no longer exists", schedule_id), e)
            .for_resource(id.clone())
    })?;

    let payload = build_payload(to, variant)?;
    let updated = client
        .schedules()
        .update(schedule_id, &payload)
        .await
        .map_err(|e| {
            remote_error(format!("Failed to update schedule {}", payload.name), e)
                .for_resource(id.clone())
        })?;

    Ok(project(id.clone(), updated, variant))
}

/// Fetch first so a vanished schedule yields a clean not-found error, then
/// remove it.
pub async fn delete(client: &AwxClient, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
    let schedule_id = numeric_identifier(id, identifier)?;

    client.schedules().get(schedule_id).await.map_err(|e| {
        remote_error(format!("Schedule {} not found", schedule_id), e).for_resource(id.clone())
    })?;

    client
        .schedules()
        .delete(schedule_id)
        .await
        .map_err(|e| remote_error("Failed to delete schedule", e).for_resource(id.clone()))
}

fn build_payload(resource: &Resource, variant: Variant) -> ProviderResult<SchedulePayload> {
    let name = required_str(resource, "name")?;
    let rrule = required_str(resource, "rrule")?;
    let template = required_int(resource, variant.template_attribute())?;

    let inventory = match resource.attr_str("inventory") {
        Some(raw) => transform::optional_int(raw).map_err(|msg| {
            ProviderError::new("Invalid inventory attribute")
                .with_detail(msg)
                .for_resource(resource.id.clone())
        })?,
        None => None,
    };

    let extra_data = match resource.attr_str("extra_data") {
        Some(raw) if !raw.trim().is_empty() => {
            Some(transform::yaml_to_json(raw).map_err(|msg| {
                ProviderError::new("Invalid extra_data attribute")
                    .with_detail(msg)
                    .for_resource(resource.id.clone())
            })?)
        }
        _ => None,
    };

    Ok(SchedulePayload {
        name: name.to_string(),
        rrule: rrule.to_string(),
        description: resource.attr_str("description").unwrap_or_default().to_string(),
        enabled: resource.attr_bool("enabled").unwrap_or(true),
        unified_job_template: template,
        inventory,
        extra_data,
    })
}

fn project(id: ResourceId, schedule: Schedule, variant: Variant) -> State {
    let mut attributes = HashMap::new();
    attributes.insert("id".to_string(), Value::Int(schedule.id));
    attributes.insert("name".to_string(), Value::String(schedule.name));
    attributes.insert("rrule".to_string(), Value::String(schedule.rrule));
    attributes.insert(
        "description".to_string(),
        Value::String(schedule.description),
    );
    attributes.insert("enabled".to_string(), Value::Bool(schedule.enabled));
    attributes.insert(
        variant.template_attribute().to_string(),
        Value::Int(schedule.unified_job_template),
    );
    if let Some(inv) = schedule.inventory {
        attributes.insert("inventory".to_string(), Value::String(inv.to_string()));
    }
    let extra = transform::json_to_yaml(&schedule.extra_data);
    if !extra.is_empty() {
        attributes.insert("extra_data".to_string(), Value::String(extra));
    }

    let identifier = schedule.id.to_string();
    State::existing(id, attributes).with_identifier(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule_resource() -> Resource {
        Resource::new("schedule", "nightly")
            .with_attribute("name", Value::String("nightly".to_string()))
            .with_attribute(
                "rrule",
                Value::String("DTSTART:20250101T000000Z RRULE:FREQ=DAILY".to_string()),
            )
            .with_attribute("unified_job_template_id", Value::Int(7))
            .with_attribute("inventory", Value::String("6".to_string()))
            .with_attribute("extra_data", Value::String("limit: webservers".to_string()))
    }

    #[test]
    fn payload_copies_declared_attributes() {
        let payload = build_payload(&schedule_resource(), Variant::Standalone).unwrap();
        assert_eq!(payload.name, "nightly");
        assert_eq!(payload.unified_job_template, 7);
        assert_eq!(payload.inventory, Some(6));
        assert_eq!(
            payload.extra_data,
            Some(serde_json::json!({"limit": "webservers"}))
        );
        // Declared defaults
        assert!(payload.enabled);
        assert_eq!(payload.description, "");
    }

    #[test]
    fn payload_requires_the_variant_parent() {
        let err = build_payload(&schedule_resource(), Variant::UnderWorkflow).unwrap_err();
        assert!(err.to_string().contains("workflow_job_template_id"));
    }

    #[test]
    fn bad_inventory_string_is_diagnosed() {
        let resource = schedule_resource()
            .with_attribute("inventory", Value::String("six".to_string()));
        let err = build_payload(&resource, Variant::Standalone).unwrap_err();
        assert!(err.to_string().contains("Invalid inventory attribute"));
    }

    #[test]
    fn projection_round_trips_the_wire_model() {
        let schedule: Schedule = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "nightly",
            "rrule": "DTSTART:20250101T000000Z RRULE:FREQ=DAILY",
            "description": "Nightly run",
            "enabled": true,
            "unified_job_template": 7,
            "inventory": 6,
            "extra_data": {"limit": "webservers"}
        }))
        .unwrap();

        let state = project(
            ResourceId::new("schedule", "nightly"),
            schedule,
            Variant::Standalone,
        );
        assert_eq!(state.identifier.as_deref(), Some("42"));
        assert_eq!(state.attributes.get("id"), Some(&Value::Int(42)));
        assert_eq!(
            state.attributes.get("unified_job_template_id"),
            Some(&Value::Int(7))
        );
        assert_eq!(
            state.attributes.get("inventory"),
            Some(&Value::String("6".to_string()))
        );
        assert_eq!(
            state.attributes.get("extra_data"),
            Some(&Value::String("limit: webservers".to_string()))
        );
    }

    #[test]
    fn workflow_projection_names_the_parent_attribute() {
        let schedule: Schedule = serde_json::from_value(serde_json::json!({
            "id": 43,
            "name": "weekly",
            "rrule": "DTSTART:20250101T000000Z RRULE:FREQ=WEEKLY",
            "enabled": false,
            "unified_job_template": 9,
            "extra_data": {}
        }))
        .unwrap();

        let state = project(
            ResourceId::new("workflow_job_template_schedule", "weekly"),
            schedule,
            Variant::UnderWorkflow,
        );
        assert_eq!(
            state.attributes.get("workflow_job_template_id"),
            Some(&Value::Int(9))
        );
        assert!(!state.attributes.contains_key("unified_job_template_id"));
        assert!(!state.attributes.contains_key("extra_data"));
    }
}
