//! Notification templates attached to workflow job template events
//!
//! The attachment lives under a per-event sub-endpoint, so the event is part
//! of the identity. The tracked identifier has three segments:
//! `<workflow_job_template>/<event>/<notification_template>`.

use std::collections::HashMap;

use puppis_awx::AwxClient;
use puppis_awx::models::NotificationEvent;
use puppis_core::provider::{ProviderError, ProviderResult};
use puppis_core::resource::{Resource, ResourceId, State, Value};

use crate::provider::{remote_error, required_int, required_str};

pub async fn create(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let workflow_job_template_id = required_int(resource, "workflow_job_template_id")?;
    let notification_template_id = required_int(resource, "notification_template_id")?;
    let event = parse_event(&resource.id, required_str(resource, "event")?)?;

    client
        .workflow_job_templates()
        .get(workflow_job_template_id)
        .await
        .map_err(|e| {
            remote_error(
                format!("Workflow job template {} not found", workflow_job_template_id),
                e,
            )
            .for_resource(resource.id.clone())
        })?;

    client
        .workflow_job_templates()
        .associate_notification_template(workflow_job_template_id, event, notification_template_id)
        .await
        .map_err(|e| {
            remote_error(
                format!(
                    "Failed to attach notification template {} for {} events",
                    notification_template_id, event
                ),
                e,
            )
            .for_resource(resource.id.clone())
        })?;

    Ok(project(
        resource.id.clone(),
        workflow_job_template_id,
        event,
        notification_template_id,
    ))
}

pub fn read(id: &ResourceId, identifier: &str) -> ProviderResult<State> {
    let (workflow_job_template_id, event, notification_template_id) =
        parse_identifier(id, identifier)?;
    Ok(project(
        id.clone(),
        workflow_job_template_id,
        event,
        notification_template_id,
    ))
}

pub async fn delete(client: &AwxClient, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
    let (workflow_job_template_id, event, notification_template_id) =
        parse_identifier(id, identifier)?;

    match client
        .workflow_job_templates()
        .disassociate_notification_template(
            workflow_job_template_id,
            event,
            notification_template_id,
        )
        .await
    {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(remote_error(
            format!(
                "Failed to detach notification template {} for {} events",
                notification_template_id, event
            ),
            e,
        )
        .for_resource(id.clone())),
    }
}

fn parse_event(id: &ResourceId, raw: &str) -> ProviderResult<NotificationEvent> {
    raw.parse().map_err(|msg: String| {
        ProviderError::new("Invalid event attribute")
            .with_detail(msg)
            .for_resource(id.clone())
    })
}

fn parse_identifier(
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<(i64, NotificationEvent, i64)> {
    let invalid = || {
        ProviderError::new("Invalid notification identifier")
            .with_detail(format!(
                "'{}' is not of the form <workflow_job_template>/<event>/<notification_template>",
                identifier
            ))
            .for_resource(id.clone())
    };

    let mut segments = identifier.splitn(3, '/');
    let wjt = segments
        .next()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(invalid)?;
    let event: NotificationEvent = segments
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)?;
    let nt = segments
        .next()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(invalid)?;

    Ok((wjt, event, nt))
}

fn project(
    id: ResourceId,
    workflow_job_template_id: i64,
    event: NotificationEvent,
    notification_template_id: i64,
) -> State {
    let mut attributes = HashMap::new();
    attributes.insert(
        "workflow_job_template_id".to_string(),
        Value::Int(workflow_job_template_id),
    );
    attributes.insert(
        "notification_template_id".to_string(),
        Value::Int(notification_template_id),
    );
    attributes.insert("event".to_string(), Value::String(event.to_string()));

    let identifier = format!(
        "{}/{}/{}",
        workflow_job_template_id, event, notification_template_id
    );
    State::existing(id, attributes).with_identifier(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_round_trips_through_read() {
        let id = ResourceId::new("workflow_job_template_notification", "on_error");
        let state = read(&id, "12/error/4").unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("12/error/4"));
        assert_eq!(
            state.attributes.get("event"),
            Some(&Value::String("error".to_string()))
        );
        assert_eq!(
            state.attributes.get("workflow_job_template_id"),
            Some(&Value::Int(12))
        );
    }

    #[test]
    fn unknown_event_segment_is_rejected() {
        let id = ResourceId::new("workflow_job_template_notification", "on_error");
        let err = read(&id, "12/sometimes/4").unwrap_err();
        assert!(err.to_string().contains("Invalid notification identifier"));
    }

    #[test]
    fn two_segment_identifier_is_rejected() {
        let id = ResourceId::new("workflow_job_template_notification", "on_error");
        assert!(read(&id, "12/4").is_err());
    }
}
