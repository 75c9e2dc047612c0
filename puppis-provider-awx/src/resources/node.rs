//! Workflow graph nodes
//!
//! A node with no `parent_node_id` is created as a graph root; one with a
//! parent goes through the link sub-endpoint, which creates and associates
//! it in a single call.

use std::collections::HashMap;

use puppis_awx::AwxClient;
use puppis_awx::models::{NodeLink, WorkflowJobTemplateNode, WorkflowNodePayload};
use puppis_core::provider::{ProviderError, ProviderResult};
use puppis_core::resource::{Resource, ResourceId, State, Value};

use crate::provider::{numeric_identifier, remote_error, required_int};
use crate::transform;

pub async fn create(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let payload = build_payload(resource)?;

    let created = match resource.attr_int("parent_node_id") {
        Some(parent) => {
            let link = parse_link(resource)?;
            client
                .workflow_nodes()
                .create_linked(parent, link, &payload)
                .await
        }
        None => client.workflow_nodes().create(&payload).await,
    }
    .map_err(|e| {
        remote_error("Failed to create workflow node", e).for_resource(resource.id.clone())
    })?;

    Ok(project(resource.id.clone(), created))
}

pub async fn read(client: &AwxClient, id: &ResourceId, identifier: &str) -> ProviderResult<State> {
    let node_id = numeric_identifier(id, identifier)?;

    match client.workflow_nodes().get(node_id).await {
        Ok(node) => Ok(project(id.clone(), node)),
        Err(e) if e.is_not_found() => Ok(State::not_found(id.clone())),
        Err(e) => Err(remote_error("Failed to read workflow node", e).for_resource(id.clone())),
    }
}

/// Full-replace update of the mutable fields. Parentage and link are
/// force-new in the schema, so they never reach this path.
pub async fn update(
    client: &AwxClient,
    id: &ResourceId,
    identifier: &str,
    to: &Resource,
) -> ProviderResult<State> {
    let node_id = numeric_identifier(id, identifier)?;

    client.workflow_nodes().get(node_id).await.map_err(|e| {
        remote_error(format!("Workflow node {} no longer exists", node_id), e)
            .for_resource(id.clone())
    })?;

    let payload = build_payload(to)?;
    let updated = client
        .workflow_nodes()
        .update(node_id, &payload)
        .await
        .map_err(|e| {
            remote_error("Failed to update workflow node", e).for_resource(id.clone())
        })?;

    Ok(project(id.clone(), updated))
}

pub async fn delete(client: &AwxClient, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
    let node_id = numeric_identifier(id, identifier)?;

    client.workflow_nodes().get(node_id).await.map_err(|e| {
        remote_error(format!("Workflow node {} not found", node_id), e).for_resource(id.clone())
    })?;

    client
        .workflow_nodes()
        .delete(node_id)
        .await
        .map_err(|e| remote_error("Failed to delete workflow node", e).for_resource(id.clone()))
}

fn parse_link(resource: &Resource) -> ProviderResult<NodeLink> {
    resource
        .attr_str("link")
        .unwrap_or("success")
        .parse()
        .map_err(|msg: String| {
            ProviderError::new("Invalid link attribute")
                .with_detail(msg)
                .for_resource(resource.id.clone())
        })
}

fn build_payload(resource: &Resource) -> ProviderResult<WorkflowNodePayload> {
    let workflow_job_template = required_int(resource, "workflow_job_template_id")?;
    let unified_job_template = required_int(resource, "unified_job_template_id")?;

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

    Ok(WorkflowNodePayload {
        workflow_job_template,
        unified_job_template,
        inventory,
        extra_data,
        identifier: resource
            .attr_str("identifier")
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        all_parents_must_converge: resource
            .attr_bool("all_parents_must_converge")
            .unwrap_or(false),
    })
}

fn project(id: ResourceId, node: WorkflowJobTemplateNode) -> State {
    let mut attributes = HashMap::new();
    attributes.insert("id".to_string(), Value::Int(node.id));
    attributes.insert(
        "workflow_job_template_id".to_string(),
        Value::Int(node.workflow_job_template),
    );
    if let Some(ujt) = node.unified_job_template {
        attributes.insert("unified_job_template_id".to_string(), Value::Int(ujt));
    }
    if let Some(inv) = node.inventory {
        attributes.insert("inventory".to_string(), Value::String(inv.to_string()));
    }
    let extra = transform::json_to_yaml(&node.extra_data);
    if !extra.is_empty() {
        attributes.insert("extra_data".to_string(), Value::String(extra));
    }
    if !node.identifier.is_empty() {
        attributes.insert("identifier".to_string(), Value::String(node.identifier));
    }
    attributes.insert(
        "all_parents_must_converge".to_string(),
        Value::Bool(node.all_parents_must_converge),
    );

    let identifier = node.id.to_string();
    State::existing(id, attributes).with_identifier(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_resource() -> Resource {
        Resource::new("workflow_job_template_node", "deploy")
            .with_attribute("workflow_job_template_id", Value::Int(12))
            .with_attribute("unified_job_template_id", Value::Int(7))
            .with_attribute("identifier", Value::String("deploy-step".to_string()))
    }

    #[test]
    fn payload_defaults_are_applied() {
        let payload = build_payload(&node_resource()).unwrap();
        assert_eq!(payload.workflow_job_template, 12);
        assert_eq!(payload.unified_job_template, 7);
        assert_eq!(payload.identifier.as_deref(), Some("deploy-step"));
        assert!(!payload.all_parents_must_converge);
        assert!(payload.inventory.is_none());
        assert!(payload.extra_data.is_none());
    }

    #[test]
    fn missing_job_template_is_diagnosed() {
        let resource = Resource::new("workflow_job_template_node", "deploy")
            .with_attribute("workflow_job_template_id", Value::Int(12));
        let err = build_payload(&resource).unwrap_err();
        assert!(err.to_string().contains("unified_job_template_id"));
    }

    #[test]
    fn link_defaults_to_success() {
        assert_eq!(parse_link(&node_resource()).unwrap(), NodeLink::Success);

        let failure = node_resource().with_attribute("link", Value::String("failure".to_string()));
        assert_eq!(parse_link(&failure).unwrap(), NodeLink::Failure);
    }

    #[test]
    fn projection_keeps_graph_fields() {
        let node: WorkflowJobTemplateNode = serde_json::from_value(serde_json::json!({
            "id": 88,
            "workflow_job_template": 12,
            "unified_job_template": 7,
            "identifier": "deploy-step",
            "all_parents_must_converge": true,
            "extra_data": {"version": "1.2.3"}
        }))
        .unwrap();

        let state = project(ResourceId::new("workflow_job_template_node", "deploy"), node);
        assert_eq!(state.identifier.as_deref(), Some("88"));
        assert_eq!(
            state.attributes.get("all_parents_must_converge"),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            state.attributes.get("extra_data"),
            Some(&Value::String("version: 1.2.3".to_string()))
        );
    }
}
