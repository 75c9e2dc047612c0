//! Data sources: read-only lookups resolved on every plan
//!
//! Each resolves a selector to exactly one remote object and projects its
//! fields, with the remote id as both the tracked identifier and the `id`
//! attribute for references.

use std::collections::HashMap;

use puppis_awx::AwxClient;
use puppis_awx::models::ENCRYPTED;
use puppis_core::provider::ProviderResult;
use puppis_core::resource::{Resource, State, Value};

use crate::lookup::{require_filter, select_one, selector_from};
use crate::provider::{remote_error, required_int};
use crate::roles::{RoleSelector, find_named_role};
use crate::transform;

pub async fn organization(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let selector = selector_from(resource);
    require_filter("organization", &selector)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let list = client
        .organizations()
        .list(&selector)
        .await
        .map_err(|e| remote_error("Organization lookup failed", e).for_resource(resource.id.clone()))?;
    let org = select_one("organization", &selector, list)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let mut attributes = HashMap::new();
    attributes.insert("id".to_string(), Value::Int(org.id));
    attributes.insert("name".to_string(), Value::String(org.name));
    attributes.insert("description".to_string(), Value::String(org.description));

    Ok(State::existing(resource.id.clone(), attributes).with_identifier(org.id.to_string()))
}

pub async fn team(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let selector = selector_from(resource);
    require_filter("team", &selector).map_err(|e| e.for_resource(resource.id.clone()))?;

    let list = client
        .teams()
        .list(&selector)
        .await
        .map_err(|e| remote_error("Team lookup failed", e).for_resource(resource.id.clone()))?;
    let team = select_one("team", &selector, list)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let entitlements = client
        .teams()
        .list_roles(team.id)
        .await
        .map_err(|e| remote_error("Team role listing failed", e).for_resource(resource.id.clone()))?;

    let mut attributes = HashMap::new();
    attributes.insert("id".to_string(), Value::Int(team.id));
    attributes.insert("name".to_string(), Value::String(team.name));
    attributes.insert("description".to_string(), Value::String(team.description));
    if let Some(org) = team.organization {
        attributes.insert("organization_id".to_string(), Value::Int(org));
    }
    attributes.insert(
        "role_entitlement_count".to_string(),
        Value::Int(entitlements.count),
    );

    Ok(State::existing(resource.id.clone(), attributes).with_identifier(team.id.to_string()))
}

pub async fn project(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let selector = selector_from(resource);
    require_filter("project", &selector).map_err(|e| e.for_resource(resource.id.clone()))?;

    let list = client
        .projects()
        .list(&selector)
        .await
        .map_err(|e| remote_error("Project lookup failed", e).for_resource(resource.id.clone()))?;
    let project = select_one("project", &selector, list)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let mut attributes = HashMap::new();
    attributes.insert("id".to_string(), Value::Int(project.id));
    attributes.insert("name".to_string(), Value::String(project.name));
    attributes.insert(
        "description".to_string(),
        Value::String(project.description),
    );
    attributes.insert("scm_type".to_string(), Value::String(project.scm_type));
    attributes.insert("scm_url".to_string(), Value::String(project.scm_url));
    attributes.insert("scm_branch".to_string(), Value::String(project.scm_branch));
    if let Some(org) = project.organization {
        attributes.insert("organization_id".to_string(), Value::Int(org));
    }

    Ok(State::existing(resource.id.clone(), attributes).with_identifier(project.id.to_string()))
}

pub async fn schedule(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let selector = selector_from(resource);
    require_filter("schedule", &selector).map_err(|e| e.for_resource(resource.id.clone()))?;

    let list = client
        .schedules()
        .list(&selector)
        .await
        .map_err(|e| remote_error("Schedule lookup failed", e).for_resource(resource.id.clone()))?;
    let schedule = select_one("schedule", &selector, list)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let mut attributes = HashMap::new();
    attributes.insert("id".to_string(), Value::Int(schedule.id));
    attributes.insert("name".to_string(), Value::String(schedule.name));
    attributes.insert(
        "description".to_string(),
        Value::String(schedule.description),
    );
    attributes.insert("rrule".to_string(), Value::String(schedule.rrule));
    attributes.insert("enabled".to_string(), Value::Bool(schedule.enabled));
    attributes.insert(
        "unified_job_template_id".to_string(),
        Value::Int(schedule.unified_job_template),
    );
    if let Some(inv) = schedule.inventory {
        attributes.insert("inventory".to_string(), Value::String(inv.to_string()));
    }
    let extra = transform::json_to_yaml(&schedule.extra_data);
    if !extra.is_empty() {
        attributes.insert("extra_data".to_string(), Value::String(extra));
    }

    Ok(State::existing(resource.id.clone(), attributes).with_identifier(schedule.id.to_string()))
}

pub async fn inventory_group(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let inventory_id = required_int(resource, "inventory_id")?;
    let selector = selector_from(resource);
    require_filter("inventory group", &selector)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let list = client
        .inventories()
        .list_groups(inventory_id, &selector)
        .await
        .map_err(|e| {
            remote_error("Inventory group lookup failed", e).for_resource(resource.id.clone())
        })?;
    let group = select_one("inventory group", &selector, list)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let mut attributes = HashMap::new();
    attributes.insert("inventory_id".to_string(), Value::Int(inventory_id));
    attributes.insert("id".to_string(), Value::Int(group.id));
    attributes.insert("name".to_string(), Value::String(group.name));
    attributes.insert("description".to_string(), Value::String(group.description));

    Ok(State::existing(resource.id.clone(), attributes).with_identifier(group.id.to_string()))
}

pub async fn credential(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let credential_id = required_int(resource, "credential_id")?;

    let cred = client.credentials().get(credential_id).await.map_err(|e| {
        remote_error(
            format!("Credential {} lookup failed", credential_id),
            e,
        )
        .for_resource(resource.id.clone())
    })?;

    let mut attributes = HashMap::new();
    attributes.insert("credential_id".to_string(), Value::Int(cred.id));
    attributes.insert("id".to_string(), Value::Int(cred.id));
    attributes.insert("name".to_string(), Value::String(cred.name.clone()));
    attributes.insert(
        "description".to_string(),
        Value::String(cred.description.clone()),
    );
    if let Some(org) = cred.organization {
        attributes.insert("organization_id".to_string(), Value::Int(org));
    }
    for key in ["url", "client", "tenant"] {
        if let Some(value) = cred.input_str(key) {
            attributes.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    // The server masks secrets it will not echo; storing the mask would
    // clobber a real value downstream, so it is dropped instead.
    if let Some(secret) = cred.input_str("secret") {
        if secret == ENCRYPTED {
            tracing::warn!(
                credential = cred.id,
                "secret input is masked by the server and will not be projected"
            );
        } else {
            attributes.insert("secret".to_string(), Value::String(secret.to_string()));
        }
    }

    Ok(State::existing(resource.id.clone(), attributes).with_identifier(cred.id.to_string()))
}

pub async fn organization_role(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let organization_id = required_int(resource, "organization_id")?;

    let org = client.organizations().get(organization_id).await.map_err(|e| {
        remote_error(
            format!("Organization {} lookup failed", organization_id),
            e,
        )
        .for_resource(resource.id.clone())
    })?;

    let roles = org
        .summary_fields
        .and_then(|sf| sf.object_roles)
        .unwrap_or_default();
    let selector = RoleSelector::from_resource(resource);
    let role = find_named_role("organization", &roles, &selector)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let mut attributes = HashMap::new();
    attributes.insert("organization_id".to_string(), Value::Int(organization_id));
    attributes.insert("id".to_string(), Value::Int(role.id));
    attributes.insert("role_id".to_string(), Value::Int(role.id));
    attributes.insert("name".to_string(), Value::String(role.name));

    Ok(State::existing(resource.id.clone(), attributes).with_identifier(role.id.to_string()))
}

pub async fn job_template_role(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let job_template_id = required_int(resource, "job_template_id")?;

    let template = client.job_templates().get(job_template_id).await.map_err(|e| {
        remote_error(
            format!("Job template {} lookup failed", job_template_id),
            e,
        )
        .for_resource(resource.id.clone())
    })?;

    let roles = template
        .summary_fields
        .and_then(|sf| sf.object_roles)
        .unwrap_or_default();
    let selector = RoleSelector::from_resource(resource);
    let role = find_named_role("job template", &roles, &selector)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    let mut attributes = HashMap::new();
    attributes.insert("job_template_id".to_string(), Value::Int(job_template_id));
    attributes.insert("id".to_string(), Value::Int(role.id));
    attributes.insert("role_id".to_string(), Value::Int(role.id));
    attributes.insert("name".to_string(), Value::String(role.name));

    Ok(State::existing(resource.id.clone(), attributes).with_identifier(role.id.to_string()))
}
