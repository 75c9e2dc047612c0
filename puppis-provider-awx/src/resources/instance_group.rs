//! Organization / instance group membership

use std::collections::HashMap;

use puppis_awx::AwxClient;
use puppis_core::provider::ProviderResult;
use puppis_core::resource::{Resource, ResourceId, State, Value};

use crate::assoc;
use crate::provider::{remote_error, required_int};

pub async fn create(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let organization_id = required_int(resource, "organization_id")?;
    let instance_group_id = required_int(resource, "instance_group_id")?;

    // Confirm the parent before touching the membership endpoint so a stale
    // id fails with a pointed message instead of a bare 404.
    client.organizations().get(organization_id).await.map_err(|e| {
        remote_error(format!("Organization {} not found", organization_id), e)
            .for_resource(resource.id.clone())
    })?;

    client
        .organizations()
        .associate_instance_group(organization_id, instance_group_id)
        .await
        .map_err(|e| {
            remote_error(
                format!(
                    "Failed to attach instance group {} to organization {}",
                    instance_group_id, organization_id
                ),
                e,
            )
            .for_resource(resource.id.clone())
        })?;

    Ok(project(
        resource.id.clone(),
        organization_id,
        instance_group_id,
    ))
}

/// Memberships carry no server-side state of their own; the tracked
/// identifier is the membership.
pub fn read(id: &ResourceId, identifier: &str) -> ProviderResult<State> {
    let (organization_id, instance_group_id) = assoc::parse_composite_id(id, identifier)?;
    Ok(project(id.clone(), organization_id, instance_group_id))
}

pub async fn delete(client: &AwxClient, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
    let (organization_id, instance_group_id) = assoc::parse_composite_id(id, identifier)?;

    match client
        .organizations()
        .disassociate_instance_group(organization_id, instance_group_id)
        .await
    {
        Ok(()) => Ok(()),
        // Either side already gone means there is nothing left to detach.
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(remote_error(
            format!(
                "Failed to detach instance group {} from organization {}",
                instance_group_id, organization_id
            ),
            e,
        )
        .for_resource(id.clone())),
    }
}

fn project(id: ResourceId, organization_id: i64, instance_group_id: i64) -> State {
    let mut attributes = HashMap::new();
    attributes.insert("organization_id".to_string(), Value::Int(organization_id));
    attributes.insert(
        "instance_group_id".to_string(),
        Value::Int(instance_group_id),
    );

    let identifier = assoc::composite_id(organization_id, instance_group_id);
    State::existing(id, attributes).with_identifier(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_reconstructs_from_the_identifier() {
        let id = ResourceId::new("organization_instance_group", "ops_pool");
        let state = read(&id, "3/9").unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("3/9"));
        assert_eq!(state.attributes.get("organization_id"), Some(&Value::Int(3)));
        assert_eq!(
            state.attributes.get("instance_group_id"),
            Some(&Value::Int(9))
        );
    }

    #[test]
    fn read_rejects_a_malformed_identifier() {
        let id = ResourceId::new("organization_instance_group", "ops_pool");
        let err = read(&id, "not-composite").unwrap_err();
        assert!(err.to_string().contains("Invalid association identifier"));
    }
}
