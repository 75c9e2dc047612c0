//! Roles granted to teams
//!
//! The role is resolved out of the organization's named slots at create
//! time; what gets tracked is the grant itself, as `<team>/<role>`.

use std::collections::HashMap;

use puppis_awx::AwxClient;
use puppis_core::provider::ProviderResult;
use puppis_core::resource::{Resource, ResourceId, State, Value};

use crate::assoc;
use crate::provider::{remote_error, required_int};
use crate::roles::{RoleSelector, find_named_role};

pub async fn create(client: &AwxClient, resource: &Resource) -> ProviderResult<State> {
    let team_id = required_int(resource, "team_id")?;
    let organization_id = required_int(resource, "organization_id")?;

    client.teams().get(team_id).await.map_err(|e| {
        remote_error(format!("Team {} not found", team_id), e).for_resource(resource.id.clone())
    })?;

    let organization = client.organizations().get(organization_id).await.map_err(|e| {
        remote_error(format!("Organization {} not found", organization_id), e)
            .for_resource(resource.id.clone())
    })?;

    let roles = organization
        .summary_fields
        .and_then(|sf| sf.object_roles)
        .unwrap_or_default();
    let selector = RoleSelector::from_resource(resource);
    let role = find_named_role("organization", &roles, &selector)
        .map_err(|e| e.for_resource(resource.id.clone()))?;

    client
        .teams()
        .grant_role(team_id, role.id)
        .await
        .map_err(|e| {
            remote_error(
                format!("Failed to grant role {} to team {}", role.name, team_id),
                e,
            )
            .for_resource(resource.id.clone())
        })?;

    let mut attributes = HashMap::new();
    attributes.insert("team_id".to_string(), Value::Int(team_id));
    attributes.insert("organization_id".to_string(), Value::Int(organization_id));
    attributes.insert("role_id".to_string(), Value::Int(role.id));
    attributes.insert("name".to_string(), Value::String(role.name));

    let identifier = assoc::composite_id(team_id, role.id);
    Ok(State::existing(resource.id.clone(), attributes).with_identifier(identifier))
}

/// The grant has no server-side document to fetch, so read reconstructs
/// what the identifier encodes. The organization and resolved role name
/// only exist in the state recorded at create time.
pub fn read(id: &ResourceId, identifier: &str) -> ProviderResult<State> {
    let (team_id, role_id) = assoc::parse_composite_id(id, identifier)?;

    let mut attributes = HashMap::new();
    attributes.insert("team_id".to_string(), Value::Int(team_id));
    attributes.insert("role_id".to_string(), Value::Int(role_id));

    Ok(State::existing(id.clone(), attributes).with_identifier(identifier.to_string()))
}

pub async fn delete(client: &AwxClient, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
    let (team_id, role_id) = assoc::parse_composite_id(id, identifier)?;

    match client.teams().revoke_role(team_id, role_id).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(remote_error(
            format!("Failed to revoke role {} from team {}", role_id, team_id),
            e,
        )
        .for_resource(id.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_reconstructs_the_grant() {
        let id = ResourceId::new("team_role", "ops_admin");
        let state = read(&id, "5/10").unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("5/10"));
        assert_eq!(state.attributes.get("team_id"), Some(&Value::Int(5)));
        assert_eq!(state.attributes.get("role_id"), Some(&Value::Int(10)));
        assert!(!state.attributes.contains_key("name"));
    }

    #[test]
    fn read_rejects_a_malformed_identifier() {
        let id = ResourceId::new("team_role", "ops_admin");
        assert!(read(&id, "fifty").is_err());
    }
}
