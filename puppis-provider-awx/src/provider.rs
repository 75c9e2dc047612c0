//! The AWX provider: dispatch from resource types to API operations

use puppis_awx::{AwxClient, AwxConfig, AwxError};
use puppis_core::provider::{ProviderError, ProviderResult};
use puppis_core::resource::{Resource, ResourceId, State};

use crate::resources::{data, instance_group, node, notification, schedule, team_role};

/// Provider backed by one AWX server
#[derive(Debug, Clone)]
pub struct AwxProvider {
    client: AwxClient,
}

impl AwxProvider {
    pub fn new(config: AwxConfig) -> ProviderResult<Self> {
        let client = AwxClient::new(config).map_err(|e| {
            ProviderError::new("Failed to construct AWX client")
                .with_detail(e.to_string())
                .with_cause(e)
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing client (for testing against a mock server)
    pub fn with_client(client: AwxClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AwxClient {
        &self.client
    }

    pub(crate) async fn read_resource(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id.clone()));
        };

        match id.resource_type.as_str() {
            "schedule" => {
                schedule::read(&self.client, id, identifier, schedule::Variant::Standalone).await
            }
            "workflow_job_template_schedule" => {
                schedule::read(&self.client, id, identifier, schedule::Variant::UnderWorkflow).await
            }
            "workflow_job_template_node" => node::read(&self.client, id, identifier).await,
            "organization_instance_group" => instance_group::read(id, identifier),
            "workflow_job_template_notification" => notification::read(id, identifier),
            "team_role" => team_role::read(id, identifier),
            other => Err(unknown_resource_type(other).for_resource(id.clone())),
        }
    }

    pub(crate) async fn resolve_resource(&self, resource: &Resource) -> ProviderResult<State> {
        match resource.id.resource_type.as_str() {
            "data.organization" => data::organization(&self.client, resource).await,
            "data.team" => data::team(&self.client, resource).await,
            "data.project" => data::project(&self.client, resource).await,
            "data.schedule" => data::schedule(&self.client, resource).await,
            "data.inventory_group" => data::inventory_group(&self.client, resource).await,
            "data.credential" => data::credential(&self.client, resource).await,
            "data.organization_role" => data::organization_role(&self.client, resource).await,
            "data.job_template_role" => data::job_template_role(&self.client, resource).await,
            other => Err(unknown_resource_type(other).for_resource(resource.id.clone())),
        }
    }

    pub(crate) async fn create_resource(&self, resource: &Resource) -> ProviderResult<State> {
        match resource.id.resource_type.as_str() {
            "schedule" => {
                schedule::create(&self.client, resource, schedule::Variant::Standalone).await
            }
            "workflow_job_template_schedule" => {
                schedule::create(&self.client, resource, schedule::Variant::UnderWorkflow).await
            }
            "workflow_job_template_node" => node::create(&self.client, resource).await,
            "organization_instance_group" => instance_group::create(&self.client, resource).await,
            "workflow_job_template_notification" => {
                notification::create(&self.client, resource).await
            }
            "team_role" => team_role::create(&self.client, resource).await,
            other => Err(unknown_resource_type(other).for_resource(resource.id.clone())),
        }
    }

    pub(crate) async fn update_resource(
        &self,
        id: &ResourceId,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        match id.resource_type.as_str() {
            "schedule" => {
                schedule::update(&self.client, id, identifier, to, schedule::Variant::Standalone)
                    .await
            }
            "workflow_job_template_schedule" => {
                schedule::update(
                    &self.client,
                    id,
                    identifier,
                    to,
                    schedule::Variant::UnderWorkflow,
                )
                .await
            }
            "workflow_job_template_node" => node::update(&self.client, id, identifier, to).await,
            "organization_instance_group"
            | "workflow_job_template_notification"
            | "team_role" => Err(ProviderError::new(format!(
                "{} cannot be updated in place",
                id.resource_type
            ))
            .with_detail("all attributes force replacement")
            .for_resource(id.clone())),
            other => Err(unknown_resource_type(other).for_resource(id.clone())),
        }
    }

    pub(crate) async fn delete_resource(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        match id.resource_type.as_str() {
            "schedule" | "workflow_job_template_schedule" => {
                schedule::delete(&self.client, id, identifier).await
            }
            "workflow_job_template_node" => node::delete(&self.client, id, identifier).await,
            "organization_instance_group" => {
                instance_group::delete(&self.client, id, identifier).await
            }
            "workflow_job_template_notification" => {
                notification::delete(&self.client, id, identifier).await
            }
            "team_role" => team_role::delete(&self.client, id, identifier).await,
            other => Err(unknown_resource_type(other).for_resource(id.clone())),
        }
    }
}

// ── Shared helpers ────────────────────────────────────────────────────

/// Wrap a client error, keeping the server's message as the detail and the
/// error itself as the cause.
pub(crate) fn remote_error(summary: impl Into<String>, e: AwxError) -> ProviderError {
    ProviderError::new(summary).with_detail(e.to_string()).with_cause(e)
}

pub(crate) fn required_str<'a>(resource: &'a Resource, attr: &str) -> ProviderResult<&'a str> {
    resource.attr_str(attr).ok_or_else(|| {
        ProviderError::new(format!("Missing required attribute {}", attr))
            .for_resource(resource.id.clone())
    })
}

pub(crate) fn required_int(resource: &Resource, attr: &str) -> ProviderResult<i64> {
    resource.attr_int(attr).ok_or_else(|| {
        ProviderError::new(format!("Missing required attribute {}", attr))
            .for_resource(resource.id.clone())
    })
}

/// Parse a tracked identifier that must be one numeric remote id
pub(crate) fn numeric_identifier(id: &ResourceId, identifier: &str) -> ProviderResult<i64> {
    identifier.parse().map_err(|_| {
        ProviderError::new("Invalid tracked identifier")
            .with_detail(format!("'{}' is not a numeric id", identifier))
            .for_resource(id.clone())
    })
}

pub(crate) fn unknown_resource_type(resource_type: &str) -> ProviderError {
    ProviderError::new(format!("Unknown resource type: {}", resource_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use puppis_core::resource::Value;

    #[tokio::test]
    async fn read_without_identifier_is_not_found() {
        let provider = AwxProvider::with_client(AwxClient::with_http_client(
            "http://127.0.0.1:1",
            puppis_awx::AwxAuth::Bearer {
                token: "t".to_string(),
            },
            reqwest::Client::new(),
        ));

        let id = ResourceId::new("schedule", "nightly");
        let state = provider.read_resource(&id, None).await.unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn unknown_type_is_rejected_everywhere() {
        let provider = AwxProvider::with_client(AwxClient::with_http_client(
            "http://127.0.0.1:1",
            puppis_awx::AwxAuth::Bearer {
                token: "t".to_string(),
            },
            reqwest::Client::new(),
        ));

        let resource = Resource::new("firewall", "edge");
        let err = provider.create_resource(&resource).await.unwrap_err();
        assert!(err.to_string().contains("Unknown resource type: firewall"));

        let err = provider.resolve_resource(&resource).await.unwrap_err();
        assert!(err.to_string().contains("Unknown resource type: firewall"));
    }

    #[tokio::test]
    async fn associations_refuse_in_place_updates() {
        let provider = AwxProvider::with_client(AwxClient::with_http_client(
            "http://127.0.0.1:1",
            puppis_awx::AwxAuth::Bearer {
                token: "t".to_string(),
            },
            reqwest::Client::new(),
        ));

        let id = ResourceId::new("team_role", "ops_admin");
        let to = Resource::new("team_role", "ops_admin")
            .with_attribute("team_id", Value::Int(5))
            .with_attribute("organization_id", Value::Int(3));
        let err = provider
            .update_resource(&id, "5/10", &to)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot be updated in place"));
    }

    #[test]
    fn numeric_identifier_diagnoses_garbage() {
        let id = ResourceId::new("schedule", "nightly");
        assert_eq!(numeric_identifier(&id, "42").unwrap(), 42);
        let err = numeric_identifier(&id, "3/9").unwrap_err();
        assert!(err.to_string().contains("not a numeric id"));
    }
}
