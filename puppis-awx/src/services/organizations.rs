//! Organization endpoints

use serde_json::json;

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::{InstanceGroup, ListResponse, Organization, Selector};

pub struct OrganizationsService<'a> {
    client: &'a AwxClient,
}

impl<'a> OrganizationsService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, selector: &Selector) -> AwxResult<ListResponse<Organization>> {
        self.client
            .get_with_query("organizations/", &selector.to_query())
            .await
    }

    pub async fn get(&self, id: i64) -> AwxResult<Organization> {
        self.client.get(&format!("organizations/{}/", id)).await
    }

    /// Attach an instance group to the organization
    pub async fn associate_instance_group(
        &self,
        organization_id: i64,
        instance_group_id: i64,
    ) -> AwxResult<()> {
        self.client
            .post_no_content(
                &format!("organizations/{}/instance_groups/", organization_id),
                &json!({ "id": instance_group_id }),
            )
            .await
    }

    /// Detach an instance group from the organization
    pub async fn disassociate_instance_group(
        &self,
        organization_id: i64,
        instance_group_id: i64,
    ) -> AwxResult<()> {
        self.client
            .post_no_content(
                &format!("organizations/{}/instance_groups/", organization_id),
                &json!({ "id": instance_group_id, "disassociate": true }),
            )
            .await
    }

    pub async fn list_instance_groups(
        &self,
        organization_id: i64,
    ) -> AwxResult<ListResponse<InstanceGroup>> {
        self.client
            .get(&format!("organizations/{}/instance_groups/", organization_id))
            .await
    }
}
