//! Team endpoints

use serde_json::json;

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::{ListResponse, RoleSummary, Selector, Team};

pub struct TeamsService<'a> {
    client: &'a AwxClient,
}

impl<'a> TeamsService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, selector: &Selector) -> AwxResult<ListResponse<Team>> {
        self.client
            .get_with_query("teams/", &selector.to_query())
            .await
    }

    pub async fn get(&self, id: i64) -> AwxResult<Team> {
        self.client.get(&format!("teams/{}/", id)).await
    }

    /// Roles currently granted to the team
    pub async fn list_roles(&self, team_id: i64) -> AwxResult<ListResponse<RoleSummary>> {
        self.client.get(&format!("teams/{}/roles/", team_id)).await
    }

    /// Grant a role to the team
    pub async fn grant_role(&self, team_id: i64, role_id: i64) -> AwxResult<()> {
        self.client
            .post_no_content(&format!("teams/{}/roles/", team_id), &json!({ "id": role_id }))
            .await
    }

    /// Revoke a role from the team
    pub async fn revoke_role(&self, team_id: i64, role_id: i64) -> AwxResult<()> {
        self.client
            .post_no_content(
                &format!("teams/{}/roles/", team_id),
                &json!({ "id": role_id, "disassociate": true }),
            )
            .await
    }
}
