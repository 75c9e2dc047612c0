//! Project endpoints

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::{ListResponse, Project, Selector};

pub struct ProjectsService<'a> {
    client: &'a AwxClient,
}

impl<'a> ProjectsService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, selector: &Selector) -> AwxResult<ListResponse<Project>> {
        self.client
            .get_with_query("projects/", &selector.to_query())
            .await
    }

    pub async fn get(&self, id: i64) -> AwxResult<Project> {
        self.client.get(&format!("projects/{}/", id)).await
    }
}
