//! Workflow job template node endpoints

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::{ListResponse, NodeLink, WorkflowJobTemplateNode, WorkflowNodePayload};

pub struct WorkflowNodesService<'a> {
    client: &'a AwxClient,
}

impl<'a> WorkflowNodesService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> AwxResult<WorkflowJobTemplateNode> {
        self.client
            .get(&format!("workflow_job_template_nodes/{}/", id))
            .await
    }

    /// Create a root node in the workflow graph
    pub async fn create(&self, payload: &WorkflowNodePayload) -> AwxResult<WorkflowJobTemplateNode> {
        self.client
            .post("workflow_job_template_nodes/", payload)
            .await
    }

    /// Create a node hanging off the parent through the given link.
    ///
    /// The server creates the node and associates it in one call.
    pub async fn create_linked(
        &self,
        parent_node_id: i64,
        link: NodeLink,
        payload: &WorkflowNodePayload,
    ) -> AwxResult<WorkflowJobTemplateNode> {
        self.client
            .post(
                &format!(
                    "workflow_job_template_nodes/{}/{}/",
                    parent_node_id,
                    link.endpoint()
                ),
                payload,
            )
            .await
    }

    /// Replace every field of the node
    pub async fn update(
        &self,
        id: i64,
        payload: &WorkflowNodePayload,
    ) -> AwxResult<WorkflowJobTemplateNode> {
        self.client
            .put(&format!("workflow_job_template_nodes/{}/", id), payload)
            .await
    }

    pub async fn delete(&self, id: i64) -> AwxResult<()> {
        self.client
            .delete(&format!("workflow_job_template_nodes/{}/", id))
            .await
    }

    /// Nodes linked to the parent through the given link
    pub async fn list_linked(
        &self,
        parent_node_id: i64,
        link: NodeLink,
    ) -> AwxResult<ListResponse<WorkflowJobTemplateNode>> {
        self.client
            .get(&format!(
                "workflow_job_template_nodes/{}/{}/",
                parent_node_id,
                link.endpoint()
            ))
            .await
    }
}
