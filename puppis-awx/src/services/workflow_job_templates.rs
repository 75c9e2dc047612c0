//! Workflow job template endpoints

use serde_json::json;

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::{
    ListResponse, NotificationEvent, NotificationTemplate, Schedule, SchedulePayload,
    WorkflowJobTemplate,
};

pub struct WorkflowJobTemplatesService<'a> {
    client: &'a AwxClient,
}

impl<'a> WorkflowJobTemplatesService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> AwxResult<WorkflowJobTemplate> {
        self.client
            .get(&format!("workflow_job_templates/{}/", id))
            .await
    }

    /// Create a schedule owned by the workflow job template
    pub async fn create_schedule(
        &self,
        workflow_job_template_id: i64,
        payload: &SchedulePayload,
    ) -> AwxResult<Schedule> {
        self.client
            .post(
                &format!("workflow_job_templates/{}/schedules/", workflow_job_template_id),
                payload,
            )
            .await
    }

    /// Attach a notification template for the given event
    pub async fn associate_notification_template(
        &self,
        workflow_job_template_id: i64,
        event: NotificationEvent,
        notification_template_id: i64,
    ) -> AwxResult<()> {
        self.client
            .post_no_content(
                &format!(
                    "workflow_job_templates/{}/{}/",
                    workflow_job_template_id,
                    event.endpoint()
                ),
                &json!({ "id": notification_template_id }),
            )
            .await
    }

    /// Detach a notification template for the given event
    pub async fn disassociate_notification_template(
        &self,
        workflow_job_template_id: i64,
        event: NotificationEvent,
        notification_template_id: i64,
    ) -> AwxResult<()> {
        self.client
            .post_no_content(
                &format!(
                    "workflow_job_templates/{}/{}/",
                    workflow_job_template_id,
                    event.endpoint()
                ),
                &json!({ "id": notification_template_id, "disassociate": true }),
            )
            .await
    }

    pub async fn list_notification_templates(
        &self,
        workflow_job_template_id: i64,
        event: NotificationEvent,
    ) -> AwxResult<ListResponse<NotificationTemplate>> {
        self.client
            .get(&format!(
                "workflow_job_templates/{}/{}/",
                workflow_job_template_id,
                event.endpoint()
            ))
            .await
    }
}
