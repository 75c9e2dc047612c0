//! Job template endpoints

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::JobTemplate;

pub struct JobTemplatesService<'a> {
    client: &'a AwxClient,
}

impl<'a> JobTemplatesService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> AwxResult<JobTemplate> {
        self.client.get(&format!("job_templates/{}/", id)).await
    }
}
