//! Schedule endpoints

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::{ListResponse, Schedule, SchedulePayload, Selector};

pub struct SchedulesService<'a> {
    client: &'a AwxClient,
}

impl<'a> SchedulesService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, selector: &Selector) -> AwxResult<ListResponse<Schedule>> {
        self.client
            .get_with_query("schedules/", &selector.to_query())
            .await
    }

    pub async fn get(&self, id: i64) -> AwxResult<Schedule> {
        self.client.get(&format!("schedules/{}/", id)).await
    }

    pub async fn create(&self, payload: &SchedulePayload) -> AwxResult<Schedule> {
        self.client.post("schedules/", payload).await
    }

    /// Replace every field of the schedule
    pub async fn update(&self, id: i64, payload: &SchedulePayload) -> AwxResult<Schedule> {
        self.client.put(&format!("schedules/{}/", id), payload).await
    }

    pub async fn delete(&self, id: i64) -> AwxResult<()> {
        self.client.delete(&format!("schedules/{}/", id)).await
    }
}
