//! Credential endpoints

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::Credential;

pub struct CredentialsService<'a> {
    client: &'a AwxClient,
}

impl<'a> CredentialsService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> AwxResult<Credential> {
        self.client.get(&format!("credentials/{}/", id)).await
    }
}
