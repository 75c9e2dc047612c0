//! Inventory endpoints

use crate::client::AwxClient;
use crate::error::AwxResult;
use crate::models::{Inventory, InventoryGroup, ListResponse, Selector};

pub struct InventoriesService<'a> {
    client: &'a AwxClient,
}

impl<'a> InventoriesService<'a> {
    pub(crate) fn new(client: &'a AwxClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> AwxResult<Inventory> {
        self.client.get(&format!("inventories/{}/", id)).await
    }

    /// Groups of the inventory, filtered server-side
    pub async fn list_groups(
        &self,
        inventory_id: i64,
        selector: &Selector,
    ) -> AwxResult<ListResponse<InventoryGroup>> {
        self.client
            .get_with_query(
                &format!("inventories/{}/groups/", inventory_id),
                &selector.to_query(),
            )
            .await
    }
}
