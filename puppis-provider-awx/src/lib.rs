//! Puppis AWX provider
//!
//! Drives an AWX server through its v2 REST API.
//!
//! ## Module Structure
//!
//! - `provider` - AwxProvider and the per-type dispatch
//! - `registry` - Resource and data source schemas
//! - `resources` - Lifecycle handlers per resource family
//! - `lookup` - Selector-based data source resolution
//! - `roles` - Role resolution against named role slots
//! - `assoc` - Composite identifiers for associations
//! - `transform` - YAML and value conversions

pub mod assoc;
pub mod lookup;
pub mod provider;
pub mod registry;
pub mod resources;
pub mod roles;
pub mod transform;

// Re-export main types
pub use provider::AwxProvider;

use puppis_core::provider::{BoxFuture, Provider, ProviderResult};
use puppis_core::resource::{Resource, ResourceId, State};
use puppis_core::schema::ResourceSchema;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for AwxProvider {
    fn name(&self) -> &'static str {
        "awx"
    }

    fn schemas(&self) -> Vec<ResourceSchema> {
        registry::schemas()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_resource(&id, identifier.as_deref()).await })
    }

    fn resolve(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.resolve_resource(&resource).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(&resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let to = to.clone();
        Box::pin(async move { self.update_resource(&id, &identifier, &to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&id, &identifier).await })
    }
}
