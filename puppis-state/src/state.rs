//! State file structures for persisting managed resources

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The main state file structure that persists to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file format version
    pub version: u32,
    /// Monotonically increasing number for each state modification
    pub serial: u64,
    /// Unique identifier for this state lineage (prevents accidental overwrites)
    pub lineage: String,
    /// Version of Puppis that last modified this state
    pub puppis_version: String,
    /// All managed resources and their current state
    pub resources: Vec<ResourceState>,
}

impl StateFile {
    /// Current state file format version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new empty state file
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            serial: 0,
            lineage: uuid::Uuid::new_v4().to_string(),
            puppis_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: Vec::new(),
        }
    }

    /// Increment serial and stamp the current version for a new state write
    pub fn increment_serial(&mut self) {
        self.serial += 1;
        self.puppis_version = env!("CARGO_PKG_VERSION").to_string();
    }

    /// Find a resource by type and name
    pub fn find_resource(&self, resource_type: &str, name: &str) -> Option<&ResourceState> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.name == name)
    }

    /// Find a resource mutably by type and name
    pub fn find_resource_mut(
        &mut self,
        resource_type: &str,
        name: &str,
    ) -> Option<&mut ResourceState> {
        self.resources
            .iter_mut()
            .find(|r| r.resource_type == resource_type && r.name == name)
    }

    /// Add or update a resource in the state
    pub fn upsert_resource(&mut self, resource: ResourceState) {
        if let Some(existing) = self.find_resource_mut(&resource.resource_type, &resource.name) {
            *existing = resource;
        } else {
            self.resources.push(resource);
        }
    }

    /// Remove a resource from the state
    pub fn remove_resource(&mut self, resource_type: &str, name: &str) -> Option<ResourceState> {
        if let Some(pos) = self
            .resources
            .iter()
            .position(|r| r.resource_type == resource_type && r.name == name)
        {
            Some(self.resources.remove(pos))
        } else {
            None
        }
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single managed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type (e.g., "schedule", "organization_instance_group")
    pub resource_type: String,
    /// Binding name from the manifest
    pub name: String,
    /// Provider name (e.g., "awx")
    pub provider: String,
    /// Remote identifier recorded from create or read.
    /// Associations store a "parent/child" composite key here.
    #[serde(default)]
    pub identifier: Option<String>,
    /// All attributes of the resource as JSON values
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceState {
    /// Create a new resource state
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            provider: provider.into(),
            identifier: None,
            attributes: HashMap::new(),
        }
    }

    /// Set the remote identifier
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set an attribute value
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_file_new() {
        let state = StateFile::new();
        assert_eq!(state.version, StateFile::CURRENT_VERSION);
        assert_eq!(state.serial, 0);
        assert!(!state.lineage.is_empty());
        assert!(state.resources.is_empty());
    }

    #[test]
    fn state_file_increment_serial() {
        let mut state = StateFile::new();
        assert_eq!(state.serial, 0);
        state.increment_serial();
        assert_eq!(state.serial, 1);
        state.increment_serial();
        assert_eq!(state.serial, 2);
    }

    #[test]
    fn state_file_upsert_resource() {
        let mut state = StateFile::new();

        let first = ResourceState::new("schedule", "nightly", "awx")
            .with_identifier("42")
            .with_attribute("enabled", serde_json::json!(true));

        state.upsert_resource(first);
        assert_eq!(state.resources.len(), 1);

        // Update the same resource
        let second = ResourceState::new("schedule", "nightly", "awx")
            .with_identifier("42")
            .with_attribute("enabled", serde_json::json!(false));

        state.upsert_resource(second);
        assert_eq!(state.resources.len(), 1);
        assert_eq!(
            state.resources[0].attributes.get("enabled"),
            Some(&serde_json::json!(false))
        );
    }

    #[test]
    fn state_file_remove_resource() {
        let mut state = StateFile::new();

        state.upsert_resource(ResourceState::new("schedule", "nightly", "awx"));
        assert_eq!(state.resources.len(), 1);

        let removed = state.remove_resource("schedule", "nightly");
        assert!(removed.is_some());
        assert_eq!(state.resources.len(), 0);

        // Removing a resource that is not tracked returns None
        let removed = state.remove_resource("schedule", "weekly");
        assert!(removed.is_none());
    }

    #[test]
    fn composite_identifier_round_trip() {
        let resource = ResourceState::new("organization_instance_group", "default_pool", "awx")
            .with_identifier("3/12");

        let json = serde_json::to_string(&resource).unwrap();
        let back: ResourceState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.identifier.as_deref(), Some("3/12"));
    }

    #[test]
    fn state_file_serialization() {
        let mut state = StateFile::new();
        let resource = ResourceState::new("schedule", "nightly", "awx")
            .with_identifier("42")
            .with_attribute("rrule", serde_json::json!("RRULE:FREQ=DAILY"));

        state.upsert_resource(resource);

        let json = serde_json::to_string_pretty(&state).unwrap();
        let deserialized: StateFile = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.version, state.version);
        assert_eq!(deserialized.serial, state.serial);
        assert_eq!(deserialized.lineage, state.lineage);
        assert_eq!(deserialized.resources.len(), 1);
        assert_eq!(deserialized.resources[0].identifier.as_deref(), Some("42"));
    }
}
