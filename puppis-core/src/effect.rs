//! Effect - A single planned operation against the remote system
//!
//! Effects are values; nothing happens until they are applied.

use crate::resource::{Resource, ResourceId, State};

/// A planned operation
#[derive(Debug, Clone)]
pub enum Effect {
    /// Resolve a data source (read-only lookup)
    Read(Resource),
    /// Create a resource
    Create(Resource),
    /// Update a resource in place
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
    },
    /// Delete and recreate a resource (a force-new attribute changed)
    Replace {
        id: ResourceId,
        from: State,
        to: Resource,
    },
    /// Delete a resource
    Delete(ResourceId),
}

impl Effect {
    /// Whether this effect mutates the remote system
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Effect::Read(_))
    }

    /// Identity of the affected resource
    pub fn resource_id(&self) -> &ResourceId {
        match self {
            Effect::Read(r) | Effect::Create(r) => &r.id,
            Effect::Update { id, .. } | Effect::Replace { id, .. } => id,
            Effect::Delete(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_is_not_mutating() {
        let read = Effect::Read(Resource::new("organization", "acme").with_read_only(true));
        assert!(!read.is_mutating());

        let create = Effect::Create(Resource::new("schedule", "nightly"));
        assert!(create.is_mutating());

        let delete = Effect::Delete(ResourceId::new("schedule", "nightly"));
        assert!(delete.is_mutating());
    }

    #[test]
    fn resource_id_of_each_variant() {
        let id = ResourceId::new("team", "ops");
        let e = Effect::Delete(id.clone());
        assert_eq!(e.resource_id(), &id);

        let e = Effect::Update {
            id: id.clone(),
            from: State::not_found(id.clone()),
            to: Resource::new("team", "ops"),
        };
        assert_eq!(e.resource_id(), &id);
    }
}
