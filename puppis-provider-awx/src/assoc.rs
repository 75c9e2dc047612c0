//! Association identifier handling
//!
//! Associations are edges between two objects. The API gives them no id of
//! their own, so state tracks the synthetic "parent/child" pair instead of
//! borrowing the child's id.

use puppis_core::provider::{ProviderError, ProviderResult};
use puppis_core::resource::ResourceId;

/// Render the tracked identifier for a parent/child edge
pub fn composite_id(parent: i64, child: i64) -> String {
    format!("{}/{}", parent, child)
}

/// Split a tracked identifier back into its parent and child ids
pub fn parse_composite_id(id: &ResourceId, identifier: &str) -> ProviderResult<(i64, i64)> {
    let invalid = || {
        ProviderError::new("Invalid association identifier")
            .with_detail(format!(
                "'{}' is not of the form <parent>/<child>",
                identifier
            ))
            .for_resource(id.clone())
    };

    let (parent, child) = identifier.split_once('/').ok_or_else(invalid)?;
    let parent = parent.parse().map_err(|_| invalid())?;
    let child = child.parse().map_err(|_| invalid())?;
    Ok((parent, child))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_round_trip() {
        let id = ResourceId::new("organization_instance_group", "main");
        let identifier = composite_id(3, 12);
        assert_eq!(identifier, "3/12");
        assert_eq!(parse_composite_id(&id, &identifier).unwrap(), (3, 12));
    }

    #[test]
    fn malformed_identifiers_are_diagnosed() {
        let id = ResourceId::new("organization_instance_group", "main");
        for bad in ["", "3", "3/12/9", "a/b", "3/"] {
            let err = parse_composite_id(&id, bad).unwrap_err();
            assert!(err.to_string().contains("Invalid association identifier"));
        }
    }
}
