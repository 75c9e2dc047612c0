//! Role resolution against the named role slots of a parent object
//!
//! Roles are not independently addressable in the API; they ride along in
//! the parent's summary fields. Resolution scans the populated slots by
//! name first, then by id.

use puppis_awx::models::{ObjectRoles, RoleSummary};
use puppis_core::provider::{ProviderError, ProviderResult};
use puppis_core::resource::Resource;

/// Role filter read from a resource block (name and numeric id)
#[derive(Debug, Clone, Default)]
pub struct RoleSelector {
    pub name: Option<String>,
    pub id: Option<i64>,
}

impl RoleSelector {
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            name: resource.attr_str("name").map(str::to_string),
            id: resource.attr_int("role_id"),
        }
    }

    fn describe(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), Some(id)) => format!("name={}, role_id={}", name, id),
            (Some(name), None) => format!("name={}", name),
            (None, Some(id)) => format!("role_id={}", id),
            (None, None) => "no filter".to_string(),
        }
    }
}

/// Resolve one role out of the parent's named slots.
///
/// A name match anywhere in the slot list beats an id match; ids are only
/// consulted when the name finds nothing.
pub fn find_named_role(
    parent_kind: &str,
    roles: &ObjectRoles,
    selector: &RoleSelector,
) -> ProviderResult<RoleSummary> {
    if selector.name.is_none() && selector.id.is_none() {
        return Err(
            ProviderError::new(format!("Missing selector for {} role", parent_kind))
                .with_detail("set at least one of role_id or name"),
        );
    }

    let named = roles.named_roles();

    if let Some(ref name) = selector.name
        && let Some((_, role)) = named.iter().find(|(_, role)| role.name == *name)
    {
        return Ok((*role).clone());
    }
    if let Some(id) = selector.id
        && let Some((_, role)) = named.iter().find(|(_, role)| role.id == id)
    {
        return Ok((*role).clone());
    }

    Err(
        ProviderError::new(format!("{} role not found", parent_kind)).with_detail(format!(
            "no role slot matches {}",
            selector.describe()
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roles() -> ObjectRoles {
        serde_json::from_value(serde_json::json!({
            "admin_role": {"id": 10, "name": "Admin", "description": "Can manage all aspects"},
            "execute_role": {"id": 11, "name": "Execute", "description": ""},
            "read_role": {"id": 12, "name": "Read", "description": ""}
        }))
        .unwrap()
    }

    #[test]
    fn resolves_by_name() {
        let selector = RoleSelector {
            name: Some("Admin".to_string()),
            id: None,
        };
        let role = find_named_role("organization", &sample_roles(), &selector).unwrap();
        assert_eq!(role.id, 10);
    }

    #[test]
    fn name_beats_id_when_both_supplied() {
        let selector = RoleSelector {
            name: Some("Read".to_string()),
            id: Some(10),
        };
        let role = find_named_role("organization", &sample_roles(), &selector).unwrap();
        assert_eq!(role.id, 12);
    }

    #[test]
    fn falls_back_to_id_when_name_misses() {
        let selector = RoleSelector {
            name: Some("Approve".to_string()),
            id: Some(11),
        };
        let role = find_named_role("organization", &sample_roles(), &selector).unwrap();
        assert_eq!(role.name, "Execute");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let selector = RoleSelector {
            name: Some("Deploy".to_string()),
            id: None,
        };
        let err = find_named_role("organization", &sample_roles(), &selector).unwrap_err();
        assert!(err.to_string().contains("organization role not found"));
        assert!(err.to_string().contains("name=Deploy"));
    }

    #[test]
    fn empty_selector_is_rejected() {
        let err =
            find_named_role("organization", &sample_roles(), &RoleSelector::default())
                .unwrap_err();
        assert!(err.to_string().contains("Missing selector"));
    }
}
