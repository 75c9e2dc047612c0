//! Resource and data-source schemas
//!
//! Every type the provider handles is declared here exactly once;
//! [`schemas`] is the single source the dispatcher and the CLI validate
//! against. Data sources carry the `data.` prefix so a selector block and
//! a managed resource of the same family never collide.

use puppis_core::resource::Value;
use puppis_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

fn link_type() -> AttributeType {
    AttributeType::Enum(vec![
        "success".to_string(),
        "failure".to_string(),
        "always".to_string(),
    ])
}

fn event_type() -> AttributeType {
    AttributeType::Enum(vec![
        "started".to_string(),
        "success".to_string(),
        "error".to_string(),
    ])
}

// ── Data sources ─────────────────────────────────────────────────────────

pub fn organization_data_schema() -> ResourceSchema {
    ResourceSchema::new("data.organization")
        .with_description("Look up one organization by id or name")
        .attribute(
            AttributeSchema::new("id", AttributeType::Int)
                .computed()
                .with_description("Numeric id; selector and projection"),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .computed()
                .with_description("Organization name; selector and projection"),
        )
        .attribute(AttributeSchema::new("description", AttributeType::String).computed())
}

pub fn team_data_schema() -> ResourceSchema {
    ResourceSchema::new("data.team")
        .with_description("Look up one team by id or name")
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("name", AttributeType::String).computed())
        .attribute(AttributeSchema::new("description", AttributeType::String).computed())
        .attribute(
            AttributeSchema::new("organization_id", AttributeType::Int)
                .computed()
                .with_description("Organization the team belongs to"),
        )
        .attribute(
            AttributeSchema::new("role_entitlement_count", AttributeType::Int)
                .computed()
                .with_description("Number of roles currently granted to the team"),
        )
}

pub fn project_data_schema() -> ResourceSchema {
    ResourceSchema::new("data.project")
        .with_description("Look up one project by id or name")
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("name", AttributeType::String).computed())
        .attribute(AttributeSchema::new("description", AttributeType::String).computed())
        .attribute(AttributeSchema::new("scm_type", AttributeType::String).computed())
        .attribute(AttributeSchema::new("scm_url", AttributeType::String).computed())
        .attribute(AttributeSchema::new("scm_branch", AttributeType::String).computed())
        .attribute(AttributeSchema::new("organization_id", AttributeType::Int).computed())
}

pub fn schedule_data_schema() -> ResourceSchema {
    ResourceSchema::new("data.schedule")
        .with_description("Look up one schedule by id or name")
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("name", AttributeType::String).computed())
        .attribute(AttributeSchema::new("description", AttributeType::String).computed())
        .attribute(
            AttributeSchema::new("rrule", AttributeType::String)
                .computed()
                .with_description("RFC 5545 recurrence rule"),
        )
        .attribute(AttributeSchema::new("enabled", AttributeType::Bool).computed())
        .attribute(
            AttributeSchema::new("unified_job_template_id", AttributeType::Int).computed(),
        )
        .attribute(
            AttributeSchema::new("inventory", AttributeType::String)
                .computed()
                .with_description("Prompted inventory id, empty when not overridden"),
        )
        .attribute(
            AttributeSchema::new("extra_data", AttributeType::String)
                .computed()
                .with_description("Schedule variables as a YAML string"),
        )
}

pub fn inventory_group_data_schema() -> ResourceSchema {
    ResourceSchema::new("data.inventory_group")
        .with_description("Look up one group inside an inventory")
        .attribute(
            AttributeSchema::new("inventory_id", AttributeType::Int)
                .required()
                .with_description("Inventory to search in"),
        )
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("name", AttributeType::String).computed())
        .attribute(AttributeSchema::new("description", AttributeType::String).computed())
}

pub fn credential_data_schema() -> ResourceSchema {
    ResourceSchema::new("data.credential")
        .with_description("Fetch a credential and project its plain inputs")
        .attribute(
            AttributeSchema::new("credential_id", AttributeType::Int)
                .required()
                .with_description("Numeric id of the credential"),
        )
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("name", AttributeType::String).computed())
        .attribute(AttributeSchema::new("description", AttributeType::String).computed())
        .attribute(AttributeSchema::new("organization_id", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("url", AttributeType::String).computed())
        .attribute(AttributeSchema::new("client", AttributeType::String).computed())
        .attribute(AttributeSchema::new("tenant", AttributeType::String).computed())
        .attribute(
            AttributeSchema::new("secret", AttributeType::String)
                .computed()
                .sensitive()
                .with_description("Omitted when the server masks the value"),
        )
}

pub fn organization_role_data_schema() -> ResourceSchema {
    ResourceSchema::new("data.organization_role")
        .with_description("Resolve a named role slot on an organization")
        .attribute(
            AttributeSchema::new("organization_id", AttributeType::Int)
                .required()
                .with_description("Organization carrying the role"),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .computed()
                .with_description("Role name, e.g. Admin; checked before role_id"),
        )
        .attribute(AttributeSchema::new("role_id", AttributeType::Int).computed())
        .attribute(
            AttributeSchema::new("id", AttributeType::Int)
                .computed()
                .with_description("Resolved role id"),
        )
}

pub fn job_template_role_data_schema() -> ResourceSchema {
    ResourceSchema::new("data.job_template_role")
        .with_description("Resolve a named role slot on a job template")
        .attribute(
            AttributeSchema::new("job_template_id", AttributeType::Int)
                .required()
                .with_description("Job template carrying the role"),
        )
        .attribute(AttributeSchema::new("name", AttributeType::String).computed())
        .attribute(AttributeSchema::new("role_id", AttributeType::Int).computed())
        .attribute(
            AttributeSchema::new("id", AttributeType::Int)
                .computed()
                .with_description("Resolved role id"),
        )
}

// ── Managed resources ────────────────────────────────────────────────────

pub fn schedule_schema() -> ResourceSchema {
    ResourceSchema::new("schedule")
        .with_description("A schedule attached to a unified job template")
        .attribute(AttributeSchema::new("name", AttributeType::String).required())
        .attribute(
            AttributeSchema::new("rrule", AttributeType::String)
                .required()
                .with_description("RFC 5545 recurrence rule, e.g. DTSTART:... RRULE:FREQ=DAILY"),
        )
        .attribute(
            AttributeSchema::new("unified_job_template_id", AttributeType::Int)
                .required()
                .with_description("Job template, project or inventory source to run"),
        )
        .attribute(AttributeSchema::new("description", AttributeType::String))
        .attribute(
            AttributeSchema::new("enabled", AttributeType::Bool).with_default(Value::Bool(true)),
        )
        .attribute(
            AttributeSchema::new("inventory", AttributeType::String)
                .with_description("Prompted inventory id as a string, empty for none"),
        )
        .attribute(
            AttributeSchema::new("extra_data", AttributeType::String)
                .with_description("Schedule variables as a YAML string"),
        )
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
}

pub fn workflow_job_template_schedule_schema() -> ResourceSchema {
    ResourceSchema::new("workflow_job_template_schedule")
        .with_description("A schedule created under a workflow job template")
        .attribute(AttributeSchema::new("name", AttributeType::String).required())
        .attribute(AttributeSchema::new("rrule", AttributeType::String).required())
        .attribute(
            AttributeSchema::new("workflow_job_template_id", AttributeType::Int)
                .required()
                .force_new()
                .with_description("Owning workflow job template; changing it recreates"),
        )
        .attribute(AttributeSchema::new("description", AttributeType::String))
        .attribute(
            AttributeSchema::new("enabled", AttributeType::Bool).with_default(Value::Bool(true)),
        )
        .attribute(AttributeSchema::new("inventory", AttributeType::String))
        .attribute(
            AttributeSchema::new("extra_data", AttributeType::String)
                .with_description("Schedule variables as a YAML string"),
        )
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
}

pub fn workflow_job_template_node_schema() -> ResourceSchema {
    ResourceSchema::new("workflow_job_template_node")
        .with_description("A node in a workflow graph, optionally linked from a parent node")
        .attribute(
            AttributeSchema::new("workflow_job_template_id", AttributeType::Int)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("unified_job_template_id", AttributeType::Int)
                .required()
                .with_description("Job template the node runs"),
        )
        .attribute(
            AttributeSchema::new("parent_node_id", AttributeType::Int)
                .force_new()
                .with_description("Parent node to hang off; omit for a root node"),
        )
        .attribute(
            AttributeSchema::new("link", link_type())
                .force_new()
                .with_default(Value::String("success".to_string()))
                .with_description("Edge type from the parent: success, failure or always"),
        )
        .attribute(AttributeSchema::new("inventory", AttributeType::String))
        .attribute(
            AttributeSchema::new("extra_data", AttributeType::String)
                .with_description("Node variables as a YAML string"),
        )
        .attribute(
            AttributeSchema::new("identifier", AttributeType::String)
                .with_description("Stable node identifier within the workflow"),
        )
        .attribute(
            AttributeSchema::new("all_parents_must_converge", AttributeType::Bool)
                .with_default(Value::Bool(false)),
        )
        .attribute(AttributeSchema::new("id", AttributeType::Int).computed())
}

pub fn organization_instance_group_schema() -> ResourceSchema {
    ResourceSchema::new("organization_instance_group")
        .with_description("Membership of an instance group in an organization")
        .attribute(
            AttributeSchema::new("organization_id", AttributeType::Int)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("instance_group_id", AttributeType::Int)
                .required()
                .force_new(),
        )
}

pub fn workflow_job_template_notification_schema() -> ResourceSchema {
    ResourceSchema::new("workflow_job_template_notification")
        .with_description("A notification template attached to a workflow job template event")
        .attribute(
            AttributeSchema::new("workflow_job_template_id", AttributeType::Int)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("notification_template_id", AttributeType::Int)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("event", event_type())
                .required()
                .force_new()
                .with_description("Which run outcome triggers it: started, success or error"),
        )
}

pub fn team_role_schema() -> ResourceSchema {
    ResourceSchema::new("team_role")
        .with_description("A role granted to a team, resolved from an organization's role slots")
        .attribute(
            AttributeSchema::new("team_id", AttributeType::Int)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("organization_id", AttributeType::Int)
                .required()
                .force_new()
                .with_description("Organization whose role slots are searched"),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .computed()
                .force_new()
                .with_description("Role name, checked before role_id"),
        )
        .attribute(
            AttributeSchema::new("role_id", AttributeType::Int)
                .computed()
                .force_new(),
        )
}

/// Every schema this provider serves, declared once
pub fn schemas() -> Vec<ResourceSchema> {
    vec![
        organization_data_schema(),
        team_data_schema(),
        project_data_schema(),
        schedule_data_schema(),
        inventory_group_data_schema(),
        credential_data_schema(),
        organization_role_data_schema(),
        job_template_role_data_schema(),
        schedule_schema(),
        workflow_job_template_schedule_schema(),
        workflow_job_template_node_schema(),
        organization_instance_group_schema(),
        workflow_job_template_notification_schema(),
        team_role_schema(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn every_type_is_registered_once() {
        let all = schemas();
        let names: HashSet<&str> = all.iter().map(|s| s.resource_type.as_str()).collect();
        assert_eq!(names.len(), all.len(), "duplicate resource type registered");
        assert!(names.contains("schedule"));
        assert!(names.contains("data.schedule"));
    }

    #[test]
    fn valid_schedule_minimal() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("nightly".to_string()));
        attrs.insert(
            "rrule".to_string(),
            Value::String("DTSTART:20250101T000000Z RRULE:FREQ=DAILY".to_string()),
        );
        attrs.insert("unified_job_template_id".to_string(), Value::Int(7));

        assert!(schedule_schema().validate(&attrs).is_ok());
    }

    #[test]
    fn schedule_missing_rrule() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("nightly".to_string()));
        attrs.insert("unified_job_template_id".to_string(), Value::Int(7));

        assert!(schedule_schema().validate(&attrs).is_err());
    }

    #[test]
    fn node_link_rejects_unknown_variant() {
        let mut attrs = HashMap::new();
        attrs.insert("workflow_job_template_id".to_string(), Value::Int(9));
        attrs.insert("unified_job_template_id".to_string(), Value::Int(7));
        attrs.insert("link".to_string(), Value::String("sometimes".to_string()));

        assert!(workflow_job_template_node_schema().validate(&attrs).is_err());

        attrs.insert("link".to_string(), Value::String("failure".to_string()));
        assert!(workflow_job_template_node_schema().validate(&attrs).is_ok());
    }

    #[test]
    fn data_selectors_validate_with_partial_attributes() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("Acme".to_string()));
        assert!(organization_data_schema().validate(&attrs).is_ok());

        // The at-least-one-filter rule is enforced at resolve time, not here
        assert!(organization_data_schema().validate(&HashMap::new()).is_ok());
    }

    #[test]
    fn association_attributes_all_force_replacement() {
        let schema = organization_instance_group_schema();
        let force_new = schema.force_new_attributes();
        assert!(force_new.contains(&"organization_id"));
        assert!(force_new.contains(&"instance_group_id"));
    }
}
