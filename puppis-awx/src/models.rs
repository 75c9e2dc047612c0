//! Wire models for the AWX v2 API
//!
//! Field names match the API's snake_case JSON keys. Unknown fields are
//! ignored so new server versions don't break decoding.

use serde::{Deserialize, Serialize};

/// Value the API substitutes for secret inputs it will not echo back
pub const ENCRYPTED: &str = "$encrypted$";

/// Paginated list envelope returned by every collection endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Server-side filter on a collection endpoint.
///
/// AWX filters exact-match on query parameters; id and name are the two
/// lookup keys the tooling exposes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Selector {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// True when no filter key is set
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }

    /// Render as query parameters
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.id {
            query.push(("id", id.to_string()));
        }
        if let Some(ref name) = self.name {
            query.push(("name", name.clone()));
        }
        query
    }

    /// Human-readable form for error messages (e.g., "id=3, name=ops")
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(id) = self.id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref name) = self.name {
            parts.push(format!("name={}", name));
        }
        if parts.is_empty() {
            "no filter".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// One named role slot from summary_fields.object_roles
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoleSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The named role slots an object can carry.
///
/// Different object kinds populate different subsets; absent slots decode
/// as None and are skipped by [`ObjectRoles::named_roles`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectRoles {
    #[serde(default)]
    pub adhoc_role: Option<RoleSummary>,
    #[serde(default)]
    pub admin_role: Option<RoleSummary>,
    #[serde(default)]
    pub approval_role: Option<RoleSummary>,
    #[serde(default)]
    pub auditor_role: Option<RoleSummary>,
    #[serde(default)]
    pub credential_admin_role: Option<RoleSummary>,
    #[serde(default)]
    pub execute_role: Option<RoleSummary>,
    #[serde(default)]
    pub inventory_admin_role: Option<RoleSummary>,
    #[serde(default)]
    pub job_template_admin_role: Option<RoleSummary>,
    #[serde(default)]
    pub member_role: Option<RoleSummary>,
    #[serde(default)]
    pub notification_admin_role: Option<RoleSummary>,
    #[serde(default)]
    pub project_admin_role: Option<RoleSummary>,
    #[serde(default)]
    pub read_role: Option<RoleSummary>,
    #[serde(default)]
    pub update_role: Option<RoleSummary>,
    #[serde(default)]
    pub use_role: Option<RoleSummary>,
    #[serde(default)]
    pub workflow_admin_role: Option<RoleSummary>,
}

impl ObjectRoles {
    /// Populated role slots in a fixed enumeration order.
    ///
    /// The order is stable so lookups scan the same sequence every time.
    pub fn named_roles(&self) -> Vec<(&'static str, &RoleSummary)> {
        let slots: [(&'static str, &Option<RoleSummary>); 15] = [
            ("adhoc", &self.adhoc_role),
            ("admin", &self.admin_role),
            ("approval", &self.approval_role),
            ("auditor", &self.auditor_role),
            ("credential_admin", &self.credential_admin_role),
            ("execute", &self.execute_role),
            ("inventory_admin", &self.inventory_admin_role),
            ("job_template_admin", &self.job_template_admin_role),
            ("member", &self.member_role),
            ("notification_admin", &self.notification_admin_role),
            ("project_admin", &self.project_admin_role),
            ("read", &self.read_role),
            ("update", &self.update_role),
            ("use", &self.use_role),
            ("workflow_admin", &self.workflow_admin_role),
        ];
        slots
            .into_iter()
            .filter_map(|(slot, role)| role.as_ref().map(|r| (slot, r)))
            .collect()
    }
}

/// summary_fields block attached to most objects
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryFields {
    #[serde(default)]
    pub object_roles: Option<ObjectRoles>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub summary_fields: Option<SummaryFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub organization: Option<i64>,
    #[serde(default)]
    pub summary_fields: Option<SummaryFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scm_type: String,
    #[serde(default)]
    pub scm_url: String,
    #[serde(default)]
    pub scm_branch: String,
    #[serde(default)]
    pub organization: Option<i64>,
    #[serde(default)]
    pub summary_fields: Option<SummaryFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub name: String,
    pub rrule: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    pub unified_job_template: i64,
    #[serde(default)]
    pub inventory: Option<i64>,
    #[serde(default)]
    pub extra_data: serde_json::Value,
}

/// Request body for creating or replacing a schedule
#[derive(Debug, Clone, Serialize)]
pub struct SchedulePayload {
    pub name: String,
    pub rrule: String,
    pub description: String,
    pub enabled: bool,
    pub unified_job_template: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub organization: Option<i64>,
    pub credential_type: i64,
    #[serde(default)]
    pub inputs: serde_json::Value,
}

impl Credential {
    /// Fetch a string input field (e.g., "url", "client", "tenant")
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobTemplate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub summary_fields: Option<SummaryFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowJobTemplate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub summary_fields: Option<SummaryFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowJobTemplateNode {
    pub id: i64,
    pub workflow_job_template: i64,
    #[serde(default)]
    pub unified_job_template: Option<i64>,
    #[serde(default)]
    pub inventory: Option<i64>,
    #[serde(default)]
    pub extra_data: serde_json::Value,
    #[serde(default)]
    pub all_parents_must_converge: bool,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub success_nodes: Vec<i64>,
    #[serde(default)]
    pub failure_nodes: Vec<i64>,
    #[serde(default)]
    pub always_nodes: Vec<i64>,
}

/// Request body for creating or replacing a workflow node
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowNodePayload {
    pub workflow_job_template: i64,
    pub unified_job_template: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub all_parents_must_converge: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceGroup {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationTemplate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub notification_type: String,
    #[serde(default)]
    pub organization: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Inventory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub organization: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub inventory: i64,
}

/// Event a notification template can be attached to on a workflow job
/// template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    Started,
    Success,
    Error,
}

impl NotificationEvent {
    /// Sub-endpoint under the workflow job template
    pub fn endpoint(&self) -> &'static str {
        match self {
            NotificationEvent::Started => "notification_templates_started",
            NotificationEvent::Success => "notification_templates_success",
            NotificationEvent::Error => "notification_templates_error",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationEvent::Started => "started",
            NotificationEvent::Success => "success",
            NotificationEvent::Error => "error",
        }
    }

    pub const ALL: [NotificationEvent; 3] = [
        NotificationEvent::Started,
        NotificationEvent::Success,
        NotificationEvent::Error,
    ];
}

impl std::str::FromStr for NotificationEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "started" => Ok(NotificationEvent::Started),
            "success" => Ok(NotificationEvent::Success),
            "error" => Ok(NotificationEvent::Error),
            other => Err(format!(
                "unknown notification event '{}', expected started, success or error",
                other
            )),
        }
    }
}

impl std::fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a workflow node hangs off its parent node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLink {
    Success,
    Failure,
    Always,
}

impl NodeLink {
    /// Sub-endpoint under the parent node
    pub fn endpoint(&self) -> &'static str {
        match self {
            NodeLink::Success => "success_nodes",
            NodeLink::Failure => "failure_nodes",
            NodeLink::Always => "always_nodes",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLink::Success => "success",
            NodeLink::Failure => "failure",
            NodeLink::Always => "always",
        }
    }
}

impl std::str::FromStr for NodeLink {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(NodeLink::Success),
            "failure" => Ok(NodeLink::Failure),
            "always" => Ok(NodeLink::Always),
            other => Err(format!(
                "unknown node link '{}', expected success, failure or always",
                other
            )),
        }
    }
}

impl std::fmt::Display for NodeLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
