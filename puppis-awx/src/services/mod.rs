//! Per-resource-family services
//!
//! Each service borrows the client and exposes the endpoints of one API
//! family. Obtain them through the accessor methods on
//! [`crate::AwxClient`].

mod credentials;
mod inventories;
mod job_templates;
mod organizations;
mod projects;
mod schedules;
mod teams;
mod workflow_job_templates;
mod workflow_nodes;

pub use credentials::CredentialsService;
pub use inventories::InventoriesService;
pub use job_templates::JobTemplatesService;
pub use organizations::OrganizationsService;
pub use projects::ProjectsService;
pub use schedules::SchedulesService;
pub use teams::TeamsService;
pub use workflow_job_templates::WorkflowJobTemplatesService;
pub use workflow_nodes::WorkflowNodesService;
