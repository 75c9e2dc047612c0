//! Resource family handlers
//!
//! One module per family; the dispatcher in `provider` routes by resource
//! type. Data sources live together in `data` since they share the
//! selector flow.

pub mod data;
pub mod instance_group;
pub mod node;
pub mod notification;
pub mod schedule;
pub mod team_role;
