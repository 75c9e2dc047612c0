//! Puppis Core
//!
//! Core library for a declarative provisioning tool: resource and value
//! model, attribute schemas, desired-vs-current diffing, plans, and the
//! Provider trait that backend implementations fulfil.

pub mod differ;
pub mod effect;
pub mod plan;
pub mod provider;
pub mod resource;
pub mod schema;
