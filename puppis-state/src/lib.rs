//! Puppis State Management
//!
//! Persists the mapping between declared resources and their remote
//! identifiers, with locking for safe concurrent access.
//!
//! # Overview
//!
//! - **StateFile**: the state structure containing all managed resources
//! - **StateBackend**: a trait for state storage backends
//! - **LockInfo**: information about state locks for concurrent access control
//!
//! # Example
//!
//! ```ignore
//! use puppis_state::{create_backend, BackendConfig};
//!
//! let config = BackendConfig {
//!     backend_type: "local".to_string(),
//!     attributes: [
//!         ("path".to_string(), Value::String("prod.state.json".to_string())),
//!     ].into_iter().collect(),
//! };
//!
//! let backend = create_backend(&config)?;
//!
//! let lock = backend.acquire_lock("apply").await?;
//! let state = backend.read_state().await?;
//!
//! // ... modify resources ...
//!
//! backend.write_state(&state).await?;
//! backend.release_lock(&lock).await?;
//! ```

pub mod backend;
pub mod backends;
pub mod lock;
pub mod state;

// Re-export main types for convenience
pub use backend::{BackendConfig, BackendError, BackendResult, StateBackend};
pub use backends::create_backend;
pub use lock::LockInfo;
pub use state::{ResourceState, StateFile};
