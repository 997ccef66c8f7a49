//! paramfeed - Parameter data providers for load tests
//!
//! A load test replays a scenario many times from many concurrent callers. Each
//! invocation needs concrete arguments: a username, an id, a file to upload.
//! paramfeed supplies them from declaratively described pools.
//!
//! # Architecture
//!
//! - **Pools**: literal lists, integer ranges, templated ranges
//! - **Selection policies**: shared cursor, per-caller cursor, sticky per-caller assignment
//! - **File sets**: weighted folders, deterministic 100-slot dispersion,
//!   file name patterns that reference earlier parameters
//! - **Plugins**: custom providers registered by name
//! - **Agent distribution**: split ranges and lists across load agents

pub mod config;
pub mod error;
pub mod files;
pub mod output;
pub mod plan;
pub mod pool;
pub mod provider;
pub mod selection;
pub mod value;

// Re-export commonly used types
pub use config::{ParameterLevel, PlanConfig, ProviderConfig};
pub use error::{InitFailure, ProviderError, ProviderResult};
pub use plan::ParameterSet;
pub use provider::{ParameterDataProvider, ProviderFactory, ProviderRegistry};
pub use value::{ArgumentValue, CallerId, Value};

/// Result type used throughout paramfeed
pub type Result<T> = anyhow::Result<T>;
