//! Parameter data providers
//!
//! A provider feeds one named parameter. It owns a pool of values (or, for
//! file sets, a dispersion sequence over folders) and hands out one value per
//! call according to the parameter's [`ParameterLevel`].
//!
//! # Lifecycle
//!
//! 1. Construct the provider from its configuration (usually through
//!    [`ProviderFactory`](factory::ProviderFactory)).
//! 2. Call [`initialize`](ParameterDataProvider::initialize) once. This loads
//!    backing data and resets every cursor.
//! 3. Share the provider between callers and call
//!    [`get_value`](ParameterDataProvider::get_value) concurrently.
//!
//! Re-initializing takes `&mut self`, so it can't overlap with `get_value`.

pub mod builtin;
pub mod factory;
pub mod file_set;
pub mod pooled;
pub mod registry;

pub use factory::ProviderFactory;
pub use file_set::FileSetProvider;
pub use pooled::PoolProvider;
pub use registry::{ProviderConstructor, ProviderRegistry};

use crate::config::ParameterLevel;
use crate::error::ProviderResult;
use crate::value::{ArgumentValue, CallerId};

/// Source of values for one named parameter
pub trait ParameterDataProvider: Send + Sync {
    /// Name of the parameter this provider feeds
    fn parameter_name(&self) -> &str;

    /// Level at which new values are generated
    fn level(&self) -> ParameterLevel;

    /// Load backing data and reset all cursors
    fn initialize(&mut self) -> ProviderResult<()>;

    /// Next value from a pool shared by every caller
    fn per_invocation(&self, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue>;

    /// Next value from the caller's own walk through the pool
    fn per_caller(&self, caller: CallerId, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue>;

    /// The value assigned to the caller on its first call
    fn per_caller_sticky(&self, caller: CallerId, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue>;

    /// Produce a value for `caller`
    ///
    /// `resolved` holds the values already produced for earlier parameters of
    /// the same invocation.
    fn get_value(&self, caller: CallerId, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        match self.level() {
            ParameterLevel::PerInvocation => self.per_invocation(resolved),
            ParameterLevel::PerThread => self.per_caller(caller, resolved),
            ParameterLevel::PerThreadStatic => self.per_caller_sticky(caller, resolved),
        }
    }
}

impl std::fmt::Debug for dyn ParameterDataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterDataProvider")
            .field("parameter", &self.parameter_name())
            .field("level", &self.level())
            .finish()
    }
}
