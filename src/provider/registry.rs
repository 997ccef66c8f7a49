//! Plugin registry for custom providers
//!
//! Custom providers are registered ahead of time under a name. A `custom`
//! parameter description refers to that name, and the registered constructor
//! builds a fresh, uninitialized provider from the parameter name, the control
//! tokens and the level.
//!
//! ```
//! use paramfeed::provider::{ProviderRegistry, PoolProvider};
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register("colors", |name, _tokens, level| {
//!     Box::new(PoolProvider::list(name, level, vec!["red".into(), "green".into()]))
//! });
//! assert!(registry.contains("colors"));
//! ```

use super::builtin::{ConstantProvider, TimestampProvider};
use super::ParameterDataProvider;
use crate::config::{ControlTokens, ParameterLevel};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds an uninitialized provider for one parameter
pub type ProviderConstructor =
    Arc<dyn Fn(&str, &ControlTokens, ParameterLevel) -> Box<dyn ParameterDataProvider> + Send + Sync>;

/// Named constructors for custom providers
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    constructors: BTreeMap<String, ProviderConstructor>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the `constant` and `timestamp` providers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ConstantProvider::NAME, |name, tokens, level| {
            Box::new(ConstantProvider::new(name, tokens, level))
        });
        registry.register(TimestampProvider::NAME, |name, tokens, level| {
            Box::new(TimestampProvider::new(name, tokens, level))
        });
        registry
    }

    /// Register `constructor` under `name`, replacing any earlier registration
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&str, &ControlTokens, ParameterLevel) -> Box<dyn ParameterDataProvider> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Build a provider with the constructor registered under `name`
    pub fn construct(
        &self,
        name: &str,
        parameter: &str,
        tokens: &ControlTokens,
        level: ParameterLevel,
    ) -> Option<Box<dyn ParameterDataProvider>> {
        self.constructors
            .get(name)
            .map(|constructor| constructor(parameter, tokens, level))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
