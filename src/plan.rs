//! Parameter sets
//!
//! A [`ParameterSet`] is the ordered list of providers a test plan declares.
//! Resolving it for one invocation asks every provider in declaration order and
//! passes the values produced so far, so a file-set pattern can refer to a
//! parameter declared before it.

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ParameterDataProvider, ProviderFactory, ProviderRegistry};
use crate::value::{ArgumentValue, CallerId};
use std::collections::HashSet;
use tracing::debug;

/// Ordered, initialized providers of one test plan
#[derive(Debug, Default)]
pub struct ParameterSet {
    providers: Vec<Box<dyn ParameterDataProvider>>,
}

impl ParameterSet {
    /// Build and initialize one provider per description
    pub fn from_configs(configs: &[ProviderConfig], registry: &ProviderRegistry) -> ProviderResult<Self> {
        let factory = ProviderFactory::new(registry.clone());
        let mut seen = HashSet::new();
        let mut providers = Vec::with_capacity(configs.len());

        for config in configs {
            if !seen.insert(config.name()) {
                return Err(ProviderError::Duplicate {
                    parameter: config.name().to_string(),
                });
            }
            providers.push(factory.create(config)?);
        }

        Ok(Self { providers })
    }

    /// Append an already initialized provider
    pub fn push(&mut self, provider: Box<dyn ParameterDataProvider>) -> ProviderResult<()> {
        if self.names().contains(&provider.parameter_name()) {
            return Err(ProviderError::Duplicate {
                parameter: provider.parameter_name().to_string(),
            });
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Resolve every parameter for one invocation by `caller`
    pub fn resolve(&self, caller: CallerId) -> ProviderResult<Vec<ArgumentValue>> {
        let mut resolved = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let value = provider.get_value(caller, &resolved)?;
            resolved.push(value);
        }
        debug!(%caller, parameters = resolved.len(), "resolved invocation");
        Ok(resolved)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.parameter_name()).collect()
    }
}
