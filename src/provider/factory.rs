//! Provider factory
//!
//! Turns a [`ProviderConfig`] into an initialized provider. Built-in kinds map
//! to [`PoolProvider`] or [`FileSetProvider`]; `custom` descriptions are looked
//! up in the [`ProviderRegistry`].

use super::{FileSetProvider, ParameterDataProvider, PoolProvider, ProviderRegistry};
use crate::config::{ProviderConfig, UsernameConfig, DEFAULT_RANGE_END, USERNAME_PARAMETER};
use crate::error::{InitFailure, ProviderError, ProviderResult};
use crate::pool::TEMPLATE_MARKER;
use tracing::info;

/// Builds and initializes providers from configuration
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    registry: ProviderRegistry,
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new(ProviderRegistry::with_builtins())
    }
}

impl ProviderFactory {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Mutable access for registering more custom providers
    pub fn registry_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.registry
    }

    /// Build the provider described by `config` and initialize it
    pub fn create(&self, config: &ProviderConfig) -> ProviderResult<Box<dyn ParameterDataProvider>> {
        let mut provider = self.build(config)?;
        provider.initialize()?;

        info!(
            parameter = %provider.parameter_name(),
            kind = config.kind(),
            level = %provider.level(),
            "created data provider"
        );
        Ok(provider)
    }

    fn build(&self, config: &ProviderConfig) -> ProviderResult<Box<dyn ParameterDataProvider>> {
        let provider: Box<dyn ParameterDataProvider> = match config {
            ProviderConfig::List(list) => Box::new(PoolProvider::list(&list.name, list.level, list.values.clone())),
            ProviderConfig::Range(range) => match &range.template {
                Some(template) => Box::new(PoolProvider::templated_range(
                    &range.name,
                    range.level,
                    template,
                    range.start,
                    range.end,
                )),
                None => Box::new(PoolProvider::range(&range.name, range.level, range.start, range.end)),
            },
            ProviderConfig::FileSet(set) => Box::new(FileSetProvider::new(set)),
            ProviderConfig::Username(username) => Box::new(username_provider(username)?),
            ProviderConfig::Custom(custom) => self
                .registry
                .construct(&custom.provider, &custom.name, &custom.tokens, custom.level)
                .ok_or_else(|| ProviderError::Unsupported {
                    parameter: custom.name.clone(),
                    kind: custom.provider.clone(),
                })?,
        };
        Ok(provider)
    }
}

fn username_provider(config: &UsernameConfig) -> ProviderResult<PoolProvider> {
    match (&config.values, config.start) {
        (Some(values), _) => Ok(PoolProvider::list(USERNAME_PARAMETER, config.level, values.clone())),
        (None, Some(start)) => Ok(PoolProvider::templated_range(
            USERNAME_PARAMETER,
            config.level,
            config.template.as_deref().unwrap_or(TEMPLATE_MARKER),
            start,
            config.end.unwrap_or(DEFAULT_RANGE_END),
        )),
        (None, None) => Err(ProviderError::init(USERNAME_PARAMETER, InitFailure::EmptyPool)),
    }
}
