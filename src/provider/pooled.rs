//! List, range and templated-range providers

use super::ParameterDataProvider;
use crate::config::ParameterLevel;
use crate::error::{ProviderError, ProviderResult};
use crate::pool::ValuePool;
use crate::selection::CyclicCursor;
use crate::value::{ArgumentValue, CallerId, Value};
use tracing::debug;

/// Provider walking a [`ValuePool`] cyclically
#[derive(Debug)]
pub struct PoolProvider {
    name: String,
    level: ParameterLevel,
    pool: ValuePool,
    /// Set by a successful `initialize()`
    cursor: Option<CyclicCursor>,
}

impl PoolProvider {
    pub fn new(name: impl Into<String>, level: ParameterLevel, pool: ValuePool) -> Self {
        Self {
            name: name.into(),
            level,
            pool,
            cursor: None,
        }
    }

    /// Provider over literal values
    pub fn list(name: impl Into<String>, level: ParameterLevel, values: Vec<Value>) -> Self {
        Self::new(name, level, ValuePool::List(values))
    }

    /// Provider over the integers `start..=end`
    pub fn range(name: impl Into<String>, level: ParameterLevel, start: i64, end: i64) -> Self {
        Self::new(name, level, ValuePool::Range { start, end })
    }

    /// Provider over `start..=end` rendered through `template`
    pub fn templated_range(
        name: impl Into<String>,
        level: ParameterLevel,
        template: impl Into<String>,
        start: i64,
        end: i64,
    ) -> Self {
        Self::new(
            name,
            level,
            ValuePool::Template {
                template: template.into(),
                start,
                end,
            },
        )
    }

    pub fn pool(&self) -> &ValuePool {
        &self.pool
    }

    fn cursor(&self) -> ProviderResult<&CyclicCursor> {
        self.cursor.as_ref().ok_or_else(|| ProviderError::NotInitialized {
            parameter: self.name.clone(),
        })
    }

    fn value_at(&self, index: usize) -> ProviderResult<ArgumentValue> {
        // The cursor only yields indices below the validated pool length
        let value = self.pool.value_at(index).ok_or_else(|| ProviderError::NotInitialized {
            parameter: self.name.clone(),
        })?;
        Ok(ArgumentValue::new(self.name.as_str(), value))
    }
}

impl ParameterDataProvider for PoolProvider {
    fn parameter_name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> ParameterLevel {
        self.level
    }

    fn initialize(&mut self) -> ProviderResult<()> {
        self.cursor = None;
        self.pool
            .validate()
            .map_err(|source| ProviderError::init(&self.name, source))?;
        let len = self.pool.len().unwrap_or(0);

        self.cursor = Some(CyclicCursor::new(len));
        debug!(parameter = %self.name, level = %self.level, values = len, "initialized pool provider");
        Ok(())
    }

    fn per_invocation(&self, _resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        let index = self.cursor()?.next_shared();
        self.value_at(index)
    }

    fn per_caller(&self, caller: CallerId, _resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        let index = self.cursor()?.next_for_caller(caller);
        self.value_at(index)
    }

    fn per_caller_sticky(&self, caller: CallerId, _resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        let index = self.cursor()?.sticky_for_caller(caller);
        self.value_at(index)
    }
}
