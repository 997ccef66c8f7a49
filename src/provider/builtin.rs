//! Built-in custom providers
//!
//! - `constant`: always hands out the `value` control token.
//! - `timestamp`: the current UTC time, formatted with the optional `format`
//!   token (strftime syntax, RFC 3339 when absent). Sticky callers keep the
//!   time of their first call.

use super::ParameterDataProvider;
use crate::config::{ControlTokens, ParameterLevel};
use crate::error::{InitFailure, ProviderError, ProviderResult};
use crate::value::{ArgumentValue, CallerId, Value};
use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

const VALUE_TOKEN: &str = "value";
const FORMAT_TOKEN: &str = "format";

/// Provider returning one configured value
#[derive(Debug)]
pub struct ConstantProvider {
    name: String,
    level: ParameterLevel,
    token: Option<String>,
    value: Option<Value>,
}

impl ConstantProvider {
    pub const NAME: &'static str = "constant";

    pub fn new(name: &str, tokens: &ControlTokens, level: ParameterLevel) -> Self {
        Self {
            name: name.to_string(),
            level,
            token: tokens.get(VALUE_TOKEN).cloned(),
            value: None,
        }
    }

    fn current(&self) -> ProviderResult<ArgumentValue> {
        let value = self.value.clone().ok_or_else(|| ProviderError::NotInitialized {
            parameter: self.name.clone(),
        })?;
        Ok(ArgumentValue::new(self.name.as_str(), value))
    }
}

impl ParameterDataProvider for ConstantProvider {
    fn parameter_name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> ParameterLevel {
        self.level
    }

    fn initialize(&mut self) -> ProviderResult<()> {
        let token = self.token.as_ref().ok_or_else(|| {
            ProviderError::init(
                &self.name,
                InitFailure::InvalidToken {
                    token: VALUE_TOKEN.to_string(),
                    reason: "missing".to_string(),
                },
            )
        })?;
        self.value = Some(Value::from(token.as_str()));
        Ok(())
    }

    fn per_invocation(&self, _resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        self.current()
    }

    fn per_caller(&self, _caller: CallerId, _resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        self.current()
    }

    fn per_caller_sticky(&self, _caller: CallerId, _resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        self.current()
    }
}

/// Provider returning the current time
#[derive(Debug)]
pub struct TimestampProvider {
    name: String,
    level: ParameterLevel,
    format: Option<String>,
    initialized: bool,
    sticky: Mutex<HashMap<CallerId, String>>,
}

impl TimestampProvider {
    pub const NAME: &'static str = "timestamp";

    pub fn new(name: &str, tokens: &ControlTokens, level: ParameterLevel) -> Self {
        Self {
            name: name.to_string(),
            level,
            format: tokens.get(FORMAT_TOKEN).cloned(),
            initialized: false,
            sticky: Mutex::new(HashMap::new()),
        }
    }

    fn now(&self) -> ProviderResult<String> {
        if !self.initialized {
            return Err(ProviderError::NotInitialized {
                parameter: self.name.clone(),
            });
        }

        let now = Utc::now();
        Ok(match &self.format {
            Some(format) => now.format(format).to_string(),
            None => now.to_rfc3339(),
        })
    }
}

impl ParameterDataProvider for TimestampProvider {
    fn parameter_name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> ParameterLevel {
        self.level
    }

    fn initialize(&mut self) -> ProviderResult<()> {
        self.initialized = false;
        if let Some(format) = &self.format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(ProviderError::init(
                    &self.name,
                    InitFailure::InvalidToken {
                        token: FORMAT_TOKEN.to_string(),
                        reason: format!("'{}' is not a valid strftime format", format),
                    },
                ));
            }
        }

        self.sticky
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
        self.initialized = true;
        debug!(parameter = %self.name, format = ?self.format, "initialized timestamp provider");
        Ok(())
    }

    fn per_invocation(&self, _resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        Ok(ArgumentValue::new(self.name.as_str(), self.now()?))
    }

    fn per_caller(&self, _caller: CallerId, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        self.per_invocation(resolved)
    }

    fn per_caller_sticky(&self, caller: CallerId, _resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        let now = self.now()?;
        let mut sticky = self
            .sticky
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let value = sticky.entry(caller).or_insert(now).clone();
        Ok(ArgumentValue::new(self.name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> ControlTokens {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_constant() {
        let mut provider = ConstantProvider::new("env", &tokens(&[("value", "staging")]), ParameterLevel::PerThread);
        assert!(matches!(
            provider.get_value(CallerId(1), &[]),
            Err(ProviderError::NotInitialized { .. })
        ));

        provider.initialize().unwrap();
        for caller in 1..4 {
            assert_eq!(
                provider.get_value(CallerId(caller), &[]).unwrap().value.to_string(),
                "staging"
            );
        }
    }

    #[test]
    fn test_constant_requires_value_token() {
        let mut provider = ConstantProvider::new("env", &ControlTokens::new(), ParameterLevel::PerInvocation);
        let err = provider.initialize().unwrap_err();
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn test_timestamp_format() {
        let mut provider =
            TimestampProvider::new("day", &tokens(&[("format", "%Y-%m-%d")]), ParameterLevel::PerInvocation);
        provider.initialize().unwrap();

        let value = provider.get_value(CallerId(1), &[]).unwrap().value.to_string();
        assert_eq!(value.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&value, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_timestamp_default_is_rfc3339() {
        let mut provider = TimestampProvider::new("at", &ControlTokens::new(), ParameterLevel::PerThread);
        provider.initialize().unwrap();

        let value = provider.get_value(CallerId(1), &[]).unwrap().value.to_string();
        assert!(chrono::DateTime::parse_from_rfc3339(&value).is_ok());
    }

    #[test]
    fn test_timestamp_rejects_bad_format() {
        let mut provider =
            TimestampProvider::new("at", &tokens(&[("format", "%Y-%Q")]), ParameterLevel::PerInvocation);
        assert!(provider.initialize().is_err());
    }

    #[test]
    fn test_timestamp_sticky_keeps_first_value() {
        let mut provider = TimestampProvider::new(
            "at",
            &tokens(&[("format", "%H:%M:%S%.9f")]),
            ParameterLevel::PerThreadStatic,
        );
        provider.initialize().unwrap();

        let first = provider.get_value(CallerId(1), &[]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = provider.get_value(CallerId(1), &[]).unwrap();
        assert_eq!(first, second);
    }
}
