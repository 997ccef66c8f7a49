//! Configuration module
//!
//! Declarative descriptions of parameter data providers, TOML loading,
//! validation, agent distribution and CLI argument parsing.

pub mod cli;
pub mod distribute;
pub mod toml;
pub mod validator;

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Control tokens handed to custom providers
pub type ControlTokens = BTreeMap<String, String>;

/// Pattern used when a folder is configured without one
pub const MATCH_ALL_PATTERN: &str = ".*";

/// Percentage used when a folder is configured without one
pub const HUNDRED_PERCENT: u8 = 100;

/// Parameter name used by username providers
pub const USERNAME_PARAMETER: &str = "username";

/// Range end used when a range is configured without one
pub const DEFAULT_RANGE_END: i64 = i32::MAX as i64;

/// Complete parameter plan: every provider description, in declaration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default)]
    pub parameters: Vec<ProviderConfig>,
}

/// Level at which new values are generated for a parameter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterLevel {
    /// Every call returns the next pool element; the pool is shared by all callers
    #[serde(alias = "PER_INVOCATION")]
    PerInvocation,
    /// Each caller advances its own cursor through the pool
    #[serde(alias = "PER_THREAD")]
    PerThread,
    /// Each caller keeps the element it was assigned on first access
    #[serde(alias = "PER_THREAD_STATIC")]
    PerThreadStatic,
}

impl fmt::Display for ParameterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerInvocation => write!(f, "per-invocation"),
            Self::PerThread => write!(f, "per-thread"),
            Self::PerThreadStatic => write!(f, "per-thread-static"),
        }
    }
}

/// Description of one parameter data provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProviderConfig {
    /// Literal list of values
    List(ListConfig),
    /// Integer range, optionally rendered through a string template
    Range(RangeConfig),
    /// Weighted set of folders whose file names are handed out
    FileSet(FileSetConfig),
    /// Usernames from a list or a templated range
    Username(UsernameConfig),
    /// Externally registered provider
    Custom(CustomConfig),
}

impl ProviderConfig {
    /// Name of the parameter this provider feeds
    pub fn name(&self) -> &str {
        match self {
            Self::List(c) => &c.name,
            Self::Range(c) => &c.name,
            Self::FileSet(c) => &c.name,
            Self::Username(_) => USERNAME_PARAMETER,
            Self::Custom(c) => &c.name,
        }
    }

    /// Level at which values are generated
    pub fn level(&self) -> ParameterLevel {
        match self {
            Self::List(c) => c.level,
            Self::Range(c) => c.level,
            Self::FileSet(c) => c.level,
            Self::Username(c) => c.level,
            Self::Custom(c) => c.level,
        }
    }

    /// Kind tag as written in configuration files
    pub fn kind(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Range(_) => "range",
            Self::FileSet(_) => "file-set",
            Self::Username(_) => "username",
            Self::Custom(_) => "custom",
        }
    }
}

/// Literal list provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub name: String,
    #[serde(default = "default_list_level")]
    pub level: ParameterLevel,
    pub values: Vec<Value>,
}

/// Range provider configuration
///
/// Without a template the provider hands out the integers themselves; with a
/// template every `{0}` is replaced by the current number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeConfig {
    pub name: String,
    #[serde(default = "default_static_level")]
    pub level: ParameterLevel,
    pub start: i64,
    #[serde(default = "default_range_end")]
    pub end: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// Weighted file-set provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSetConfig {
    pub name: String,
    #[serde(default = "default_file_set_level")]
    pub level: ParameterLevel,
    pub folders: Vec<FolderConfig>,
    /// Scan sub-folders as well
    #[serde(default = "default_true")]
    pub recursive: bool,
    /// Hand out full paths (true) or bare file names (false)
    #[serde(default = "default_true")]
    pub full_path: bool,
    /// Seed for the one-time shuffle of each folder listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle_seed: Option<u64>,
}

/// One folder of a file set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderConfig {
    pub path: PathBuf,
    /// Target share of selections (0-100)
    #[serde(default = "default_percentage")]
    pub percentage: u8,
    /// Full-match regex for file names; may reference earlier parameters as `${name}`
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl FolderConfig {
    pub fn new(path: impl Into<PathBuf>, percentage: u8, pattern: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            percentage,
            pattern: pattern.into(),
        }
    }
}

/// Username provider configuration
///
/// Either `values` or a templated range (`template`, `start`, `end`) is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameConfig {
    #[serde(default = "default_static_level")]
    pub level: ParameterLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl UsernameConfig {
    /// Number of distinct usernames this configuration can produce
    pub fn available(&self) -> u64 {
        match (&self.values, self.start) {
            (Some(values), _) => values.len() as u64,
            (None, Some(start)) => {
                let end = self.end.unwrap_or(DEFAULT_RANGE_END);
                if end < start {
                    0
                } else {
                    end.abs_diff(start).saturating_add(1)
                }
            }
            (None, None) => 0,
        }
    }
}

/// Custom (plugin) provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomConfig {
    pub name: String,
    /// Name the provider was registered under
    pub provider: String,
    #[serde(default = "default_list_level")]
    pub level: ParameterLevel,
    #[serde(default)]
    pub tokens: ControlTokens,
}

fn default_list_level() -> ParameterLevel {
    ParameterLevel::PerInvocation
}

fn default_static_level() -> ParameterLevel {
    ParameterLevel::PerThreadStatic
}

fn default_file_set_level() -> ParameterLevel {
    ParameterLevel::PerThread
}

fn default_range_end() -> i64 {
    DEFAULT_RANGE_END
}

fn default_true() -> bool {
    true
}

fn default_percentage() -> u8 {
    HUNDRED_PERCENT
}

fn default_pattern() -> String {
    MATCH_ALL_PATTERN.to_string()
}
