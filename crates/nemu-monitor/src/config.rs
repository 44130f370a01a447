use crate::memory::DEFAULT_MEMORY_SIZE;
use anyhow::Context as _;
use serde::Deserialize;
use std::{fs, path::Path};

/// Default number of watchpoints which can be active at once.
pub const DEFAULT_WATCH_CAPACITY: usize = 32;
/// Default number of tokens an expression may contain.
pub const DEFAULT_MAX_TOKENS: usize = 65536;
/// Default number of levels operators and groups may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Limits used by the monitor.
///
/// Every field can be omitted when loading, in which case its default is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dereferenced addresses must be strictly below this.
    pub memory_limit: u32,
    /// Capacity of the watchpoint pool.
    pub watch_capacity: usize,
    /// Maximum number of tokens in a single expression.
    pub max_tokens: usize,
    /// Maximum nesting of operators and parenthesized groups.
    pub max_depth: usize,
}

impl Config {
    /// Parse a configuration from TOML.
    pub fn from_toml(input: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let input = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        Self::from_toml(&input)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_SIZE,
            watch_capacity: DEFAULT_WATCH_CAPACITY,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
