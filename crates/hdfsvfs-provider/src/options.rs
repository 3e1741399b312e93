//! Per-mount configuration options and the merge into a client config.
//!
//! The option set is open: whatever keys a mount declares are copied through
//! to the client configuration as string key/value pairs. Each option maps
//! to a distinct key, so iteration order is insignificant and merging has no
//! failure modes of its own.

use std::collections::HashMap;
use std::fmt;

use crate::client::ClientConfig;

/// A typed option value. The string form written into the client
/// configuration is the value's `Display` rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Str(s) => f.write_str(s),
            OptionValue::Int(n) => write!(f, "{}", n),
            OptionValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Int(n)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

/// Options attached to one mount, overlaid onto the client configuration
/// during connection resolution. Overrides win over derived defaults.
#[derive(Debug, Clone, Default)]
pub struct MountOptions {
    entries: HashMap<String, OptionValue>,
}

impl MountOptions {
    pub fn new() -> Self {
        MountOptions::default()
    }

    /// Declare an option as present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every present option into `config` as its string form.
    pub fn merge_into(&self, config: &mut ClientConfig) {
        for (key, value) in &self.entries {
            config.set(key.clone(), value.to_string());
        }
    }
}
