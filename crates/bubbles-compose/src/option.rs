//! Declared command-line options and the values parsed for them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of value an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Presence flag, `--offline`.
    Boolean,
    /// Flag taking a value, `--packages git,curl`.
    String,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::String => write!(f, "string"),
        }
    }
}

/// A command-line option declared by a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleOption {
    /// Long flag name without leading dashes.
    pub name: String,
    /// Kind of value the option takes.
    pub kind: OptionKind,
    /// One-line help text.
    pub description: String,
}

impl BubbleOption {
    /// Declares a boolean flag.
    #[must_use]
    pub fn flag(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OptionKind::Boolean,
            description: description.into(),
        }
    }

    /// Declares an option taking a string value.
    #[must_use]
    pub fn text(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OptionKind::String,
            description: description.into(),
        }
    }
}

/// A single parsed option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Value of a boolean flag.
    Flag(bool),
    /// Value of a string option.
    Text(String),
}

/// Option values keyed by option name.
///
/// Boolean flags are always present once parsed; string options only when
/// given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedValues(BTreeMap<String, OptionValue>);

impl ParsedValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        let _ = self.0.insert(name.into(), value);
    }

    /// Builder-style [`insert`](Self::insert) for a boolean flag.
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.insert(name, OptionValue::Flag(value));
        self
    }

    /// Builder-style [`insert`](Self::insert) for a string option.
    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, OptionValue::Text(value.into()));
        self
    }

    /// Returns whether a boolean flag was set. Missing flags read as `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(OptionValue::Flag(true)))
    }

    /// Returns the value of a string option, ignoring empty strings.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(OptionValue::Text(value)) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the raw value recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }
}

/// Splits a comma-separated list option into its non-empty items.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
