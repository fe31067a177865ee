//! Tool operations and per-type operation sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The operations a content type can be exposed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Paginated query over a collection.
    List,
    /// Fetch a single document (by id for collections).
    Get,
    /// Insert a new document.
    Create,
    /// Modify an existing document (or the global's single document).
    Update,
    /// Remove a document.
    Delete,
}

/// Capability class used for scope checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationClass {
    Read,
    Write,
}

impl Operation {
    /// All operations in tool-generation order.
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Get,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    /// Lowercase name used in tool names and scopes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// list and get are read-class; everything else writes.
    pub fn class(&self) -> OperationClass {
        match self {
            Operation::List | Operation::Get => OperationClass::Read,
            Operation::Create | Operation::Update | Operation::Delete => OperationClass::Write,
        }
    }

    pub fn is_read(&self) -> bool {
        self.class() == OperationClass::Read
    }
}

impl OperationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationClass::Read => "read",
            OperationClass::Write => "write",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OperationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Operation::List),
            "get" => Ok(Operation::Get),
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

/// Resolved set of enabled operations for one content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSet {
    #[serde(default = "default_true")]
    pub list: bool,
    #[serde(default = "default_true")]
    pub get: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub delete: bool,
}

impl Default for OperationSet {
    fn default() -> Self {
        Self {
            list: true,
            get: true,
            create: false,
            update: false,
            delete: false,
        }
    }
}

impl OperationSet {
    /// Every operation enabled.
    pub fn all() -> Self {
        Self {
            list: true,
            get: true,
            create: true,
            update: true,
            delete: true,
        }
    }

    /// No operation enabled.
    pub fn none() -> Self {
        Self {
            list: false,
            get: false,
            create: false,
            update: false,
            delete: false,
        }
    }

    pub fn is_enabled(&self, operation: Operation) -> bool {
        match operation {
            Operation::List => self.list,
            Operation::Get => self.get,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    pub fn set(&mut self, operation: Operation, enabled: bool) {
        match operation {
            Operation::List => self.list = enabled,
            Operation::Get => self.get = enabled,
            Operation::Create => self.create = enabled,
            Operation::Update => self.update = enabled,
            Operation::Delete => self.delete = enabled,
        }
    }

    /// Enabled operations in tool-generation order.
    pub fn enabled(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.is_enabled(*op))
            .collect()
    }

    /// Shallow merge: only keys present in `overrides` replace the current value.
    pub fn merge(&self, overrides: &OperationOverrides) -> Self {
        let mut merged = *self;
        for op in Operation::ALL {
            if let Some(enabled) = overrides.get(op) {
                merged.set(op, enabled);
            }
        }
        merged
    }

    /// Globals only ever support get and update.
    pub fn clamp_to_global(&self) -> Self {
        Self {
            list: false,
            get: self.get,
            create: false,
            update: self.update,
            delete: false,
        }
    }
}

/// Partial operation settings supplied per type in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,
}

impl OperationOverrides {
    pub fn get(&self, operation: Operation) -> Option<bool> {
        match operation {
            Operation::List => self.list,
            Operation::Get => self.get,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

fn default_true() -> bool {
    true
}
