//! Signature scanning
//!
//! Walks a function's parameters in declaration order and resolves each one,
//! leaving tombstones for names the caller excluded so positional checks
//! against the documentation still line up.

use crate::error::{Result, SchemaError};
use crate::signature::{BuildOptions, Function};
use crate::types::{resolve, ParameterDescriptor, Value};
use indexmap::IndexMap;
use std::fmt;
use tracing::debug;

/// What the scanner recorded for one parameter name
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Known but excluded; holds its position only
    Tombstone,
    Present {
        descriptor: ParameterDescriptor,
        /// `None` when absent or declared as `None`
        default: Option<Value>,
    },
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Tombstone => write!(f, "ignored"),
            Slot::Present {
                descriptor,
                default,
            } => write!(
                f,
                "{} default={}",
                descriptor,
                default.as_ref().unwrap_or(&Value::None)
            ),
        }
    }
}

/// Ordered mapping from parameter name to slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannedSignature {
    slots: IndexMap<String, Slot>,
}

impl ScannedSignature {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    /// Slot at a position, used for diagnostics
    pub fn get_index(&self, index: usize) -> Option<(&str, &Slot)> {
        self.slots.get_index(index).map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Scan the parameters of `function`
pub fn scan(function: &Function, opts: &BuildOptions) -> Result<ScannedSignature> {
    let mut slots = IndexMap::new();

    for param in function.params() {
        if param.kind().is_structural() {
            debug!(function = function.name(), param = param.name(), kind = ?param.kind(), "skipping structural parameter");
            continue;
        }

        let name = param.name().to_string();
        if slots.contains_key(&name) {
            return Err(SchemaError::DuplicateArgument(name).into());
        }

        if opts.excludes(&name) {
            debug!(function = function.name(), param = %name, "excluded parameter");
            slots.insert(name, Slot::Tombstone);
            continue;
        }

        let descriptor = resolve(&name, param.annotation())?;
        let default = param.default().filter(|d| !d.is_none()).cloned();
        slots.insert(
            name,
            Slot::Present {
                descriptor,
                default,
            },
        );
    }

    Ok(ScannedSignature { slots })
}
