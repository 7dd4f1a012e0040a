//! Core types for spark-params.
//!
//! These types describe *what* is tracked. They are created once per parameter
//! at attach time and flow unchanged through every update cycle.

use std::fmt;

// =============================================================================
// Parameter Identity
// =============================================================================

/// Identity record of a tracked parameter.
///
/// Immutable once the parameter is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterIdentity {
    name: String,
    handler_identity: Option<String>,
    comparer_source: Option<String>,
}

impl ParameterIdentity {
    /// Create an identity with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler_identity: None,
            comparer_source: None,
        }
    }

    /// Declare the handler identity label.
    ///
    /// By convention the label is the name of the change handler.
    pub fn with_handler_identity(mut self, label: impl Into<String>) -> Self {
        self.handler_identity = Some(label.into());
        self
    }

    /// Record the name of the parameter that supplies this parameter's comparer.
    pub fn with_comparer_source(mut self, source: impl Into<String>) -> Self {
        self.comparer_source = Some(source.into());
        self
    }

    /// Parameter name, unique within a scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared handler identity label, if any.
    pub fn handler_identity(&self) -> Option<&str> {
        self.handler_identity.as_deref()
    }

    /// Name of the parameter whose value resolves this parameter's comparer.
    pub fn comparer_source(&self) -> Option<&str> {
        self.comparer_source.as_deref()
    }
}

impl fmt::Display for ParameterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(label) = &self.handler_identity {
            write!(f, " -> {label}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Change Event
// =============================================================================

/// Payload delivered to handlers that accept per-parameter change data.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterChangedEvent<T> {
    /// Name of the parameter that changed.
    pub name: String,
    /// Value observed at the end of the previous cycle.
    pub last_value: T,
    /// Value observed after this cycle's base apply.
    pub new_value: T,
}

impl<T> ParameterChangedEvent<T> {
    /// Build the event for one changed parameter.
    pub fn new(name: impl Into<String>, last_value: T, new_value: T) -> Self {
        Self {
            name: name.into(),
            last_value,
            new_value,
        }
    }
}

// =============================================================================
// Dispatch Key
// =============================================================================

/// Key under which changed parameters collapse into one handler invocation.
///
/// Two parameters share a key only when both declare the same label *and*
/// point at the same handler allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    pub label: String,
    pub target: usize,
}
