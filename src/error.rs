//! Error types for parameter registration and dispatch.

use thiserror::Error;

/// Errors raised while registering parameters or running an update cycle.
///
/// Registration errors (`DuplicateName`, `LockedMutation`,
/// `DuplicateAcrossScopes`) are programmer mistakes and are never retried.
#[derive(Error, Debug)]
pub enum ParamError {
    /// A slot with this name is already registered in the group.
    #[error("duplicate parameter name: {name}")]
    DuplicateName { name: String },

    /// The scope was already locked by a read, a dispatch or disposal.
    #[error("cannot add parameter {name}: scope is locked")]
    LockedMutation { name: String },

    /// The same name appears in more than one scope of a union.
    #[error("parameter {name} is registered in more than one scope")]
    DuplicateAcrossScopes { name: String },

    /// A change handler or write-back notification failed.
    #[error("handler for parameter {name} failed")]
    Handler {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// `set_value` was called on a slot whose value source cannot be written.
    #[error("parameter {name} is read-only")]
    ReadOnly { name: String },
}

impl ParamError {
    /// Name of the parameter this error is about.
    pub fn parameter_name(&self) -> &str {
        match self {
            Self::DuplicateName { name }
            | Self::LockedMutation { name }
            | Self::DuplicateAcrossScopes { name }
            | Self::Handler { name, .. }
            | Self::ReadOnly { name } => name,
        }
    }

    /// True for errors raised at registration time rather than during a cycle.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateName { .. }
                | Self::LockedMutation { .. }
                | Self::DuplicateAcrossScopes { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ParamError>;
