//! Notification scopes.
//!
//! - [`group`] - [`ParameterGroup`], name-unique ordered slots
//! - [`container`] - [`ScopeContainer`], lock-on-first-read update cycle
//! - [`dispatch`] - change collection, handler identity grouping, sequential run
//! - [`union`] - [`ContainerUnion`], one cycle across several scopes

pub mod container;
pub mod dispatch;
pub mod group;
pub mod union;

pub use container::{ScopeContainer, ScopeState};
pub use dispatch::{ChangeSet, group_by_handler_identity};
pub use group::ParameterGroup;
pub use union::{ContainerUnion, UnionConfig};
