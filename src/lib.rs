//! # spark-params
//!
//! Parameter change detection and handler dispatch for reactive UI components.
//!
//! On every update the host framework hands a component a batch of incoming
//! values. spark-params applies them through the host's own assignment, finds
//! which tracked parameters actually changed, and runs each logical change
//! handler exactly once.
//!
//! ## Architecture
//!
//! ```text
//! ContainerUnion → ScopeContainer → ParameterGroup → ParameterSlot
//!        apply_and_notify(base_apply, view)
//!          lock → base_apply → diff → group by handler identity → run → advance
//! ```
//!
//! Everything is single-threaded (`Rc`/`RefCell`). Handlers may be async;
//! they are awaited one after the other, never concurrently.
//!
//! ## Modules
//!
//! - [`types`] - Parameter identity, change event, dispatch key
//! - [`parameter`] - Slots, value sources, comparers, handlers
//! - [`scope`] - Groups, scope containers, unions, dispatch
//! - [`error`] - [`ParamError`]

pub mod error;
pub mod parameter;
pub mod scope;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{ParamError, Result};

pub use parameter::{
    Comparer, DefaultComparer, EqualityComparer, EventHandler, Handler, HandlerAction,
    NoArgHandler, ParameterSlot, ParameterState, SharedComparer, SharedParameter, SlotBuilder,
    Tolerance, ValueGetter, ValueSetter, ValueSource, WriteBack,
};

pub use scope::{
    ChangeSet, ContainerUnion, ParameterGroup, ScopeContainer, ScopeState, UnionConfig,
    group_by_handler_identity,
};
