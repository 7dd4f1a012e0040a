//! Tracked parameters.
//!
//! - [`slot`] - [`ParameterSlot`], one tracked named value
//! - [`value`] - where a slot reads its live value from
//! - [`comparer`] - equality strategies (fixed, supplied, parameter-sourced)
//! - [`handler`] - change handlers and their actions
//!
//! Scopes hold slots of different value types side by side, so they work
//! against the type-erased [`ParameterState`] trait.

pub mod comparer;
pub mod handler;
pub mod slot;
pub mod value;

pub use comparer::{Comparer, DefaultComparer, EqualityComparer, SharedComparer, Tolerance};
pub use handler::{EventHandler, Handler, HandlerAction, NoArgHandler, WriteBack};
pub use slot::{ParameterSlot, SlotBuilder};
pub use value::{ValueGetter, ValueSetter, ValueSource};

use std::rc::Rc;

use crate::types::{DispatchKey, ParameterIdentity};

/// Type-erased view of a tracked parameter, as seen by groups and scopes.
pub trait ParameterState {
    fn identity(&self) -> &ParameterIdentity;

    fn name(&self) -> &str {
        self.identity().name()
    }

    fn is_initialized(&self) -> bool;

    /// Capture the first baseline.
    fn on_initialized(&self);

    /// Compare the baseline against the live value with the comparer resolved now.
    fn has_changed(&self) -> bool;

    /// Move the baseline to the live value.
    fn advance(&self);

    fn has_handler(&self) -> bool;

    /// Key under which this parameter's handler may collapse with others.
    ///
    /// `None` means the handler always fires on its own.
    fn dispatch_key(&self) -> Option<DispatchKey>;

    /// Call the handler. Parameters without a handler complete immediately.
    fn invoke_handler(&self) -> HandlerAction;
}

/// Shared handle to a tracked parameter of any value type.
pub type SharedParameter = Rc<dyn ParameterState>;
