//! Parameter Slot - one tracked named value.
//!
//! A slot reads the component's live value through its [`ValueSource`], keeps
//! the value observed at the end of the last cycle, and decides whether the
//! two differ under its [`Comparer`].
//!
//! # Lifecycle
//!
//! 1. `attach` / `builder(..).attach()` - created once per component instance
//! 2. `on_initialized()` - first baseline captured
//! 3. per cycle: `has_changed()` → `invoke_handler()` → `advance()`
//!
//! Diffing before `on_initialized()` is a precondition violation. Debug builds
//! assert; release builds treat the missing baseline as a change.
//!
//! # Example
//!
//! ```ignore
//! use spark_params::{ParameterSlot, Handler};
//! use spark_signals::signal;
//!
//! let width = signal(80u16);
//! let slot = ParameterSlot::builder_from("Width", width.clone())
//!     .handler(Handler::no_arg(|| println!("width changed")))
//!     .attach();
//!
//! slot.on_initialized();
//! width.set(100);
//! assert!(slot.has_changed());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::comparer::Comparer;
use super::handler::{Handler, HandlerAction, NoArgHandler, WriteBack};
use super::value::ValueSource;
use super::ParameterState;
use crate::error::{ParamError, Result};
use crate::types::{DispatchKey, ParameterChangedEvent, ParameterIdentity};

// =============================================================================
// Parameter Slot
// =============================================================================

/// One tracked named value bound to a component instance.
pub struct ParameterSlot<T: Clone + PartialEq + 'static> {
    identity: ParameterIdentity,
    source: ValueSource<T>,
    /// `None` until `on_initialized()`.
    last_value: RefCell<Option<T>>,
    handler: Option<Handler<T>>,
    comparer: Comparer<T>,
    write_back: Option<WriteBack<T>>,
}

impl<T: Clone + PartialEq + 'static> ParameterSlot<T> {
    /// Attach a slot reading its live value through `get`.
    pub fn attach(
        name: impl Into<String>,
        get: impl Fn() -> T + 'static,
        handler: Option<Handler<T>>,
        comparer: Option<Comparer<T>>,
    ) -> Rc<Self> {
        let mut builder = Self::builder(name, get);
        if let Some(handler) = handler {
            builder = builder.handler(handler);
        }
        if let Some(comparer) = comparer {
            builder = builder.comparer(comparer);
        }
        builder.attach()
    }

    /// Start building a slot backed by a getter closure.
    pub fn builder(name: impl Into<String>, get: impl Fn() -> T + 'static) -> SlotBuilder<T> {
        SlotBuilder::new(name, ValueSource::getter(get))
    }

    /// Start building a slot backed by any value source (signal, getter, writable pair).
    pub fn builder_from(
        name: impl Into<String>,
        source: impl Into<ValueSource<T>>,
    ) -> SlotBuilder<T> {
        SlotBuilder::new(name, source.into())
    }

    /// Name, handler label and comparer source.
    pub fn identity(&self) -> &ParameterIdentity {
        &self.identity
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// Live value, read through the value source.
    pub fn current(&self) -> T {
        self.source.get()
    }

    /// Baseline captured by the last `on_initialized()` / `advance()`.
    pub fn last_value(&self) -> Option<T> {
        self.last_value.borrow().clone()
    }

    /// Equality strategy used by `has_changed()`.
    pub fn comparer(&self) -> &Comparer<T> {
        &self.comparer
    }

    /// Change handler, if any.
    pub fn handler(&self) -> Option<&Handler<T>> {
        self.handler.as_ref()
    }

    /// Explicit two-way write path.
    ///
    /// The write-back notification runs first, while both the live value and
    /// the baseline still hold the old value. Only after it completes is
    /// `new_value` committed to the source and the baseline. A failing
    /// write-back leaves the old value in place.
    pub async fn set_value(&self, new_value: T) -> Result<()> {
        if !self.source.is_writable() {
            return Err(ParamError::ReadOnly {
                name: self.name().to_string(),
            });
        }

        if let Some(write_back) = &self.write_back {
            write_back(&new_value)
                .complete()
                .await
                .map_err(|source| ParamError::Handler {
                    name: self.name().to_string(),
                    source,
                })?;
        }

        self.source.set(new_value.clone());
        *self.last_value.borrow_mut() = Some(new_value);
        trace!(name = self.name(), "parameter value committed");
        Ok(())
    }
}

impl<T: Clone + PartialEq + 'static> ParameterState for ParameterSlot<T> {
    fn identity(&self) -> &ParameterIdentity {
        &self.identity
    }

    fn is_initialized(&self) -> bool {
        self.last_value.borrow().is_some()
    }

    fn on_initialized(&self) {
        let value = self.current();
        *self.last_value.borrow_mut() = Some(value);
    }

    fn has_changed(&self) -> bool {
        debug_assert!(
            self.is_initialized(),
            "parameter {} diffed before on_initialized()",
            self.name()
        );
        // Clone out so user getters/comparers never run under our borrow
        let last = self.last_value.borrow().clone();
        let current = self.current();
        match last {
            Some(last) => !self.comparer.equals(&last, &current),
            None => true,
        }
    }

    fn advance(&self) {
        let value = self.current();
        *self.last_value.borrow_mut() = Some(value);
    }

    fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    fn dispatch_key(&self) -> Option<DispatchKey> {
        let label = self.identity.handler_identity()?;
        match &self.handler {
            Some(Handler::NoArg(handler)) => Some(DispatchKey {
                label: label.to_string(),
                target: handler.target(),
            }),
            _ => None,
        }
    }

    fn invoke_handler(&self) -> HandlerAction {
        match &self.handler {
            None => HandlerAction::done(),
            Some(Handler::NoArg(handler)) => handler.call(),
            Some(Handler::EventArg(handler)) => {
                let new_value = self.current();
                let last_value = self.last_value().unwrap_or_else(|| new_value.clone());
                handler(ParameterChangedEvent::new(self.name(), last_value, new_value))
            }
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for ParameterSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSlot")
            .field("identity", &self.identity)
            .field("last_value", &self.last_value.borrow())
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

// =============================================================================
// Slot Builder
// =============================================================================

/// Options for attaching a [`ParameterSlot`].
pub struct SlotBuilder<T: Clone + PartialEq + 'static> {
    name: String,
    source: ValueSource<T>,
    handler: Option<Handler<T>>,
    handler_identity: Option<String>,
    comparer: Comparer<T>,
    write_back: Option<WriteBack<T>>,
}

impl<T: Clone + PartialEq + 'static> SlotBuilder<T> {
    /// Builder for a slot named `name` reading from `source`.
    pub fn new(name: impl Into<String>, source: ValueSource<T>) -> Self {
        Self {
            name: name.into(),
            source,
            handler: None,
            handler_identity: None,
            comparer: Comparer::default(),
            write_back: None,
        }
    }

    /// Set the change handler.
    pub fn handler(mut self, handler: Handler<T>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Use a parameterless handler that other slots may share.
    pub fn shared_handler(mut self, handler: &NoArgHandler) -> Self {
        self.handler = Some(Handler::NoArg(handler.clone()));
        self
    }

    /// Label shared by parameters whose handler should run once per cycle.
    pub fn handler_identity(mut self, label: impl Into<String>) -> Self {
        self.handler_identity = Some(label.into());
        self
    }

    /// Set the equality strategy. Defaults to `PartialEq`.
    pub fn comparer(mut self, comparer: Comparer<T>) -> Self {
        self.comparer = comparer;
        self
    }

    /// Notification fired by [`ParameterSlot::set_value`] before the commit.
    pub fn on_write_back<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> R + 'static,
        R: Into<HandlerAction>,
    {
        self.write_back = Some(Rc::new(move |value: &T| -> HandlerAction { f(value).into() }));
        self
    }

    /// Finish the slot. Its baseline is captured by `on_initialized()`.
    pub fn attach(self) -> Rc<ParameterSlot<T>> {
        let mut identity = ParameterIdentity::new(self.name);
        if let Some(label) = self.handler_identity {
            identity = identity.with_handler_identity(label);
        }
        if let Some(source) = self.comparer.source_name() {
            identity = identity.with_comparer_source(source);
        }

        Rc::new(ParameterSlot {
            identity,
            source: self.source,
            last_value: RefCell::new(None),
            handler: self.handler,
            comparer: self.comparer,
            write_back: self.write_back,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
