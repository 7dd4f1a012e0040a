//! Change handlers.
//!
//! The handler's shape is fixed when the parameter is attached:
//!
//! - [`Handler::NoArg`] - called with no arguments. A [`NoArgHandler`] is a
//!   shared callable; cloning it keeps the same target, which is what lets two
//!   parameters collapse into one invocation per cycle.
//! - [`Handler::EventArg`] - receives a [`ParameterChangedEvent`]. These never
//!   collapse, each changed parameter gets its own event.
//!
//! Handlers return a [`HandlerAction`]: either done immediately, or a future
//! the dispatcher awaits before running the next handler.
//!
//! # Example
//!
//! ```ignore
//! use spark_params::{Handler, HandlerAction, NoArgHandler};
//!
//! // Shared between Width and Height
//! let on_resize = NoArgHandler::new(|| println!("resized"));
//!
//! // Async, with per-parameter event data
//! let on_value: Handler<i32> = Handler::with_event_async(|event| async move {
//!     println!("{} -> {}", event.last_value, event.new_value);
//!     Ok(())
//! });
//! ```

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::types::ParameterChangedEvent;

// =============================================================================
// Handler Action
// =============================================================================

/// Outcome of a handler call.
pub enum HandlerAction {
    /// Handler completed synchronously.
    Done(anyhow::Result<()>),
    /// Handler needs async work. The future is awaited before the next handler runs.
    Async(LocalBoxFuture<'static, anyhow::Result<()>>),
}

impl HandlerAction {
    /// Successful synchronous completion.
    pub fn done() -> Self {
        HandlerAction::Done(Ok(()))
    }

    /// Synchronous failure.
    pub fn fail(error: impl Into<anyhow::Error>) -> Self {
        HandlerAction::Done(Err(error.into()))
    }

    /// Wrap a future.
    pub fn future(fut: impl Future<Output = anyhow::Result<()>> + 'static) -> Self {
        HandlerAction::Async(fut.boxed_local())
    }

    /// Drive the action to completion.
    pub async fn complete(self) -> anyhow::Result<()> {
        match self {
            HandlerAction::Done(result) => result,
            HandlerAction::Async(fut) => fut.await,
        }
    }
}

impl From<()> for HandlerAction {
    fn from(_: ()) -> Self {
        HandlerAction::done()
    }
}

impl From<anyhow::Result<()>> for HandlerAction {
    fn from(result: anyhow::Result<()>) -> Self {
        HandlerAction::Done(result)
    }
}

impl fmt::Debug for HandlerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerAction::Done(result) => f.debug_tuple("Done").field(result).finish(),
            HandlerAction::Async(_) => f.write_str("Async(..)"),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Parameterless handler with a stable target.
///
/// Two slots holding clones of the same `NoArgHandler` point at one target.
/// Two separately built handlers never do, even if their closures are identical.
#[derive(Clone)]
pub struct NoArgHandler(Rc<dyn Fn() -> HandlerAction>);

impl NoArgHandler {
    /// Wrap a closure as a shareable handler.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: Into<HandlerAction>,
    {
        NoArgHandler(Rc::new(move || -> HandlerAction { f().into() }))
    }

    /// Handler returning a future.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        NoArgHandler(Rc::new(move || HandlerAction::future(f())))
    }

    /// Invoke the handler.
    pub fn call(&self) -> HandlerAction {
        (self.0)()
    }

    /// Address of the shared callable, used as its identity.
    pub fn target(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// True when both handles share one callable.
    pub fn same_target(&self, other: &NoArgHandler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NoArgHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoArgHandler({:#x})", self.target())
    }
}

/// Handler receiving the per-parameter change event.
pub type EventHandler<T> = Rc<dyn Fn(ParameterChangedEvent<T>) -> HandlerAction>;

/// A change handler, resolved to its shape at attach time.
pub enum Handler<T> {
    NoArg(NoArgHandler),
    EventArg(EventHandler<T>),
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        match self {
            Handler::NoArg(h) => Handler::NoArg(h.clone()),
            Handler::EventArg(h) => Handler::EventArg(h.clone()),
        }
    }
}

impl<T: 'static> Handler<T> {
    /// Parameterless handler.
    pub fn no_arg<F, R>(f: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: Into<HandlerAction>,
    {
        Handler::NoArg(NoArgHandler::new(f))
    }

    /// Parameterless handler returning a future.
    pub fn no_arg_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        Handler::NoArg(NoArgHandler::from_async(f))
    }

    /// Handler receiving the change event.
    pub fn with_event<F, R>(f: F) -> Self
    where
        F: Fn(ParameterChangedEvent<T>) -> R + 'static,
        R: Into<HandlerAction>,
    {
        Handler::EventArg(Rc::new(move |event: ParameterChangedEvent<T>| -> HandlerAction {
            f(event).into()
        }))
    }

    /// Handler receiving the change event and returning a future.
    pub fn with_event_async<F, Fut>(f: F) -> Self
    where
        F: Fn(ParameterChangedEvent<T>) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        Handler::EventArg(Rc::new(move |event: ParameterChangedEvent<T>| {
            HandlerAction::future(f(event))
        }))
    }

    /// True for handlers that take the event payload.
    pub fn accepts_event(&self) -> bool {
        matches!(self, Handler::EventArg(_))
    }
}

impl<T> From<NoArgHandler> for Handler<T> {
    fn from(handler: NoArgHandler) -> Self {
        Handler::NoArg(handler)
    }
}

impl<T> From<&NoArgHandler> for Handler<T> {
    fn from(handler: &NoArgHandler) -> Self {
        Handler::NoArg(handler.clone())
    }
}

/// Notification fired by `set_value` before the new value is committed.
pub type WriteBack<T> = Rc<dyn Fn(&T) -> HandlerAction>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_cloned_handler_shares_target() {
        let handler = NoArgHandler::new(|| ());
        let clone = handler.clone();
        assert!(handler.same_target(&clone));
        assert_eq!(handler.target(), clone.target());
    }

    #[test]
    fn test_separate_handlers_differ() {
        let a = NoArgHandler::new(|| ());
        let b = NoArgHandler::new(|| ());
        assert!(!a.same_target(&b));
    }

    #[test]
    fn test_no_arg_call() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let handler = NoArgHandler::new(move || count_clone.set(count_clone.get() + 1));

        assert!(matches!(handler.call(), HandlerAction::Done(Ok(()))));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_accepts_event() {
        let no_arg: Handler<i32> = Handler::no_arg(|| ());
        let with_event: Handler<i32> = Handler::with_event(|_event| ());
        assert!(!no_arg.accepts_event());
        assert!(with_event.accepts_event());
    }

    #[tokio::test]
    async fn test_async_action_completes() {
        let action = HandlerAction::future(async {
            tokio::task::yield_now().await;
            Ok(())
        });
        assert!(action.complete().await.is_ok());

        let failed = HandlerAction::fail(anyhow::anyhow!("boom"));
        assert_eq!(failed.complete().await.unwrap_err().to_string(), "boom");
    }
}
