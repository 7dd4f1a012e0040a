//! Container Union - several scopes driven as one component.
//!
//! A component may split its parameters into scopes (one per logical region).
//! The union runs a single update cycle across all of them:
//!
//! 1. verify once, if [`UnionConfig::auto_verify`] is set
//! 2. lock every scope
//! 3. `base_apply(view)` - exactly once
//! 4. every scope collects its changes against that one application
//! 5. the changes are merged in scope order, grouped by handler identity once
//!    and dispatched
//!
//! Name uniqueness across scopes is opt-in. [`ContainerUnion::verify`] can be
//! called at any time; with `auto_verify` it runs during `on_initialized()`
//! (or the first cycle) and not again unless a scope is added.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, warn};

use super::container::ScopeContainer;
use super::dispatch::ChangeSet;
use crate::error::{ParamError, Result};

// =============================================================================
// Config
// =============================================================================

/// Options for a [`ContainerUnion`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnionConfig {
    /// Verify cross-scope name uniqueness automatically before the first cycle.
    pub auto_verify: bool,
}

impl UnionConfig {
    /// Defaults: no automatic verification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify name uniqueness before the first cycle.
    pub fn auto_verify(mut self, enabled: bool) -> Self {
        self.auto_verify = enabled;
        self
    }
}

// =============================================================================
// Union
// =============================================================================

/// Ordered collection of [`ScopeContainer`]s.
#[derive(Debug, Default)]
pub struct ContainerUnion {
    config: UnionConfig,
    scopes: RefCell<Vec<Rc<ScopeContainer>>>,
    verified: Cell<bool>,
}

impl ContainerUnion {
    /// Empty union with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty union with `config`.
    pub fn with_config(config: UnionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active config.
    pub fn config(&self) -> UnionConfig {
        self.config
    }

    /// Append a scope. Dispatch follows the order scopes are added in.
    pub fn add(&self, scope: Rc<ScopeContainer>) {
        self.scopes.borrow_mut().push(scope);
        self.verified.set(false);
    }

    /// Number of member scopes.
    pub fn len(&self) -> usize {
        self.scopes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.borrow().is_empty()
    }

    /// Snapshot of the member scopes in declaration order.
    pub fn scopes(&self) -> Vec<Rc<ScopeContainer>> {
        self.scopes.borrow().clone()
    }

    /// Fail if any parameter name appears in more than one scope.
    ///
    /// Reading the scopes' names locks them.
    pub fn verify(&self) -> Result<()> {
        let mut seen: HashSet<String> = HashSet::new();
        for scope in self.scopes() {
            for name in scope.names() {
                if !seen.insert(name.clone()) {
                    warn!(
                        name = %name,
                        scope = scope.label(),
                        "parameter registered in several scopes"
                    );
                    return Err(ParamError::DuplicateAcrossScopes { name });
                }
            }
        }
        self.verified.set(true);
        debug!(scopes = self.len(), parameters = seen.len(), "parameter union verified");
        Ok(())
    }

    /// True after a successful `verify()` with no scope added since.
    pub fn is_verified(&self) -> bool {
        self.verified.get()
    }

    fn ensure_verified(&self) -> Result<()> {
        if self.config.auto_verify && !self.verified.get() {
            self.verify()?;
        }
        Ok(())
    }

    /// Verify (if configured) and capture every scope's first baseline.
    pub fn on_initialized(&self) -> Result<()> {
        self.ensure_verified()?;
        for scope in self.scopes() {
            scope.on_initialized();
        }
        Ok(())
    }

    /// Run one update cycle across every scope.
    ///
    /// Changes from all scopes are merged in declaration order and grouped
    /// once, so a handler shared across scopes still runs once per cycle.
    /// A handler failure stops the remaining handlers. Every changed slot is
    /// still advanced.
    pub async fn apply_and_notify<V, F>(&self, base_apply: F, view: V) -> Result<()>
    where
        F: FnOnce(V),
    {
        self.ensure_verified()?;

        let scopes = self.scopes();
        for scope in &scopes {
            scope.dispose();
        }

        base_apply(view);

        let mut changes = ChangeSet::default();
        for scope in &scopes {
            changes.extend(scope.collect_changes());
        }
        changes.dispatch().await
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{
        Handler, HandlerAction, NoArgHandler, ParameterSlot, ParameterState, SharedParameter,
    };
    use std::cell::Cell;

    fn slot(name: &str) -> SharedParameter {
        ParameterSlot::attach(name, || 0i32, None, None)
    }

    fn scope(label: &str, names: &[&str]) -> Rc<ScopeContainer> {
        let slots = names.iter().map(|name| slot(name));
        Rc::new(ScopeContainer::from_slots(label, slots).unwrap())
    }

    #[test]
    fn test_verify_distinct() {
        let union = ContainerUnion::new();
        union.add(scope("layout", &["Width", "Height"]));
        union.add(scope("style", &["Color"]));

        assert!(union.verify().is_ok());
        assert!(union.is_verified());
        assert_eq!(union.len(), 2);
    }

    #[test]
    fn test_verify_duplicate_across_scopes() {
        let union = ContainerUnion::new();
        union.add(scope("layout", &["Width", "Height"]));
        union.add(scope("style", &["Color", "Width"]));

        let err = union.verify().unwrap_err();
        assert!(matches!(err, ParamError::DuplicateAcrossScopes { ref name } if name == "Width"));
        assert!(!union.is_verified());
    }

    #[test]
    fn test_without_auto_verify_duplicates_pass_initialization() {
        let union = ContainerUnion::new();
        union.add(scope("a", &["Width"]));
        union.add(scope("b", &["Width"]));

        assert!(union.on_initialized().is_ok());
    }

    #[test]
    fn test_auto_verify_on_initialized() {
        let union = ContainerUnion::with_config(UnionConfig::new().auto_verify(true));
        union.add(scope("a", &["Width"]));
        union.add(scope("b", &["Width"]));

        assert!(matches!(
            union.on_initialized(),
            Err(ParamError::DuplicateAcrossScopes { .. })
        ));
    }

    #[test]
    fn test_add_resets_verification() {
        let union = ContainerUnion::with_config(UnionConfig::new().auto_verify(true));
        union.add(scope("a", &["Width"]));
        union.verify().unwrap();

        union.add(scope("b", &["Height"]));
        assert!(!union.is_verified());
    }

    #[tokio::test]
    async fn test_auto_verify_on_first_cycle() {
        let union = ContainerUnion::with_config(UnionConfig::new().auto_verify(true));
        union.add(scope("a", &["Width"]));
        union.add(scope("b", &["Width"]));

        let applied = Cell::new(false);
        let err = union
            .apply_and_notify(|_: ()| applied.set(true), ())
            .await
            .unwrap_err();

        assert!(matches!(err, ParamError::DuplicateAcrossScopes { .. }));
        assert!(!applied.get());
    }

    #[tokio::test]
    async fn test_cycle_applies_once_and_dispatches_in_scope_order() {
        let value = Rc::new(Cell::new(0));
        let applies = Rc::new(Cell::new(0));
        let log = Rc::new(RefCell::new(Vec::new()));

        let make = |name: &'static str| -> SharedParameter {
            let value = value.clone();
            let log = log.clone();
            ParameterSlot::attach(
                name,
                move || value.get(),
                Some(Handler::no_arg(move || log.borrow_mut().push(name))),
                None,
            )
        };

        let union = ContainerUnion::new();
        let first = ScopeContainer::from_slots("first", vec![make("A"), make("B")]).unwrap();
        let second = ScopeContainer::from_slots("second", vec![make("C")]).unwrap();
        union.add(Rc::new(first));
        union.add(Rc::new(second));
        union.on_initialized().unwrap();

        let (target, count) = (value.clone(), applies.clone());
        union
            .apply_and_notify(
                move |v: i32| {
                    count.set(count.get() + 1);
                    target.set(v);
                },
                1,
            )
            .await
            .unwrap();

        assert_eq!(applies.get(), 1);
        assert_eq!(*log.borrow(), vec!["A", "B", "C"]);
        assert!(union.scopes().iter().all(|scope| scope.is_locked()));
    }

    #[tokio::test]
    async fn test_failure_stops_later_scopes_but_advances_them() {
        let value = Rc::new(Cell::new(0));
        let reached = Rc::new(Cell::new(false));

        let v = value.clone();
        let failing: SharedParameter = ParameterSlot::attach(
            "A",
            move || v.get(),
            Some(Handler::no_arg(|| HandlerAction::fail(anyhow::anyhow!("boom")))),
            None,
        );
        let (v, r) = (value.clone(), reached.clone());
        let later: SharedParameter = ParameterSlot::attach(
            "B",
            move || v.get(),
            Some(Handler::no_arg(move || r.set(true))),
            None,
        );

        let union = ContainerUnion::new();
        let first = ScopeContainer::from_slots("first", vec![failing.clone()]).unwrap();
        let second = ScopeContainer::from_slots("second", vec![later.clone()]).unwrap();
        union.add(Rc::new(first));
        union.add(Rc::new(second));
        union.on_initialized().unwrap();

        let target = value.clone();
        let err = union
            .apply_and_notify(move |v: i32| target.set(v), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, ParamError::Handler { ref name, .. } if name == "A"));
        assert!(!reached.get());
        assert!(!failing.has_changed());
        assert!(!later.has_changed());
    }

    #[tokio::test]
    async fn test_shared_handler_across_scopes_runs_once() {
        let value = Rc::new(Cell::new(0));
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let on_change = NoArgHandler::new(move || calls_clone.set(calls_clone.get() + 1));

        let make = |name: &str| -> SharedParameter {
            let value = value.clone();
            ParameterSlot::builder(name, move || value.get())
                .shared_handler(&on_change)
                .handler_identity("on_change")
                .attach()
        };

        let union = ContainerUnion::new();
        union.add(Rc::new(ScopeContainer::from_slots("left", vec![make("A")]).unwrap()));
        union.add(Rc::new(ScopeContainer::from_slots("right", vec![make("B")]).unwrap()));
        union.on_initialized().unwrap();

        let target = value.clone();
        union
            .apply_and_notify(move |v: i32| target.set(v), 1)
            .await
            .unwrap();

        assert_eq!(calls.get(), 1);
    }
}
