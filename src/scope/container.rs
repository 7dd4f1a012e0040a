//! Scope Container - lazily locking wrapper around a [`ParameterGroup`].
//!
//! Membership is open until the first read. Any enumeration, lookup,
//! initialization, dispatch or `dispose()` moves the container from
//! [`ScopeState::Unlocked`] to [`ScopeState::Locked`], and that transition is
//! never undone. Adding afterwards fails with [`ParamError::LockedMutation`].
//!
//! # Update cycle
//!
//! ```text
//! apply_and_notify(base_apply, view)
//!   lock → base_apply(view) → diff slots → group handlers → run → advance
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spark_params::{ScopeContainer, ParameterSlot, Handler};
//!
//! let scope = ScopeContainer::new("props");
//! scope.add(ParameterSlot::attach("A", move || a.get(), Some(on_a), None))?;
//! scope.add(ParameterSlot::attach("B", move || b.get(), Some(on_b), None))?;
//! scope.on_initialized();
//!
//! scope.apply_and_notify(|view: Props| component.assign(view), incoming).await?;
//! ```

use std::cell::{Cell, RefCell};

use tracing::{debug, trace};

use super::dispatch::ChangeSet;
use super::group::ParameterGroup;
use crate::error::{ParamError, Result};
use crate::parameter::SharedParameter;

/// Membership state of a [`ScopeContainer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeState {
    /// Slots may still be added.
    #[default]
    Unlocked,
    /// Membership is frozen.
    Locked,
}

/// One notification scope.
pub struct ScopeContainer {
    label: String,
    state: Cell<ScopeState>,
    group: RefCell<ParameterGroup>,
}

impl ScopeContainer {
    /// Create an empty, unlocked scope. `label` only appears in logs.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: Cell::new(ScopeState::Unlocked),
            group: RefCell::new(ParameterGroup::new()),
        }
    }

    /// Create an unlocked scope from an externally supplied sequence of slots.
    ///
    /// Names must be unique, exactly as with [`add`](Self::add).
    pub fn from_slots(
        label: impl Into<String>,
        slots: impl IntoIterator<Item = SharedParameter>,
    ) -> Result<Self> {
        let scope = Self::new(label);
        for slot in slots {
            scope.add(slot)?;
        }
        Ok(scope)
    }

    /// Label used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current state. Does not lock.
    pub fn state(&self) -> ScopeState {
        self.state.get()
    }

    /// Does not lock.
    pub fn is_locked(&self) -> bool {
        self.state.get() == ScopeState::Locked
    }

    /// Register a slot.
    pub fn add(&self, slot: SharedParameter) -> Result<()> {
        if self.is_locked() {
            return Err(ParamError::LockedMutation {
                name: slot.name().to_string(),
            });
        }
        self.group.borrow_mut().add(slot)
    }

    fn lock(&self) {
        if self.state.get() == ScopeState::Unlocked {
            self.state.set(ScopeState::Locked);
            trace!(scope = %self.label, "parameter scope locked");
        }
    }

    // =========================================================================
    // Reads (all lock)
    // =========================================================================

    /// Number of member slots.
    pub fn len(&self) -> usize {
        self.lock();
        self.group.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if a slot with this name is a member.
    pub fn contains_name(&self, name: &str) -> bool {
        self.lock();
        self.group.borrow().contains_name(name)
    }

    /// True if this exact slot is a member.
    pub fn contains(&self, slot: &SharedParameter) -> bool {
        self.lock();
        self.group.borrow().contains(slot)
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.lock();
        self.group.borrow().names().map(str::to_string).collect()
    }

    /// Snapshot of the member slots in insertion order.
    pub fn slots(&self) -> Vec<SharedParameter> {
        self.lock();
        self.group.borrow().iter().cloned().collect()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Capture every member's first baseline.
    pub fn on_initialized(&self) {
        for slot in self.slots() {
            slot.on_initialized();
        }
        debug!(scope = %self.label, "parameter scope initialized");
    }

    /// Freeze membership. Idempotent.
    pub fn dispose(&self) {
        self.lock();
    }

    /// Diff every member against its baseline, without running handlers.
    pub fn collect_changes(&self) -> ChangeSet {
        let slots = self.slots();
        let changes = ChangeSet::collect(&slots);
        if !changes.is_empty() {
            debug!(
                scope = %self.label,
                changed = ?changes.names().collect::<Vec<_>>(),
                "parameter changes detected"
            );
        }
        changes
    }

    /// Run one update cycle for this scope.
    ///
    /// `base_apply` performs the host's raw assignment of `view`; the view is
    /// only observed through the slots' value getters afterwards.
    pub async fn apply_and_notify<V, F>(&self, base_apply: F, view: V) -> Result<()>
    where
        F: FnOnce(V),
    {
        self.lock();
        base_apply(view);
        self.collect_changes().dispatch().await
    }
}

impl std::fmt::Debug for ScopeContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeContainer")
            .field("label", &self.label)
            .field("state", &self.state.get())
            .field("group", &*self.group.borrow())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
