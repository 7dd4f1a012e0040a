//! Handler identity grouping and sequential dispatch.
//!
//! Given the changed parameters of one cycle (in insertion order), decide
//! which handler calls collapse and run the survivors one at a time.
//!
//! # Grouping rule
//!
//! Two changed parameters share one invocation iff both declare the same
//! handler identity label *and* hold the same no-arg handler allocation.
//! Everything else fires on its own:
//!
//! - no label
//! - event-taking handler (each parameter needs its own event)
//! - same label on a separately built handler
//!
//! Groups are ordered by their first member.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::error::{ParamError, Result};
use crate::parameter::SharedParameter;
use crate::types::DispatchKey;

// =============================================================================
// Change Set
// =============================================================================

/// Parameters found changed in one cycle, in insertion order.
#[derive(Default)]
pub struct ChangeSet {
    changed: Vec<SharedParameter>,
}

impl ChangeSet {
    /// Diff every slot against its baseline.
    pub fn collect<'a>(slots: impl IntoIterator<Item = &'a SharedParameter>) -> Self {
        let changed = slots
            .into_iter()
            .filter(|slot| slot.has_changed())
            .cloned()
            .collect();
        Self { changed }
    }

    /// Append another set's changes after this one's.
    pub fn extend(&mut self, other: ChangeSet) {
        self.changed.extend(other.changed);
    }

    /// Number of changed slots.
    pub fn len(&self) -> usize {
        self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Names of the changed slots.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(|slot| slot.name())
    }

    /// One representative per handler invocation, in first-member order.
    pub fn dispatch_groups(&self) -> Vec<SharedParameter> {
        group_by_handler_identity(&self.changed)
    }

    /// Run the handlers of this cycle, then advance every changed slot.
    ///
    /// Handlers are awaited in order. The first failure stops the remaining
    /// handlers; baselines are advanced either way and the failure returned.
    pub async fn dispatch(self) -> Result<()> {
        let groups = self.dispatch_groups();
        debug!(
            changed = self.changed.len(),
            groups = groups.len(),
            "dispatching parameter changes"
        );

        let result = run_handlers(&groups).await;
        self.advance();
        result
    }

    /// Move every changed slot's baseline to its live value.
    pub fn advance(&self) {
        for slot in &self.changed {
            slot.advance();
        }
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// Collapse parameters sharing a [`DispatchKey`]; keep everything else.
///
/// Parameters without a handler are dropped, they have nothing to invoke.
pub fn group_by_handler_identity(changed: &[SharedParameter]) -> Vec<SharedParameter> {
    let mut seen: HashSet<DispatchKey> = HashSet::new();
    let mut groups = Vec::with_capacity(changed.len());

    for slot in changed {
        if !slot.has_handler() {
            continue;
        }
        match slot.dispatch_key() {
            Some(key) => {
                if seen.insert(key) {
                    groups.push(slot.clone());
                } else {
                    trace!(name = slot.name(), "handler already scheduled this cycle");
                }
            }
            None => groups.push(slot.clone()),
        }
    }

    groups
}

async fn run_handlers(groups: &[SharedParameter]) -> Result<()> {
    for slot in groups {
        trace!(name = slot.name(), "invoking change handler");
        if let Err(source) = slot.invoke_handler().complete().await {
            warn!(name = slot.name(), error = %source, "change handler failed");
            return Err(ParamError::Handler {
                name: slot.name().to_string(),
                source,
            });
        }
    }
    Ok(())
}
