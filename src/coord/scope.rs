use std::fmt;

use super::aggregator::SharedAggregator;
use super::error::CoordinationError;

/// Opaque identifier of one mounted editing surface instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub(super) u64);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a scope is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePhase {
    /// Fields are being populated programmatically; mutations don't count
    Initializing,
    /// User edits flip the scope dirty
    Tracking,
    /// Closed; never reused
    Disarmed,
}

/// What a reported mutation did to the scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEffect {
    /// Clean → dirty; the aggregator was incremented
    Dirtied,
    /// Scope was already dirty; nothing changed
    AlreadyDirty,
    /// Observed during initialization and ignored for dirtiness
    Suppressed,
    /// Scope is disarmed
    Ignored,
}

/// Per-surface tracker of "modified since opened or last saved".
///
/// Every transition that changes `is_dirty` notifies the shared aggregator on
/// the edge, so the aggregator holds at most one contribution per scope.
#[derive(Debug)]
pub struct DirtyScope {
    id: ScopeId,
    phase: ScopePhase,
    is_dirty: bool,
    suppressed_mutations: usize,
    aggregator: SharedAggregator,
}

impl DirtyScope {
    /// Create a scope in `Initializing` and register it as live.
    pub fn arm(aggregator: &SharedAggregator) -> Self {
        let id = aggregator.register();
        tracing::debug!(scope = %id, "scope armed");
        DirtyScope {
            id,
            phase: ScopePhase::Initializing,
            is_dirty: false,
            suppressed_mutations: 0,
            aggregator: aggregator.clone(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn phase(&self) -> ScopePhase {
        self.phase
    }

    pub fn is_dirty(&self) -> bool {
        self.phase == ScopePhase::Tracking && self.is_dirty
    }

    /// Mutations seen while initializing
    pub fn suppressed_mutations(&self) -> usize {
        self.suppressed_mutations
    }

    pub fn complete_initialization(&mut self) -> Result<(), CoordinationError> {
        match self.phase {
            ScopePhase::Initializing => {
                self.phase = ScopePhase::Tracking;
                tracing::debug!(
                    scope = %self.id,
                    suppressed = self.suppressed_mutations,
                    "scope tracking"
                );
                Ok(())
            }
            ScopePhase::Tracking => Ok(()),
            ScopePhase::Disarmed => Err(self.stale()),
        }
    }

    pub fn report_mutation(&mut self) -> Result<MutationEffect, CoordinationError> {
        match self.phase {
            ScopePhase::Initializing => {
                self.suppressed_mutations += 1;
                Ok(MutationEffect::Suppressed)
            }
            ScopePhase::Tracking if self.is_dirty => Ok(MutationEffect::AlreadyDirty),
            ScopePhase::Tracking => {
                self.aggregator.increment(self.id)?;
                self.is_dirty = true;
                Ok(MutationEffect::Dirtied)
            }
            ScopePhase::Disarmed => Ok(MutationEffect::Ignored),
        }
    }

    /// Clear the dirty flag after a successful save; the scope keeps tracking.
    pub fn mark_saved(&mut self) -> Result<(), CoordinationError> {
        if self.phase == ScopePhase::Disarmed {
            return Err(self.stale());
        }
        if self.is_dirty {
            self.aggregator.decrement(self.id)?;
            self.is_dirty = false;
        }
        Ok(())
    }

    /// Force clean and close the scope. Idempotent.
    pub fn disarm(&mut self) -> Result<(), CoordinationError> {
        if self.phase == ScopePhase::Disarmed {
            return Ok(());
        }
        let cleared = if self.is_dirty {
            self.is_dirty = false;
            self.aggregator.decrement(self.id)
        } else {
            Ok(())
        };
        self.phase = ScopePhase::Disarmed;
        self.aggregator.unregister(self.id);
        tracing::debug!(scope = %self.id, "scope disarmed");
        cleared
    }

    fn stale(&self) -> CoordinationError {
        let err = CoordinationError::StaleScope(self.id);
        tracing::error!(scope = %self.id, "{}", err);
        err
    }
}

impl Drop for DirtyScope {
    fn drop(&mut self) {
        if self.phase != ScopePhase::Disarmed {
            tracing::warn!(scope = %self.id, "scope dropped without disarm");
            let _ = self.disarm();
        }
    }
}
