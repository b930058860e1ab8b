use std::time::{Duration, Instant};

use super::aggregator::SharedAggregator;
use super::error::CoordinationError;
use super::scope::{DirtyScope, MutationEffect, ScopeId};

/// How a surface was populated when it opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialData {
    /// Create mode: blank template or defaults
    Blank,
    /// Edit mode: pre-populated from the record with this id
    Existing(String),
}

/// How the end of programmatic initialization is signalled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitCompletion {
    /// The surface calls `complete_initialization` itself
    Explicit,
    /// Surface has no completion event; start tracking after this long
    Fallback(Duration),
}

#[derive(Debug)]
struct OpenSurface {
    scope: DirtyScope,
    parent: Option<ScopeId>,
    label: String,
    deadline: Option<Instant>,
}

/// Arms a scope when a surface opens and disarms it on every close path.
///
/// Surfaces are kept in open order. A nested surface records its parent, so
/// closing a parent also closes everything opened on top of it, while
/// closing a child never touches the parent.
#[derive(Debug)]
pub struct ScopeLifecycleController {
    aggregator: SharedAggregator,
    open: Vec<OpenSurface>,
}

impl ScopeLifecycleController {
    pub fn new(aggregator: SharedAggregator) -> Self {
        ScopeLifecycleController {
            aggregator,
            open: Vec::new(),
        }
    }

    pub fn aggregator(&self) -> &SharedAggregator {
        &self.aggregator
    }

    /// Arm a scope for a top-level surface
    pub fn on_surface_open(
        &mut self,
        label: impl Into<String>,
        initial: InitialData,
        completion: InitCompletion,
    ) -> ScopeId {
        self.open_surface(None, label.into(), initial, completion)
    }

    /// Arm a scope for a surface opened from inside `parent`
    pub fn on_nested_surface_open(
        &mut self,
        parent: ScopeId,
        label: impl Into<String>,
        initial: InitialData,
        completion: InitCompletion,
    ) -> Result<ScopeId, CoordinationError> {
        self.position(parent)?;
        Ok(self.open_surface(Some(parent), label.into(), initial, completion))
    }

    fn open_surface(
        &mut self,
        parent: Option<ScopeId>,
        label: String,
        initial: InitialData,
        completion: InitCompletion,
    ) -> ScopeId {
        let scope = DirtyScope::arm(&self.aggregator);
        let id = scope.id();
        let deadline = match completion {
            InitCompletion::Explicit => None,
            InitCompletion::Fallback(after) => Some(Instant::now() + after),
        };
        tracing::debug!(scope = %id, surface = %label, ?initial, ?parent, "surface opened");
        self.open.push(OpenSurface {
            scope,
            parent,
            label,
            deadline,
        });
        id
    }

    /// The surface has finished writing its initial values
    pub fn complete_initialization(&mut self, id: ScopeId) -> Result<(), CoordinationError> {
        let idx = self.position(id)?;
        let surface = &mut self.open[idx];
        surface.deadline = None;
        surface.scope.complete_initialization()
    }

    /// Start tracking any fallback scope whose deadline has passed.
    /// Returns the scopes that were switched over.
    pub fn poll_deadlines(&mut self, now: Instant) -> Vec<ScopeId> {
        let mut completed = Vec::new();
        for surface in &mut self.open {
            let due = surface.deadline.is_some_and(|d| d <= now);
            if !due {
                continue;
            }
            surface.deadline = None;
            if surface.scope.complete_initialization().is_ok() {
                tracing::warn!(
                    scope = %surface.scope.id(),
                    surface = %surface.label,
                    "initialization completed by fallback timer"
                );
                completed.push(surface.scope.id());
            }
        }
        completed
    }

    /// Earliest pending fallback deadline, for sizing the event poll
    pub fn next_deadline(&self) -> Option<Instant> {
        self.open.iter().filter_map(|s| s.deadline).min()
    }

    pub fn on_field_change(&mut self, id: ScopeId) -> Result<MutationEffect, CoordinationError> {
        let idx = self.position(id)?;
        self.open[idx].scope.report_mutation()
    }

    /// A save reported success. The scope stays open unless `closing`.
    pub fn on_save_succeeded(&mut self, id: ScopeId, closing: bool) -> Result<(), CoordinationError> {
        let idx = self.position(id)?;
        self.open[idx].scope.mark_saved()?;
        if closing {
            self.on_surface_close(id)?;
        }
        Ok(())
    }

    /// Disarm the surface and everything nested in it, innermost first.
    pub fn on_surface_close(&mut self, id: ScopeId) -> Result<(), CoordinationError> {
        let covered = self.covered_scopes(id)?;
        let mut first_err = None;
        for scope_id in covered {
            let Ok(idx) = self.position(scope_id) else {
                continue;
            };
            let mut surface = self.open.remove(idx);
            if let Err(e) = surface.scope.disarm() {
                first_err.get_or_insert(e);
            }
            tracing::debug!(scope = %scope_id, surface = %surface.label, "surface closed");
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Close `id` if it is still open; a no-op otherwise
    pub fn close_if_open(&mut self, id: ScopeId) -> Result<(), CoordinationError> {
        if self.is_open(id) {
            self.on_surface_close(id)
        } else {
            Ok(())
        }
    }

    /// `id` plus every scope nested in it, innermost first
    pub fn covered_scopes(&self, id: ScopeId) -> Result<Vec<ScopeId>, CoordinationError> {
        self.position(id)?;
        let mut covered: Vec<ScopeId> = self
            .open
            .iter()
            .map(|s| s.scope.id())
            .filter(|&s| self.descends_from(s, id))
            .collect();
        covered.reverse();
        Ok(covered)
    }

    fn descends_from(&self, mut scope: ScopeId, ancestor: ScopeId) -> bool {
        loop {
            if scope == ancestor {
                return true;
            }
            match self.parent_of(scope) {
                Some(parent) => scope = parent,
                None => return false,
            }
        }
    }

    fn parent_of(&self, id: ScopeId) -> Option<ScopeId> {
        self.open
            .iter()
            .find(|s| s.scope.id() == id)
            .and_then(|s| s.parent)
    }

    fn position(&self, id: ScopeId) -> Result<usize, CoordinationError> {
        self.open
            .iter()
            .position(|s| s.scope.id() == id)
            .ok_or_else(|| {
                let err = CoordinationError::UnknownScope(id);
                tracing::error!(scope = %id, "{}", err);
                err
            })
    }

    pub fn is_open(&self, id: ScopeId) -> bool {
        self.open.iter().any(|s| s.scope.id() == id)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&DirtyScope> {
        self.open
            .iter()
            .find(|s| s.scope.id() == id)
            .map(|s| &s.scope)
    }

    pub fn is_dirty(&self, id: ScopeId) -> bool {
        self.scope(id).is_some_and(|s| s.is_dirty())
    }

    /// Most recently opened surface still open
    pub fn top(&self) -> Option<ScopeId> {
        self.open.last().map(|s| s.scope.id())
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.parent_of(id)
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}
