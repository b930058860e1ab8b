use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use super::error::CoordinationError;
use super::scope::ScopeId;

/// Process-wide combination of every tracked scope's dirty flag.
///
/// The count is derived from the set of contributing scopes, so a scope can
/// never be counted twice and a decrement can always be matched against the
/// increment that it undoes.
#[derive(Debug, Default)]
pub struct GlobalDirtyAggregator {
    next_id: u64,
    live: BTreeSet<ScopeId>,
    contributions: BTreeSet<ScopeId>,
}

impl GlobalDirtyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when at least one tracked scope is dirty
    pub fn read(&self) -> bool {
        !self.contributions.is_empty()
    }

    pub fn active_dirty_count(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_dirty(&self, scope: ScopeId) -> bool {
        self.contributions.contains(&scope)
    }

    /// Whether any of the given scopes currently contributes
    pub fn any_dirty(&self, scopes: &[ScopeId]) -> bool {
        scopes.iter().any(|s| self.contributions.contains(s))
    }

    /// Scopes that have been armed and not yet disarmed
    pub fn live_scopes(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.live.iter().copied()
    }

    pub fn is_live(&self, scope: ScopeId) -> bool {
        self.live.contains(&scope)
    }

    pub fn increment(&mut self, scope: ScopeId) -> Result<(), CoordinationError> {
        if !self.contributions.insert(scope) {
            let err = CoordinationError::DuplicateIncrement(scope);
            tracing::error!(%scope, "{}", err);
            return Err(err);
        }
        tracing::debug!(%scope, count = self.contributions.len(), "dirty count incremented");
        Ok(())
    }

    pub fn decrement(&mut self, scope: ScopeId) -> Result<(), CoordinationError> {
        if !self.contributions.remove(&scope) {
            let err = CoordinationError::UnmatchedDecrement(scope);
            tracing::error!(%scope, "{}", err);
            return Err(err);
        }
        tracing::debug!(%scope, count = self.contributions.len(), "dirty count decremented");
        Ok(())
    }

    /// Allocate a fresh id and record the scope as live
    pub(super) fn register(&mut self) -> ScopeId {
        self.next_id += 1;
        let id = ScopeId(self.next_id);
        self.live.insert(id);
        id
    }

    pub(super) fn unregister(&mut self, scope: ScopeId) {
        self.live.remove(&scope);
    }
}

/// Single-threaded handle to the application's aggregator.
///
/// All scopes, the lifecycle controller and the navigation guard hold a clone
/// of the same handle. The handle is deliberately `!Send`: every mutation
/// happens on the UI thread.
#[derive(Debug, Clone, Default)]
pub struct SharedAggregator(Rc<RefCell<GlobalDirtyAggregator>>);

impl SharedAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> bool {
        self.0.borrow().read()
    }

    pub fn active_dirty_count(&self) -> usize {
        self.0.borrow().active_dirty_count()
    }

    pub fn is_dirty(&self, scope: ScopeId) -> bool {
        self.0.borrow().is_dirty(scope)
    }

    pub fn any_dirty(&self, scopes: &[ScopeId]) -> bool {
        self.0.borrow().any_dirty(scopes)
    }

    pub fn live_count(&self) -> usize {
        self.0.borrow().live.len()
    }

    pub fn live_scopes(&self) -> Vec<ScopeId> {
        self.0.borrow().live_scopes().collect()
    }

    pub fn is_live(&self, scope: ScopeId) -> bool {
        self.0.borrow().is_live(scope)
    }

    pub fn increment(&self, scope: ScopeId) -> Result<(), CoordinationError> {
        self.0.borrow_mut().increment(scope)
    }

    pub fn decrement(&self, scope: ScopeId) -> Result<(), CoordinationError> {
        self.0.borrow_mut().decrement(scope)
    }

    pub(super) fn register(&self) -> ScopeId {
        self.0.borrow_mut().register()
    }

    pub(super) fn unregister(&self, scope: ScopeId) {
        self.0.borrow_mut().unregister(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean() {
        let agg = GlobalDirtyAggregator::new();
        assert!(!agg.read());
        assert_eq!(agg.active_dirty_count(), 0);
    }

    #[test]
    fn increment_and_decrement_per_scope() {
        let mut agg = GlobalDirtyAggregator::new();
        let a = agg.register();
        let b = agg.register();
        agg.increment(a).unwrap();
        agg.increment(b).unwrap();
        assert_eq!(agg.active_dirty_count(), 2);
        assert!(agg.any_dirty(&[b]));

        agg.decrement(a).unwrap();
        assert!(agg.read());
        agg.decrement(b).unwrap();
        assert!(!agg.read());
    }

    #[test]
    fn unmatched_decrement_is_rejected() {
        let mut agg = GlobalDirtyAggregator::new();
        let a = agg.register();
        assert_eq!(
            agg.decrement(a),
            Err(CoordinationError::UnmatchedDecrement(a))
        );
        assert_eq!(agg.active_dirty_count(), 0);
    }

    #[test]
    fn duplicate_increment_is_rejected() {
        let mut agg = GlobalDirtyAggregator::new();
        let a = agg.register();
        agg.increment(a).unwrap();
        assert_eq!(
            agg.increment(a),
            Err(CoordinationError::DuplicateIncrement(a))
        );
        assert_eq!(agg.active_dirty_count(), 1);
    }

    #[test]
    fn register_allocates_unique_ids() {
        let shared = SharedAggregator::new();
        let a = shared.register();
        let b = shared.register();
        assert_ne!(a, b);
        assert_eq!(shared.live_scopes(), vec![a, b]);
        assert!(shared.is_live(a));
        shared.unregister(a);
        assert_eq!(shared.live_count(), 1);
    }

    #[test]
    fn handles_share_state() {
        let shared = SharedAggregator::new();
        let other = shared.clone();
        let a = shared.register();
        shared.increment(a).unwrap();
        assert!(other.read());
        assert!(other.is_dirty(a));
    }
}
