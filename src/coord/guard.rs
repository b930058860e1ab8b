use std::collections::BTreeMap;

use super::aggregator::SharedAggregator;
use super::error::CoordinationError;
use super::lifecycle::ScopeLifecycleController;
use super::scope::ScopeId;

pub const DEFAULT_CONFIRM_PROMPT: &str = "Discard unsaved changes?";
pub const DEFAULT_UNLOAD_PROMPT: &str = "You have unsaved changes. Quit anyway?";

/// The user's answer to a pending confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Throw the changes away and leave
    Discard,
    /// Stay on the surface
    Keep,
}

/// A "discard changes?" interaction waiting for the user.
///
/// Holds the exit continuation until the user answers; it is never run
/// speculatively.
#[derive(Debug)]
pub struct ConfirmationRequest<A> {
    scope: ScopeId,
    covered: Vec<ScopeId>,
    prompt: String,
    action: A,
}

impl<A> ConfirmationRequest<A> {
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn covered(&self) -> &[ScopeId] {
        &self.covered
    }

    pub fn action(&self) -> &A {
        &self.action
    }
}

/// Permission to leave a set of scopes, carrying the exit action.
#[must_use = "a clearance does nothing until it proceeds"]
#[derive(Debug)]
pub struct Clearance<A> {
    covered: Vec<ScopeId>,
    action: A,
}

impl<A> Clearance<A> {
    /// Scopes that will be disarmed once the action succeeds, innermost first
    pub fn covered(&self) -> &[ScopeId] {
        &self.covered
    }

    /// Run the exit action, then disarm the covered scopes.
    ///
    /// Scopes are only disarmed when `run` returns `Ok`; a failed action (or
    /// failed save) leaves them armed and dirty so the guard stays active.
    pub fn proceed<T, E, F>(self, lifecycle: &mut ScopeLifecycleController, run: F) -> Result<T, E>
    where
        F: FnOnce(A) -> Result<T, E>,
        E: From<CoordinationError>,
    {
        let value = run(self.action)?;
        for scope in &self.covered {
            lifecycle.close_if_open(*scope)?;
        }
        Ok(value)
    }
}

/// Result of routing an exit through the guard
#[derive(Debug)]
pub enum Guarded<A> {
    /// Nothing relevant is dirty; proceed immediately
    Clear(Clearance<A>),
    /// A confirmation was raised; answer it with [`NavigationGuard::resolve`]
    Pending { scope: ScopeId, prompt: String },
    /// A confirmation is already waiting for this scope; the new action was dropped
    AlreadyPending(ScopeId),
}

/// Answer to the host environment's "about to quit" signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnloadVerdict {
    Allow,
    /// Ask the host to show its own prompt with this message
    Prevent { message: String },
}

/// Intercepts every "leave this surface" affordance.
///
/// `A` is the caller's exit continuation: an enum describing what to do, or
/// a boxed closure.
#[derive(Debug)]
pub struct NavigationGuard<A> {
    aggregator: SharedAggregator,
    confirm_prompt: String,
    unload_prompt: String,
    pending: BTreeMap<ScopeId, ConfirmationRequest<A>>,
    unload_registered: bool,
}

impl<A> NavigationGuard<A> {
    pub fn new(aggregator: SharedAggregator) -> Self {
        Self::with_prompts(aggregator, DEFAULT_CONFIRM_PROMPT, DEFAULT_UNLOAD_PROMPT)
    }

    pub fn with_prompts(
        aggregator: SharedAggregator,
        confirm_prompt: impl Into<String>,
        unload_prompt: impl Into<String>,
    ) -> Self {
        NavigationGuard {
            aggregator,
            confirm_prompt: confirm_prompt.into(),
            unload_prompt: unload_prompt.into(),
            pending: BTreeMap::new(),
            unload_registered: false,
        }
    }

    /// Route an exit from `scope` (and anything nested in it) through the guard.
    pub fn guard(
        &mut self,
        lifecycle: &ScopeLifecycleController,
        scope: ScopeId,
        action: A,
    ) -> Result<Guarded<A>, CoordinationError> {
        self.drop_closed();
        if self.pending.contains_key(&scope) {
            tracing::debug!(%scope, "confirmation already pending");
            return Ok(Guarded::AlreadyPending(scope));
        }

        let covered = lifecycle.covered_scopes(scope)?;
        if !self.aggregator.any_dirty(&covered) {
            return Ok(Guarded::Clear(Clearance { covered, action }));
        }

        tracing::debug!(%scope, ?covered, "confirmation requested");
        let prompt = self.confirm_prompt.clone();
        self.pending.insert(
            scope,
            ConfirmationRequest {
                scope,
                covered,
                prompt: prompt.clone(),
                action,
            },
        );
        Ok(Guarded::Pending { scope, prompt })
    }

    /// Answer the pending confirmation for `scope`.
    ///
    /// `Keep` drops the request with no other effect. `Discard` hands back a
    /// clearance; the scopes are disarmed when it proceeds successfully.
    /// A request whose scope was closed some other way (saved and closed,
    /// or closed by its parent) is dropped and yields `None`.
    pub fn resolve(&mut self, scope: ScopeId, decision: Decision) -> Option<Clearance<A>> {
        self.drop_closed();
        let request = self.pending.remove(&scope)?;
        match decision {
            Decision::Keep => {
                tracing::debug!(%scope, "confirmation declined");
                None
            }
            Decision::Discard => {
                tracing::debug!(%scope, "confirmation accepted");
                Some(Clearance {
                    covered: request.covered,
                    action: request.action,
                })
            }
        }
    }

    pub fn pending(&self, scope: ScopeId) -> Option<&ConfirmationRequest<A>> {
        self.pending
            .get(&scope)
            .filter(|_| self.aggregator.is_live(scope))
    }

    /// Any waiting request, for hosts that show one prompt at a time
    pub fn first_pending(&self) -> Option<&ConfirmationRequest<A>> {
        self.pending
            .values()
            .find(|request| self.aggregator.is_live(request.scope))
    }

    pub fn has_pending(&self) -> bool {
        self.first_pending().is_some()
    }

    /// Forget requests whose scope has been disarmed since they were raised
    fn drop_closed(&mut self) {
        let aggregator = &self.aggregator;
        self.pending.retain(|scope, _| {
            let live = aggregator.is_live(*scope);
            if !live {
                tracing::debug!(%scope, "dropping confirmation for closed scope");
            }
            live
        });
    }

    /// Record the host's single unload hook registration.
    pub fn register_unload(&mut self) -> Result<(), CoordinationError> {
        if self.unload_registered {
            let err = CoordinationError::UnloadAlreadyRegistered;
            tracing::error!("{}", err);
            return Err(err);
        }
        self.unload_registered = true;
        Ok(())
    }

    pub fn unload_registered(&self) -> bool {
        self.unload_registered
    }

    /// Read the global signal at the moment the host is about to quit.
    pub fn guard_unload(&self) -> UnloadVerdict {
        if self.aggregator.read() {
            tracing::debug!(
                dirty = self.aggregator.active_dirty_count(),
                "unload prevented"
            );
            UnloadVerdict::Prevent {
                message: self.unload_prompt.clone(),
            }
        } else {
            UnloadVerdict::Allow
        }
    }
}
