//! Unsaved-changes coordination.
//!
//! Each open editing surface owns a [`DirtyScope`]. Scopes report their dirty
//! edges into one [`GlobalDirtyAggregator`], the [`ScopeLifecycleController`]
//! arms and disarms scopes as surfaces open and close, and the
//! [`NavigationGuard`] asks for confirmation before a dirty surface is left.
//!
//! Everything here runs on the UI thread; the shared aggregator handle is
//! `!Send`.

pub mod aggregator;
pub mod error;
pub mod guard;
pub mod lifecycle;
pub mod scope;

pub use aggregator::{GlobalDirtyAggregator, SharedAggregator};
pub use error::CoordinationError;
pub use guard::{Clearance, ConfirmationRequest, Decision, Guarded, NavigationGuard, UnloadVerdict};
pub use lifecycle::{InitCompletion, InitialData, ScopeLifecycleController};
pub use scope::{DirtyScope, MutationEffect, ScopeId, ScopePhase};
