use super::scope::ScopeId;

/// Caller-contract violations in the unsaved-changes coordination layer.
///
/// These are never clamped or corrected: they surface double-disarm and
/// leaked-scope bugs at the point they are detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinationError {
    #[error("scope {0} is disarmed and cannot be reused")]
    StaleScope(ScopeId),
    #[error("scope {0} is not open")]
    UnknownScope(ScopeId),
    #[error("scope {0} already contributes to the dirty count")]
    DuplicateIncrement(ScopeId),
    #[error("scope {0} has no dirty contribution to remove")]
    UnmatchedDecrement(ScopeId),
    #[error("unload guard is already registered")]
    UnloadAlreadyRegistered,
}
