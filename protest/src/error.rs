//! Error types for the property runner and generator layer.
//!
//! Kept as a hand-written enum with manual `Display`/`Error` impls, in
//! the same style the rest of this crate uses for its other data types —
//! no `thiserror`, no derive-macro sugar.

use std::fmt;

/// Everything that can go wrong while generating values or running a
/// property.
#[derive(Debug, Clone)]
pub enum PropertyError {
    /// The property's predicate returned or threw a failure for a given
    /// input. Carries the formatted counterexample and the predicate's
    /// message, and triggers the shrink search.
    PropertyFailed {
        message: String,
        counterexample: String,
    },
    /// A generator could not produce a value that satisfied its
    /// constraints (for example, `filter`'s retry budget was exhausted).
    /// Does not trigger shrinking — there is no value to shrink.
    GenerationFailed { reason: String },
    /// A precondition (`filter`, or an explicit skip inside a predicate)
    /// asked to discard this attempt. Not a failure by itself; the runner
    /// counts these and fails the run only if too many attempts are
    /// discarded.
    Precondition,
    /// A configuration value was invalid (for example, `num_runs == 0`).
    ConfigError { reason: String },
    /// An invariant inside the engine itself was violated. Should not
    /// happen in practice; reported rather than panicking so embedding
    /// test harnesses can decide what to do with it.
    InternalError { reason: String },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::PropertyFailed {
                message,
                counterexample,
            } => write!(f, "property failed: {message}\ncounterexample: {counterexample}"),
            PropertyError::GenerationFailed { reason } => {
                write!(f, "generation failed: {reason}")
            }
            PropertyError::Precondition => write!(f, "precondition not satisfied"),
            PropertyError::ConfigError { reason } => write!(f, "invalid configuration: {reason}"),
            PropertyError::InternalError { reason } => write!(f, "internal error: {reason}"),
        }
    }
}

impl std::error::Error for PropertyError {}

/// Shorthand used throughout the crate.
pub type PropertyResult<T> = Result<T, PropertyError>;
