//! Error type for stateful runs, mirroring the shape of
//! [`protest::error::PropertyError`] — a hand-written enum with manual
//! `Display`/`Error` impls, no derive-macro sugar.

use std::fmt;

#[derive(Debug, Clone)]
pub enum StatefulError {
    /// A generated sequence failed: either an action threw, or
    /// `post_check` returned `false` after a complete sequence. Carries
    /// a human-readable report built by the shrink search.
    SequenceFailed { message: String, report: String },
    /// `G_init` or `G_action` could not produce a value.
    GenerationFailed { reason: String },
    /// A configuration value was invalid.
    ConfigError { reason: String },
}

impl fmt::Display for StatefulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatefulError::SequenceFailed { message, report } => {
                write!(f, "{report}\n  {message}")
            }
            StatefulError::GenerationFailed { reason } => write!(f, "generation failed: {reason}"),
            StatefulError::ConfigError { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for StatefulError {}

pub type StatefulResult<T> = Result<T, StatefulError>;
