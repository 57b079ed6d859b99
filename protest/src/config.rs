//! Configuration for the property runner: a builder with consuming
//! setters, and a `validate` pass returning [`ConfigError`] — the same
//! shape the rest of this crate uses for its own validation (see
//! [`crate::error::PropertyError`]), kept as its own error type because
//! configuration mistakes are caught eagerly, before any generation
//! happens.

use crate::random::Seed;
use std::rc::Rc;

/// How much the runner prints to stderr while it works. There is no
/// logging subsystem here — just an ambient verbosity flag threaded
/// through configuration, the way the rest of this crate avoids pulling
/// in machinery the spec doesn't ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// Configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumRuns(usize),
    InvalidActionBounds { min: usize, max: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidNumRuns(n) => write!(f, "invalid num_runs: {n} (must be > 0)"),
            ConfigError::InvalidActionBounds { min, max } => write!(
                f,
                "invalid action bounds: min_actions={min} > max_actions={max}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Lifecycle hook with no arguments, run before/after each attempt.
pub type Hook = Rc<dyn Fn()>;

/// Configuration for [`crate::property`]'s `for_all`/`example`/`matrix`
/// family. Built with consuming setters (`set_*`), mirroring the
/// teacher's own configuration builders, then checked once with
/// [`PropertyConfig::validate`] before a run starts.
#[derive(Clone)]
pub struct PropertyConfig {
    pub(crate) seed: Option<Seed>,
    pub(crate) num_runs: usize,
    pub(crate) on_startup: Option<Hook>,
    pub(crate) on_cleanup: Option<Hook>,
    pub(crate) verbosity: Verbosity,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            seed: None,
            num_runs: 200,
            on_startup: None,
            on_cleanup: None,
            verbosity: Verbosity::default(),
        }
    }
}

impl PropertyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn set_num_runs(mut self, num_runs: usize) -> Self {
        self.num_runs = num_runs;
        self
    }

    pub fn set_on_startup(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_startup = Some(Rc::new(hook));
        self
    }

    pub fn set_on_cleanup(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_cleanup = Some(Rc::new(hook));
        self
    }

    pub fn set_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn num_runs(&self) -> usize {
        self.num_runs
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn seed_or_entropy(&self) -> crate::random::Random {
        match &self.seed {
            Some(seed) => crate::random::Random::new(seed.clone()),
            None => crate::random::Random::from_entropy(),
        }
    }

    pub fn run_startup(&self) {
        if let Some(hook) = &self.on_startup {
            hook();
        }
    }

    pub fn run_cleanup(&self) {
        if let Some(hook) = &self.on_cleanup {
            hook();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_runs == 0 {
            return Err(ConfigError::InvalidNumRuns(self.num_runs));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn defaults_match_spec_for_all() {
        let cfg = PropertyConfig::new();
        assert_eq!(cfg.num_runs(), 200);
        assert_eq!(cfg.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn builder_setters_are_consuming_and_chainable() {
        let cfg = PropertyConfig::new()
            .set_num_runs(50)
            .set_seed(7u64)
            .set_verbosity(Verbosity::Verbose);
        assert_eq!(cfg.num_runs(), 50);
        assert_eq!(cfg.verbosity(), Verbosity::Verbose);
    }

    #[test]
    fn rejects_zero_num_runs() {
        let cfg = PropertyConfig::new().set_num_runs(0);
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidNumRuns(0)));
    }

    #[test]
    fn startup_and_cleanup_hooks_run_when_invoked() {
        let started = Rc::new(Cell::new(false));
        let cleaned = Rc::new(Cell::new(false));
        let s = Rc::clone(&started);
        let c = Rc::clone(&cleaned);
        let cfg = PropertyConfig::new()
            .set_on_startup(move || s.set(true))
            .set_on_cleanup(move || c.set(true));
        cfg.run_startup();
        assert!(started.get());
        assert!(!cleaned.get());
        cfg.run_cleanup();
        assert!(cleaned.get());
    }

    #[test]
    fn same_seed_yields_a_reproducible_random_source() {
        let cfg = PropertyConfig::new().set_seed(42u64);
        let mut a = cfg.seed_or_entropy();
        let mut b = cfg.seed_or_entropy();
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
