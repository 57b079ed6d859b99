//! Configuration for stateful runs — the action-sequence counterpart of
//! [`protest::config::PropertyConfig`], split into its own type because
//! `post_check` needs to be generic over the harness's object/model
//! types, which a zero-argument lifecycle hook does not.

use crate::error::{StatefulError, StatefulResult};
use protest::config::{Hook, Verbosity};
use protest::random::{Random, Seed};
use std::rc::Rc;

/// A check run once after a sequence completes without an action
/// throwing. Returning `false` fails the run just as a thrown action
/// would, and triggers the same shrink search.
pub type PostCheck<Obj, Model> = Rc<dyn Fn(&Obj, &Model) -> bool>;

/// Configuration for [`crate::harness::run`]. Built with consuming
/// setters, then checked once with [`RunnerConfig::validate`] before a
/// run starts.
#[derive(Clone)]
pub struct RunnerConfig<Obj, Model> {
    pub(crate) seed: Option<Seed>,
    pub(crate) num_runs: usize,
    pub(crate) min_actions: usize,
    pub(crate) max_actions: usize,
    pub(crate) on_startup: Option<Hook>,
    pub(crate) on_cleanup: Option<Hook>,
    pub(crate) post_check: Option<PostCheck<Obj, Model>>,
    pub(crate) verbosity: Verbosity,
}

impl<Obj, Model> Default for RunnerConfig<Obj, Model> {
    fn default() -> Self {
        Self {
            seed: None,
            num_runs: 100,
            min_actions: 1,
            max_actions: 100,
            on_startup: None,
            on_cleanup: None,
            post_check: None,
            verbosity: Verbosity::default(),
        }
    }
}

impl<Obj, Model> RunnerConfig<Obj, Model> {
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

    pub fn set_min_actions(mut self, min_actions: usize) -> Self {
        self.min_actions = min_actions;
        self
    }

    pub fn set_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions;
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

    pub fn set_post_check(mut self, check: impl Fn(&Obj, &Model) -> bool + 'static) -> Self {
        self.post_check = Some(Rc::new(check));
        self
    }

    pub fn set_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn num_runs(&self) -> usize {
        self.num_runs
    }

    pub fn min_actions(&self) -> usize {
        self.min_actions
    }

    pub fn max_actions(&self) -> usize {
        self.max_actions
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn post_check(&self) -> Option<&PostCheck<Obj, Model>> {
        self.post_check.as_ref()
    }

    pub fn seed_or_entropy(&self) -> Random {
        match &self.seed {
            Some(seed) => Random::new(seed.clone()),
            None => Random::from_entropy(),
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

    pub fn validate(&self) -> StatefulResult<()> {
        if self.num_runs == 0 {
            return Err(StatefulError::ConfigError {
                reason: "num_runs must be > 0".to_string(),
            });
        }
        if self.min_actions > self.max_actions {
            return Err(StatefulError::ConfigError {
                reason: format!(
                    "min_actions={} > max_actions={}",
                    self.min_actions, self.max_actions
                ),
            });
        }
        Ok(())
    }
}
