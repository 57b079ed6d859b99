//! # Protest Stateful
//!
//! Model-based testing on top of [`protest`]: generate sequences of
//! [`Action`]s against a real object and a reference model, run them in
//! lock-step, and shrink any failing sequence down to the shortest
//! prefix and simplest arguments that still reproduce it.
//!
//! ## Quick Start
//!
//! ```rust
//! use protest::gen;
//! use protest::generator::{one_of, Generator};
//! use protest_stateful::{Action, RunnerConfig};
//!
//! #[derive(Clone, Debug)]
//! enum ListAction {
//!     Push(i64),
//!     Clear,
//! }
//!
//! impl Action<Vec<i64>, usize> for ListAction {
//!     fn apply(&self, obj: &mut Vec<i64>, model: &mut usize) -> Result<(), String> {
//!         match self {
//!             ListAction::Push(v) => { obj.push(*v); *model += 1; }
//!             ListAction::Clear => { obj.clear(); *model = 0; }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let init: Generator<Vec<i64>> = gen::just(Vec::new());
//! let config: RunnerConfig<Vec<i64>, usize> = RunnerConfig::new()
//!     .set_num_runs(20)
//!     .set_post_check(|obj: &Vec<i64>, model: &usize| obj.len() == *model);
//!
//! let result = protest_stateful::run(&config, &init, |_obj| 0usize, |_obj: &Vec<i64>, _model: &usize| {
//!     one_of(vec![gen::interval(-5, 5).map(|v: &i64| ListAction::Push(*v)), gen::just(ListAction::Clear)])
//! });
//! assert!(result.is_ok());
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod harness;

pub use action::Action;
pub use config::RunnerConfig;
pub use error::{StatefulError, StatefulResult};
pub use harness::run;

/// Commonly used names, for `use protest_stateful::prelude::*;`.
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::config::RunnerConfig;
    pub use crate::error::{StatefulError, StatefulResult};
    pub use crate::harness::run;
}
