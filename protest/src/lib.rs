//! # Protest - Property-Based Testing for Rust
//!
//! Protest generates random inputs from composable [`Generator`]s, runs a
//! predicate against each one, and shrinks any failure down to the
//! simplest input that still reproduces it.
//!
//! ## Quick Start
//!
//! ```rust
//! use protest::config::PropertyConfig;
//! use protest::generator::Generator;
//! use protest::property::for_all2;
//! use protest::shrink::shrink_signed;
//!
//! let interval = |low: i64, high: i64| {
//!     Generator::new(move |rnd: &mut protest::random::Random| {
//!         Ok(shrink_signed(rnd.interval(low, high)))
//!     })
//! };
//!
//! let config = PropertyConfig::new().set_num_runs(100);
//! let a = interval(0, 1000);
//! let b = interval(0, 1000);
//! let result = for_all2(&config, &a, &b, |x: i64, y: i64| x + y == y + x);
//! assert!(result.is_ok());
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod gen;
pub mod generator;
pub mod lazy;
pub mod property;
pub mod random;
pub mod shrink;
pub mod shrinkable;
pub mod weighted;

pub use config::{ConfigError, PropertyConfig, Verbosity};
pub use error::{PropertyError, PropertyResult};
pub use format::{format_args, format_failure, ToValue, Value};
pub use generator::{
    accumulate, aggregate, array, chain, chain_tuple2, chain_tuple3, construct2, construct3,
    dictionary, one_of, one_of_weighted, set, tuple2, tuple3, tuple4, unique_array, Generator,
};
pub use lazy::LazyStream;
pub use property::{
    example, for_all1, for_all1_async, for_all2, for_all3, for_all4, matrix2, matrix3,
    precondition, IntoOutcome, PredicateOutcome, PropertyFailure,
};
pub use random::{Random, Seed};
pub use shrinkable::Shrinkable;
pub use weighted::{normalize_weights, pick_index, WeightedValue};

/// Commonly used names, for `use protest::prelude::*;`.
pub mod prelude {
    pub use crate::config::PropertyConfig;
    pub use crate::error::{PropertyError, PropertyResult};
    pub use crate::gen;
    pub use crate::generator::{
        accumulate, array, chain, construct2, construct3, dictionary, one_of, one_of_weighted,
        set, tuple2, tuple3, tuple4, unique_array, Generator,
    };
    pub use crate::property::{example, for_all1, for_all2, for_all3, for_all4, precondition};
    pub use crate::random::Random;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    fn interval_gen(low: i64, high: i64) -> Generator<i64> {
        Generator::new(move |rnd: &mut Random| Ok(crate::shrink::shrink_signed(rnd.interval(low, high))))
    }

    #[test]
    fn public_api_runs_a_simple_property() {
        let config = PropertyConfig::new().set_seed(1u64).set_num_runs(50);
        let gen = interval_gen(0, 1000);
        let result = for_all1(&config, &gen, |x: i64| x >= 0);
        assert!(result.is_ok());
    }

    #[test]
    fn public_api_array_generator_round_trips_through_map() {
        let elem = interval_gen(-5, 5);
        let arrays = array(elem, 0, 8).map(|xs: &Vec<i64>| xs.iter().sum::<i64>());
        let config = PropertyConfig::new().set_seed(2u64).set_num_runs(50);
        let result = for_all1(&config, &arrays, |_sum: i64| true);
        assert!(result.is_ok());
    }
}
