//! The property runner: drives generators over many random inputs,
//! classifies each predicate call as pass/fail/precondition-skip, and
//! greedily shrinks failures one argument at a time (left to right,
//! never revisiting an earlier argument once it stops shrinking).
//!
//! Typed per-arity entry points (`for_all1`, `for_all2`, ...) are used
//! instead of a single reflective N-ary dispatch, so callers get real
//! type checking on predicate arguments instead of a runtime type error.

use crate::config::{PropertyConfig, Verbosity};
use crate::error::{PropertyError, PropertyResult};
use crate::format::{format_failure, ToValue, Value};
use crate::generator::Generator;
use crate::random::Random;
use crate::shrinkable::Shrinkable;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// What a single predicate invocation decided.
#[derive(Debug, Clone)]
pub enum PredicateOutcome {
    Pass,
    Fail(String),
    Precondition,
}

/// Converts a predicate's return value into a [`PredicateOutcome`].
/// Implemented for plain `bool` (the common case) and for
/// `PredicateOutcome` itself (for predicates that need to signal
/// preconditions explicitly without panicking).
pub trait IntoOutcome {
    fn into_outcome(self) -> PredicateOutcome;
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> PredicateOutcome {
        if self {
            PredicateOutcome::Pass
        } else {
            PredicateOutcome::Fail("predicate returned false".to_string())
        }
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> PredicateOutcome {
        PredicateOutcome::Pass
    }
}

impl IntoOutcome for PredicateOutcome {
    fn into_outcome(self) -> PredicateOutcome {
        self
    }
}

/// Marker payload used to signal a precondition skip by panicking.
/// Predicates that can't return [`PredicateOutcome`] directly (for
/// example, a plain `bool` closure) call [`precondition`] instead.
struct PreconditionSignal;

/// Discard the current attempt without counting it as a failure, from
/// inside any predicate (including ones returning plain `bool`).
pub fn precondition(holds: bool) {
    if !holds {
        std::panic::panic_any(PreconditionSignal);
    }
}

fn invoke<R: IntoOutcome>(f: impl FnOnce() -> R + std::panic::UnwindSafe) -> PredicateOutcome {
    match catch_unwind(f) {
        Ok(result) => result.into_outcome(),
        Err(payload) => {
            if payload.downcast_ref::<PreconditionSignal>().is_some() {
                PredicateOutcome::Precondition
            } else if let Some(s) = payload.downcast_ref::<&str>() {
                PredicateOutcome::Fail(s.to_string())
            } else if let Some(s) = payload.downcast_ref::<String>() {
                PredicateOutcome::Fail(s.clone())
            } else {
                PredicateOutcome::Fail("predicate panicked".to_string())
            }
        }
    }
}

fn log(config: &PropertyConfig, message: impl Fn() -> String) {
    if config.verbosity() == Verbosity::Verbose {
        eprintln!("protest: {}", message());
    }
}

/// A single recorded step of the shrink search: the args at that point,
/// and which argument index (if any) was just improved to reach them.
type ShrinkStep = (Vec<Value>, Option<usize>);

/// Shared result of a failed run after the shrink search has finished.
#[derive(Debug)]
pub struct PropertyFailure {
    pub error: PropertyError,
    pub report: String,
}

fn build_failure(original_error: String, trace: Vec<ShrinkStep>) -> PropertyFailure {
    let report = format_failure(&original_error, &trace);
    let counterexample = trace
        .last()
        .map(|(args, _)| Value::List(args.clone()).to_string())
        .unwrap_or_default();
    PropertyFailure {
        error: PropertyError::PropertyFailed {
            message: original_error,
            counterexample,
        },
        report,
    }
}

/// Greedy, left-to-right, per-argument shrink search (§4.5): once
/// argument `i` stops improving, move to `i + 1` and never come back.
fn shrink_search<T: Clone + 'static>(
    config: &PropertyConfig,
    shrinkables: Vec<Shrinkable<T>>,
    to_value: impl Fn(&[T]) -> Vec<Value>,
    mut run: impl FnMut(&[T]) -> PredicateOutcome,
) -> Vec<ShrinkStep> {
    let mut args: Vec<T> = shrinkables.iter().map(|s| s.value().clone()).collect();
    let mut trace = vec![(to_value(&args), None)];

    for i in 0..shrinkables.len() {
        let mut stream = shrinkables[i].shrinks();
        loop {
            let mut advanced = None;
            for candidate in stream.iterator() {
                let mut trial = args.clone();
                trial[i] = candidate.value().clone();
                match run(&trial) {
                    PredicateOutcome::Fail(_) => {
                        advanced = Some(candidate);
                        break;
                    }
                    PredicateOutcome::Pass | PredicateOutcome::Precondition => continue,
                }
            }
            match advanced {
                Some(candidate) => {
                    args[i] = candidate.value().clone();
                    stream = candidate.shrinks();
                    trace.push((to_value(&args), Some(i)));
                    log(config, || format!("shrink step at arg {i}: {:?}", to_value(&args)));
                }
                None => break,
            }
        }
    }

    trace
}

fn check_preconditions(config: &PropertyConfig, skips: usize, completed: usize) -> PropertyResult<()> {
    let num_runs = config.num_runs();
    // Dominance is judged against attempts actually made (skips + completed),
    // not num_runs, and only once there is at least one completed run to
    // compare against. A predicate that never completes at all (every
    // attempt skipped) would never trip that ratio, so it also dominates
    // outright once skips alone reach num_runs.
    let dominates = (completed > 0 && skips * 2 >= skips + completed) || (completed == 0 && skips >= num_runs);
    if dominates {
        return Err(PropertyError::PropertyFailed {
            message: format!(
                "too many preconditions: {skips} of {num_runs} attempts were skipped (completed {completed})"
            ),
            counterexample: String::new(),
        });
    }
    Ok(())
}

macro_rules! impl_for_all {
    ($name:ident, ($($T:ident),+), ($($idx:tt),+), ($($gen:ident),+)) => {
        /// Draw `num_runs` random inputs from the given generators and
        /// check `predicate` against each, shrinking on the first
        /// failure.
        pub fn $name<$($T: Clone + ToValue + 'static),+, R: IntoOutcome>(
            config: &PropertyConfig,
            $($gen: &Generator<$T>),+,
            predicate: impl Fn($($T),+) -> R + std::panic::RefUnwindSafe,
        ) -> PropertyResult<()> {
            config.validate().map_err(|e| PropertyError::ConfigError {
                reason: e.to_string(),
            })?;
            config.run_startup();
            let mut rnd = config.seed_or_entropy();
            let mut skips = 0usize;
            let mut completed = 0usize;

            let result = loop {
                if completed >= config.num_runs() {
                    break Ok(());
                }
                let gen_result: PropertyResult<($(Shrinkable<$T>),+,)> =
                    (|| Ok(($($gen.generate(&mut rnd)?),+,)))();
                let shrinkables = match gen_result {
                    Ok(s) => s,
                    Err(e) => break Err(PropertyFailure {
                        report: e.to_string(),
                        error: e,
                    }),
                };
                let values = ($(shrinkables.$idx.value().clone()),+,);

                let outcome = invoke(AssertUnwindSafe(|| predicate($(values.$idx.clone()),+)));
                match outcome {
                    PredicateOutcome::Pass => {
                        completed += 1;
                        log(config, || format!("run {completed} passed"));
                    }
                    PredicateOutcome::Precondition => {
                        skips += 1;
                        log(config, || format!("run skipped (precondition), {skips} total"));
                        if let Err(e) = check_preconditions(config, skips, completed) {
                            break Err(PropertyFailure {
                                report: e.to_string(),
                                error: e,
                            });
                        }
                    }
                    PredicateOutcome::Fail(message) => {
                        let positional: Vec<Shrinkable<Positional>> = vec![
                            $(Positional::wrap::<$T>(shrinkables.$idx.clone())),+
                        ];
                        let trace = shrink_search(
                            config,
                            positional,
                            |vals: &[Positional]| {
                                vals.iter().map(|v| v.to_value()).collect()
                            },
                            |vals: &[Positional]| {
                                invoke(AssertUnwindSafe(|| {
                                    let mut it = vals.iter();
                                    $(let $gen = it.next().unwrap().downcast::<$T>();)+
                                    predicate($($gen),+)
                                }))
                            },
                        );
                        break Err(build_failure(message, trace));
                    }
                }
            };
            config.run_cleanup();
            result.map_err(|f: PropertyFailure| {
                eprintln!("{}", f.report);
                f.error
            })
        }
    };
}

impl_for_all!(for_all1, (A), (0), (ga));
impl_for_all!(for_all2, (A, B), (0, 1), (ga, gb));
impl_for_all!(for_all3, (A, B, C), (0, 1, 2), (ga, gb, gc));
impl_for_all!(for_all4, (A, B, C, D), (0, 1, 2, 3), (ga, gb, gc, gd));

/// Run `predicate` once against fixed example values, with no
/// generation or shrinking.
pub fn example<R: IntoOutcome>(predicate: impl FnOnce() -> R + std::panic::UnwindSafe) -> PropertyResult<()> {
    match invoke(predicate) {
        PredicateOutcome::Pass => Ok(()),
        PredicateOutcome::Precondition => Err(PropertyError::Precondition),
        PredicateOutcome::Fail(message) => Err(PropertyError::PropertyFailed {
            message,
            counterexample: String::new(),
        }),
    }
}

/// Exhaustive Cartesian-product enumeration over two fixed lists; no
/// randomness, no shrinking.
pub fn matrix2<A: Clone + ToValue, B: Clone + ToValue>(
    a: &[A],
    b: &[B],
    predicate: impl Fn(A, B) -> bool + std::panic::RefUnwindSafe,
) -> PropertyResult<()>
where
    A: std::panic::RefUnwindSafe,
    B: std::panic::RefUnwindSafe,
{
    if a.is_empty() || b.is_empty() {
        return Err(PropertyError::ConfigError {
            reason: "matrix: input lists must be non-empty".to_string(),
        });
    }
    let mut skips = 0usize;
    let total = a.len() * b.len();
    for x in a {
        for y in b {
            match invoke(AssertUnwindSafe(|| predicate(x.clone(), y.clone()))) {
                PredicateOutcome::Pass => {}
                PredicateOutcome::Precondition => skips += 1,
                PredicateOutcome::Fail(message) => {
                    let counterexample = Value::List(vec![x.to_value(), y.to_value()]).to_string();
                    return Err(PropertyError::PropertyFailed {
                        message,
                        counterexample,
                    });
                }
            }
        }
    }
    if skips == total {
        return Err(PropertyError::PropertyFailed {
            message: "matrix: every combination was a precondition skip".to_string(),
            counterexample: String::new(),
        });
    }
    Ok(())
}

pub fn matrix3<A: Clone + ToValue, B: Clone + ToValue, C: Clone + ToValue>(
    a: &[A],
    b: &[B],
    c: &[C],
    predicate: impl Fn(A, B, C) -> bool + std::panic::RefUnwindSafe,
) -> PropertyResult<()>
where
    A: std::panic::RefUnwindSafe,
    B: std::panic::RefUnwindSafe,
    C: std::panic::RefUnwindSafe,
{
    if a.is_empty() || b.is_empty() || c.is_empty() {
        return Err(PropertyError::ConfigError {
            reason: "matrix: input lists must be non-empty".to_string(),
        });
    }
    let mut skips = 0usize;
    let total = a.len() * b.len() * c.len();
    for x in a {
        for y in b {
            for z in c {
                match invoke(AssertUnwindSafe(|| predicate(x.clone(), y.clone(), z.clone()))) {
                    PredicateOutcome::Pass => {}
                    PredicateOutcome::Precondition => skips += 1,
                    PredicateOutcome::Fail(message) => {
                        let counterexample =
                            Value::List(vec![x.to_value(), y.to_value(), z.to_value()]).to_string();
                        return Err(PropertyError::PropertyFailed {
                            message,
                            counterexample,
                        });
                    }
                }
            }
        }
    }
    if skips == total {
        return Err(PropertyError::PropertyFailed {
            message: "matrix: every combination was a precondition skip".to_string(),
            counterexample: String::new(),
        });
    }
    Ok(())
}

/// Sequential async variant of [`for_all1`]: the predicate returns a
/// future, awaited before moving to the next iteration. No intra-run
/// concurrency — this mirrors the synchronous loop one suspension point
/// at a time.
pub async fn for_all1_async<A, Fut, R>(
    config: &PropertyConfig,
    ga: &Generator<A>,
    predicate: impl Fn(A) -> Fut,
) -> PropertyResult<()>
where
    A: Clone + ToValue + 'static,
    Fut: std::future::Future<Output = R>,
    R: IntoOutcome,
{
    config.validate().map_err(|e| PropertyError::ConfigError {
        reason: e.to_string(),
    })?;
    config.run_startup();
    let mut rnd = config.seed_or_entropy();
    let mut skips = 0usize;
    let mut completed = 0usize;

    let result: Result<(), PropertyFailure> = loop {
        if completed >= config.num_runs() {
            break Ok(());
        }
        let shrinkable = match ga.generate(&mut rnd) {
            Ok(s) => s,
            Err(e) => {
                break Err(PropertyFailure {
                    report: e.to_string(),
                    error: e,
                })
            }
        };
        let value = shrinkable.value().clone();
        let outcome = predicate(value).await.into_outcome();
        match outcome {
            PredicateOutcome::Pass => completed += 1,
            PredicateOutcome::Precondition => {
                skips += 1;
                if let Err(e) = check_preconditions(config, skips, completed) {
                    break Err(PropertyFailure {
                        report: e.to_string(),
                        error: e,
                    });
                }
            }
            PredicateOutcome::Fail(message) => {
                let mut args = vec![shrinkable.value().clone()];
                let mut trace = vec![(vec![args[0].to_value()], None)];
                let mut stream = shrinkable.shrinks();
                loop {
                    let mut advanced = None;
                    for candidate in stream.iterator() {
                        let outcome = predicate(candidate.value().clone()).await.into_outcome();
                        if matches!(outcome, PredicateOutcome::Fail(_)) {
                            advanced = Some(candidate);
                            break;
                        }
                    }
                    match advanced {
                        Some(candidate) => {
                            args[0] = candidate.value().clone();
                            trace.push((vec![args[0].to_value()], Some(0)));
                            stream = candidate.shrinks();
                        }
                        None => break,
                    }
                }
                break Err(build_failure(message, trace));
            }
        }
    };
    config.run_cleanup();
    result.map_err(|f| {
        eprintln!("{}", f.report);
        f.error
    })
}

/// Type-erased wrapper used internally so the greedy shrink search in
/// [`shrink_search`] can operate over a `Vec` of heterogeneous argument
/// types through one homogeneous interface.
#[derive(Clone)]
enum Positional {
    Boxed(std::rc::Rc<dyn std::any::Any>, fn(&dyn std::any::Any) -> Value),
}

impl Positional {
    fn wrap<T: Clone + ToValue + 'static>(s: Shrinkable<T>) -> Shrinkable<Positional> {
        s.map(|v: &T| {
            let boxed: std::rc::Rc<dyn std::any::Any> = std::rc::Rc::new(v.clone());
            Positional::Boxed(boxed, |any| {
                any.downcast_ref::<T>()
                    .expect("Positional type mismatch")
                    .to_value()
            })
        })
    }

    fn to_value(&self) -> Value {
        match self {
            Positional::Boxed(any, f) => f(any.as_ref()),
        }
    }

    fn downcast<T: Clone + 'static>(&self) -> T {
        match self {
            Positional::Boxed(any, _) => any
                .downcast_ref::<T>()
                .expect("Positional type mismatch")
                .clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::random::Random;

    fn interval_gen(low: i64, high: i64) -> Generator<i64> {
        Generator::new(move |rnd: &mut Random| Ok(crate::shrink::shrink_signed(rnd.interval(low, high))))
    }

    #[test]
    fn commutativity_example_passes() {
        let config = PropertyConfig::new().set_seed("s1").set_num_runs(200);
        let a = interval_gen(0, 100);
        let b = interval_gen(0, 100);
        let result = for_all2(&config, &a, &b, |x: i64, y: i64| x + y == y + x);
        assert!(result.is_ok());
    }

    #[test]
    fn failing_property_shrinks_array_to_minimal_counterexample() {
        let config = PropertyConfig::new().set_seed("fail").set_num_runs(100);
        let elem = interval_gen(0, 10);
        let arrays = crate::generator::array(elem, 0, 10);
        let result = for_all1(&config, &arrays, |xs: Vec<i64>| xs.len() < 3);
        assert!(result.is_err());
    }

    #[test]
    fn example_runs_a_single_fixed_check() {
        assert!(example(|| 2 + 2 == 4).is_ok());
        assert!(example(|| 2 + 2 == 5).is_err());
    }

    #[test]
    fn matrix2_invokes_predicate_for_every_combination() {
        use std::cell::RefCell;
        let calls = RefCell::new(0);
        let result = matrix2(&[1, 2, 3], &[2, 3], |_a: i64, _b: i64| {
            *calls.borrow_mut() += 1;
            true
        });
        assert!(result.is_ok());
        assert_eq!(*calls.borrow(), 6);
    }

    #[test]
    fn matrix2_reports_the_failing_combination() {
        let result = matrix2(&[1, 2, 3], &[2, 3], |a: i64, b: i64| !(a == 2 && b == 3));
        let err = result.unwrap_err();
        match err {
            PropertyError::PropertyFailed { counterexample, .. } => {
                assert_eq!(counterexample, "[2, 3]");
            }
            other => panic!("expected PropertyFailed, got {other:?}"),
        }
    }

    #[test]
    fn matrix_rejects_empty_lists() {
        let result = matrix2(&Vec::<i64>::new(), &[1], |_a: i64, _b: i64| true);
        assert!(matches!(result, Err(PropertyError::ConfigError { .. })));
    }

    #[test]
    fn precondition_skip_does_not_count_as_failure() {
        let config = PropertyConfig::new().set_seed(1u64).set_num_runs(20);
        let gen = interval_gen(0, 1);
        let result = for_all1(&config, &gen, |x: i64| {
            precondition(x == 0);
            true
        });
        assert!(result.is_ok());
    }

    #[test]
    fn too_many_preconditions_is_reported_as_failure() {
        let config = PropertyConfig::new().set_seed(1u64).set_num_runs(20);
        let gen = interval_gen(0, 1);
        let result = for_all1(&config, &gen, |_x: i64| {
            precondition(false);
            true
        });
        assert!(result.is_err());
    }

    #[test]
    fn determinism_same_seed_same_outcome() {
        let run = || {
            let config = PropertyConfig::new().set_seed("det").set_num_runs(50);
            let gen = interval_gen(0, 50);
            for_all1(&config, &gen, |x: i64| x < 40).map_err(|e| e.to_string())
        };
        assert_eq!(run(), run());
    }
}
