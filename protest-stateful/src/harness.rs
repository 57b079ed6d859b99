//! The stateful runner: generate a sequence of [`Action`]s against a
//! fresh object/model pair, execute it in lock-step, and when something
//! fails, shrink the sequence down to the simplest reproduction.
//!
//! Shrinking runs in three phases, in order, never revisiting an
//! earlier one once it moves on:
//!
//! 1. Length — remove chunks of the sequence (halving chunk size each
//!    pass, from full length down to one action at a time) while the
//!    failure still reproduces.
//! 2. Actions — shrink each surviving action through its own
//!    [`protest::Shrinkable`] tree, left to right, same greedy
//!    descend-while-it-still-fails search the `for_all` family uses.
//! 3. Initial state — shrink the starting object through its own
//!    shrink tree, replaying the (now fixed) action sequence against
//!    each candidate.

use crate::action::Action;
use crate::config::{PostCheck, RunnerConfig};
use crate::error::{StatefulError, StatefulResult};
use protest::config::Verbosity;
use protest::generator::Generator;
use protest::shrinkable::Shrinkable;
use std::fmt::Debug;

fn log(verbosity: Verbosity, message: impl Fn() -> String) {
    if verbosity == Verbosity::Verbose {
        eprintln!("protest-stateful: {}", message());
    }
}

/// Replay `actions` (by value, via their current `Shrinkable` node)
/// against a fresh clone of `obj0`, returning the first failure
/// message: either an action's own error, or `"post_check returned
/// false"` if the sequence completes but the check fails.
fn replay_message<Obj, Model, A>(
    obj0: &Obj,
    model_of: &impl Fn(&Obj) -> Model,
    actions: &[Shrinkable<A>],
    post_check: Option<&PostCheck<Obj, Model>>,
) -> Option<String>
where
    Obj: Clone,
    Model: Clone,
    A: Action<Obj, Model>,
{
    let mut obj = obj0.clone();
    let mut model = model_of(obj0);
    for step in actions {
        if let Err(message) = step.value().apply(&mut obj, &mut model) {
            return Some(message);
        }
    }
    match post_check {
        Some(check) if !check(&obj, &model) => Some("post_check returned false".to_string()),
        _ => None,
    }
}

fn minimize_length<Obj, Model, A>(
    obj0: &Obj,
    model_of: &impl Fn(&Obj) -> Model,
    post_check: Option<&PostCheck<Obj, Model>>,
    mut actions: Vec<Shrinkable<A>>,
) -> Vec<Shrinkable<A>>
where
    Obj: Clone,
    Model: Clone,
    A: Action<Obj, Model>,
{
    let mut chunk = actions.len();
    while chunk > 1 {
        chunk /= 2;
        let mut i = 0;
        while i < actions.len() {
            let end = (i + chunk).min(actions.len());
            let mut candidate = actions.clone();
            candidate.drain(i..end);
            if replay_message(obj0, model_of, &candidate, post_check).is_some() {
                actions = candidate;
            } else {
                i = end;
            }
        }
    }
    actions
}

fn minimize_actions<Obj, Model, A>(
    obj0: &Obj,
    model_of: &impl Fn(&Obj) -> Model,
    post_check: Option<&PostCheck<Obj, Model>>,
    mut actions: Vec<Shrinkable<A>>,
) -> Vec<Shrinkable<A>>
where
    Obj: Clone,
    Model: Clone,
    A: Action<Obj, Model>,
{
    for i in 0..actions.len() {
        let mut stream = actions[i].shrinks();
        loop {
            let mut advanced = None;
            for candidate in stream.iterator() {
                let mut trial = actions.clone();
                trial[i] = candidate.clone();
                if replay_message(obj0, model_of, &trial, post_check).is_some() {
                    advanced = Some(candidate);
                    break;
                }
            }
            match advanced {
                Some(candidate) => {
                    stream = candidate.shrinks();
                    actions[i] = candidate;
                }
                None => break,
            }
        }
    }
    actions
}

fn minimize_init<Obj, Model, A>(
    mut obj0: Shrinkable<Obj>,
    model_of: &impl Fn(&Obj) -> Model,
    post_check: Option<&PostCheck<Obj, Model>>,
    actions: &[Shrinkable<A>],
) -> Shrinkable<Obj>
where
    Obj: Clone + 'static,
    Model: Clone,
    A: Action<Obj, Model>,
{
    let mut stream = obj0.shrinks();
    loop {
        let mut advanced = None;
        for candidate in stream.iterator() {
            if replay_message(candidate.value(), model_of, actions, post_check).is_some() {
                advanced = Some(candidate);
                break;
            }
        }
        match advanced {
            Some(candidate) => {
                stream = candidate.shrinks();
                obj0 = candidate;
            }
            None => break,
        }
    }
    obj0
}

fn build_report<Obj: Debug, A: Debug>(
    obj0: &Obj,
    actions: &[Shrinkable<A>],
    message: &str,
) -> String {
    let values: Vec<&A> = actions.iter().map(|s| s.value()).collect();
    format!(
        "stateful property failed (simplest sequence found by shrinking): initial state = {obj0:?}, actions = {values:?}\n  {message}"
    )
}

fn shrink_and_report<Obj, Model, A>(
    config: &RunnerConfig<Obj, Model>,
    obj0: Shrinkable<Obj>,
    model_of: &impl Fn(&Obj) -> Model,
    actions: Vec<Shrinkable<A>>,
    first_message: &str,
) -> String
where
    Obj: Clone + Debug + 'static,
    Model: Clone,
    A: Action<Obj, Model>,
{
    let post_check = config.post_check();
    log(config.verbosity(), || {
        format!("shrinking a failing sequence of {} action(s)", actions.len())
    });
    let actions = minimize_length(obj0.value(), model_of, post_check, actions);
    let actions = minimize_actions(obj0.value(), model_of, post_check, actions);
    let obj0 = minimize_init(obj0, model_of, post_check, &actions);
    let final_message =
        replay_message(obj0.value(), model_of, &actions, post_check).unwrap_or_else(|| first_message.to_string());
    build_report(obj0.value(), &actions, &final_message)
}

/// Generate, execute, and (on failure) shrink sequences of actions.
///
/// `init` produces the real object under test; `model_of` derives the
/// reference model from it; `action_of` yields the generator of valid
/// next actions given the current object and model. Each run draws a
/// length in `[min_actions, max_actions]`, then alternates drawing an
/// action and applying it until the sequence ends or an action fails.
pub fn run<Obj, Model, A>(
    config: &RunnerConfig<Obj, Model>,
    init: &Generator<Obj>,
    model_of: impl Fn(&Obj) -> Model,
    action_of: impl Fn(&Obj, &Model) -> Generator<A>,
) -> StatefulResult<()>
where
    Obj: Clone + Debug + 'static,
    Model: Clone + 'static,
    A: Action<Obj, Model>,
{
    config.validate()?;
    config.run_startup();
    let mut rnd = config.seed_or_entropy();
    let mut completed = 0usize;

    let result = loop {
        if completed >= config.num_runs() {
            break Ok(());
        }

        let n = rnd.interval(config.min_actions() as i64, config.max_actions() as i64) as usize;

        let obj0_shrinkable = match init.generate(&mut rnd) {
            Ok(s) => s,
            Err(e) => break Err(StatefulError::GenerationFailed { reason: e.to_string() }),
        };
        let obj0 = obj0_shrinkable.value().clone();
        let model0 = model_of(&obj0);

        let mut obj = obj0.clone();
        let mut model = model0;
        let mut actions: Vec<Shrinkable<A>> = Vec::with_capacity(n);
        let mut failure: Option<String> = None;

        for _ in 0..n {
            let action_gen = action_of(&obj, &model);
            let action_shrinkable = match action_gen.generate(&mut rnd) {
                Ok(s) => s,
                Err(e) => {
                    failure = Some(format!("generation failed: {e}"));
                    break;
                }
            };
            let outcome = action_shrinkable.value().apply(&mut obj, &mut model);
            actions.push(action_shrinkable);
            if let Err(message) = outcome {
                failure = Some(message);
                break;
            }
        }

        if failure.is_none() {
            if let Some(check) = config.post_check() {
                if !check(&obj, &model) {
                    failure = Some("post_check returned false".to_string());
                }
            }
        }

        match failure {
            None => {
                completed += 1;
                log(config.verbosity(), || format!("run {completed} passed ({n} actions)"));
            }
            Some(message) => {
                let report = shrink_and_report(config, obj0_shrinkable, &model_of, actions, &message);
                break Err(StatefulError::SequenceFailed { message, report });
            }
        }
    };

    config.run_cleanup();
    result
}
