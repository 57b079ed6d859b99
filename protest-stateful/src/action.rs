//! The unit of a stateful run: a single step applied to the object
//! under test and its reference model in lock-step.

use std::fmt::Debug;

/// One step of a generated sequence. `apply` mutates both the real
/// object and the model together and reports failure with a message
/// rather than a panic, mirroring how the property side turns a failed
/// predicate into a [`protest::property::PredicateOutcome::Fail`]
/// rather than unwinding.
pub trait Action<Obj, Model>: Clone + Debug + 'static {
    fn apply(&self, obj: &mut Obj, model: &mut Model) -> Result<(), String>;
}
