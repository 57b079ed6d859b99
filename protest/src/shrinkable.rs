//! The shrink tree: a value paired with a lazy stream of simpler
//! alternatives ("children"), each of which is itself a full [`Shrinkable`].
//!
//! This is the one data type every shrinker (`shrink::*`) and every
//! generator combinator (`generator::*`) ultimately produces and combines.
//! It is deliberately separate from generation: a `Shrinkable<T>` carries no
//! notion of randomness or of how it was produced, only a value and a way
//! to walk toward simpler ones.

use crate::lazy::LazyStream;
use std::rc::Rc;

/// Error returned by [`Shrinkable::retrieve`] when a path element has no
/// corresponding child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalError {
    pub path: Vec<usize>,
    pub failed_at_depth: usize,
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no child at index {} (depth {} of path {:?})",
            self.path[self.failed_at_depth], self.failed_at_depth, self.path
        )
    }
}

impl std::error::Error for RetrievalError {}

/// A value plus a lazily-computed stream of simpler alternatives.
///
/// Cloning is a cheap `Rc` bump (besides cloning the value itself).
pub struct Shrinkable<T> {
    value: T,
    shrinks: Rc<dyn Fn() -> LazyStream<Shrinkable<T>>>,
}

impl<T: Clone + 'static> Clone for Shrinkable<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            shrinks: Rc::clone(&self.shrinks),
        }
    }
}

impl<T: Clone + 'static> Shrinkable<T> {
    /// Build a node from a value and a thunk producing its children.
    pub fn new(value: T, shrinks: impl Fn() -> LazyStream<Shrinkable<T>> + 'static) -> Self {
        Self {
            value,
            shrinks: Rc::new(shrinks),
        }
    }

    /// A terminal node with no further shrinks.
    pub fn unshrinkable(value: T) -> Self {
        Self::new(value, || LazyStream::empty())
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// The direct children of this node, freshly computed.
    pub fn shrinks(&self) -> LazyStream<Shrinkable<T>> {
        (self.shrinks)()
    }

    /// Lift `f` over the value and recursively over every descendant.
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + Clone + 'static) -> Shrinkable<U> {
        let value = f(&self.value);
        let this = self.clone();
        Shrinkable::new(value, move || {
            let f = f.clone();
            this.shrinks().transform(move |child| child.map(f.clone()))
        })
    }

    /// Replace this node with `f(value)`, grafting this node's original
    /// shrink tree (itself recursively `flat_map`ped through `f`) ahead of
    /// the replacement's own shrinks.
    pub fn flat_map<U: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> Shrinkable<U> + Clone + 'static,
    ) -> Shrinkable<U> {
        let replacement = f(&self.value);
        let value = replacement.value().clone();
        let this = self.clone();
        Shrinkable::new(value, move || {
            let f = f.clone();
            let from_original = this
                .shrinks()
                .transform(move |child| child.flat_map(f.clone()));
            from_original.concat(replacement.shrinks())
        })
    }

    /// Keep only children (recursively) whose value satisfies `pred`.
    /// Panics if the node's own value does not satisfy `pred` — callers
    /// are expected to check the root value before filtering.
    pub fn filter(&self, pred: impl Fn(&T) -> bool + Clone + 'static) -> Shrinkable<T> {
        assert!(
            pred(&self.value),
            "Shrinkable::filter: root value does not satisfy predicate"
        );
        let this = self.clone();
        Shrinkable::new(self.value.clone(), move || {
            let pred = pred.clone();
            let pred2 = pred.clone();
            this.shrinks()
                .filter(move |child| pred(child.value()))
                .transform(move |child| child.filter(pred2.clone()))
        })
    }

    /// Replace the shrink stream outright.
    pub fn with_shrinks(&self, stream: LazyStream<Shrinkable<T>>) -> Shrinkable<T> {
        Shrinkable::new(self.value.clone(), move || stream.clone())
    }

    /// Append `stream` after every node's own (recursively processed)
    /// shrink stream ends — extra fallback candidates tried once the
    /// primary ones at that level are exhausted, at every level of the
    /// tree.
    pub fn concat_static(&self, stream: LazyStream<Shrinkable<T>>) -> Shrinkable<T> {
        let this = self.clone();
        Shrinkable::new(self.value.clone(), move || {
            let extra = stream.clone();
            this.shrinks()
                .transform({
                    let extra = extra.clone();
                    move |child| child.concat_static(extra.clone())
                })
                .concat(extra)
        })
    }

    /// Like [`Shrinkable::concat_static`], but the extra stream is computed
    /// from the node being extended rather than fixed up front.
    pub fn concat(
        &self,
        f: impl Fn(&Shrinkable<T>) -> LazyStream<Shrinkable<T>> + Clone + 'static,
    ) -> Shrinkable<T> {
        let this = self.clone();
        Shrinkable::new(self.value.clone(), move || {
            let extra = f(&this);
            this.shrinks()
                .transform({
                    let f = f.clone();
                    move |child| child.concat(f.clone())
                })
                .concat(extra)
        })
    }

    /// Append `stream` only at true leaves (nodes whose own shrink stream
    /// is empty), rather than at every level.
    pub fn and_then_static(&self, stream: LazyStream<Shrinkable<T>>) -> Shrinkable<T> {
        let this = self.clone();
        Shrinkable::new(self.value.clone(), move || {
            let children = this.shrinks();
            if children.is_empty() {
                stream.clone()
            } else {
                let extra = stream.clone();
                children.transform(move |child| child.and_then_static(extra.clone()))
            }
        })
    }

    /// Like [`Shrinkable::and_then_static`], but the extension stream is
    /// computed from the leaf node rather than fixed up front.
    pub fn and_then(
        &self,
        f: impl Fn(&Shrinkable<T>) -> LazyStream<Shrinkable<T>> + Clone + 'static,
    ) -> Shrinkable<T> {
        let this = self.clone();
        Shrinkable::new(self.value.clone(), move || {
            let children = this.shrinks();
            if children.is_empty() {
                f(&this)
            } else {
                children.transform({
                    let f = f.clone();
                    move |child| child.and_then(f.clone())
                })
            }
        })
    }

    /// Truncate the direct shrink stream to at most `n` children.
    pub fn take(&self, n: usize) -> Shrinkable<T> {
        let this = self.clone();
        Shrinkable::new(self.value.clone(), move || this.shrinks().take(n))
    }

    /// Navigate to a descendant by a path of child indices, taken against
    /// the *current* shrink stream at each level (re-evaluated each step,
    /// since filtering/mapping may have been applied along the way).
    pub fn retrieve(&self, path: &[usize]) -> Result<Shrinkable<T>, RetrievalError> {
        let mut current = self.clone();
        for (depth, &idx) in path.iter().enumerate() {
            let mut iter = current.shrinks().iterator();
            match iter.nth(idx) {
                Some(next) => current = next,
                None => {
                    return Err(RetrievalError {
                        path: path.to_vec(),
                        failed_at_depth: depth,
                    })
                }
            }
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: i64) -> Shrinkable<i64> {
        if n == 0 {
            return Shrinkable::unshrinkable(0);
        }
        Shrinkable::new(n, move || LazyStream::once(chain(n - 1)))
    }

    #[test]
    fn unshrinkable_has_no_children() {
        let s = Shrinkable::unshrinkable(5);
        assert_eq!(*s.value(), 5);
        assert!(s.shrinks().is_empty());
    }

    #[test]
    fn map_transforms_value_and_children() {
        let s = chain(3).map(|v: &i64| v * 10);
        assert_eq!(*s.value(), 30);
        let child = s.shrinks().head().unwrap();
        assert_eq!(*child.value(), 20);
    }

    #[test]
    fn filter_panics_on_bad_root() {
        let result = std::panic::catch_unwind(|| chain(3).filter(|v| *v > 100));
        assert!(result.is_err());
    }

    #[test]
    fn filter_keeps_only_matching_descendants() {
        let s = chain(5).filter(|v| v % 2 == 0);
        let values: Vec<i64> = s.shrinks().iterator().map(|c| *c.value()).collect();
        assert_eq!(values, vec![4, 2, 0]);
    }

    #[test]
    fn with_shrinks_replaces_children_outright() {
        let replacement = LazyStream::from_vec(vec![Shrinkable::unshrinkable(99)]);
        let s = chain(3).with_shrinks(replacement);
        let values: Vec<i64> = s.shrinks().iterator().map(|c| *c.value()).collect();
        assert_eq!(values, vec![99]);
    }

    #[test]
    fn concat_static_appends_at_every_level() {
        let extra = LazyStream::once(Shrinkable::unshrinkable(-1));
        let s = chain(2).concat_static(extra);
        let top: Vec<i64> = s.shrinks().iterator().map(|c| *c.value()).collect();
        assert_eq!(top, vec![1, -1]);
        let second_level_node = s.shrinks().head().unwrap();
        let second: Vec<i64> = second_level_node
            .shrinks()
            .iterator()
            .map(|c| *c.value())
            .collect();
        assert_eq!(second, vec![0, -1]);
    }

    #[test]
    fn and_then_static_appends_only_at_leaves() {
        let extra = LazyStream::once(Shrinkable::unshrinkable(-1));
        let s = chain(2).and_then_static(extra);
        let top: Vec<i64> = s.shrinks().iterator().map(|c| *c.value()).collect();
        assert_eq!(top, vec![1]);
        let leaf_level_1 = s.shrinks().head().unwrap();
        let mid: Vec<i64> = leaf_level_1.shrinks().iterator().map(|c| *c.value()).collect();
        assert_eq!(mid, vec![0]);
        let leaf = leaf_level_1.shrinks().head().unwrap();
        let at_leaf: Vec<i64> = leaf.shrinks().iterator().map(|c| *c.value()).collect();
        assert_eq!(at_leaf, vec![-1]);
    }

    #[test]
    fn take_truncates_direct_children() {
        let s = Shrinkable::new(0, || {
            LazyStream::from_vec(vec![
                Shrinkable::unshrinkable(1),
                Shrinkable::unshrinkable(2),
                Shrinkable::unshrinkable(3),
            ])
        });
        let truncated = s.take(1);
        assert_eq!(truncated.shrinks().iterator().count(), 1);
    }

    #[test]
    fn retrieve_walks_a_path() {
        let s = chain(4);
        let node = s.retrieve(&[0, 0]).unwrap();
        assert_eq!(*node.value(), 2);
    }

    #[test]
    fn retrieve_reports_failure_depth() {
        let s = chain(1);
        let err = s.retrieve(&[0, 5]).unwrap_err();
        assert_eq!(err.failed_at_depth, 1);
    }

    #[test]
    fn flat_map_grafts_original_tree_ahead_of_replacement_tree() {
        // a: chain(2) = 2 -> 1 -> 0
        // f(a) replaces with a fixed node carrying its own single shrink
        let replaced = chain(2).flat_map(|v: &i64| {
            Shrinkable::new(v * 100, || LazyStream::once(Shrinkable::unshrinkable(-7)))
        });
        assert_eq!(*replaced.value(), 200);
        let children: Vec<i64> = replaced.shrinks().iterator().map(|c| *c.value()).collect();
        // first the original tree (1, 0) re-mapped through f, then -7 from the replacement
        assert_eq!(children, vec![100, -7]);
    }
}
