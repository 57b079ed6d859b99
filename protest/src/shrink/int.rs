//! Binary-search integer shrinking.
//!
//! Every integer strictly between `0` and the seed `n` (in absolute value)
//! must appear exactly once somewhere in the tree, and every child must be
//! strictly smaller in magnitude than its parent.
//!
//! The tree is built by recursively bisecting the open range `(0, n)`: the
//! midpoint becomes a direct child of the root, the gap between the
//! midpoint and the root stays attached to the root (more direct children,
//! covering values closer to `n`), and the gap between `0` and the midpoint
//! is nested underneath the midpoint. Applying the same rule recursively
//! partitions `(0, n)` without overlap, and every produced value is smaller
//! than whichever node it hangs off, since it always lies strictly inside
//! that node's own `(lo, value)` interval.

use crate::lazy::LazyStream;
use crate::shrinkable::Shrinkable;
use num_traits::{PrimInt, Signed, Unsigned};

fn two<T: PrimInt>() -> T {
    T::one() + T::one()
}

/// Direct children (and, recursively, their own children) covering the
/// open interval `(lo, hi)`.
fn range_tree<T: PrimInt + 'static>(lo: T, hi: T) -> LazyStream<Shrinkable<T>> {
    let span = hi - lo;
    if span <= T::one() {
        return LazyStream::empty();
    }
    let mid = lo + span / two::<T>();
    LazyStream::from_fn(move || {
        let node = Shrinkable::new(mid, move || range_tree(lo, mid));
        Some((node, range_tree(mid, hi)))
    })
}

/// Shrinks an unsigned integer toward `0`.
pub fn shrink_unsigned<T: PrimInt + Unsigned + 'static>(n: T) -> Shrinkable<T> {
    if n.is_zero() {
        return Shrinkable::unshrinkable(n);
    }
    let zero = T::zero();
    Shrinkable::new(n, move || {
        range_tree(zero, n).concat(LazyStream::once(Shrinkable::unshrinkable(zero)))
    })
}

/// Shrinks a signed integer toward `0`, mirroring negative values through
/// the positive-side tree so the magnitude invariants hold symmetrically.
pub fn shrink_signed<T: PrimInt + Signed + 'static>(n: T) -> Shrinkable<T> {
    if n.is_zero() {
        return Shrinkable::unshrinkable(n);
    }
    if n > T::zero() {
        let zero = T::zero();
        Shrinkable::new(n, move || {
            range_tree(zero, n).concat(LazyStream::once(Shrinkable::unshrinkable(zero)))
        })
    } else {
        shrink_signed(n.neg()).map(|v: &T| v.neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn collect_all(s: &Shrinkable<i64>) -> Vec<i64> {
        let mut out = vec![*s.value()];
        for child in s.shrinks().iterator() {
            out.extend(collect_all(&child));
        }
        out
    }

    #[test]
    fn zero_has_no_children() {
        let s = shrink_signed(0i64);
        assert!(s.shrinks().is_empty());
    }

    #[test]
    fn tree_is_complete_and_duplicate_free_for_several_seeds() {
        for &n in &[1i64, 2, 3, 5, 10, 17, 40213, 7531246] {
            let tree = shrink_signed(n);
            let all = collect_all(&tree);
            let as_set: HashSet<i64> = all.iter().copied().collect();
            assert_eq!(
                all.len(),
                as_set.len(),
                "duplicate values found shrinking {n}"
            );
            let expected: HashSet<i64> = (0..n).collect();
            let without_root: HashSet<i64> = as_set.into_iter().filter(|&v| v != n).collect();
            assert_eq!(without_root, expected, "incomplete coverage shrinking {n}");
        }
    }

    #[test]
    fn negative_seed_mirrors_the_positive_tree() {
        let tree = shrink_signed(-5i64);
        let all = collect_all(&tree);
        let expected: Vec<i64> = (-4..=0).collect();
        let mut sorted = all.clone();
        sorted.retain(|&v| v != -5);
        sorted.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn every_child_is_strictly_simpler_than_its_parent() {
        fn check(s: &Shrinkable<i64>) {
            for child in s.shrinks().iterator() {
                assert!(child.value().abs() < s.value().abs());
                check(&child);
            }
        }
        check(&shrink_signed(964285173i64));
    }

    #[test]
    fn unsigned_shrinks_toward_zero() {
        let tree = shrink_unsigned(9u32);
        let all = collect_all(&tree);
        let as_set: HashSet<u32> = all.iter().copied().collect();
        let expected: HashSet<u32> = (0..9).collect();
        let without_root: HashSet<u32> = as_set.into_iter().filter(|&v| v != 9).collect();
        assert_eq!(without_root, expected);
    }
}
