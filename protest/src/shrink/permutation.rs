//! Permutation shrinking: shrink toward the identity permutation by
//! swapping one out-of-place element into its correct slot at a time.
//!
//! A permutation is represented as `Vec<usize>`, a rearrangement of
//! `0..n`. Each child has strictly more fixed points (`p[i] == i`) than
//! its parent, so the tree is finite and terminates at the identity.

use crate::lazy::LazyStream;
use crate::shrinkable::Shrinkable;

pub fn shrink_permutation(p: Vec<usize>) -> Shrinkable<Vec<usize>> {
    Shrinkable::new(p.clone(), move || permutation_children(p.clone()))
}

fn fixed_point_count(p: &[usize]) -> usize {
    p.iter().enumerate().filter(|(i, &v)| *i == v).count()
}

fn permutation_children(p: Vec<usize>) -> LazyStream<Shrinkable<Vec<usize>>> {
    let base_fixed = fixed_point_count(&p);
    let mut candidates = Vec::new();

    for i in 0..p.len() {
        if p[i] == i {
            continue;
        }
        // j is where the value `i` currently sits; swapping puts i into
        // its correct slot, strictly increasing the fixed-point count.
        let j = p.iter().position(|&v| v == i).expect("permutation contains every index");
        let mut swapped = p.clone();
        swapped.swap(i, j);
        if fixed_point_count(&swapped) > base_fixed {
            candidates.push(swapped);
        }
    }

    LazyStream::from_vec(candidates).transform(shrink_permutation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_terminal() {
        let s = shrink_permutation(vec![0, 1, 2, 3]);
        assert!(s.shrinks().is_empty());
    }

    #[test]
    fn children_have_strictly_more_fixed_points() {
        let p = vec![2, 0, 3, 1];
        let s = shrink_permutation(p.clone());
        let base = fixed_point_count(&p);
        for child in s.shrinks().iterator() {
            assert!(fixed_point_count(child.value()) > base);
        }
    }

    #[test]
    fn eventually_reaches_identity() {
        fn reaches_identity(s: &Shrinkable<Vec<usize>>, depth: usize) -> bool {
            let n = s.value().len();
            if *s.value() == (0..n).collect::<Vec<_>>() {
                return true;
            }
            if depth == 0 {
                return false;
            }
            s.shrinks().iterator().any(|c| reaches_identity(&c, depth - 1))
        }
        assert!(reaches_identity(&shrink_permutation(vec![3, 1, 2, 0]), 10));
    }
}
