//! Set shrinking: same length-first-then-element strategy as arrays
//! (`shrink::array`), but candidates that would introduce a duplicate
//! value (breaking set uniqueness) are discarded.

use crate::lazy::LazyStream;
use crate::shrinkable::Shrinkable;
use std::collections::HashSet;
use std::hash::Hash;

pub fn shrink_set<T: Clone + Eq + Hash + 'static>(elems: Vec<Shrinkable<T>>) -> Shrinkable<Vec<T>> {
    let values: Vec<T> = elems.iter().map(|e| e.value().clone()).collect();
    Shrinkable::new(values, move || set_children(elems.clone()))
}

fn is_unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::new();
    values.iter().all(|v| seen.insert(v))
}

fn set_children<T: Clone + Eq + Hash + 'static>(
    elems: Vec<Shrinkable<T>>,
) -> LazyStream<Shrinkable<Vec<T>>> {
    let mut candidates: Vec<Vec<Shrinkable<T>>> = Vec::new();
    let len = elems.len();

    if len > 0 {
        let mut chunk = len;
        while chunk > 0 {
            let mut start = 0;
            while start + chunk <= len {
                let mut reduced = elems.clone();
                reduced.drain(start..start + chunk);
                candidates.push(reduced);
                start += chunk;
            }
            if chunk == 1 {
                break;
            }
            chunk /= 2;
        }
    }

    for i in 0..len {
        for shrunk_elem in elems[i].shrinks().iterator() {
            let mut replaced = elems.clone();
            replaced[i] = shrunk_elem;
            let values: Vec<T> = replaced.iter().map(|e| e.value().clone()).collect();
            if is_unique(&values) {
                candidates.push(replaced);
            }
        }
    }

    LazyStream::from_vec(candidates).transform(shrink_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shrink::int::shrink_signed;

    fn elems(values: &[i64]) -> Vec<Shrinkable<i64>> {
        values.iter().map(|&v| shrink_signed(v)).collect()
    }

    #[test]
    fn never_produces_duplicate_elements() {
        fn check(s: &Shrinkable<Vec<i64>>, depth: usize) {
            assert!(is_unique(s.value()));
            if depth == 0 {
                return;
            }
            for child in s.shrinks().iterator() {
                check(&child, depth - 1);
            }
        }
        check(&shrink_set(elems(&[1, 2, 3, 5])), 6);
    }

    #[test]
    fn empty_set_is_terminal() {
        let s = shrink_set::<i64>(vec![]);
        assert!(s.shrinks().is_empty());
    }

    #[test]
    fn shrinks_toward_smaller_cardinality() {
        let s = shrink_set(elems(&[10, 20, 30]));
        let first = s.shrinks().head().unwrap();
        assert!(first.value().len() <= 3);
    }
}
