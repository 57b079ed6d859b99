//! Dictionary shrinking: entries are shrunk with the same length-first
//! strategy as [`crate::shrink::set`], keyed on entry count and on key
//! uniqueness rather than whole-entry uniqueness.

use crate::lazy::LazyStream;
use crate::shrinkable::Shrinkable;
use std::collections::HashSet;
use std::hash::Hash;

pub fn shrink_dict<K: Clone + Eq + Hash + 'static, V: Clone + 'static>(
    entries: Vec<Shrinkable<(K, V)>>,
) -> Shrinkable<Vec<(K, V)>> {
    let values: Vec<(K, V)> = entries.iter().map(|e| e.value().clone()).collect();
    Shrinkable::new(values, move || dict_children(entries.clone()))
}

fn keys_unique<K: Eq + Hash, V>(entries: &[(K, V)]) -> bool {
    let mut seen = HashSet::new();
    entries.iter().all(|(k, _)| seen.insert(k))
}

fn dict_children<K: Clone + Eq + Hash + 'static, V: Clone + 'static>(
    entries: Vec<Shrinkable<(K, V)>>,
) -> LazyStream<Shrinkable<Vec<(K, V)>>> {
    let mut candidates: Vec<Vec<Shrinkable<(K, V)>>> = Vec::new();
    let len = entries.len();

    if len > 0 {
        let mut chunk = len;
        while chunk > 0 {
            let mut start = 0;
            while start + chunk <= len {
                let mut reduced = entries.clone();
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
        for shrunk_entry in entries[i].shrinks().iterator() {
            let mut replaced = entries.clone();
            replaced[i] = shrunk_entry;
            let values: Vec<(K, V)> = replaced.iter().map(|e| e.value().clone()).collect();
            if keys_unique(&values) {
                candidates.push(replaced);
            }
        }
    }

    LazyStream::from_vec(candidates).transform(shrink_dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shrink::int::shrink_signed;
    use crate::shrinkable::Shrinkable;

    fn entries(pairs: &[(i64, i64)]) -> Vec<Shrinkable<(i64, i64)>> {
        pairs
            .iter()
            .map(|&(k, v)| {
                let key_tree = shrink_signed(k);
                let val_tree = shrink_signed(v);
                Shrinkable::new((k, v), move || {
                    key_tree
                        .shrinks()
                        .transform({
                            let val = v;
                            move |kc| (*kc.value(), val)
                        })
                        .concat(val_tree.shrinks().transform({
                            let key = k;
                            move |vc| (key, *vc.value())
                        }))
                        .transform(|pair| Shrinkable::unshrinkable(pair))
                })
            })
            .collect()
    }

    #[test]
    fn never_duplicates_keys() {
        fn check(s: &Shrinkable<Vec<(i64, i64)>>, depth: usize) {
            assert!(keys_unique(s.value()));
            if depth == 0 {
                return;
            }
            for child in s.shrinks().iterator() {
                check(&child, depth - 1);
            }
        }
        check(&shrink_dict(entries(&[(1, 10), (2, 20), (3, 30)])), 6);
    }

    #[test]
    fn empty_dict_is_terminal() {
        let s = shrink_dict::<i64, i64>(vec![]);
        assert!(s.shrinks().is_empty());
    }
}
