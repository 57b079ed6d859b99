//! Array/`Vec` shrinking: shrink length first (by removing contiguous
//! runs, largest first, down to `min_len`), then shrink individual
//! elements in place using each element's own shrink tree.
//!
//! Element shrinking is explored one position at a time — each candidate
//! replaces a single element and leaves the rest untouched — rather than
//! combinatorially shrinking every position at once, to keep the tree's
//! branching factor linear in the array length.

use crate::lazy::LazyStream;
use crate::shrinkable::Shrinkable;

/// Build a `Shrinkable<Vec<T>>` from already-`Shrinkable` elements. Each
/// element is expected to carry its own shrink tree (as produced by a
/// generator or another `shrink::*` function).
pub fn shrink_array<T: Clone + 'static>(
    elems: Vec<Shrinkable<T>>,
    min_len: usize,
) -> Shrinkable<Vec<T>> {
    let values: Vec<T> = elems.iter().map(|e| e.value().clone()).collect();
    Shrinkable::new(values, move || array_children(elems.clone(), min_len))
}

fn array_children<T: Clone + 'static>(
    elems: Vec<Shrinkable<T>>,
    min_len: usize,
) -> LazyStream<Shrinkable<Vec<T>>> {
    let mut candidates: Vec<Vec<Shrinkable<T>>> = Vec::new();
    let len = elems.len();

    if len > min_len {
        let mut chunk = len - min_len;
        while chunk > 0 {
            let mut start = 0;
            while start + chunk <= len {
                let mut reduced = elems.clone();
                reduced.drain(start..start + chunk);
                if reduced.len() >= min_len {
                    candidates.push(reduced);
                }
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
            candidates.push(replaced);
        }
    }

    LazyStream::from_vec(candidates).transform(move |c| shrink_array(c, min_len))
}
