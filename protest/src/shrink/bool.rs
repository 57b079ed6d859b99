//! Boolean shrinking: `true` shrinks to `false`; `false` is terminal.

use crate::lazy::LazyStream;
use crate::shrinkable::Shrinkable;

pub fn shrink_bool(value: bool) -> Shrinkable<bool> {
    if value {
        Shrinkable::new(true, || LazyStream::once(Shrinkable::unshrinkable(false)))
    } else {
        Shrinkable::unshrinkable(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_shrinks_to_false_only() {
        let s = shrink_bool(true);
        let children: Vec<bool> = s.shrinks().iterator().map(|c| *c.value()).collect();
        assert_eq!(children, vec![false]);
    }

    #[test]
    fn false_is_terminal() {
        let s = shrink_bool(false);
        assert!(s.shrinks().is_empty());
    }
}
