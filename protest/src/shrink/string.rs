//! String shrinking: array-level shrinking of the character sequence
//! (shorten first, via [`crate::shrink::array`]), with each character
//! shrunk toward a simpler one (ASCII lowercase letters before digits
//! before punctuation, converging on `'a'`).

use crate::shrink::array::shrink_array;
use crate::shrinkable::Shrinkable;

/// Shrink a single `char` toward `'a'`, approaching from either side of
/// its code point (covers punctuation and digits, whose code points sit
/// below `'a'`, as well as the rest of the alphabet and beyond, above it).
pub fn shrink_char(c: char) -> Shrinkable<char> {
    if c == 'a' {
        return Shrinkable::unshrinkable(c);
    }
    let delta = (c as i64) - ('a' as i64);
    crate::shrink::int::shrink_signed(delta).map(|d: &i64| {
        char::from_u32((('a' as i64) + *d) as u32).unwrap_or('a')
    })
}

pub fn shrink_string(s: &str, min_len: usize) -> Shrinkable<String> {
    let chars: Vec<Shrinkable<char>> = s.chars().map(shrink_char).collect();
    shrink_array(chars, min_len).map(|cs: &Vec<char>| cs.iter().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_and_digits_shrink_toward_a() {
        let s = shrink_char('Z');
        let children: Vec<char> = s.shrinks().iterator().map(|c| *c.value()).collect();
        assert!(children.contains(&'a'));
    }

    #[test]
    fn a_is_terminal() {
        assert!(shrink_char('a').shrinks().is_empty());
    }

    #[test]
    fn string_shrinks_length_before_characters() {
        let s = shrink_string("zzz", 0);
        let first = s.shrinks().head().unwrap();
        assert!(first.value().len() < 3);
    }

    #[test]
    fn string_eventually_collapses_toward_all_a() {
        fn contains_all_a(s: &Shrinkable<String>, depth: usize) -> bool {
            if !s.value().is_empty() && s.value().chars().all(|c| c == 'a') {
                return true;
            }
            if depth == 0 {
                return false;
            }
            s.shrinks().iterator().any(|c| contains_all_a(&c, depth - 1))
        }
        let s = shrink_string("xyz", 3);
        assert!(contains_all_a(&s, 20));
    }
}
