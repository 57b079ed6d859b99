//! The `Gen` namespace: ready-made generators for the primitive and
//! near-primitive types (booleans, numbers, characters, strings,
//! permutations), built directly on the shrinkers in [`crate::shrink`].
//! Container combinators (`array`, `tuple2`, `one_of`, ...) live in
//! [`crate::generator`] and are re-exported from here under the same
//! names so callers can reach everything through one module.

use crate::error::PropertyResult;
use crate::generator::Generator;
use crate::random::Random;
use crate::shrink::{shrink_bool, shrink_char, shrink_float, shrink_permutation, shrink_signed, shrink_string};
use crate::shrinkable::Shrinkable;
use crate::weighted::WeightedValue;

pub use crate::generator::{
    array, chain, construct2, construct3, dictionary, one_of, one_of_weighted, set, tuple2,
    tuple3, tuple4, unique_array,
};

/// Always produces `value`, with no shrinks.
pub fn just<T: Clone + 'static>(value: T) -> Generator<T> {
    Generator::just(value)
}

/// Always produces the value returned by `f`, computed fresh on every
/// draw, with no shrinks.
pub fn lazy<T: Clone + 'static>(f: impl Fn() -> T + 'static) -> Generator<T> {
    Generator::lazy(f)
}

/// Choose from a weighted list (normalized per [`WeightedValue`]),
/// shrinking toward the first listed value.
pub fn element_of<T: Clone + 'static>(weighted: Vec<WeightedValue<T>>) -> PropertyResult<Generator<T>> {
    Generator::element_of(weighted)
}

/// A fair coin flip, shrinking `true` toward `false`.
pub fn boolean() -> Generator<bool> {
    Generator::new(|rnd: &mut Random| Ok(shrink_bool(rnd.next_boolean(0.5))))
}

/// A coin flip biased toward `true` with probability `p`.
pub fn boolean_weighted(p: f64) -> Generator<bool> {
    Generator::new(move |rnd: &mut Random| Ok(shrink_bool(rnd.next_boolean(p))))
}

/// A finite `f64`, drawn over a wide range and shrinking toward `0.0`.
pub fn float() -> Generator<f64> {
    Generator::new(|rnd: &mut Random| {
        let mantissa = rnd.interval(-1_000_000_000, 1_000_000_000) as f64;
        let scale = rnd.interval(0, 6);
        Ok(shrink_float(mantissa / 10f64.powi(scale as i32)))
    })
}

/// Uniform draw over the inclusive interval `[lo, hi]`, shrinking toward
/// `0` (or the nearer bound, if `0` is out of range).
pub fn interval(lo: i64, hi: i64) -> Generator<i64> {
    assert!(hi >= lo, "Gen::interval requires hi >= lo");
    Generator::new(move |rnd: &mut Random| {
        let v = rnd.interval(lo, hi);
        Ok(shrink_toward_range(v, lo, hi))
    })
}

/// Uniform draw over the half-open interval `[lo, hi)`.
pub fn in_range(lo: i64, hi: i64) -> Generator<i64> {
    assert!(hi > lo, "Gen::in_range requires hi > lo");
    interval(lo, hi - 1)
}

fn shrink_toward_range(v: i64, lo: i64, hi: i64) -> Shrinkable<i64> {
    if lo <= 0 && hi >= 0 {
        return shrink_signed(v);
    }
    let anchor = if lo > 0 { lo } else { hi };
    shrink_signed(v - anchor).map(move |d: &i64| d + anchor)
}

fn ascii_char(rnd: &mut Random) -> char {
    char::from_u32(rnd.interval(0, 127) as u32).unwrap_or('a')
}

fn printable_ascii_char(rnd: &mut Random) -> char {
    char::from_u32(rnd.interval(0x20, 0x7E) as u32).unwrap_or('a')
}

fn unicode_char(rnd: &mut Random) -> char {
    loop {
        let code = rnd.interval(0, 0x10FFFF) as u32;
        if (0xD800..=0xDFFF).contains(&code) {
            continue;
        }
        if let Some(c) = char::from_u32(code) {
            return c;
        }
    }
}

/// A single ASCII character (code points `0..=127`).
pub fn ascii() -> Generator<char> {
    Generator::new(|rnd: &mut Random| Ok(shrink_char(ascii_char(rnd))))
}

/// A single printable ASCII character (code points `0x20..=0x7E`).
pub fn printable_ascii() -> Generator<char> {
    Generator::new(|rnd: &mut Random| Ok(shrink_char(printable_ascii_char(rnd))))
}

/// A single valid Unicode scalar value, excluding surrogate code points.
pub fn unicode() -> Generator<char> {
    Generator::new(|rnd: &mut Random| Ok(shrink_char(unicode_char(rnd))))
}

fn string_gen(
    char_draw: impl Fn(&mut Random) -> char + 'static,
    min_len: usize,
    max_len: usize,
) -> Generator<String> {
    assert!(max_len >= min_len, "Gen string: max_len must be >= min_len");
    Generator::new(move |rnd: &mut Random| {
        let len = rnd.interval(min_len as i64, max_len as i64) as usize;
        let s: String = (0..len).map(|_| char_draw(rnd)).collect();
        Ok(shrink_string(&s, min_len))
    })
}

/// A `String` of `min..=max` ASCII characters.
pub fn ascii_string(min_len: usize, max_len: usize) -> Generator<String> {
    string_gen(ascii_char, min_len, max_len)
}

/// A `String` of `min..=max` printable ASCII characters.
pub fn printable_ascii_string(min_len: usize, max_len: usize) -> Generator<String> {
    string_gen(printable_ascii_char, min_len, max_len)
}

/// A `String` of `min..=max` Unicode scalar values.
pub fn unicode_string(min_len: usize, max_len: usize) -> Generator<String> {
    string_gen(unicode_char, min_len, max_len)
}

/// A random permutation of `items`, shrinking toward the original order.
pub fn permutation<T: Clone + 'static>(items: Vec<T>) -> Generator<Vec<T>> {
    let n = items.len();
    let for_generate = items.clone();
    Generator::new(move |rnd: &mut Random| {
        let mut indices: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = rnd.interval(0, i as i64) as usize;
            indices.swap(i, j);
        }
        Ok(shrink_permutation(indices))
    })
    .map(move |indices: &Vec<usize>| indices.iter().map(|&i| for_generate[i].clone()).collect())
}

/// Pair a value with an explicit weight in `[0,1]`, for [`element_of`].
pub fn weighted_value<T>(value: T, weight: f64) -> WeightedValue<T> {
    WeightedValue::new(weight, value)
}

/// Pair a generator with an explicit weight in `[0,1]`, for
/// [`one_of_weighted`].
pub fn weighted_gen<T>(gen: Generator<T>, weight: f64) -> WeightedValue<Generator<T>> {
    WeightedValue::new(weight, gen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_produces_both_values_over_many_draws() {
        let g = boolean();
        let mut rnd = Random::new(1u64);
        let mut seen = (false, false);
        for _ in 0..100 {
            let v = *g.generate(&mut rnd).unwrap().value();
            if v {
                seen.0 = true;
            } else {
                seen.1 = true;
            }
        }
        assert_eq!(seen, (true, true));
    }

    #[test]
    fn interval_respects_bounds_and_shrinks_within_range() {
        let g = interval(10, 20);
        let mut rnd = Random::new(3u64);
        for _ in 0..50 {
            let s = g.generate(&mut rnd).unwrap();
            assert!((10..=20).contains(s.value()));
            for child in s.shrinks().iterator() {
                assert!((10..=20).contains(child.value()));
            }
        }
    }

    #[test]
    fn in_range_excludes_the_upper_bound() {
        let g = in_range(0, 5);
        let mut rnd = Random::new(4u64);
        for _ in 0..50 {
            let s = g.generate(&mut rnd).unwrap();
            assert!((0..5).contains(s.value()));
        }
    }

    #[test]
    fn ascii_string_stays_within_min_max() {
        let g = ascii_string(2, 6);
        let mut rnd = Random::new(5u64);
        for _ in 0..30 {
            let s = g.generate(&mut rnd).unwrap();
            let len = s.value().chars().count();
            assert!((2..=6).contains(&len));
            assert!(s.value().chars().all(|c| (c as u32) < 128));
        }
    }

    #[test]
    fn unicode_char_avoids_surrogate_range() {
        let mut rnd = Random::new(6u64);
        for _ in 0..200 {
            let c = unicode_char(&mut rnd);
            let code = c as u32;
            assert!(!(0xD800..=0xDFFF).contains(&code));
        }
    }

    #[test]
    fn permutation_contains_exactly_the_original_elements() {
        let g = permutation(vec!["a", "b", "c", "d"]);
        let mut rnd = Random::new(7u64);
        let s = g.generate(&mut rnd).unwrap();
        let mut sorted = s.value().clone();
        sorted.sort();
        assert_eq!(sorted, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn weighted_helpers_carry_the_given_weight() {
        let wv = weighted_value(5, 0.4);
        assert_eq!(wv.weight, Some(0.4));
        assert_eq!(wv.value, 5);
        let wg = weighted_gen(just(9), 0.6);
        assert_eq!(wg.weight, Some(0.6));
    }

    #[test]
    fn element_of_picks_among_the_weighted_values_and_shrinks_to_the_first() {
        let g = element_of(vec![
            weighted_value("a", 0.5),
            weighted_value("b", 0.25),
            WeightedValue::unweighted("c"),
        ])
        .unwrap();
        let mut rnd = Random::new(2u64);
        for _ in 0..20 {
            let s = g.generate(&mut rnd).unwrap();
            assert!(["a", "b", "c"].contains(s.value()));
        }
    }

    #[test]
    fn element_of_rejects_an_invalid_weight_list() {
        let result = element_of(vec![weighted_value("a", 0.7), weighted_value("b", 0.7)]);
        assert!(result.is_err());
    }
}
