//! Float shrinking: drop the fractional part first, then halve what
//! remains (fractional, then integral) toward `0.0`. `NaN` and the
//! infinities shrink directly to `0.0`; negative values mirror the
//! positive tree; `-0.0` shrinks once to `+0.0`.
//!
//! Unlike the integer shrinker, completeness/uniqueness over "every
//! representable float" is not a meaningful invariant here (there is no
//! enumerable set of floats between `0.0` and `n` to exhaust) — the goal is
//! a short, monotonically-simplifying path toward `0.0`.

use crate::lazy::LazyStream;
use crate::shrinkable::Shrinkable;

pub fn shrink_float(x: f64) -> Shrinkable<f64> {
    if !x.is_finite() {
        return Shrinkable::new(x, || LazyStream::once(Shrinkable::unshrinkable(0.0)));
    }
    if x == 0.0 {
        return if x.is_sign_negative() {
            Shrinkable::new(x, || LazyStream::once(Shrinkable::unshrinkable(0.0)))
        } else {
            Shrinkable::unshrinkable(0.0)
        };
    }
    if x < 0.0 {
        return shrink_float(-x).map(|v: &f64| -*v);
    }
    Shrinkable::new(x, move || LazyStream::from_vec(candidates(x)).transform(shrink_float))
}

fn candidates(x: f64) -> Vec<f64> {
    let int_part = x.trunc();
    let mut out = Vec::new();

    if int_part != x {
        out.push(int_part);
    }

    let mut current = x;
    for _ in 0..64 {
        let halved = int_part + (current - int_part) / 2.0;
        if halved == current {
            break;
        }
        out.push(halved);
        current = halved;
    }

    let mut whole = int_part;
    while whole != 0.0 {
        let halved_whole = (whole / 2.0).trunc();
        out.push(halved_whole);
        if halved_whole == whole {
            break;
        }
        whole = halved_whole;
    }

    out.push(0.0);
    out.retain(|c| *c != x);
    out.dedup_by(|a, b| a == b);
    out
}
