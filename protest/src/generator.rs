//! Generator combinators: `Random -> PropertyResult<Shrinkable<T>>`,
//! wrapped so they compose like the shrink trees they produce.
//!
//! A [`Generator<T>`] is the thing a property runner draws from; it owns
//! no state of its own beyond what its construction closure captured, so
//! combinators build new generators out of old ones rather than mutating
//! anything.

use crate::error::{PropertyError, PropertyResult};
use crate::lazy::LazyStream;
use crate::random::Random;
use crate::shrink::{shrink_array, shrink_dict, shrink_set, shrink_tuple2, shrink_tuple3, shrink_tuple4};
use crate::shrinkable::Shrinkable;
use crate::weighted::{normalize_weights, pick_index, WeightedValue};
use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

/// Retry budget for [`Generator::filter`] before it reports a generation
/// failure.
pub const DEFAULT_FILTER_RETRIES: usize = 1000;

type GenFn<T> = Rc<dyn Fn(&mut Random) -> PropertyResult<Shrinkable<T>>>;

pub struct Generator<T> {
    generate: GenFn<T>,
}

impl<T> Clone for Generator<T> {
    fn clone(&self) -> Self {
        Self {
            generate: Rc::clone(&self.generate),
        }
    }
}

impl<T: Clone + 'static> Generator<T> {
    pub fn new(f: impl Fn(&mut Random) -> PropertyResult<Shrinkable<T>> + 'static) -> Self {
        Self {
            generate: Rc::new(f),
        }
    }

    pub fn generate(&self, rnd: &mut Random) -> PropertyResult<Shrinkable<T>> {
        (self.generate)(rnd)
    }

    /// Always produces the same value, with no shrinks.
    pub fn just(value: T) -> Self {
        Self::new(move |_rnd| Ok(Shrinkable::unshrinkable(value.clone())))
    }

    /// Always produces the value returned by `f`, computed fresh on every
    /// draw, with no shrinks.
    pub fn lazy(f: impl Fn() -> T + 'static) -> Self {
        Self::new(move |_rnd| Ok(Shrinkable::unshrinkable(f())))
    }

    /// Pick from a weighted list (normalized per [`WeightedValue`]),
    /// shrinking toward the first listed entry. Validation is eager: an
    /// invalid weight list reports a [`PropertyError::ConfigError`]
    /// immediately rather than at generation time.
    pub fn element_of(weighted: Vec<WeightedValue<T>>) -> PropertyResult<Self> {
        let bounds = normalize_weights(&weighted)?;
        let values: Vec<T> = weighted.into_iter().map(|w| w.value).collect();
        Ok(Self::new(move |rnd: &mut Random| {
            let idx = pick_index(&bounds, rnd.uniform()) as u64;
            let values = values.clone();
            Ok(crate::shrink::shrink_unsigned(idx)
                .map(move |i: &u64| values[*i as usize].clone()))
        }))
    }

    /// Map the generated value (and, recursively, every shrunk value)
    /// through `f`.
    pub fn map<U: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> U + Clone + 'static,
    ) -> Generator<U> {
        let this = self.clone();
        Generator::new(move |rnd: &mut Random| Ok(this.generate(rnd)?.map(f.clone())))
    }

    /// Retry generation until `pred` holds, up to `max_tries` attempts,
    /// reporting [`PropertyError::GenerationFailed`] if the budget runs
    /// out. Shrinking is then re-filtered through the same predicate so
    /// every candidate the shrink search sees also satisfies it.
    pub fn filter(
        &self,
        pred: impl Fn(&T) -> bool + Clone + 'static,
        max_tries: usize,
    ) -> Generator<T> {
        let this = self.clone();
        Generator::new(move |rnd: &mut Random| {
            for _ in 0..max_tries.max(1) {
                let candidate = this.generate(rnd)?;
                if pred(candidate.value()) {
                    return Ok(candidate.filter(pred.clone()));
                }
            }
            Err(PropertyError::GenerationFailed {
                reason: format!(
                    "filter: no value satisfied the predicate in {max_tries} attempts"
                ),
            })
        })
    }

    /// Draw `a` from `self`, then draw `b` from `f(a)` using an
    /// independent derived random source, so that re-deriving `b` for a
    /// shrunk `a` (during shrink search) is deterministic and does not
    /// disturb `a`'s own remaining draws.
    pub fn flat_map<U: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> Generator<U> + Clone + 'static,
    ) -> Generator<U> {
        let this = self.clone();
        Generator::new(move |rnd: &mut Random| {
            let a = this.generate(rnd)?;
            let b_seed = rnd.next_u64();
            let f = f.clone();
            let first = f(a.value());
            let first_shrinkable = first.generate(&mut Random::new(b_seed))?;
            Ok(a.flat_map(move |a_value: &T| {
                let b_gen = f(a_value);
                let mut b_rnd = Random::new(b_seed);
                b_gen
                    .generate(&mut b_rnd)
                    .unwrap_or_else(|_| first_shrinkable.clone())
            }))
        })
    }
}

/// Pick uniformly among generators, forwarding the chosen generator's
/// exact `Shrinkable` tree untouched — the engine never shrinks "across"
/// branches, only within whichever one was picked.
pub fn one_of<T: Clone + 'static>(gens: Vec<Generator<T>>) -> Generator<T> {
    assert!(!gens.is_empty(), "one_of: empty list");
    Generator::new(move |rnd: &mut Random| {
        let idx = rnd.in_range(0, gens.len() as i64) as usize;
        gens[idx].generate(rnd)
    })
}

/// Like [`one_of`], but generators are picked with explicit weights
/// (normalized per [`WeightedValue`]) instead of uniformly. Validation
/// is eager, same as [`Generator::element_of`].
pub fn one_of_weighted<T: Clone + 'static>(
    weighted: Vec<WeightedValue<Generator<T>>>,
) -> PropertyResult<Generator<T>> {
    let bounds = normalize_weights(&weighted)?;
    let gens: Vec<Generator<T>> = weighted.into_iter().map(|w| w.value).collect();
    Ok(Generator::new(move |rnd: &mut Random| {
        let idx = pick_index(&bounds, rnd.uniform());
        gens[idx].generate(rnd)
    }))
}

/// Draw `len` elements sequentially, independent of each other, collected
/// into a `Vec`. `len` is itself drawn uniformly from `[min_len, max_len]`.
pub fn array<T: Clone + 'static>(elem: Generator<T>, min_len: usize, max_len: usize) -> Generator<Vec<T>> {
    assert!(max_len >= min_len, "array: max_len must be >= min_len");
    Generator::new(move |rnd: &mut Random| {
        let len = rnd.interval(min_len as i64, max_len as i64) as usize;
        let elems: PropertyResult<Vec<Shrinkable<T>>> =
            (0..len).map(|_| elem.generate(rnd)).collect();
        Ok(shrink_array(elems?, min_len))
    })
}

/// Sequential, homogeneous composition: draw each of `gens` in order,
/// independent of one another, into one `Vec`.
pub fn chain<T: Clone + 'static>(gens: Vec<Generator<T>>) -> Generator<Vec<T>> {
    let min_len = gens.len();
    Generator::new(move |rnd: &mut Random| {
        let elems: PropertyResult<Vec<Shrinkable<T>>> =
            gens.iter().map(|g| g.generate(rnd)).collect();
        Ok(shrink_array(elems?, min_len))
    })
}

/// Draw between `min_len` and `max_len` elements with no duplicates
/// (by value equality), retrying individual draws as needed.
pub fn unique_array<T: Clone + Eq + Hash + 'static>(
    elem: Generator<T>,
    min_len: usize,
    max_len: usize,
) -> Generator<Vec<T>> {
    assert!(max_len >= min_len, "unique_array: max_len must be >= min_len");
    Generator::new(move |rnd: &mut Random| {
        let len = rnd.interval(min_len as i64, max_len as i64) as usize;
        let mut elems: Vec<Shrinkable<T>> = Vec::with_capacity(len);
        let mut seen: HashSet<T> = HashSet::new();
        let max_attempts = (len * 50).max(DEFAULT_FILTER_RETRIES);
        let mut attempts = 0;
        while elems.len() < len {
            if attempts >= max_attempts {
                return Err(PropertyError::GenerationFailed {
                    reason: format!(
                        "unique_array: could not find {len} unique values in {max_attempts} attempts"
                    ),
                });
            }
            attempts += 1;
            let candidate = elem.generate(rnd)?;
            if seen.insert(candidate.value().clone()) {
                elems.push(candidate);
            }
        }
        Ok(shrink_set(elems))
    })
}

/// Alias for [`unique_array`] — a set is an array with uniqueness
/// enforced.
pub fn set<T: Clone + Eq + Hash + 'static>(
    elem: Generator<T>,
    min_len: usize,
    max_len: usize,
) -> Generator<Vec<T>> {
    unique_array(elem, min_len, max_len)
}

/// Draw between `min_len` and `max_len` key/value pairs with no duplicate
/// keys.
pub fn dictionary<K: Clone + Eq + Hash + 'static, V: Clone + 'static>(
    key: Generator<K>,
    value: Generator<V>,
    min_len: usize,
    max_len: usize,
) -> Generator<Vec<(K, V)>> {
    assert!(max_len >= min_len, "dictionary: max_len must be >= min_len");
    Generator::new(move |rnd: &mut Random| {
        let len = rnd.interval(min_len as i64, max_len as i64) as usize;
        let mut entries: Vec<Shrinkable<(K, V)>> = Vec::with_capacity(len);
        let mut seen: HashSet<K> = HashSet::new();
        let max_attempts = (len * 50).max(DEFAULT_FILTER_RETRIES);
        let mut attempts = 0;
        while entries.len() < len {
            if attempts >= max_attempts {
                return Err(PropertyError::GenerationFailed {
                    reason: format!(
                        "dictionary: could not find {len} unique keys in {max_attempts} attempts"
                    ),
                });
            }
            attempts += 1;
            let k = key.generate(rnd)?;
            if seen.contains(k.value()) {
                continue;
            }
            let v = value.generate(rnd)?;
            seen.insert(k.value().clone());
            entries.push(shrink_tuple2(k, v));
        }
        Ok(shrink_dict(entries))
    })
}

/// Draw two independent values into a tuple.
pub fn tuple2<A: Clone + 'static, B: Clone + 'static>(
    a: Generator<A>,
    b: Generator<B>,
) -> Generator<(A, B)> {
    Generator::new(move |rnd: &mut Random| Ok(shrink_tuple2(a.generate(rnd)?, b.generate(rnd)?)))
}

pub fn tuple3<A: Clone + 'static, B: Clone + 'static, C: Clone + 'static>(
    a: Generator<A>,
    b: Generator<B>,
    c: Generator<C>,
) -> Generator<(A, B, C)> {
    Generator::new(move |rnd: &mut Random| {
        Ok(shrink_tuple3(a.generate(rnd)?, b.generate(rnd)?, c.generate(rnd)?))
    })
}

pub fn tuple4<A: Clone + 'static, B: Clone + 'static, C: Clone + 'static, D: Clone + 'static>(
    a: Generator<A>,
    b: Generator<B>,
    c: Generator<C>,
    d: Generator<D>,
) -> Generator<(A, B, C, D)> {
    Generator::new(move |rnd: &mut Random| {
        Ok(shrink_tuple4(
            a.generate(rnd)?,
            b.generate(rnd)?,
            c.generate(rnd)?,
            d.generate(rnd)?,
        ))
    })
}

/// Heterogeneous sequential chaining — an alias family over [`tuple2`]/
/// [`tuple3`]/[`tuple4`], kept under this name for parity with the
/// homogeneous [`chain`].
pub fn chain_tuple2<A: Clone + 'static, B: Clone + 'static>(
    a: Generator<A>,
    b: Generator<B>,
) -> Generator<(A, B)> {
    tuple2(a, b)
}

pub fn chain_tuple3<A: Clone + 'static, B: Clone + 'static, C: Clone + 'static>(
    a: Generator<A>,
    b: Generator<B>,
    c: Generator<C>,
) -> Generator<(A, B, C)> {
    tuple3(a, b, c)
}

/// Build a value from two independently-drawn parts via `ctor`.
pub fn construct2<A: Clone + 'static, B: Clone + 'static, R: Clone + 'static>(
    a: Generator<A>,
    b: Generator<B>,
    ctor: impl Fn(A, B) -> R + Clone + 'static,
) -> Generator<R> {
    tuple2(a, b).map(move |t: &(A, B)| ctor(t.0.clone(), t.1.clone()))
}

pub fn construct3<A: Clone + 'static, B: Clone + 'static, C: Clone + 'static, R: Clone + 'static>(
    a: Generator<A>,
    b: Generator<B>,
    c: Generator<C>,
    ctor: impl Fn(A, B, C) -> R + Clone + 'static,
) -> Generator<R> {
    tuple3(a, b, c).map(move |t: &(A, B, C)| ctor(t.0.clone(), t.1.clone(), t.2.clone()))
}

/// Build a `Vec` by repeatedly deriving the next element from the
/// previous one, starting from `initial`. Length is drawn once up front
/// from `[min_len, max_len]`. Shrinking truncates the tail first, then
/// shrinks only the initial element (replaying `next` deterministically
/// for every downstream element) — interior elements are not shrunk
/// independently, since each one is a function of everything before it.
pub fn accumulate<T: Clone + 'static>(
    initial: Generator<T>,
    next: impl Fn(&T) -> Generator<T> + Clone + 'static,
    min_len: usize,
    max_len: usize,
) -> Generator<Vec<T>> {
    assert!(max_len >= min_len, "accumulate: max_len must be >= min_len");
    Generator::new(move |rnd: &mut Random| {
        let len = rnd.interval(min_len as i64, max_len as i64) as usize;
        let init_shrinkable = initial.generate(rnd)?;
        let mut seeds = Vec::with_capacity(len.saturating_sub(1));
        let mut last = init_shrinkable.value().clone();
        for _ in 1..len {
            let seed = rnd.next_u64();
            let gen = next(&last);
            let mut step_rnd = Random::new(seed);
            last = gen.generate(&mut step_rnd)?.into_value();
            seeds.push(seed);
        }
        Ok(build_accumulate_tree(
            init_shrinkable,
            seeds,
            next.clone(),
            min_len,
        ))
    })
}

/// Alias kept for the "aggregate" name used in some property-testing
/// libraries for the same combinator.
pub fn aggregate<T: Clone + 'static>(
    initial: Generator<T>,
    next: impl Fn(&T) -> Generator<T> + Clone + 'static,
    min_len: usize,
    max_len: usize,
) -> Generator<Vec<T>> {
    accumulate(initial, next, min_len, max_len)
}

fn replay_chain<T: Clone + 'static>(
    init_value: &T,
    seeds: &[u64],
    next: &(impl Fn(&T) -> Generator<T> + Clone + 'static),
) -> PropertyResult<Vec<T>> {
    let mut values = vec![init_value.clone()];
    for &seed in seeds {
        let gen = next(values.last().expect("at least the initial element"));
        let mut r = Random::new(seed);
        values.push(gen.generate(&mut r)?.into_value());
    }
    Ok(values)
}

fn build_accumulate_tree<T: Clone + 'static>(
    init: Shrinkable<T>,
    seeds: Vec<u64>,
    next: impl Fn(&T) -> Generator<T> + Clone + 'static,
    min_len: usize,
) -> Shrinkable<Vec<T>> {
    let full_len = seeds.len() + 1;
    let values = replay_chain(init.value(), &seeds, &next).unwrap_or_else(|_| vec![init.value().clone()]);
    Shrinkable::new(values, move || {
        let mut length_candidates: Vec<Vec<T>> = Vec::new();
        let mut len = full_len;
        while len > min_len {
            let next_len = if len - min_len > 1 {
                min_len + (len - min_len) / 2
            } else {
                min_len
            };
            let truncated = &seeds[..next_len.saturating_sub(1)];
            if let Ok(values) = replay_chain(init.value(), truncated, &next) {
                length_candidates.push(values);
            }
            if next_len == len {
                break;
            }
            len = next_len;
        }

        let seeds_for_init = seeds.clone();
        let next_for_init = next.clone();
        let init_children = init.shrinks().transform(move |shrunk_init| {
            build_accumulate_tree(
                shrunk_init,
                seeds_for_init.clone(),
                next_for_init.clone(),
                min_len,
            )
        });

        LazyStream::from_vec(length_candidates)
            .transform(|v| Shrinkable::unshrinkable(v))
            .concat(init_children)
    })
}
