//! Memoized, possibly-infinite lazy sequences used to drive shrink search.
//!
//! A [`LazyStream`] is either empty or a head value plus a thunk producing
//! the tail. The head (and the decision of whether the stream is empty at
//! all) is forced and cached on first evaluation via a shared [`OnceCell`],
//! but independent [`LazyStream::iterator`] calls walk the same underlying
//! stream from its start without disturbing each other's position.

use std::cell::OnceCell;
use std::rc::Rc;

type Node<T> = Option<(T, LazyStream<T>)>;
type Thunk<T> = Rc<dyn Fn() -> Node<T>>;

/// A memoized, possibly-infinite sequence of values.
///
/// Cloning a `LazyStream` is a cheap `Rc` bump; the clone shares the same
/// memoized cache as the original.
pub struct LazyStream<T> {
    thunk: Thunk<T>,
    cache: Rc<OnceCell<Node<T>>>,
}

impl<T> Clone for LazyStream<T> {
    fn clone(&self) -> Self {
        Self {
            thunk: Rc::clone(&self.thunk),
            cache: Rc::clone(&self.cache),
        }
    }
}

impl<T: Clone + 'static> LazyStream<T> {
    /// The empty stream.
    pub fn empty() -> Self {
        Self {
            thunk: Rc::new(|| None),
            cache: Rc::new(OnceCell::new()),
        }
    }

    /// Build a stream whose head and tail are computed lazily by `f`,
    /// forced (and cached) on first demand.
    pub fn from_fn(f: impl Fn() -> Node<T> + 'static) -> Self {
        Self {
            thunk: Rc::new(f),
            cache: Rc::new(OnceCell::new()),
        }
    }

    /// A single-element stream.
    pub fn once(value: T) -> Self {
        Self::from_fn(move || Some((value.clone(), LazyStream::empty())))
    }

    /// Build a stream from an eagerly-known `Vec`, still forced lazily one
    /// element at a time.
    pub fn from_vec(values: Vec<T>) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        let mut iter = values.into_iter();
        let head = iter.next().expect("checked non-empty above");
        let rest: Vec<T> = iter.collect();
        Self::from_fn(move || Some((head.clone(), LazyStream::from_vec(rest.clone()))))
    }

    fn force(&self) -> &Node<T> {
        self.cache.get_or_init(|| (self.thunk)())
    }

    /// Whether the stream has no elements. Forces the head.
    pub fn is_empty(&self) -> bool {
        self.force().is_none()
    }

    /// The first element, if any. Forces the head.
    pub fn head(&self) -> Option<T> {
        self.force().as_ref().map(|(h, _)| h.clone())
    }

    /// The remainder of the stream after the head. Forces the head.
    pub fn tail(&self) -> LazyStream<T> {
        match self.force() {
            Some((_, t)) => t.clone(),
            None => LazyStream::empty(),
        }
    }

    /// A fresh iterator over this stream, independent of any other
    /// iterator created from the same (or a cloned) stream.
    pub fn iterator(&self) -> LazyStreamIter<T> {
        LazyStreamIter {
            current: self.clone(),
        }
    }

    /// Keep only elements satisfying `pred`. May diverge on an infinite
    /// stream with no matching element — callers are expected to bound
    /// stream depth with [`LazyStream::take`] first if that is a concern.
    pub fn filter(&self, pred: impl Fn(&T) -> bool + Clone + 'static) -> LazyStream<T> {
        let this = self.clone();
        Self::from_fn(move || {
            let mut current = this.clone();
            loop {
                match current.force() {
                    None => return None,
                    Some((h, t)) => {
                        if pred(h) {
                            return Some((h.clone(), t.filter(pred.clone())));
                        }
                        current = t.clone();
                    }
                }
            }
        })
    }

    /// Map every element through `f`, lazily.
    pub fn transform<U: Clone + 'static>(
        &self,
        f: impl Fn(T) -> U + Clone + 'static,
    ) -> LazyStream<U> {
        let this = self.clone();
        LazyStream::from_fn(move || {
            this.force()
                .clone()
                .map(|(h, t)| (f(h), t.transform(f.clone())))
        })
    }

    /// Append `other` after this stream ends.
    pub fn concat(&self, other: LazyStream<T>) -> LazyStream<T> {
        let this = self.clone();
        Self::from_fn(move || match this.force() {
            Some((h, t)) => Some((h.clone(), t.concat(other.clone()))),
            None => other.force().clone(),
        })
    }

    /// Truncate to at most `n` elements.
    pub fn take(&self, n: usize) -> LazyStream<T> {
        if n == 0 {
            return Self::empty();
        }
        let this = self.clone();
        Self::from_fn(move || this.force().clone().map(|(h, t)| (h, t.take(n - 1))))
    }
}

/// Iterator produced by [`LazyStream::iterator`].
pub struct LazyStreamIter<T> {
    current: LazyStream<T>,
}

impl<T: Clone + 'static> Iterator for LazyStreamIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let (head, tail) = self.current.force().clone()?;
        self.current = tail;
        Some(head)
    }
}
