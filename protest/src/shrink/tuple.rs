//! Tuple shrinking: candidates alternate which position they shrink —
//! first try shrinking position 0 one step, then position 1, then
//! position 2, and so on, cycling — rather than fully exhausting one
//! position's shrink tree before moving to the next. This keeps a failing
//! multi-argument property from getting stuck minimizing only its first
//! argument.

use crate::lazy::LazyStream;
use crate::shrinkable::Shrinkable;

macro_rules! impl_tuple_shrink {
    ($fn_name:ident, ($($T:ident),+), ($($idx:tt),+), ($($field:ident),+)) => {
        pub fn $fn_name<$($T: Clone + 'static),+>(
            $($field: Shrinkable<$T>),+
        ) -> Shrinkable<($($T),+,)> {
            let value = ($($field.value().clone()),+,);
            Shrinkable::new(value, move || {
                alternate(vec![
                    $( $field.shrinks().transform({
                        let others = ($($field.clone()),+,);
                        move |shrunk| {
                            let mut out = ($(others.$idx.value().clone()),+,);
                            out.$idx = shrunk.into_value();
                            out
                        }
                    }) ),+
                ])
                .transform(|v| Shrinkable::unshrinkable(v))
            })
        }
    };
}

/// Round-robin merge of several streams: position 0 of each stream, then
/// position 1 of each, and so on.
fn alternate<T: Clone + 'static>(streams: Vec<LazyStream<T>>) -> LazyStream<T> {
    alternate_from(streams, 0)
}

fn alternate_from<T: Clone + 'static>(streams: Vec<LazyStream<T>>, start: usize) -> LazyStream<T> {
    if streams.is_empty() {
        return LazyStream::empty();
    }
    LazyStream::from_fn(move || {
        let n = streams.len();
        for offset in 0..n {
            let i = (start + offset) % n;
            if let Some(head) = streams[i].head() {
                let mut next_streams = streams.clone();
                next_streams[i] = streams[i].tail();
                return Some((head, alternate_from(next_streams, (i + 1) % n)));
            }
        }
        None
    })
}

impl_tuple_shrink!(shrink_tuple2, (A, B), (0, 1), (a, b));
impl_tuple_shrink!(shrink_tuple3, (A, B, C), (0, 1, 2), (a, b, c));
impl_tuple_shrink!(shrink_tuple4, (A, B, C, D), (0, 1, 2, 3), (a, b, c, d));
impl_tuple_shrink!(shrink_tuple5, (A, B, C, D, E), (0, 1, 2, 3, 4), (a, b, c, d, e));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shrink::int::shrink_signed;

    #[test]
    fn alternates_between_positions() {
        let s = shrink_tuple2(shrink_signed(4i64), shrink_signed(4i64));
        let children: Vec<(i64, i64)> = s.shrinks().iterator().take(4).map(|c| c.into_value()).collect();
        // position 0 shrinks first, then position 1, then back to 0, ...
        assert_eq!(children[0].0, 2);
        assert_eq!(children[0].1, 4);
        assert_eq!(children[1].0, 4);
        assert_eq!(children[1].1, 2);
    }

    #[test]
    fn tuple3_covers_all_positions() {
        let s = shrink_tuple3(shrink_signed(2i64), shrink_signed(2i64), shrink_signed(2i64));
        let children: Vec<(i64, i64, i64)> = s.shrinks().iterator().collect::<Vec<_>>().into_iter().map(|c| c.into_value()).collect();
        assert!(children.iter().any(|c| c.0 == 0 && c.1 == 2 && c.2 == 2));
        assert!(children.iter().any(|c| c.0 == 2 && c.1 == 0 && c.2 == 2));
        assert!(children.iter().any(|c| c.0 == 2 && c.1 == 2 && c.2 == 0));
    }
}
