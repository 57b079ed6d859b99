//! Concrete shrinkers: functions that turn a seed value into a
//! [`crate::shrinkable::Shrinkable`] tree of simpler alternatives. The
//! generator combinators in [`crate::generator`] call these to attach a
//! shrink tree to each value they draw.

pub mod array;
pub mod bool;
pub mod dict;
pub mod float;
pub mod int;
pub mod permutation;
pub mod set;
pub mod string;
pub mod tuple;

pub use self::array::shrink_array;
pub use self::bool::shrink_bool;
pub use self::dict::shrink_dict;
pub use self::float::shrink_float;
pub use self::int::{shrink_signed, shrink_unsigned};
pub use self::permutation::shrink_permutation;
pub use self::set::shrink_set;
pub use self::string::{shrink_char, shrink_string};
pub use self::tuple::{shrink_tuple2, shrink_tuple3, shrink_tuple4, shrink_tuple5};
