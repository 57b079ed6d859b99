//! Canonical JSON-like formatting for counterexamples and shrink traces.
//!
//! Kept as its own module rather than folded into the runner, the same
//! way the teacher isolates its test-runner reporting from the execution
//! loop itself — this is pure presentation, with no dependency on
//! generation or shrinking.

use std::fmt;

/// A formattable value: enough of JSON's data model to print
/// counterexamples without pulling in `serde_json`, which the teacher
/// does not depend on.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// Anything without a direct mapping above falls back to its own
    /// `Display`/`Debug` text, printed verbatim (not quoted).
    Raw(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{}", quote(s)),
            Value::List(items) => write_seq(f, '[', ']', items),
            Value::Set(items) => write_seq(f, '{', '}', items),
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Raw(s) => write!(f, "{s}"),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: char, close: char, items: &[Value]) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a tuple of argument values as `[v0, v1, ...]`, the form used
/// throughout the failure-report templates in [`format_failure`].
pub fn format_args(args: &[Value]) -> String {
    Value::List(args.to_vec()).to_string()
}

/// Converts a concrete generated type into the canonical [`Value`] model
/// used for reporting. Implemented for the primitive and container types
/// the generator combinators in [`crate::generator`] actually produce;
/// anything else falls back to [`Value::Raw`] via its `Debug` text.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! impl_to_value_int {
    ($($t:ty),+) => {
        $(impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Int(*self as i64)
            }
        })+
    };
}

impl_to_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Str((*self).to_string())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<K: ToValue, V: ToValue> ToValue for (K, V) {
    fn to_value(&self) -> Value {
        Value::List(vec![self.0.to_value(), self.1.to_value()])
    }
}

impl<A: ToValue, B: ToValue, C: ToValue> ToValue for (A, B, C) {
    fn to_value(&self) -> Value {
        Value::List(vec![self.0.to_value(), self.1.to_value(), self.2.to_value()])
    }
}

/// `property failed (simplest args found by shrinking): <json-args>`
/// followed by one `shrinking found simpler failing arg <index>:
/// <json-args>` line per recorded shrink step, or the "(args found)"
/// variant with the original error when shrinking never improved on the
/// first failure.
pub fn format_failure(original_error: &str, steps: &[(Vec<Value>, Option<usize>)]) -> String {
    let Some((final_args, _)) = steps.last() else {
        return format!("property failed (args found): []\n  {original_error}");
    };

    if steps.len() == 1 && steps[0].1.is_none() {
        return format!(
            "property failed (args found): {}\n  {original_error}",
            format_args(final_args)
        );
    }

    let mut out = format!(
        "property failed (simplest args found by shrinking): {}",
        format_args(final_args)
    );
    for (args, shrunk_index) in steps.iter().skip(1) {
        if let Some(index) = shrunk_index {
            out.push_str(&format!(
                "\n  shrinking found simpler failing arg {index}: {}",
                format_args(args)
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_value_converts_primitives_and_vecs() {
        assert_eq!(42i64.to_value(), Value::Int(42));
        assert_eq!(true.to_value(), Value::Bool(true));
        assert_eq!(vec![1i64, 2, 3].to_value(), Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn strings_are_double_quoted() {
        assert_eq!(Value::Str("hi".to_string()).to_string(), "\"hi\"");
    }

    #[test]
    fn quote_escapes_backslash_and_inner_quotes() {
        assert_eq!(
            Value::Str("a\"b\\c".to_string()).to_string(),
            "\"a\\\"b\\\\c\""
        );
    }

    #[test]
    fn lists_use_square_brackets() {
        let v = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(v.to_string(), "[1, 2]");
    }

    #[test]
    fn sets_use_curly_brackets_without_keys() {
        let v = Value::Set(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(v.to_string(), "{1, 2}");
    }

    #[test]
    fn maps_print_ordered_key_value_pairs() {
        let v = Value::Map(vec![
            (Value::Str("a".to_string()), Value::Int(1)),
            (Value::Str("b".to_string()), Value::Int(2)),
        ]);
        assert_eq!(v.to_string(), "{\"a\": 1, \"b\": 2}");
    }

    #[test]
    fn null_and_bool_render_bare() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn format_failure_with_no_shrink_step_uses_args_found_form() {
        let steps = vec![(vec![Value::Int(5)], None)];
        let out = format_failure("assertion failed", &steps);
        assert!(out.starts_with("property failed (args found): [5]"));
        assert!(out.contains("assertion failed"));
    }

    #[test]
    fn format_failure_with_shrink_steps_lists_each_one() {
        let steps = vec![
            (vec![Value::Int(10)], None),
            (vec![Value::Int(3)], Some(0)),
            (vec![Value::Int(0)], Some(0)),
        ];
        let out = format_failure("assertion failed", &steps);
        assert!(out.starts_with("property failed (simplest args found by shrinking): [0]"));
        assert!(out.contains("shrinking found simpler failing arg 0: [3]"));
        assert!(out.contains("shrinking found simpler failing arg 0: [0]"));
    }
}
