//! Language-level errors are plain [`Value::Error`](crate::interpreter::Value::Error) values.
//! These macros build them and guard builtin preconditions.

/// Build an error value from a format string.
#[macro_export]
macro_rules! lerr {
    ($($arg:tt)*) => (
        $crate::interpreter::Value::Error(format!($($arg)*))
    )
}

/// Return an error value from the enclosing function unless `cond` holds.
#[macro_export]
macro_rules! lassert {
    ($cond:expr, $($arg:tt)*) => (
        if !($cond) {
            return $crate::lerr!($($arg)*);
        }
    )
}

#[macro_export]
macro_rules! lassert_num {
    ($op:expr, $args:expr, $n:expr) => (
        $crate::lassert!(
            $args.len() == $n,
            "Function '{}' passed incorrect number of arguments. Got {}, Expected {}.",
            $op, $args.len(), $n
        )
    )
}

#[macro_export]
macro_rules! lassert_type {
    ($op:expr, $args:expr, $i:expr, $variant:ident, $expected:expr) => (
        $crate::lassert!(
            matches!($args[$i], $crate::interpreter::Value::$variant(..)),
            "Function '{}' passed incorrect type for argument {}. Got {}, Expected {}.",
            $op, $i, $args[$i].type_name(), $expected
        )
    )
}

#[macro_export]
macro_rules! lassert_not_empty {
    ($op:expr, $args:expr, $i:expr) => (
        $crate::lassert!(
            !matches!($args[$i], $crate::interpreter::Value::LiteralList(ref cells) if cells.is_empty()),
            "Function '{}' passed {{}} for argument {}.",
            $op, $i
        )
    )
}
