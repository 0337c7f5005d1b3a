//! Leveled runtime checks.
//!
//! Cheap checks are always active. The expensive ones, such as re-checking that a model satisfies
//! every clause, only run in tests and with the `debug-checks` feature.

pub const KESTREL_ASSERT_SIMPLE: u8 = 1;
pub const KESTREL_ASSERT_MODERATE: u8 = 2;
pub const KESTREL_ASSERT_ADVANCED: u8 = 3;

#[cfg(any(test, feature = "debug-checks"))]
pub const KESTREL_ASSERT_LEVEL_DEFINITION: u8 = KESTREL_ASSERT_ADVANCED;

#[cfg(not(any(test, feature = "debug-checks")))]
pub const KESTREL_ASSERT_LEVEL_DEFINITION: u8 = KESTREL_ASSERT_SIMPLE;

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_at {
    ($level:ident, $check:ident, $($arg:tt)*) => {
        if $crate::asserts::KESTREL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::$level {
            $check!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_simple {
    ($($arg:tt)*) => {
        $crate::kestrel_assert_at!(KESTREL_ASSERT_SIMPLE, assert, $($arg)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_eq_simple {
    ($($arg:tt)*) => {
        $crate::kestrel_assert_at!(KESTREL_ASSERT_SIMPLE, assert_eq, $($arg)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_moderate {
    ($($arg:tt)*) => {
        $crate::kestrel_assert_at!(KESTREL_ASSERT_MODERATE, assert, $($arg)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! kestrel_assert_advanced {
    ($($arg:tt)*) => {
        $crate::kestrel_assert_at!(KESTREL_ASSERT_ADVANCED, assert, $($arg)*)
    };
}
