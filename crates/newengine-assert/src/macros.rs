//! Check-site macros.
//!
//! On failure each macro reports through [`AssertionManager::instance`](crate::AssertionManager::instance)
//! and, on a `Halt` verdict, calls [`debug_break`](crate::debug_break) in the caller's frame.
//!
//! With the `disabled` feature all three compile to dead code: arguments are type-checked
//! but never evaluated, nothing is reported and control flow is untouched.

/// Reports `cond` when it evaluates to `false`.
///
/// ```ignore
/// assert_condition!(index < len);
/// ```
#[cfg(not(feature = "disabled"))]
#[macro_export]
macro_rules! assert_condition {
    ($cond:expr $(,)?) => {{
        if !($cond) {
            let verdict = $crate::AssertionManager::instance().report(
                ::core::option::Option::Some(::core::stringify!($cond)),
                ::core::option::Option::None,
                ::core::file!(),
                ::core::line!(),
            );
            if verdict.is_halt() {
                $crate::debug_break();
            }
        }
    }};
}

/// Reports `cond` with a formatted message when it evaluates to `false`.
///
/// ```ignore
/// assert_message!(hp >= 0, "hp underflow: {}", hp);
/// ```
#[cfg(not(feature = "disabled"))]
#[macro_export]
macro_rules! assert_message {
    ($cond:expr, $($arg:tt)+) => {{
        if !($cond) {
            let message = ::std::format!($($arg)+);
            let verdict = $crate::AssertionManager::instance().report(
                ::core::option::Option::Some(::core::stringify!($cond)),
                ::core::option::Option::Some(message.as_str()),
                ::core::file!(),
                ::core::line!(),
            );
            if verdict.is_halt() {
                $crate::debug_break();
            }
        }
    }};
}

/// Unconditional report with a formatted message.
///
/// ```ignore
/// assert_forced!("unknown asset kind {kind:?}");
/// ```
#[cfg(not(feature = "disabled"))]
#[macro_export]
macro_rules! assert_forced {
    ($($arg:tt)+) => {{
        let message = ::std::format!($($arg)+);
        let verdict = $crate::AssertionManager::instance().report(
            ::core::option::Option::None,
            ::core::option::Option::Some(message.as_str()),
            ::core::file!(),
            ::core::line!(),
        );
        if verdict.is_halt() {
            $crate::debug_break();
        }
    }};
}

#[cfg(feature = "disabled")]
#[macro_export]
macro_rules! assert_condition {
    ($cond:expr $(,)?) => {{
        if false {
            let _: bool = $cond;
        }
    }};
}

#[cfg(feature = "disabled")]
#[macro_export]
macro_rules! assert_message {
    ($cond:expr, $($arg:tt)+) => {{
        if false {
            let _: bool = $cond;
            let _ = ::std::format!($($arg)+);
        }
    }};
}

#[cfg(feature = "disabled")]
#[macro_export]
macro_rules! assert_forced {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::std::format!($($arg)+);
        }
    }};
}
