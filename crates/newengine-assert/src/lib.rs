//! NewEngine assertions.
//!
//! Failed checks go through one process-wide [`AssertionManager`], which hands them to
//! the installed [`AssertHandler`]. The built-in [`DefaultAssertHandler`] logs the
//! failure and asks the developer whether to abort, break into the debugger, or go on.
//!
//! ```ignore
//! use newengine_assert::{assert_condition, assert_message, assert_forced};
//!
//! assert_condition!(frame_index > 0);
//! assert_message!(slot.is_some(), "texture slot {} empty", id);
//! assert_forced!("unreachable render path");
//! ```

pub mod config;
pub mod debugger;
pub mod default_handler;
pub mod error;
pub mod handler;
pub mod manager;
pub mod prompt;
pub mod report;
pub mod sink;
pub mod terminate;
pub mod verdict;

mod macros;

pub use config::AssertConfig;
pub use debugger::debug_break;
pub use default_handler::DefaultAssertHandler;
pub use error::{AssertError, AssertResult};
pub use handler::AssertHandler;
pub use manager::AssertionManager;
pub use report::AssertReport;
pub use sink::{AssertSink, Severity, ASSERT_LOG_TARGET};
pub use verdict::Verdict;

/// `false` when the crate was built with the `disabled` feature.
#[inline]
pub const fn asserts_enabled() -> bool {
    !cfg!(feature = "disabled")
}
