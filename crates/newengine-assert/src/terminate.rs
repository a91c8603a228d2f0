use std::io::Write;

use crate::report::AssertReport;

/// Last step of the decision protocol when the human picks Abort / Cancel.
///
/// Never returns. Tests swap in an implementation that unwinds with a sentinel panic.
pub trait Terminator: Send + Sync {
    fn terminate(&self, report: &AssertReport<'_>) -> !;
}

/// Raises SIGABRT through `std::process::abort`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbortTerminator;

impl Terminator for AbortTerminator {
    fn terminate(&self, report: &AssertReport<'_>) -> ! {
        log::error!(
            target: crate::sink::ASSERT_LOG_TARGET,
            "aborting process after failed assertion at {}:{}",
            report.file,
            report.line
        );
        log::logger().flush();
        let _ = std::io::stderr().flush();
        std::process::abort()
    }
}
