use crate::report::AssertReport;
use crate::verdict::Verdict;

/// Policy that turns a failed check into a verdict.
///
/// Exactly one handler is installed in the [`AssertionManager`](crate::AssertionManager)
/// at any time. Closures `Fn(&AssertReport) -> Verdict` are handlers too.
pub trait AssertHandler: Send + Sync {
    fn evaluate(&self, report: &AssertReport<'_>) -> Verdict;
}

impl<F> AssertHandler for F
where
    F: Fn(&AssertReport<'_>) -> Verdict + Send + Sync,
{
    #[inline]
    fn evaluate(&self, report: &AssertReport<'_>) -> Verdict {
        self(report)
    }
}
