/// Outcome of a fault report.
///
/// `Halt` is the default: unless a human (or a handler) explicitly decides to continue,
/// the check site must stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    /// Break into the debugger (or abort when none is attached).
    #[default]
    Halt,
    /// Resume past the failed check.
    Continue,
}

impl Verdict {
    #[inline]
    pub fn is_halt(self) -> bool {
        matches!(self, Verdict::Halt)
    }
}

impl From<bool> for Verdict {
    /// `true` means "halt execution", matching the boolean report contract.
    #[inline]
    fn from(halt: bool) -> Self {
        if halt {
            Verdict::Halt
        } else {
            Verdict::Continue
        }
    }
}
