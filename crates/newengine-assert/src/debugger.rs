/// Answers "is an interactive debugging session attached right now?".
pub trait DebuggerProbe: Send + Sync {
    fn is_attached(&self) -> bool;
}

/// Detects a tracer attached to the current process.
///
/// Linux: non-zero `TracerPid` in `/proc/self/status`. Other platforms: never attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracerProbe;

impl DebuggerProbe for TracerProbe {
    #[inline]
    fn is_attached(&self) -> bool {
        debugger_attached()
    }
}

/// Fixed answer, used by config overrides and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedProbe(pub bool);

impl DebuggerProbe for FixedProbe {
    #[inline]
    fn is_attached(&self) -> bool {
        self.0
    }
}

#[cfg(target_os = "linux")]
pub fn debugger_attached() -> bool {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| parse_tracer_pid(&status))
        .is_some_and(|pid| pid != 0)
}

#[cfg(not(target_os = "linux"))]
pub fn debugger_attached() -> bool {
    false
}

/// Extracts `TracerPid` from the contents of `/proc/<pid>/status`.
pub fn parse_tracer_pid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|l| l.strip_prefix("TracerPid:"))
        .and_then(|v| v.trim().parse().ok())
}

/// Stops in the attached debugger, in the caller's frame.
///
/// Without a debugger a breakpoint trap would just kill the process with SIGTRAP,
/// so the process aborts instead. Execution continues after this call only if the
/// debugger resumes it.
#[inline(always)]
pub fn debug_break() {
    if !debugger_attached() {
        std::process::abort();
    }
    trap();
}

#[inline(always)]
fn trap() {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    // SAFETY: int3 only raises a breakpoint exception; no memory or registers are touched.
    unsafe {
        core::arch::asm!("int3", options(nomem, nostack));
    }

    #[cfg(target_arch = "aarch64")]
    // SAFETY: brk only raises a breakpoint exception.
    unsafe {
        core::arch::asm!("brk #0xf000", options(nomem, nostack));
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    std::process::abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "Name:\tgame\nState:\tS (sleeping)\nTracerPid:\t4242\nUid:\t1000\n";

    #[test]
    fn reads_tracer_pid() {
        assert_eq!(parse_tracer_pid(STATUS), Some(4242));
        assert_eq!(parse_tracer_pid("TracerPid:\t0\n"), Some(0));
        assert_eq!(parse_tracer_pid("Name:\tgame\n"), None);
    }

    #[test]
    fn fixed_probe_answers_as_told() {
        assert!(FixedProbe(true).is_attached());
        assert!(!FixedProbe(false).is_attached());
    }
}
