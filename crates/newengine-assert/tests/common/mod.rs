#![allow(dead_code)]

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use newengine_assert::debugger::FixedProbe;
use newengine_assert::prompt::{AbortRetryIgnore, OkCancel, Presenter};
use newengine_assert::terminate::Terminator;
use newengine_assert::{AssertReport, AssertResult, AssertSink, DefaultAssertHandler, Severity};

/// Panic payload thrown instead of terminating the test process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminated {
    pub file: String,
    pub line: u32,
}

pub struct SentinelTerminator;

impl Terminator for SentinelTerminator {
    fn terminate(&self, report: &AssertReport<'_>) -> ! {
        panic::panic_any(Terminated {
            file: report.file.to_string(),
            line: report.line,
        })
    }
}

/// Runs `f`; returns `Err(Terminated)` if it ended in the terminator.
pub fn catch_terminate<T>(f: impl FnOnce() -> T) -> Result<T, Terminated> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(v) => Ok(v),
        Err(payload) => Err(into_terminated(payload)),
    }
}

fn into_terminated(payload: Box<dyn Any + Send>) -> Terminated {
    match payload.downcast::<Terminated>() {
        Ok(t) => *t,
        Err(other) => panic::resume_unwind(other),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    AbortRetryIgnore { title: String, message: String },
    OkCancel { title: String, message: String },
}

/// Presenter that answers from a script and remembers what it was shown.
#[derive(Clone, Default)]
pub struct ScriptedPresenter {
    three_way: Arc<Mutex<VecDeque<AbortRetryIgnore>>>,
    two_way: Arc<Mutex<VecDeque<OkCancel>>>,
    shown: Arc<Mutex<Vec<Shown>>>,
}

impl ScriptedPresenter {
    pub fn answering_three_way(answer: AbortRetryIgnore) -> Self {
        let p = Self::default();
        p.push_three_way(answer);
        p
    }

    pub fn answering_two_way(answer: OkCancel) -> Self {
        let p = Self::default();
        p.push_two_way(answer);
        p
    }

    pub fn push_three_way(&self, answer: AbortRetryIgnore) {
        self.three_way.lock().push_back(answer);
    }

    pub fn push_two_way(&self, answer: OkCancel) {
        self.two_way.lock().push_back(answer);
    }

    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().clone()
    }
}

impl Presenter for ScriptedPresenter {
    fn abort_retry_ignore(&self, title: &str, message: &str) -> AbortRetryIgnore {
        self.shown.lock().push(Shown::AbortRetryIgnore {
            title: title.to_string(),
            message: message.to_string(),
        });
        self.three_way
            .lock()
            .pop_front()
            .expect("unexpected Abort/Retry/Ignore prompt")
    }

    fn ok_cancel(&self, title: &str, message: &str) -> OkCancel {
        self.shown.lock().push(Shown::OkCancel {
            title: title.to_string(),
            message: message.to_string(),
        });
        self.two_way
            .lock()
            .pop_front()
            .expect("unexpected OK/Cancel prompt")
    }
}

/// Sink that keeps every line it receives.
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<(String, Severity)>>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<(String, Severity)> {
        self.lines.lock().clone()
    }
}

impl AssertSink for RecordingSink {
    fn write(&self, text: &str, severity: Severity) -> AssertResult<()> {
        self.lines.lock().push((text.to_string(), severity));
        Ok(())
    }
}

/// Default handler wired to test doubles.
pub fn handler(
    debugger: bool,
    presenter: &ScriptedPresenter,
    sink: &RecordingSink,
) -> DefaultAssertHandler {
    DefaultAssertHandler::builder()
        .probe(FixedProbe(debugger))
        .presenter(presenter.clone())
        .sink(sink.clone())
        .terminator(SentinelTerminator)
        .build()
}
