use std::sync::Arc;
use std::time::Duration;

use parking_lot::ReentrantMutex;

use crate::config::{AssertConfig, DebuggerDetection, PromptMode};
use crate::debugger::{DebuggerProbe, FixedProbe, TracerProbe};
use crate::handler::AssertHandler;
use crate::prompt::{AbortRetryIgnore, AbortingPresenter, OkCancel, Presenter, TerminalPresenter};
use crate::report::AssertReport;
use crate::sink::{AssertSink, FileSink, LogSink, Severity, TeeSink, ASSERT_LOG_TARGET};
use crate::terminate::{AbortTerminator, Terminator};
use crate::verdict::Verdict;

/// One prompt on screen at a time, process-wide. Reentrant so that a fault raised on
/// the presenting thread itself (inside a presenter or sink) still gets through.
static PRESENTATION: ReentrantMutex<()> = ReentrantMutex::new(());

/// Decision protocol states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Idle,
    Presenting { debugger: bool },
    /// Terminal: the terminator runs, no verdict is produced.
    Aborting,
    /// Terminal: verdict `Halt`.
    BreakRequested,
    /// Terminal: verdict `Continue`.
    Resuming,
}

impl DecisionState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DecisionState::Aborting | DecisionState::BreakRequested | DecisionState::Resuming
        )
    }

    /// Verdict carried by a state. Non-terminal states carry the default `Halt`.
    #[inline]
    pub fn verdict(self) -> Verdict {
        match self {
            DecisionState::Resuming => Verdict::Continue,
            _ => Verdict::Halt,
        }
    }
}

impl From<AbortRetryIgnore> for DecisionState {
    #[inline]
    fn from(choice: AbortRetryIgnore) -> Self {
        match choice {
            AbortRetryIgnore::Abort => DecisionState::Aborting,
            AbortRetryIgnore::Retry => DecisionState::BreakRequested,
            AbortRetryIgnore::Ignore => DecisionState::Resuming,
        }
    }
}

impl From<OkCancel> for DecisionState {
    #[inline]
    fn from(choice: OkCancel) -> Self {
        match choice {
            OkCancel::Ok => DecisionState::Resuming,
            OkCancel::Cancel => DecisionState::Aborting,
        }
    }
}

/// Runs the Idle -> Presenting -> {Aborting, BreakRequested, Resuming} machine once.
pub struct DecisionProtocol<'a> {
    title: &'a str,
    probe: &'a dyn DebuggerProbe,
    presenter: &'a dyn Presenter,
    terminator: &'a dyn Terminator,
    state: DecisionState,
}

impl<'a> DecisionProtocol<'a> {
    pub fn new(
        title: &'a str,
        probe: &'a dyn DebuggerProbe,
        presenter: &'a dyn Presenter,
        terminator: &'a dyn Terminator,
    ) -> Self {
        Self {
            title,
            probe,
            presenter,
            terminator,
            state: DecisionState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> DecisionState {
        self.state
    }

    fn transition(&mut self, next: DecisionState) {
        log::trace!(target: ASSERT_LOG_TARGET, "decision {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Asks the human and returns the verdict. `Aborting` never returns.
    pub fn run(&mut self, report: &AssertReport<'_>, message: &str) -> Verdict {
        let debugger = self.probe.is_attached();
        self.transition(DecisionState::Presenting { debugger });

        let next = if debugger {
            DecisionState::from(self.presenter.abort_retry_ignore(self.title, message))
        } else {
            DecisionState::from(self.presenter.ok_cancel(self.title, message))
        };
        self.transition(next);

        if self.state == DecisionState::Aborting {
            self.terminator.terminate(report);
        }
        self.state.verdict()
    }
}

/// Built-in handler: compose, log, then ask.
pub struct DefaultAssertHandler {
    title: String,
    sink: Arc<dyn AssertSink>,
    presenter: Arc<dyn Presenter>,
    probe: Arc<dyn DebuggerProbe>,
    terminator: Arc<dyn Terminator>,
}

impl DefaultAssertHandler {
    /// Log facade sink, stdin prompt, platform debugger detection, SIGABRT.
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[inline]
    pub fn builder() -> DefaultAssertHandlerBuilder {
        DefaultAssertHandlerBuilder::default()
    }

    /// Builds the handler described by `cfg`.
    ///
    /// Nothing is opened here; a configured log file is created on the first report.
    pub fn from_config(cfg: &AssertConfig) -> Self {
        DefaultAssertHandlerBuilder::from_config(cfg).build()
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sends the log line; failures are swallowed so they never mask the fault itself.
    fn forward(&self, report: &AssertReport<'_>) {
        if let Err(e) = self.sink.write(&report.log_line(), Severity::Assert) {
            log::warn!(target: "newengine::assert::sink", "assert sink failed: {e}");
        }
    }
}

impl Default for DefaultAssertHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl AssertHandler for DefaultAssertHandler {
    fn evaluate(&self, report: &AssertReport<'_>) -> Verdict {
        let message = report.compose_message();
        self.forward(report);

        let _presenting = PRESENTATION.lock();
        DecisionProtocol::new(
            &self.title,
            self.probe.as_ref(),
            self.presenter.as_ref(),
            self.terminator.as_ref(),
        )
        .run(report, &message)
    }
}

/// Explicit composition of a [`DefaultAssertHandler`]. Unset parts use the defaults.
#[derive(Default)]
pub struct DefaultAssertHandlerBuilder {
    title: Option<String>,
    sink: Option<Arc<dyn AssertSink>>,
    presenter: Option<Arc<dyn Presenter>>,
    probe: Option<Arc<dyn DebuggerProbe>>,
    terminator: Option<Arc<dyn Terminator>>,
}

impl DefaultAssertHandlerBuilder {
    /// Builder preloaded from `cfg`. Parts set afterwards override the configured ones.
    pub fn from_config(cfg: &AssertConfig) -> Self {
        let mut b = Self::default().title(cfg.title.clone());

        b = match cfg.debugger {
            DebuggerDetection::Auto => b,
            DebuggerDetection::Attached => b.probe(FixedProbe(true)),
            DebuggerDetection::Detached => b.probe(FixedProbe(false)),
        };

        b = match cfg.prompt {
            PromptMode::Terminal => b,
            PromptMode::Abort => b.presenter(AbortingPresenter),
        };

        if let Some(path) = cfg.log_file.as_deref() {
            let file =
                FileSink::new(path).with_timeout(Duration::from_millis(cfg.sink_timeout_ms));
            b = b.sink(TeeSink::new().with(LogSink).with(file));
        }

        b
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn sink(mut self, sink: impl AssertSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Arc::new(presenter));
        self
    }

    pub fn probe(mut self, probe: impl DebuggerProbe + 'static) -> Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    pub fn terminator(mut self, terminator: impl Terminator + 'static) -> Self {
        self.terminator = Some(Arc::new(terminator));
        self
    }

    pub fn build(self) -> DefaultAssertHandler {
        DefaultAssertHandler {
            title: self.title.unwrap_or_else(|| AssertConfig::default().title),
            sink: self.sink.unwrap_or_else(|| Arc::new(LogSink)),
            presenter: self
                .presenter
                .unwrap_or_else(|| Arc::new(TerminalPresenter::stdio())),
            probe: self.probe.unwrap_or_else(|| Arc::new(TracerProbe)),
            terminator: self.terminator.unwrap_or_else(|| Arc::new(AbortTerminator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_map_to_terminal_states() {
        assert_eq!(DecisionState::from(AbortRetryIgnore::Abort), DecisionState::Aborting);
        assert_eq!(DecisionState::from(AbortRetryIgnore::Retry), DecisionState::BreakRequested);
        assert_eq!(DecisionState::from(AbortRetryIgnore::Ignore), DecisionState::Resuming);
        assert_eq!(DecisionState::from(OkCancel::Ok), DecisionState::Resuming);
        assert_eq!(DecisionState::from(OkCancel::Cancel), DecisionState::Aborting);
    }

    #[test]
    fn only_resuming_continues() {
        assert_eq!(DecisionState::Idle.verdict(), Verdict::Halt);
        assert_eq!(
            DecisionState::Presenting { debugger: false }.verdict(),
            Verdict::Halt
        );
        assert_eq!(DecisionState::BreakRequested.verdict(), Verdict::Halt);
        assert_eq!(DecisionState::Resuming.verdict(), Verdict::Continue);
        assert!(!DecisionState::Idle.is_terminal());
        assert!(DecisionState::Aborting.is_terminal());
    }
}
