use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::config::AssertConfig;
use crate::default_handler::DefaultAssertHandler;
use crate::handler::AssertHandler;
use crate::report::AssertReport;
use crate::verdict::Verdict;

static MANAGER: OnceLock<AssertionManager> = OnceLock::new();

/// Process-wide owner of the installed [`AssertHandler`].
///
/// There is never an "unset" state: the slot starts with a [`DefaultAssertHandler`]
/// and every replacement swaps in another handler.
pub struct AssertionManager {
    handler: RwLock<Arc<dyn AssertHandler>>,
}

impl AssertionManager {
    /// The global manager, created on first access.
    ///
    /// Creation is synchronized; every thread observes the same instance.
    #[inline]
    pub fn instance() -> &'static AssertionManager {
        MANAGER.get_or_init(AssertionManager::new_default)
    }

    /// Standalone manager with a default handler configured from the environment.
    pub fn new_default() -> Self {
        Self::with_handler(DefaultAssertHandler::from_config(&AssertConfig::from_env()))
    }

    /// Standalone manager with an explicit initial handler.
    pub fn with_handler(handler: impl AssertHandler + 'static) -> Self {
        Self {
            handler: RwLock::new(Arc::new(handler)),
        }
    }

    /// Currently installed handler.
    #[inline]
    pub fn handler(&self) -> Arc<dyn AssertHandler> {
        self.handler.read().clone()
    }

    /// Replaces the handler for every subsequent report.
    ///
    /// Reports already running keep their own reference to the previous handler.
    #[inline]
    pub fn set_handler(&self, handler: impl AssertHandler + 'static) {
        self.set_handler_arc(Arc::new(handler));
    }

    /// Closure form of [`set_handler`](Self::set_handler).
    #[inline]
    pub fn set_handler_fn<F>(&self, f: F)
    where
        F: Fn(&AssertReport<'_>) -> Verdict + Send + Sync + 'static,
    {
        self.set_handler_arc(Arc::new(f));
    }

    /// Installs a shared handler; returns the previous one.
    pub fn set_handler_arc(&self, handler: Arc<dyn AssertHandler>) -> Arc<dyn AssertHandler> {
        std::mem::replace(&mut *self.handler.write(), handler)
    }

    /// Reinstalls a fresh default handler.
    pub fn reset_handler(&self) {
        self.set_handler(DefaultAssertHandler::from_config(&AssertConfig::from_env()));
    }

    /// Entry point of every failed check. Returns the handler's verdict unchanged.
    pub fn report(
        &self,
        condition: Option<&str>,
        message: Option<&str>,
        file: &str,
        line: u32,
    ) -> Verdict {
        let report = AssertReport::new(condition, message, file, line);
        self.report_with(&report)
    }

    /// Same as [`report`](Self::report) for a prebuilt report.
    pub fn report_with(&self, report: &AssertReport<'_>) -> Verdict {
        // Lock is released before the handler runs; handlers may swap the slot or
        // report nested faults.
        let handler = self.handler();
        handler.evaluate(report)
    }
}

impl fmt::Debug for AssertionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionManager").finish_non_exhaustive()
    }
}
