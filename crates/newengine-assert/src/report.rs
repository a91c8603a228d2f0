use std::fmt;

/// Prefix of every logged assertion line.
pub const LOG_PREFIX: &str = "ASSERTION FAILED:  ";

/// Indentation that aligns the location line under the diagnostic text.
pub const LOCATION_INDENT: &str = "\n                      FILE: ";

/// One failed check, alive only for the duration of a single report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssertReport<'a> {
    pub condition: Option<&'a str>,
    pub message: Option<&'a str>,
    pub file: &'a str,
    pub line: u32,
}

impl<'a> AssertReport<'a> {
    #[inline]
    pub fn new(
        condition: Option<&'a str>,
        message: Option<&'a str>,
        file: &'a str,
        line: u32,
    ) -> Self {
        Self {
            condition,
            message,
            file,
            line,
        }
    }

    /// Report without a boolean condition (`assert_forced!`).
    #[inline]
    pub fn forced(message: &'a str, file: &'a str, line: u32) -> Self {
        Self::new(None, Some(message), file, line)
    }

    #[inline]
    pub fn is_forced(&self) -> bool {
        self.condition().is_none()
    }

    /// Condition text, with empty text treated as absent.
    #[inline]
    pub fn condition(&self) -> Option<&'a str> {
        self.condition.filter(|c| !c.is_empty())
    }

    /// Message text, with empty text treated as absent.
    #[inline]
    pub fn message(&self) -> Option<&'a str> {
        self.message.filter(|m| !m.is_empty())
    }

    /// Human readable diagnostic: condition, then message, newline-separated when both exist.
    pub fn compose_message(&self) -> String {
        match (self.condition(), self.message()) {
            (Some(c), Some(m)) => {
                let mut out = String::with_capacity(c.len() + 1 + m.len());
                out.push_str(c);
                out.push('\n');
                out.push_str(m);
                out
            }
            (Some(c), None) => c.to_owned(),
            (None, Some(m)) => m.to_owned(),
            (None, None) => String::new(),
        }
    }

    /// Full line handed to the log sink.
    pub fn log_line(&self) -> String {
        format_log_line(&self.compose_message(), self.file, self.line)
    }
}

impl fmt::Display for AssertReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log_line())
    }
}

/// `ASSERTION FAILED:  <diagnostic>` followed by the aligned `FILE: .. LINE: ..` line.
pub fn format_log_line(diagnostic: &str, file: &str, line: u32) -> String {
    format!("{LOG_PREFIX}{diagnostic}{LOCATION_INDENT}{file} LINE: {line}")
}
