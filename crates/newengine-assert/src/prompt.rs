use std::io::{self, BufRead, BufReader, Write};

use parking_lot::Mutex;

/// Answer to the three-way prompt shown when a debugger is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortRetryIgnore {
    Abort,
    Retry,
    Ignore,
}

/// Answer to the degraded two-way prompt shown without a debugger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OkCancel {
    Ok,
    Cancel,
}

impl AbortRetryIgnore {
    /// Accepts `a`/`r`/`i` or the full word, case-insensitive.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "a" | "abort" => Some(Self::Abort),
            "r" | "retry" => Some(Self::Retry),
            "i" | "ignore" => Some(Self::Ignore),
            _ => None,
        }
    }
}

impl OkCancel {
    /// Accepts `o`/`c` or the full word, case-insensitive.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "o" | "ok" => Some(Self::Ok),
            "c" | "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Platform surface that asks a human what to do about a failed assertion.
///
/// Both calls block until an answer exists.
pub trait Presenter: Send + Sync {
    fn abort_retry_ignore(&self, title: &str, message: &str) -> AbortRetryIgnore;
    fn ok_cancel(&self, title: &str, message: &str) -> OkCancel;
}

/// Headless presenter: never consents to continue.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbortingPresenter;

impl Presenter for AbortingPresenter {
    #[inline]
    fn abort_retry_ignore(&self, _title: &str, _message: &str) -> AbortRetryIgnore {
        AbortRetryIgnore::Abort
    }

    #[inline]
    fn ok_cancel(&self, _title: &str, _message: &str) -> OkCancel {
        OkCancel::Cancel
    }
}

struct TerminalIo<R, W> {
    input: R,
    output: W,
}

/// Text-mode message box.
///
/// Prints the message to the output stream and reads answer lines until one parses.
/// An empty line picks `Retry` in the three-way prompt; the two-way prompt has no
/// default. End of input (or a read error) counts as no consent: `Abort` / `Cancel`.
///
/// The streams stay locked for the whole prompt, so a fault raised from inside the
/// reader or writer themselves would block.
pub struct TerminalPresenter<R = BufReader<io::Stdin>, W = io::Stderr> {
    io: Mutex<TerminalIo<R, W>>,
}

impl TerminalPresenter {
    /// stdin / stderr presenter.
    pub fn stdio() -> Self {
        Self::with_io(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R, W> TerminalPresenter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn with_io(input: R, output: W) -> Self {
        Self {
            io: Mutex::new(TerminalIo { input, output }),
        }
    }

    /// Gives back the streams.
    pub fn into_io(self) -> (R, W) {
        let io = self.io.into_inner();
        (io.input, io.output)
    }

    fn ask<T>(
        &self,
        title: &str,
        message: &str,
        choices: &str,
        parse: impl Fn(&str) -> Option<T>,
        default: Option<T>,
        no_answer: T,
    ) -> T {
        let mut guard = self.io.lock();
        let TerminalIo { input, output } = &mut *guard;

        // Output errors are ignored; the answer still has to be read.
        let _ = write_box(output, title, message);

        let mut line = String::new();
        loop {
            let _ = write!(output, "{choices} > ");
            let _ = output.flush();

            line.clear();
            match input.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    let _ = writeln!(output);
                    return no_answer;
                }
                Ok(_) => {}
            }

            if let Some(answer) = parse(&line) {
                return answer;
            }
            if line.trim().is_empty() {
                if let Some(answer) = default {
                    return answer;
                }
            }
            let _ = writeln!(output, "unrecognized choice: '{}'", line.trim());
        }
    }
}

impl<R, W> Presenter for TerminalPresenter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn abort_retry_ignore(&self, title: &str, message: &str) -> AbortRetryIgnore {
        self.ask(
            title,
            message,
            "[A]bort / [R]etry / [I]gnore (Enter: retry)",
            AbortRetryIgnore::parse,
            Some(AbortRetryIgnore::Retry),
            AbortRetryIgnore::Abort,
        )
    }

    fn ok_cancel(&self, title: &str, message: &str) -> OkCancel {
        self.ask(
            title,
            message,
            "[O]k / [C]ancel",
            OkCancel::parse,
            None,
            OkCancel::Cancel,
        )
    }
}

fn write_box(out: &mut impl Write, title: &str, message: &str) -> io::Result<()> {
    let width = message
        .lines()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0);
    let rule = "=".repeat(width + 4);

    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "  {title}")?;
    writeln!(out, "{rule}")?;
    for line in message.lines() {
        writeln!(out, "  {line}")?;
    }
    writeln!(out, "{rule}")
}
