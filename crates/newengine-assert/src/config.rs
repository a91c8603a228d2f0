use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AssertError, AssertResult};

pub const ENV_DEBUGGER: &str = "NEWENGINE_ASSERT_DEBUGGER";
pub const ENV_PROMPT: &str = "NEWENGINE_ASSERT_PROMPT";
pub const ENV_LOG_FILE: &str = "NEWENGINE_ASSERT_LOG";
pub const ENV_TIMEOUT_MS: &str = "NEWENGINE_ASSERT_TIMEOUT_MS";

/// How the default handler decides whether a debugger is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebuggerDetection {
    /// Ask the platform.
    #[default]
    Auto,
    /// Always show Abort / Retry / Ignore.
    Attached,
    /// Always show OK / Cancel.
    Detached,
}

impl FromStr for DebuggerDetection {
    type Err = AssertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "attached" | "1" | "on" => Ok(Self::Attached),
            "detached" | "0" | "off" => Ok(Self::Detached),
            _ => Err(AssertError::invalid(ENV_DEBUGGER, s)),
        }
    }
}

/// Where the decision is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Text prompt on stdin / stderr.
    #[default]
    Terminal,
    /// Headless: every fault ends the process.
    Abort,
}

impl FromStr for PromptMode {
    type Err = AssertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" => Ok(Self::Terminal),
            "abort" => Ok(Self::Abort),
            _ => Err(AssertError::invalid(ENV_PROMPT, s)),
        }
    }
}

/// `[assert]` section of the engine config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertConfig {
    #[serde(default)]
    pub debugger: DebuggerDetection,
    #[serde(default)]
    pub prompt: PromptMode,
    /// Optional file that receives every assertion line in addition to the log facade.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_sink_timeout_ms")]
    pub sink_timeout_ms: u64,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_sink_timeout_ms() -> u64 { 250 }
fn default_title() -> String { "Assertion failed".to_string() }

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            debugger: DebuggerDetection::default(),
            prompt: PromptMode::default(),
            log_file: None,
            sink_timeout_ms: default_sink_timeout_ms(),
            title: default_title(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RootToml {
    #[serde(default)]
    assert: Option<AssertConfig>,
}

impl AssertConfig {
    /// Defaults with environment overrides applied. Invalid values are logged and skipped.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        for err in cfg.apply_env() {
            log::warn!(target: crate::sink::ASSERT_LOG_TARGET, "ignoring env override: {err}");
        }
        cfg
    }

    /// Reads the `[assert]` table of a TOML file. A file without the table yields defaults.
    pub fn load_toml(path: impl AsRef<Path>) -> AssertResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AssertError::io(path, e))?;
        Self::parse_toml(&text).map_err(|source| AssertError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse_toml(text: &str) -> Result<Self, toml::de::Error> {
        let root: RootToml = toml::from_str(text)?;
        Ok(root.assert.unwrap_or_default())
    }

    /// Applies `NEWENGINE_ASSERT_*` variables from the process environment.
    /// Returns the rejected values; the matching fields keep their previous value.
    pub fn apply_env(&mut self) -> Vec<AssertError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`apply_env`](Self::apply_env) with a custom variable lookup.
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Vec<AssertError> {
        let mut rejected = Vec::new();

        if let Some(v) = var(ENV_DEBUGGER) {
            match v.parse() {
                Ok(d) => self.debugger = d,
                Err(e) => rejected.push(e),
            }
        }

        if let Some(v) = var(ENV_PROMPT) {
            match v.parse() {
                Ok(p) => self.prompt = p,
                Err(e) => rejected.push(e),
            }
        }

        if let Some(v) = var(ENV_LOG_FILE) {
            let v = v.trim();
            self.log_file = (!v.is_empty()).then(|| PathBuf::from(v));
        }

        if let Some(v) = var(ENV_TIMEOUT_MS) {
            match v.trim().parse::<u64>() {
                Ok(ms) => self.sink_timeout_ms = ms,
                Err(_) => rejected.push(AssertError::invalid(ENV_TIMEOUT_MS, v)),
            }
        }

        rejected
    }
}
