//! Run configuration, verbosity levels, and the wall-clock budget.
//!
//! [`RunConfig`] is built once from command-line options and handed by
//! reference to the task pool and the command pipelines. Nothing in the
//! workspace reads process-wide configuration.

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Upper bound on an explicit thread count.
pub const MAX_THREADS: usize = 1024;

// ── Verbosity ──────────────────────────────────────────────────────

/// How much the tools report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// Nothing at all.
    Quiet,
    /// Only unrecoverable failures.
    Fatal,
    /// Errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Stage summaries.
    #[default]
    Info,
    /// Per-stage and per-field detail. Forces single-threaded execution
    /// so log lines stay in order.
    Debug,
}

impl Verbosity {
    /// All levels, quietest first.
    pub const ALL: [Verbosity; 6] = [
        Self::Quiet,
        Self::Fatal,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
    ];

    /// Canonical token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// The `tracing` filter directive matching this level.
    ///
    /// `tracing` has no level above `ERROR`, so `Fatal` and `Error`
    /// share a directive.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "off",
            Self::Fatal | Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "quite" is accepted for compatibility with existing scripts.
            "quiet" | "quite" => Ok(Self::Quiet),
            "fatal" => Ok(Self::Fatal),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(ConfigError::UnknownVerbosity {
                token: s.to_string(),
            }),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building or validating a [`RunConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The verbosity token is not one of the recognised levels.
    UnknownVerbosity {
        /// The offending token.
        token: String,
    },
    /// An explicit thread count above [`MAX_THREADS`].
    InvalidThreadCount {
        /// The requested count.
        requested: usize,
    },
    /// A time limit of zero would abort before any work.
    ZeroTimeLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVerbosity { token } => write!(
                f,
                "unknown verbosity \"{token}\" (expected quiet, fatal, error, warn, info or debug)"
            ),
            Self::InvalidThreadCount { requested } => write!(
                f,
                "thread count {requested} exceeds the maximum of {MAX_THREADS}"
            ),
            Self::ZeroTimeLimit => write!(f, "time limit must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

// ── RunConfig ──────────────────────────────────────────────────────

/// Per-invocation settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Worker threads. `None` or `Some(0)` = all available hardware
    /// parallelism.
    pub threads: Option<usize>,
    /// Reporting level.
    pub verbosity: Verbosity,
    /// Overall wall-clock budget. `None` = unlimited.
    pub time_limit: Option<Duration>,
}

impl RunConfig {
    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.threads {
            if n > MAX_THREADS {
                return Err(ConfigError::InvalidThreadCount { requested: n });
            }
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }

    /// The number of worker threads to actually use.
    ///
    /// `Debug` verbosity always resolves to 1.
    pub fn resolved_thread_count(&self) -> usize {
        if self.verbosity >= Verbosity::Debug {
            return 1;
        }
        match self.threads {
            Some(n) if n > 0 => n.min(MAX_THREADS),
            _ => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }

    /// Start the wall-clock budget now.
    pub fn start_deadline(&self) -> Deadline {
        Deadline::new(self.time_limit)
    }
}

// ── Deadline ───────────────────────────────────────────────────────

/// A wall-clock budget started at a fixed instant.
///
/// Pipelines consult it between stages only; a stage that is already
/// running always completes.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Start a budget of `limit` (`None` = unlimited) now.
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// A budget that never expires.
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Time since the budget started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left, or `None` if unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|l| l.saturating_sub(self.elapsed()))
    }

    /// True once the budget is used up.
    pub fn expired(&self) -> bool {
        self.limit.is_some_and(|l| self.elapsed() >= l)
    }

    /// Fail with [`TimeLimitExceeded`] if the budget is used up.
    pub fn check(&self, stage: &str) -> Result<(), TimeLimitExceeded> {
        match self.limit {
            Some(limit) if self.elapsed() >= limit => Err(TimeLimitExceeded {
                stage: stage.to_string(),
                limit,
                elapsed: self.elapsed(),
            }),
            _ => Ok(()),
        }
    }
}

/// The wall-clock budget ran out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLimitExceeded {
    /// The stage after which the budget was checked.
    pub stage: String,
    /// The configured budget.
    pub limit: Duration,
    /// Time used when the check failed.
    pub elapsed: Duration,
}

impl fmt::Display for TimeLimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time limit of {:.3}s exceeded after {} ({:.3}s elapsed)",
            self.limit.as_secs_f64(),
            self.stage,
            self.elapsed.as_secs_f64()
        )
    }
}

impl Error for TimeLimitExceeded {}
