use std::fmt;
use std::str::FromStr;

use crate::error::LogError;

/// Severity levels accepted by the logger.
///
/// The set and its ordering follow the syslog tradition: `Emergency` is the
/// most urgent tier, `Debug` the least, and the derived ordering matches the
/// syslog numbering (`Emergency < Debug`). Level names are matched exactly
/// and case-sensitively; `"error"` is a level, `"Error"` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Level {
    /// Every level, most urgent first.
    pub const ALL: [Level; 8] = [
        Level::Emergency,
        Level::Alert,
        Level::Critical,
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Info,
        Level::Debug,
    ];

    /// Lower-case name of the level as it appears in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Emergency => "emergency",
            Level::Alert => "alert",
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    /// Look up a level by its exact name. No case folding, no trimming.
    pub fn from_name(name: &str) -> Option<Level> {
        Level::ALL.into_iter().find(|level| level.as_str() == name)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_name(s).ok_or_else(|| LogError::UnsupportedLevel(s.to_string()))
    }
}

/// Mapping from the `log` facade's five levels onto the eight-member set.
/// `Trace` folds into `Debug`; the set has no finer tier.
impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Debug,
        }
    }
}
