//! Runtime configuration.

use std::fmt;

/// Environment variable holding the SQL trace level.
pub const TRACE_ENV: &str = "NDO_TRACE_LEVEL";

/// Which statements are traced, and at which `tracing` level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceLevel {
    /// No statement tracing. Failing statements are still reported.
    #[default]
    Off,
    Debug,
    Trace,
}

impl TraceLevel {
    /// `DEBUG` and `TRACE` (any case) enable tracing; anything else turns it off.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => TraceLevel::Debug,
            "TRACE" => TraceLevel::Trace,
            _ => TraceLevel::Off,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, TraceLevel::Off)
    }
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceLevel::Off => f.write_str("OFF"),
            TraceLevel::Debug => f.write_str("DEBUG"),
            TraceLevel::Trace => f.write_str("TRACE"),
        }
    }
}

/// Configuration for [`crate::Ndo`].
#[derive(Debug, Clone)]
pub struct NdoConfig {
    /// Statement trace level.
    pub trace: TraceLevel,
    /// Truncate traced SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for NdoConfig {
    fn default() -> Self {
        Self {
            trace: TraceLevel::Off,
            max_sql_length: Some(1000),
        }
    }
}

impl NdoConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the trace level read from `NDO_TRACE_LEVEL`.
    pub fn from_env() -> Self {
        let trace = std::env::var(TRACE_ENV)
            .map(|v| TraceLevel::parse(&v))
            .unwrap_or_default();
        Self::new().trace(trace)
    }

    /// Set the statement trace level.
    pub fn trace(mut self, level: TraceLevel) -> Self {
        self.trace = level;
        self
    }

    /// Set maximum SQL length to trace.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace_level() {
        assert_eq!(TraceLevel::parse("DEBUG"), TraceLevel::Debug);
        assert_eq!(TraceLevel::parse(" debug "), TraceLevel::Debug);
        assert_eq!(TraceLevel::parse("TRACE"), TraceLevel::Trace);
        assert_eq!(TraceLevel::parse("INFO"), TraceLevel::Off);
        assert_eq!(TraceLevel::parse(""), TraceLevel::Off);
    }

    #[test]
    fn test_builder() {
        let config = NdoConfig::new().trace(TraceLevel::Debug).no_truncate();
        assert!(config.trace.is_enabled());
        assert_eq!(config.max_sql_length, None);

        let config = NdoConfig::new().max_sql_length(10);
        assert!(!config.trace.is_enabled());
        assert_eq!(config.max_sql_length, Some(10));
    }
}
