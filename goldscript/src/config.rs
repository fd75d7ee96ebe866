//! Run configuration consumed by the session and the entry points.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for a runner instance, shared by every script it runs.
///
/// Built with the `with_*` setters; the default runs without stress
/// reconnects, without fail-fast, with no directive flags defined and the
/// trace discarded.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub(crate) flags: BTreeMap<String, bool>,
    pub(crate) stress_reconnects: bool,
    pub(crate) fail_fast: bool,
    pub(crate) in_memory: bool,
    pub(crate) reconnect_seed: u64,
    pub(crate) reconnect_exempt: Vec<String>,
    pub(crate) collect_statements: bool,
    pub(crate) trace_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            flags: BTreeMap::new(),
            stress_reconnects: false,
            fail_fast: false,
            in_memory: false,
            reconnect_seed: 1,
            reconnect_exempt: Vec::new(),
            collect_statements: false,
            trace_path: None,
        }
    }
}

impl RunConfig {
    /// Start from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a directive flag. Scripts may only reference defined flags;
    /// `#+name#` keeps its line when the flag is true, `#-name#` when false.
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    /// Enable frequent-reconnect stress mode: before eligible statements the
    /// session reconnects with probability 1/10.
    pub fn with_stress_reconnects(mut self, enabled: bool) -> Self {
        self.stress_reconnects = enabled;
        self
    }

    /// Abort the whole run on the first expectation mismatch.
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Mark the engine's storage as volatile. Reconnecting would discard the
    /// database, so `@reconnect` lines and random reconnects are disabled.
    pub fn with_in_memory(mut self, enabled: bool) -> Self {
        self.in_memory = enabled;
        self
    }

    /// Seed for the per-script random source driving stress reconnects.
    /// Identical seeds reproduce identical reconnect decisions.
    pub fn with_reconnect_seed(mut self, seed: u64) -> Self {
        self.reconnect_seed = seed;
        self
    }

    /// Exempt a script (by the name passed to the run entry point) from
    /// random reconnects, for scripts whose semantics break across sessions.
    pub fn exempt_from_reconnect(mut self, script: impl Into<String>) -> Self {
        self.reconnect_exempt.push(script.into());
        self
    }

    /// Collect every executed statement text into the script report.
    pub fn with_statement_collection(mut self, enabled: bool) -> Self {
        self.collect_statements = enabled;
        self
    }

    /// Write the output trace to this file. The file is recreated per script
    /// by the path-based entry points; without a path the trace is discarded.
    pub fn with_trace_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace_path = Some(path.into());
        self
    }

    /// Value of a defined directive flag.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    pub(crate) fn reconnect_allowed_for(&self, script: &str) -> bool {
        !self.reconnect_exempt.iter().any(|s| s == script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Defaults: nothing enabled, seed 1, trace discarded.
    #[test]
    fn default_configuration() {
        let config = RunConfig::default();
        assert!(!config.stress_reconnects);
        assert!(!config.fail_fast);
        assert!(!config.in_memory);
        assert_eq!(config.reconnect_seed, 1);
        assert!(!config.collect_statements);
        assert!(config.trace_path.is_none());
        assert_eq!(config.flag("anything"), None);
    }

    /// Setters chain and exemptions match by exact script name.
    #[test]
    fn builder_and_exemptions() {
        let config = RunConfig::new()
            .with_flag("fast", true)
            .with_stress_reconnects(true)
            .with_reconnect_seed(7)
            .exempt_from_reconnect("scripts/random.sql");
        assert_eq!(config.flag("fast"), Some(true));
        assert!(config.stress_reconnects);
        assert_eq!(config.reconnect_seed, 7);
        assert!(!config.reconnect_allowed_for("scripts/random.sql"));
        assert!(config.reconnect_allowed_for("scripts/other.sql"));
    }
}
