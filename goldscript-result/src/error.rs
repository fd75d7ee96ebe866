use std::io;
use thiserror::Error;

/// Unified error type for all goldscript operations.
///
/// Every variant describes a condition that stops the runner, not a condition
/// produced by the engine under test. Engine-raised execution errors are part
/// of the comparison protocol and are modeled as statement outcomes in the
/// runner crate, so a failing `INSERT` in a script never surfaces here.
///
/// # Error Handling Strategy
///
/// Errors propagate upward with the `?` operator. A [`Error::ScriptFormat`]
/// aborts the current script file; everything recorded up to that point is
/// discarded because the line stream can no longer be trusted. A
/// [`Error::FailFast`] aborts the entire run; harness integrations convert it
/// into a non-zero process exit.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a script or writing the output trace.
    ///
    /// Wraps the standard library error, which carries the detail (file not
    /// found, permission denied, disk full).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The script file violates the script grammar.
    ///
    /// Raised for:
    /// - a malformed conditional directive (`#` line with a bad shape or sign)
    /// - a directive naming a flag the run configuration does not define
    /// - a parameterized statement not followed by a `{` line
    /// - an unterminated quoted field or parameter block
    ///
    /// These are authoring mistakes in the script, not engine behavior, so the
    /// file is abandoned at the offending line.
    #[error("script format error in {script} line {line}: {message}")]
    ScriptFormat {
        /// Name of the script being processed.
        script: String,
        /// Raw line number at which the violation was detected.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// The connection factory or an engine adapter failed outside statement
    /// execution, for example when opening the initial connection or a
    /// replacement during a reconnect.
    #[error("connection error: {0}")]
    Connection(String),

    /// First expectation mismatch under fail-fast mode.
    ///
    /// Carries the full diagnostic so the caller can report it without access
    /// to the (discarded) script report. The connection is dropped as this
    /// error unwinds, matching the close-before-exit contract of the runner.
    #[error("fail-fast abort in {script} line {line}: expected {expected:?}, got {actual:?}")]
    FailFast {
        /// Name of the script being processed.
        script: String,
        /// Raw line number of the comparison.
        line: usize,
        /// The expectation line from the script.
        expected: String,
        /// The produced result line.
        actual: String,
    },

    /// Internal error indicating a bug or unexpected state in the runner.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a connection error from any displayable failure.
    ///
    /// Convenience for engine adapters mapping their own error types at the
    /// factory boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use goldscript_result::Error;
    ///
    /// fn open() -> Result<(), Error> {
    ///     Err(Error::connection("engine refused the session"))
    /// }
    ///
    /// assert!(matches!(open(), Err(Error::Connection(_))));
    /// ```
    #[inline]
    pub fn connection<E: std::fmt::Display>(err: E) -> Self {
        Error::Connection(err.to_string())
    }
}
