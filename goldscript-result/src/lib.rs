//! Error and result definitions for the goldscript test runner.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout the goldscript crates. All operations that can
//! fail return `Result<T>`, and errors propagate naturally with the `?` operator
//! up to the entry points, where callers decide whether a failure is fatal for
//! the whole run or just for one script.
//!
//! # Error Philosophy
//!
//! A single error enum covers every runner-level failure. Note what is *not* in
//! here: errors raised by the engine under test while executing a statement.
//! Those are expected, testable outcomes of a script (they render as
//! `exception <NAME>` result lines) and travel as ordinary statement-outcome
//! values, never as `Error`. `Error` is reserved for conditions that stop the
//! runner itself:
//!
//! - **I/O failures** ([`Error::Io`]): reading a script, writing the trace
//! - **Script format errors** ([`Error::ScriptFormat`]): the script file itself
//!   is malformed
//! - **Connection failures** ([`Error::Connection`]): the engine adapter could
//!   not produce a connection
//! - **Fail-fast aborts** ([`Error::FailFast`]): the first mismatch under
//!   fail-fast mode
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
