//! Golden-file script runner for SQL engines.
//!
//! This crate executes `.sql` test scripts in which every statement is
//! followed by its expected output, compares what the engine actually
//! produced line by line, and regenerates the golden output as a trace.
//!
//! # Primary API
//!
//! [`ScriptRunner`] is the main entry point. It provides methods for:
//! - Running individual `.sql` files
//! - Running all script files in a directory
//! - Running scripts from strings or readers
//!
//! Engines plug in through the [`Connection`] trait; a factory producing
//! connections is all the runner needs, and it reuses the factory whenever
//! a script asks for (or stress mode injects) a reconnect.
//!
//! # Test Harness API
//!
//! For integration with `libtest-mimic` test harnesses:
//! - [`run_script_harness`] and [`run_script_harness_with_args`] for
//!   script discovery and per-script trials
//! - [`StubEngine`] for exercising the runner without a real database

pub mod codes;
mod config;
mod db;
mod format;
mod params;
mod reader;
mod report;
mod runner;
mod session;
mod stub;

// Primary public API - the main entry point for users
pub use config::RunConfig;
pub use runner::ScriptRunner;

// Engine seam
pub use db::{Connection, ConnectionFactory, DEFAULT_SCHEMA, EngineError, Rows, StatementOutcome};

// Reports and shared error type
pub use goldscript_result::{Error, Result};
pub use report::{Diagnostic, ScriptReport};

// Test harness API - for libtest integration
pub use runner::{run_script_harness, run_script_harness_with_args};
pub use stub::{StubConnection, StubEngine};
