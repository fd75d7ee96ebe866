//! In-memory stub engine for exercising the runner without a real database.
//!
//! The stub replays canned outcomes keyed by statement text and records
//! everything it executes, so tests can script arbitrary engine behavior
//! and then inspect exactly what the runner did.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use goldscript_result::Result;

use crate::db::{Connection, ConnectionFactory, DEFAULT_SCHEMA, Rows, StatementOutcome};

#[derive(Debug)]
struct StubState {
    responses: HashMap<String, VecDeque<StatementOutcome>>,
    executed: Vec<String>,
    prepared: Vec<(String, Vec<Option<String>>)>,
    connections_opened: usize,
    schema: String,
    regular_mode: bool,
    temporary_tables: bool,
    auto_commit: bool,
}

/// Shared handle for scripting stub behavior and inspecting what it saw.
/// Clones share state, so a handle kept by the test observes connections
/// opened through the factory it handed to the runner.
#[derive(Clone)]
pub struct StubEngine {
    state: Arc<Mutex<StubState>>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StubState {
                responses: HashMap::new(),
                executed: Vec::new(),
                prepared: Vec::new(),
                connections_opened: 0,
                schema: DEFAULT_SCHEMA.to_string(),
                regular_mode: true,
                temporary_tables: false,
                auto_commit: true,
            })),
        }
    }

    /// Queue an outcome for a statement text. Repeated calls for the same
    /// text replay in order; statements with no queued outcome succeed with
    /// an update count of zero (one for prepared executions).
    pub fn respond(&self, sql: impl Into<String>, outcome: StatementOutcome) {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry(sql.into())
            .or_default()
            .push_back(outcome);
    }

    /// Connection factory in the form the runner consumes. Each call bumps
    /// the counter and opens a fresh connection whose auto-commit flag
    /// starts from the engine-level setting (enabled by default).
    pub fn factory(&self) -> ConnectionFactory<StubConnection> {
        let state = Arc::clone(&self.state);
        Box::new(move || {
            let mut guard = state.lock().unwrap();
            guard.connections_opened += 1;
            let auto_commit = guard.auto_commit;
            drop(guard);
            Ok(StubConnection {
                state: Arc::clone(&state),
                auto_commit,
            })
        })
    }

    pub fn set_schema(&self, schema: impl Into<String>) {
        self.state.lock().unwrap().schema = schema.into();
    }

    pub fn set_regular_mode(&self, regular: bool) {
        self.state.lock().unwrap().regular_mode = regular;
    }

    pub fn set_temporary_tables(&self, present: bool) {
        self.state.lock().unwrap().temporary_tables = present;
    }

    /// Initial auto-commit flag for connections the factory opens later;
    /// connections opened earlier keep their own flag.
    pub fn set_auto_commit(&self, enabled: bool) {
        self.state.lock().unwrap().auto_commit = enabled;
    }

    /// Number of connections opened through the factory so far.
    pub fn connections_opened(&self) -> usize {
        self.state.lock().unwrap().connections_opened
    }

    /// Statement texts executed without parameters, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Prepared executions as (statement, bound parameters) pairs, in order.
    pub fn prepared(&self) -> Vec<(String, Vec<Option<String>>)> {
        self.state.lock().unwrap().prepared.clone()
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One stub session. `SET AUTOCOMMIT ON|OFF` flips the session flag the
/// way an engine would and `SHOW AUTOCOMMIT` reads it back as a result
/// set, which the reconnect tests lean on.
pub struct StubConnection {
    state: Arc<Mutex<StubState>>,
    auto_commit: bool,
}

impl StubConnection {
    fn pop_response(&self, sql: &str) -> Option<StatementOutcome> {
        let mut guard = self.state.lock().unwrap();
        guard.responses.get_mut(sql).and_then(VecDeque::pop_front)
    }
}

impl Connection for StubConnection {
    fn execute(&mut self, sql: &str) -> Result<StatementOutcome> {
        self.state.lock().unwrap().executed.push(sql.to_string());
        let upper = sql.trim().to_uppercase();
        if upper == "SET AUTOCOMMIT ON" {
            self.auto_commit = true;
            return Ok(StatementOutcome::Updated(0));
        }
        if upper == "SET AUTOCOMMIT OFF" {
            self.auto_commit = false;
            return Ok(StatementOutcome::Updated(0));
        }
        if upper == "SHOW AUTOCOMMIT" {
            let value = if self.auto_commit { "TRUE" } else { "FALSE" };
            return Ok(StatementOutcome::Rows(
                Rows::with_columns(&["AUTOCOMMIT"]).row(&[Some(value)]),
            ));
        }
        Ok(self
            .pop_response(sql)
            .unwrap_or(StatementOutcome::Updated(0)))
    }

    fn execute_prepared(
        &mut self,
        sql: &str,
        params: &[Option<String>],
    ) -> Result<StatementOutcome> {
        self.state
            .lock()
            .unwrap()
            .prepared
            .push((sql.to_string(), params.to_vec()));
        Ok(self
            .pop_response(sql)
            .unwrap_or(StatementOutcome::Updated(1)))
    }

    fn auto_commit(&mut self) -> Result<bool> {
        Ok(self.auto_commit)
    }

    fn set_auto_commit(&mut self, enabled: bool) -> Result<()> {
        self.auto_commit = enabled;
        Ok(())
    }

    fn current_schema(&mut self) -> Result<String> {
        Ok(self.state.lock().unwrap().schema.clone())
    }

    fn has_temporary_tables(&mut self) -> Result<bool> {
        Ok(self.state.lock().unwrap().temporary_tables)
    }

    fn is_regular_mode(&mut self) -> Result<bool> {
        Ok(self.state.lock().unwrap().regular_mode)
    }
}
