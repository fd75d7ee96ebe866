//! The seam between the runner and the engine under test.
//!
//! The runner never talks to a concrete database. It drives a [`Connection`]
//! produced by a caller-supplied factory, and everything it needs from the
//! engine is expressed here: plain and parameterized execution, the
//! auto-commit flag, the active schema, and the catalog introspection used by
//! the reconnection preconditions.

use crate::Result;

/// Schema the reconnection controller expects to be active before it will
/// consider dropping the connection.
pub const DEFAULT_SCHEMA: &str = "PUBLIC";

/// Boxed connection factory, the form the harness entry points consume.
///
/// The session keeps the factory for the lifetime of a script so it can open
/// replacement connections during reconnects.
pub type ConnectionFactory<C> = Box<dyn FnMut() -> Result<C> + Send>;

/// An error raised by the engine while executing a statement.
///
/// These are expected, testable outcomes: the comparator renders them as
/// `exception <NAME>` lines using the code table in [`crate::codes`]. The
/// message is not part of the comparison protocol but is logged when an
/// exception line mismatches its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    /// Numeric engine error code, resolved to a symbolic name for comparison.
    pub code: i32,
    /// Human-readable engine message.
    pub message: String,
}

impl EngineError {
    /// Create an engine error from a code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A materialized result set: column labels plus rows of optional string
/// cells, where `None` is SQL NULL.
///
/// Adapters walk their engine's cursor and render every value to text before
/// handing it over; the formatter only deals in strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rows {
    /// Column labels, in result order.
    pub columns: Vec<String>,
    /// Data rows; every row has one cell per column.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Rows {
    /// Start a result set with the given column labels and no rows.
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append one data row. `None` cells are SQL NULL.
    pub fn row(mut self, cells: &[Option<&str>]) -> Self {
        self.rows
            .push(cells.iter().map(|c| c.map(str::to_string)).collect());
        self
    }
}

/// What executing one statement produced.
///
/// Engine errors are data here, not `Err` values: a script legitimately
/// expects them, and the comparator treats all three variants uniformly.
/// `Err` from the connection methods is reserved for adapter-level failures
/// that make the session unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    /// The statement produced a result set.
    Rows(Rows),
    /// The statement completed with an update count.
    Updated(i64),
    /// The engine raised an error with a numeric code.
    EngineError(EngineError),
}

/// One live session with the engine under test.
///
/// All calls are synchronous and blocking. The session owns exactly one
/// connection at a time and drops it to close; there is no separate statement
/// handle to manage.
pub trait Connection {
    /// Execute a statement with no placeholders.
    fn execute(&mut self, sql: &str) -> Result<StatementOutcome>;

    /// Bind one row of parameters to the `?` placeholders in `sql` (1-based,
    /// in order; `None` binds SQL NULL) and execute once.
    ///
    /// Adapters may cache the prepared form of `sql` between calls; the
    /// runner re-passes the same text for every row of a parameter block.
    fn execute_prepared(
        &mut self,
        sql: &str,
        params: &[Option<String>],
    ) -> Result<StatementOutcome>;

    /// Whether auto-commit is currently enabled on this connection.
    fn auto_commit(&mut self) -> Result<bool>;

    /// Enable or disable auto-commit.
    fn set_auto_commit(&mut self, enabled: bool) -> Result<()>;

    /// Name of the currently active schema.
    fn current_schema(&mut self) -> Result<String>;

    /// Whether any table in the catalog is a temporary table.
    fn has_temporary_tables(&mut self) -> Result<bool>;

    /// Whether the session runs in the engine's regular compatibility mode
    /// rather than an emulation mode.
    fn is_regular_mode(&mut self) -> Result<bool>;
}
