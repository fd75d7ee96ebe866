//! Per-script execution session.
//!
//! A session owns everything one script run needs: the directive-aware
//! reader, the engine connection, the reconnect factory, the seeded random
//! source, and the trace sink. It assembles statements line by line,
//! executes them, renders their outcomes, and compares every rendered line
//! against the expectation lines embedded in the script.

use std::io::{BufRead, Write};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use goldscript_result::{Error, Result};

use crate::codes::render_error_code;
use crate::config::RunConfig;
use crate::db::{Connection, DEFAULT_SCHEMA, EngineError, Rows, StatementOutcome};
use crate::format;
use crate::params::parse_param_row;
use crate::reader::ScriptReader;
use crate::report::{Diagnostic, ScriptReport};

pub(crate) struct ScriptSession<'a, R, C, F> {
    reader: ScriptReader<R>,
    // Empty only between closing one connection and opening the next.
    conn: Option<C>,
    factory: &'a mut F,
    config: &'a RunConfig,
    trace: &'a mut dyn Write,
    rng: ChaCha8Rng,
    report: ScriptReport,
    buffer: String,
    // Frequent-reconnect stress mode for the run: the global switch minus
    // in-memory storage. EXPLAIN plans are allowed to drift under it.
    stress: bool,
    // Random reconnects resolved for this particular script: stress mode
    // minus per-script exemptions.
    random_reconnects: bool,
}

impl<'a, R, C, F> ScriptSession<'a, R, C, F>
where
    R: BufRead,
    C: Connection,
    F: FnMut() -> Result<C>,
{
    pub(crate) fn new(
        script: &str,
        input: R,
        factory: &'a mut F,
        config: &'a RunConfig,
        trace: &'a mut dyn Write,
    ) -> Result<Self> {
        let conn = factory()?;
        let stress = config.stress_reconnects && !config.in_memory;
        let random_reconnects = stress && config.reconnect_allowed_for(script);
        Ok(Self {
            reader: ScriptReader::new(script, input, config.flags.clone()),
            conn: Some(conn),
            factory,
            config,
            trace,
            rng: ChaCha8Rng::seed_from_u64(config.reconnect_seed),
            report: ScriptReport::new(script),
            buffer: String::new(),
            stress,
            random_reconnects,
        })
    }

    fn conn(&mut self) -> Result<&mut C> {
        self.conn
            .as_mut()
            .ok_or_else(|| Error::Internal("no open connection".to_string()))
    }

    /// Drive the script to completion and hand back its report.
    pub(crate) fn run(mut self) -> Result<ScriptReport> {
        while let Some(line) = self.reader.next_line()? {
            if line.starts_with("--") {
                self.write_line(&line)?;
            } else if line.starts_with('>') {
                // Expectation lines are consumed while checking results; one
                // showing up here means the script has more of them than the
                // statement produced.
                self.record_diagnostic("<command>".to_string(), line);
            } else if let Some(stripped) = line.strip_suffix(';') {
                self.write_line(&line)?;
                self.buffer.push_str(stripped);
                let sql = std::mem::take(&mut self.buffer);
                self.process(sql)?;
            } else if line == "@reconnect" {
                if !self.buffer.is_empty() {
                    self.record_diagnostic("<command>".to_string(), line);
                } else if !self.config.in_memory {
                    let auto_commit = self.conn()?.auto_commit()?;
                    self.reconnect(auto_commit)?;
                }
            } else {
                self.write_line(&line)?;
                self.buffer.push_str(&line);
                self.buffer.push('\n');
            }
        }
        Ok(self.report)
    }

    /// Execute one assembled statement, reconnecting first in stress mode
    /// when the session state survives a reconnect.
    fn process(&mut self, sql: String) -> Result<()> {
        tracing::debug!(
            "executing statement at line {} of {}",
            self.reader.line_number(),
            self.reader.script()
        );
        if self.random_reconnects {
            let eligible = !self.conn()?.has_temporary_tables()?
                && self.conn()?.is_regular_mode()?
                && self.conn()?.current_schema()? == DEFAULT_SCHEMA;
            if eligible {
                let auto_commit = self.conn()?.auto_commit()?;
                if auto_commit && self.rng.gen_range(0..10) < 1 {
                    // reconnect 10% of the time
                    self.reconnect(auto_commit)?;
                }
            }
        }
        if self.config.collect_statements {
            self.report.statements.push(sql.clone());
        }
        if sql.contains('?') {
            self.process_prepared(&sql)?;
        } else {
            self.process_statement(&sql)?;
        }
        self.write_line("")
    }

    fn process_statement(&mut self, sql: &str) -> Result<()> {
        match self.conn()?.execute(sql)? {
            StatementOutcome::Rows(rows) => self.write_rows(sql, &rows),
            StatementOutcome::Updated(count) => {
                let text = if count < 1 {
                    "ok".to_string()
                } else {
                    format!("update count: {count}")
                };
                self.write_result(sql, &text, "> ", None)
            }
            StatementOutcome::EngineError(err) => self.write_engine_error(sql, &err),
        }
    }

    /// A statement with `?` placeholders is followed by a `{`..`}` block of
    /// parameter rows, one execution per row. Every block line is echoed to
    /// the trace. After an engine error the remaining rows are consumed but
    /// no longer executed; the final update count line is written either way.
    fn process_prepared(&mut self, sql: &str) -> Result<()> {
        let open = match self.reader.next_line()? {
            Some(line) => line,
            None => {
                return Err(self
                    .reader
                    .error(format!("expected '{{', got end of script in {sql}")));
            }
        };
        self.write_line(&open)?;
        if open != "{" {
            return Err(self
                .reader
                .error(format!("expected '{{', got \"{open}\" in {sql}")));
        }
        let mut total: i64 = 0;
        let mut failed = false;
        loop {
            let row = match self.reader.next_line()? {
                Some(line) => line,
                None => {
                    return Err(self
                        .reader
                        .error(format!("unterminated parameter block in {sql}")));
                }
            };
            self.write_line(&row)?;
            if row.starts_with('}') {
                break;
            }
            if failed {
                continue;
            }
            let params = parse_param_row(&row)
                .map_err(|message| self.reader.error(format!("{message} in {sql}")))?;
            match self.conn()?.execute_prepared(sql, &params)? {
                StatementOutcome::Rows(rows) => self.write_rows(sql, &rows)?,
                StatementOutcome::Updated(count) => total += count,
                StatementOutcome::EngineError(err) => {
                    self.write_engine_error(sql, &err)?;
                    failed = true;
                }
            }
        }
        self.write_result(sql, &format!("update count: {total}"), "> ", None)
    }

    /// Close the current connection, open a replacement through the factory,
    /// and restore the auto-commit mode. The old connection drops before the
    /// factory runs; engines with exclusive storage locks allow only one
    /// live session.
    fn reconnect(&mut self, auto_commit: bool) -> Result<()> {
        tracing::debug!("reconnecting in {}", self.reader.script());
        self.conn = None;
        let mut conn = (self.factory)()?;
        conn.set_auto_commit(auto_commit)?;
        self.conn = Some(conn);
        Ok(())
    }

    /// Render a result set and compare it line by line. With a `>> `
    /// expectation next, only a one-line summary is produced; otherwise the
    /// full grid is written, sorted unless the statement orders its rows.
    fn write_rows(&mut self, sql: &str, rows: &Rows) -> Result<()> {
        let ordered = format::is_ordered(sql);
        let data: Vec<Vec<String>> = rows
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| format::format_cell(cell.as_deref()))
                    .collect()
            })
            .collect();
        let summarized = self
            .reader
            .peek()?
            .is_some_and(|next| next.starts_with(">> "));
        if summarized {
            let summary = format::summarize(&data, rows.columns.len());
            return self.write_result(sql, &summary, ">> ", None);
        }
        let header: Vec<String> = rows
            .columns
            .iter()
            .map(|label| format::format_cell(Some(label)))
            .collect();
        let widths = format::column_widths(&header, &data);
        self.write_result(sql, &format::format_row(&header, &widths), "> ", None)?;
        self.write_result(sql, &format::separator_row(&widths), "> ", None)?;
        let mut lines: Vec<String> = data
            .iter()
            .map(|row| format::format_row(row, &widths))
            .collect();
        if !ordered {
            lines.sort();
        }
        let count = lines.len();
        for line in &lines {
            self.write_result(sql, line, "> ", None)?;
        }
        let trailer = if ordered {
            format!("rows (ordered): {count}")
        } else {
            format!("rows: {count}")
        };
        self.write_result(sql, &trailer, "> ", None)
    }

    fn write_engine_error(&mut self, sql: &str, err: &EngineError) -> Result<()> {
        let text = format!("exception {}", render_error_code(err.code));
        self.write_result(sql, &text, "> ", Some(err))
    }

    /// Compare one produced line against the script and echo it to the
    /// trace. A matching `>` line passes; a differing one records a
    /// diagnostic (EXPLAIN plans are exempt in stress mode, where the plan
    /// legitimately varies); any other line means the script expected
    /// nothing here, so it is pushed back for normal processing.
    fn write_result(
        &mut self,
        sql: &str,
        text: &str,
        prefix: &str,
        engine_error: Option<&EngineError>,
    ) -> Result<()> {
        let produced = format!("{prefix}{text}").trim().to_string();
        match self.reader.next_line()? {
            Some(expected) if expected.starts_with('>') => {
                if expected != produced {
                    if self.stress && sql.to_uppercase().starts_with("EXPLAIN") {
                        return Ok(());
                    }
                    self.record_diagnostic(expected.clone(), produced.clone());
                    if let Some(err) = engine_error {
                        tracing::error!(
                            "engine error {} behind the mismatch: {}",
                            err.code,
                            err.message
                        );
                    }
                    if self.config.fail_fast {
                        return Err(Error::FailFast {
                            script: self.reader.script().to_string(),
                            line: self.reader.line_number(),
                            expected,
                            actual: produced,
                        });
                    }
                }
            }
            Some(other) => {
                self.record_diagnostic("<nothing>".to_string(), produced.clone());
                self.reader.push_back(other);
            }
            None => {
                self.record_diagnostic("<nothing>".to_string(), produced.clone());
            }
        }
        self.write_line(&produced)
    }

    fn record_diagnostic(&mut self, expected: String, actual: String) {
        let diagnostic = Diagnostic {
            script: self.reader.script().to_string(),
            line: self.reader.line_number(),
            expected,
            actual,
        };
        tracing::error!(
            "mismatch in {} line {}: expected {:?}, got {:?}",
            diagnostic.script,
            diagnostic.line,
            diagnostic.expected,
            diagnostic.actual
        );
        self.report.diagnostics.push(diagnostic);
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.trace, "{line}")?;
        Ok(())
    }
}
