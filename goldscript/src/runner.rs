//! Entry points for running golden scripts against an engine.
//!
//! [`ScriptRunner`] owns a connection factory and a [`RunConfig`] and runs
//! one script at a time from a string, a reader, a file, or a directory
//! tree. [`run_script_harness`] wraps directory discovery in a libtest
//! harness so every script shows up as its own test.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use libtest_mimic::{Arguments, Conclusion, Failed, Trial};

use goldscript_result::{Error, Result};

use crate::config::RunConfig;
use crate::db::Connection;
use crate::report::ScriptReport;
use crate::session::ScriptSession;

/// Runs scripts through connections produced by a factory. The factory is
/// invoked once per script plus once per reconnect, so every script starts
/// on a fresh connection.
pub struct ScriptRunner<F> {
    factory: F,
    config: RunConfig,
}

impl<C, F> ScriptRunner<F>
where
    C: Connection,
    F: FnMut() -> Result<C>,
{
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, RunConfig::default())
    }

    pub fn with_config(factory: F, config: RunConfig) -> Self {
        Self { factory, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run one script from a buffered reader, writing the regenerated
    /// golden output to `trace`.
    pub fn run_reader<R: BufRead>(
        &mut self,
        script: &str,
        input: R,
        trace: &mut dyn Write,
    ) -> Result<ScriptReport> {
        tracing::info!("running script {script}");
        let session = ScriptSession::new(script, input, &mut self.factory, &self.config, trace)?;
        let report = session.run()?;
        if report.is_pass() {
            tracing::debug!("script {script} passed");
        } else {
            tracing::warn!(
                "script {script} recorded {} mismatch(es)",
                report.diagnostics.len()
            );
        }
        Ok(report)
    }

    /// Run a script held in memory, tracing to the configured path if any.
    pub fn run_script(&mut self, script: &str, contents: &str) -> Result<ScriptReport> {
        let mut trace = self.open_trace()?;
        let report = self.run_reader(script, Cursor::new(contents.as_bytes()), &mut trace)?;
        trace.flush()?;
        Ok(report)
    }

    /// Run a script file, tracing to the configured path if any.
    pub fn run_file(&mut self, path: &Path) -> Result<ScriptReport> {
        let file = File::open(path)?;
        let script = path.to_string_lossy().to_string();
        let mut trace = self.open_trace()?;
        let report = self.run_reader(&script, BufReader::new(file), &mut trace)?;
        trace.flush()?;
        Ok(report)
    }

    /// Run every `.sql` file under `dir` in sorted order and collect the
    /// per-script reports. Reports with diagnostics are returned, not
    /// errors; only runner-level failures abort the walk.
    pub fn run_dir(&mut self, dir: &Path) -> Result<Vec<ScriptReport>> {
        if !dir.exists() {
            return Err(Error::Internal(format!(
                "script directory does not exist: {}",
                dir.display()
            )));
        }
        let files = discover_scripts(dir);
        let mut reports = Vec::with_capacity(files.len());
        for path in files {
            reports.push(self.run_file(&path)?);
        }
        Ok(reports)
    }

    // The trace path is truncated per script, so with several scripts it
    // holds the output of the last one, like a scratch golden file.
    fn open_trace(&self) -> Result<Box<dyn Write>> {
        match &self.config.trace_path {
            Some(path) => {
                let file = File::create(path)?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(io::sink())),
        }
    }
}

fn discover_scripts(base: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(base)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "sql"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Discover `.sql` files under `script_dir` and execute them as libtest
/// trials, panicking if any fail. Command-line arguments come from the
/// process, so the usual filter and list flags work.
pub fn run_script_harness<C, FF, F>(script_dir: &str, config: RunConfig, factory_factory: FF)
where
    C: Connection,
    FF: Fn() -> F + Send + Sync + Clone + 'static,
    F: FnMut() -> Result<C>,
{
    let args = Arguments::from_args();
    let conclusion = run_script_harness_with_args(script_dir, config, factory_factory, args);
    if conclusion.has_failed() {
        panic!(
            "script harness reported {} failed test(s)",
            conclusion.num_failed
        );
    }
}

/// Same as [`run_script_harness`], but accepts pre-parsed [`Arguments`] so
/// callers can drive the harness programmatically, and returns the
/// [`Conclusion`] instead of panicking.
pub fn run_script_harness_with_args<C, FF, F>(
    script_dir: &str,
    config: RunConfig,
    factory_factory: FF,
    args: Arguments,
) -> Conclusion
where
    C: Connection,
    FF: Fn() -> F + Send + Sync + Clone + 'static,
    F: FnMut() -> Result<C>,
{
    let base = Path::new(script_dir);
    let files = if base.exists() {
        discover_scripts(base)
    } else {
        Vec::new()
    };

    let base_parent = base.parent();
    let mut trials: Vec<Trial> = Vec::new();
    for path in files {
        let name_path = base_parent
            .and_then(|parent| path.strip_prefix(parent).ok())
            .or_else(|| path.strip_prefix(base).ok())
            .unwrap_or(&path);
        let mut name = name_path.to_string_lossy().to_string();
        if std::path::MAIN_SEPARATOR != '/' {
            name = name.replace(std::path::MAIN_SEPARATOR, "/");
        }
        let name = name.trim_start_matches(&['/', '\\'][..]).to_string();
        let path_clone = path.clone();
        let config_clone = config.clone();
        let factory_factory_clone = factory_factory.clone();

        trials.push(Trial::test(name, move || {
            let mut runner = ScriptRunner::with_config(factory_factory_clone(), config_clone);
            let report = runner
                .run_file(&path_clone)
                .map_err(|e| Failed::from(format!("script runner error: {e}")))?;
            if report.is_pass() {
                Ok(())
            } else {
                Err(Failed::from(report.to_string()))
            }
        }));
    }

    libtest_mimic::run(&args, trials)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::db::{Rows, StatementOutcome};
    use crate::stub::StubEngine;

    /// Test that a script whose expectations match yields a passing report.
    #[test]
    fn matching_expectations_pass() {
        goldscript_test_utils::init_tracing_for_tests();
        let engine = StubEngine::new();
        engine.respond(
            "SELECT ID FROM TEST",
            StatementOutcome::Rows(Rows::with_columns(&["ID"]).row(&[Some("1")])),
        );
        let script = indoc! {"
            SELECT ID FROM TEST;
            > ID
            > --
            > 1
            > rows: 1
        "};
        let mut runner = ScriptRunner::new(engine.factory());
        let r = runner.run_script("select.sql", script);
        assert!(r.is_ok(), "runner failed: {:?}", r.err());
        let report = r.unwrap();
        assert!(report.is_pass(), "diagnostics: {:?}", report.diagnostics);
    }

    /// Test that a mismatch is recorded with the script name and line.
    #[test]
    fn mismatch_is_recorded() {
        goldscript_test_utils::init_tracing_for_tests();
        let engine = StubEngine::new();
        let script = indoc! {"
            CREATE TABLE TEST(ID INT);
            > update count: 1
        "};
        let mut runner = ScriptRunner::new(engine.factory());
        let report = runner.run_script("create.sql", script).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        let diag = &report.diagnostics[0];
        assert_eq!(diag.script, "create.sql");
        assert_eq!(diag.line, 2);
        assert_eq!(diag.expected, "> update count: 1");
        assert_eq!(diag.actual, "> ok");
    }

    /// Test that running a missing directory reports an internal error.
    #[test]
    fn missing_directory_is_an_error() {
        let engine = StubEngine::new();
        let mut runner = ScriptRunner::new(engine.factory());
        let r = runner.run_dir(Path::new("no/such/dir"));
        assert!(matches!(r, Err(Error::Internal(_))), "got {r:?}");
    }
}
