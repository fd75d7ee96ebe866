use std::fs;

use goldscript::{RunConfig, ScriptRunner, StubEngine, run_script_harness_with_args};
use goldscript_test_utils::{init_tracing_for_tests, script_dir, script_file};
use indoc::indoc;
use libtest_mimic::Arguments;

const PASSING: &str = indoc! {"
    CREATE TABLE T(ID INT);
    > ok
"};

const FAILING: &str = indoc! {"
    CREATE TABLE T(ID INT);
    > update count: 1
"};

#[test]
fn run_dir_reports_scripts_in_sorted_order() {
    init_tracing_for_tests();
    let dir = script_dir(&[("pass.sql", PASSING), ("fail.sql", FAILING)]);
    let engine = StubEngine::new();
    let mut runner = ScriptRunner::new(engine.factory());
    let reports = runner.run_dir(dir.path()).expect("run directory");
    assert_eq!(reports.len(), 2);
    assert!(reports[0].script.ends_with("fail.sql"));
    assert!(!reports[0].is_pass());
    assert!(reports[1].script.ends_with("pass.sql"));
    assert!(reports[1].is_pass());
    // One connection per script.
    assert_eq!(engine.connections_opened(), 2);
}

#[test]
fn run_file_uses_the_path_as_the_script_name() {
    init_tracing_for_tests();
    let file = script_file(PASSING);
    let engine = StubEngine::new();
    let mut runner = ScriptRunner::new(engine.factory());
    let report = runner.run_file(file.path()).expect("run file");
    assert!(report.is_pass(), "diagnostics: {:?}", report.diagnostics);
    assert_eq!(report.script, file.path().to_string_lossy().to_string());
}

#[test]
fn trace_regenerates_the_golden_output() {
    init_tracing_for_tests();
    let dir = tempfile::tempdir().expect("create temp dir");
    let trace_path = dir.path().join("trace.out");
    let engine = StubEngine::new();
    let config = RunConfig::new().with_trace_path(&trace_path);
    let script = indoc! {"
        -- demo
        CREATE TABLE T(ID INT);
        > update count: 99
        SELECT 1;
    "};
    let mut runner = ScriptRunner::with_config(engine.factory(), config);
    let report = runner.run_script("demo.sql", script).expect("run script");
    assert_eq!(report.diagnostics.len(), 2);

    // The trace carries what the engine actually produced, with expectation
    // lines replaced and one blank line after every statement.
    let trace = fs::read_to_string(&trace_path).expect("read trace");
    let expected = indoc! {"
        -- demo
        CREATE TABLE T(ID INT);
        > ok

        SELECT 1;
        > ok

    "};
    assert_eq!(trace, expected);
}

#[test]
fn comment_only_scripts_round_trip() {
    init_tracing_for_tests();
    let dir = tempfile::tempdir().expect("create temp dir");
    let trace_path = dir.path().join("trace.out");
    let engine = StubEngine::new();
    let config = RunConfig::new().with_trace_path(&trace_path);
    let script = indoc! {"
        -- first note
        -- second note
    "};
    let mut runner = ScriptRunner::with_config(engine.factory(), config);
    let report = runner.run_script("notes.sql", script).expect("run script");
    assert!(report.is_pass(), "diagnostics: {:?}", report.diagnostics);
    assert!(engine.executed().is_empty());

    let trace = fs::read_to_string(&trace_path).expect("read trace");
    assert_eq!(trace, script);
}

#[test]
fn harness_runs_one_trial_per_script() {
    init_tracing_for_tests();
    let dir = script_dir(&[("pass.sql", PASSING), ("fail.sql", FAILING)]);
    let dir_str = dir.path().to_string_lossy().to_string();
    let engine = StubEngine::new();
    let factory_factory = move || engine.factory();

    let conclusion = run_script_harness_with_args(
        &dir_str,
        RunConfig::default(),
        factory_factory,
        Arguments::default(),
    );
    assert_eq!(conclusion.num_passed, 1);
    assert_eq!(conclusion.num_failed, 1);
}
