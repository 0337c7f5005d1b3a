#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use std::fs::File;
use std::path::Path;

use helpers::output_path;
use helpers::run_solver;
use helpers::run_solver_with_prefix;
use tracecheck_format::reader::TraceReader;
use tracecheck_format::Step;

fn read_steps(path: &Path) -> Vec<Step> {
    TraceReader::new(File::open(path).expect("trace was written"))
        .read_all()
        .expect("trace is valid")
}

#[test]
fn satisfiable_instance_reports_a_model() {
    let run = run_solver("satisfiable", []);

    assert!(run.success);
    assert_eq!(Some("SATISFIABLE"), run.status());
    assert_eq!(vec![1, 2, -3], run.model());
    assert!(run.core_roots().is_empty());
}

#[test]
fn unannotated_clauses_are_reported_as_roots() {
    let run = run_solver_with_prefix("redundant_clause", "rce", []);

    assert!(run.success);
    assert_eq!(Some("UNSATISFIABLE"), run.status());
    assert_eq!(
        vec!["4 clause 1", "5 clause 2", "6 clause 3"],
        run.core_roots()
    );
}

#[test]
fn nce_finds_the_same_minimal_core() {
    let run = run_solver_with_prefix(
        "redundant_clause",
        "nce",
        ["--core-strategy".to_owned(), "nce".to_owned()],
    );

    assert!(run.success);
    assert_eq!(
        vec!["4 clause 1", "5 clause 2", "6 clause 3"],
        run.core_roots()
    );
}

#[test]
fn annotated_roots_keep_their_names() {
    let run = run_solver_with_prefix(
        "annotated",
        "named",
        ["--resolution-distance".to_owned(), "2".to_owned()],
    );

    assert!(run.success);
    assert_eq!(Some("UNSATISFIABLE"), run.status());
    assert_eq!(vec!["3 bound", "4 limit"], run.core_roots());
}

#[test]
fn negative_resolution_distance_is_rejected() {
    let run = run_solver_with_prefix(
        "annotated",
        "negative",
        ["--resolution-distance".to_owned(), "-1".to_owned()],
    );

    assert!(!run.success);
    assert_eq!(None, run.status());
}

#[test]
fn written_trace_ends_in_the_empty_clause() {
    let trace_path = output_path("annotated", "written", "trace");
    let run = run_solver_with_prefix(
        "annotated",
        "written",
        ["--trace-path".to_owned(), trace_path.display().to_string()],
    );
    assert!(run.success);

    let steps = read_steps(&trace_path);
    std::fs::remove_file(&trace_path).expect("trace can be removed");

    let last = steps.last().expect("the trace is not empty");
    assert!(last.is_empty_clause());
    assert!(!last.is_axiom());

    let unit_axioms = steps
        .iter()
        .filter(|step| step.is_axiom() && step.literals.len() == 1)
        .map(|step| step.literals[0].get())
        .collect::<Vec<_>>();
    assert!(unit_axioms.contains(&3));
    assert!(unit_axioms.contains(&4));
}

#[test]
fn external_trace_is_minimised() {
    let trace_path = output_path("annotated", "external", "trace");
    let first = run_solver_with_prefix(
        "annotated",
        "external-first",
        [
            "--core-strategy".to_owned(),
            "none".to_owned(),
            "--trace-path".to_owned(),
            trace_path.display().to_string(),
        ],
    );
    assert!(first.success);

    let replayed = run_solver_with_prefix(
        "annotated",
        "external-replay",
        ["--external-trace".to_owned(), trace_path.display().to_string()],
    );
    std::fs::remove_file(&trace_path).expect("trace can be removed");

    assert!(replayed.success);
    assert_eq!(Some("UNSATISFIABLE"), replayed.status());
    assert_eq!(vec!["3 bound", "4 limit"], replayed.core_roots());
}

#[test]
fn external_trace_of_another_instance_is_rejected() {
    let trace_path = output_path("redundant_clause", "mismatch", "trace");
    let first = run_solver_with_prefix(
        "redundant_clause",
        "mismatch-first",
        ["--trace-path".to_owned(), trace_path.display().to_string()],
    );
    assert!(first.success);

    let replayed = run_solver_with_prefix(
        "annotated",
        "mismatch-replay",
        ["--external-trace".to_owned(), trace_path.display().to_string()],
    );
    std::fs::remove_file(&trace_path).expect("trace can be removed");

    assert!(!replayed.success);
}

#[cfg(feature = "gzipped-traces")]
#[test]
fn gzipped_trace_can_be_read_back() {
    let trace_path = output_path("redundant_clause", "gzipped", "trace.gz");
    let run = run_solver_with_prefix(
        "redundant_clause",
        "gzipped",
        ["--trace-path".to_owned(), trace_path.display().to_string()],
    );
    assert!(run.success);

    let decoder = flate2::read::GzDecoder::new(File::open(&trace_path).expect("trace was written"));
    let steps = TraceReader::new(decoder)
        .read_all()
        .expect("trace is valid");
    std::fs::remove_file(&trace_path).expect("trace can be removed");

    assert!(steps.last().is_some_and(|step| step.is_empty_clause()));
}

#[test]
fn roots_inside_the_clauses_of_other_roots_are_rejected() {
    for strategy in ["rce", "nce", "none"] {
        let run = run_solver_with_prefix(
            "overlapping_roots",
            strategy,
            ["--core-strategy".to_owned(), strategy.to_owned()],
        );

        assert!(!run.success);
        assert_eq!(None, run.status());
        assert!(run.stdout.contains("root variable 1"));
    }
}
