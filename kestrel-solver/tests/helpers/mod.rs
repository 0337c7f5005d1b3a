//! Helpers to run the solver binary in integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

#[derive(Debug)]
pub(crate) struct SolverRun {
    pub(crate) success: bool,
    pub(crate) stdout: String,
}

impl SolverRun {
    /// The status line of the run, without the leading `s `.
    pub(crate) fn status(&self) -> Option<&str> {
        self.stdout
            .lines()
            .find_map(|line| line.strip_prefix("s "))
    }

    /// The core roots which were reported, without the leading `c root `.
    pub(crate) fn core_roots(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter_map(|line| line.strip_prefix("c root "))
            .collect()
    }

    /// The literals of the reported model.
    pub(crate) fn model(&self) -> Vec<i32> {
        self.stdout
            .lines()
            .filter_map(|line| line.strip_prefix("v "))
            .flat_map(|values| values.split_whitespace())
            .map(|value| value.parse::<i32>().expect("model values are integers"))
            .filter(|&value| value != 0)
            .collect()
    }
}

pub(crate) fn instance_path(name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/tests/instances/{name}.cnf",
        env!("CARGO_MANIFEST_DIR")
    ))
}

/// The path of an output file for `instance`, unique for the given `prefix` so tests running in
/// parallel do not share files.
pub(crate) fn output_path(instance: &str, prefix: &str, extension: &str) -> PathBuf {
    instance_path(instance).with_extension(format!("{prefix}.{extension}"))
}

pub(crate) fn run_solver(instance: &str, args: impl IntoIterator<Item = String>) -> SolverRun {
    run_solver_with_prefix(instance, "default", args)
}

pub(crate) fn run_solver_with_prefix(
    instance: &str,
    prefix: &str,
    args: impl IntoIterator<Item = String>,
) -> SolverRun {
    const TEST_TIMEOUT: Duration = Duration::from_secs(60);

    let solver = PathBuf::from(env!("CARGO_BIN_EXE_kestrel-solver"));
    let log_file_path = output_path(instance, prefix, "log");

    let mut command = Command::new(solver);
    for arg in args {
        let _ = command.arg(arg);
    }

    let mut child = command
        .arg(instance_path(instance))
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let success = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) => status.success(),
        Err(e) => panic!("error starting solver: {e}"),
    };

    let stdout = std::fs::read_to_string(&log_file_path).expect("Failed to read log file.");
    std::fs::remove_file(&log_file_path).expect("Failed to remove log file.");

    SolverRun { success, stdout }
}
