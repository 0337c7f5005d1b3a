mod dimacs;
mod instance;
mod os_signal_termination;
mod replay;
mod result;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use dimacs::parse_annotated_cnf;
use instance::Constraint;
use instance::Dimacs;
use instance::DimacsTranslator;
use kestrel_solver::core::basic_types::KestrelError;
use kestrel_solver::core::convert_case::Case;
use kestrel_solver::core::options::CoreMinimisation;
use kestrel_solver::core::options::ResolutionDistance;
use kestrel_solver::core::options::SolverOptions;
use kestrel_solver::core::reporting::LogReporter;
use kestrel_solver::core::statistics::configure_statistic_logging;
use kestrel_solver::core::statistics::log_statistic_postfix;
use kestrel_solver::core::statistics::should_log_statistics;
use kestrel_solver::core::termination::Combinator;
use kestrel_solver::core::termination::TimeBudget;
use kestrel_solver::core::trace::ResolutionTrace;
use kestrel_solver::Solution;
use kestrel_solver::Solver;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use replay::ReplayBackend;
use result::KestrelSolverResult;
use tracecheck_format::reader::TraceReader;
use tracecheck_format::writer::TraceWriter;
use tracecheck_format::Step;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The instance to solve, given in the DIMACS format.
    ///
    /// The top-level constraints of the instance can be annotated with comment lines of the form
    /// `c root <variable> [name]`, where the unit clause `<variable>` asserts the constraint. If
    /// the file has no annotations, every clause is treated as a top-level constraint.
    #[clap(verbatim_doc_comment)]
    instance_path: PathBuf,

    /// How the unsatisfiable core is minimised.
    ///
    /// - "rce" removes roots of the core one at a time, and keeps the resolvents which do not
    ///   depend on the removed root. This is usually the fastest.
    /// - "nce" removes roots of the core one at a time, and solves the remaining axioms from
    ///   scratch.
    /// - "none" reports the core of the first refutation.
    #[arg(long = "core-strategy", value_enum, default_value_t, verbatim_doc_comment)]
    core_strategy: CoreMinimisation,

    /// How far the relevance of a core root propagates through the translation when using the
    /// "rce" strategy.
    ///
    /// Omitting this option means that there is no limit.
    ///
    /// Possible values: a non-negative integer
    #[arg(
        long = "resolution-distance",
        allow_negative_numbers = true,
        verbatim_doc_comment
    )]
    resolution_distance: Option<i64>,

    /// The time limit in milliseconds. When the limit is reached, the solver reports "UNKNOWN".
    ///
    /// Possible values: u64
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// The output path for the refutation of an unsatisfiable instance, in the TraceCheck format.
    ///
    /// If the file extension ends with `.gz`, a gzipped trace is produced.
    #[arg(long, verbatim_doc_comment)]
    trace_path: Option<PathBuf>,

    /// A refutation of the instance in the TraceCheck format, for example produced by an
    /// external SAT solver. The core of this refutation is minimised instead of the refutation
    /// found by the built-in prover.
    ///
    /// If the file extension ends with `.gz`, the trace is read as a gzipped file.
    #[arg(long, verbatim_doc_comment)]
    external_trace: Option<PathBuf>,

    /// Enables log message output from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,
}

fn configure_logging(verbose: bool, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging("c STAT", None, Some(Case::Camel), None);
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "c {}", record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> KestrelSolverResult<()> {
    let args = Args::parse();

    configure_logging(args.verbose, args.log_statistics);

    if kestrel_solver::core::asserts::KESTREL_ASSERT_LEVEL_DEFINITION
        >= kestrel_solver::core::asserts::KESTREL_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the Kestrel assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            kestrel_solver::core::asserts::KESTREL_ASSERT_LEVEL_DEFINITION
        );
    };

    let resolution_distance = match args.resolution_distance {
        Some(distance) => ResolutionDistance::try_from(distance).map_err(KestrelError::from)?,
        None => ResolutionDistance::Unbounded,
    };
    let options = SolverOptions {
        core_minimisation: args.core_strategy,
        resolution_distance,
    };

    let instance = parse_annotated_cnf(File::open(&args.instance_path)?)?;
    info!(
        "read {} variables, {} clauses, and {} root annotations",
        instance.num_variables,
        instance.clauses.len(),
        instance.roots.len()
    );

    let refutation = args
        .external_trace
        .as_deref()
        .map(read_trace)
        .transpose()?;

    let signal = OsSignal::install()?;
    let mut termination = Combinator::new(
        signal.clone(),
        args.time_limit
            .map(|millis| TimeBudget::starting_now(Duration::from_millis(millis))),
    );

    let mut solver: Solver<Dimacs, _, _, _> = Solver::first_order(
        DimacsTranslator,
        ReplayBackend::new(refutation),
        options,
    );
    let solution = solver.solve(
        &Constraint::Instance(Rc::new(instance)),
        &(),
        &mut LogReporter,
        &mut termination,
    )?;

    match solution {
        Solution::Satisfiable(literals) => {
            println!("s SATISFIABLE");
            let values = literals
                .iter()
                .map(|literal| literal.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!("v {values} 0");
        }
        Solution::Unsatisfiable(core) => {
            println!("s UNSATISFIABLE");
            for root in core.roots() {
                println!("c root {root}");
            }

            if let Some(path) = args.trace_path.as_deref() {
                write_trace(core.trace(), path)?;
                info!("wrote the refutation to {}", path.display());
            }
        }
        Solution::Unknown => {
            if let Some(number) = signal.received() {
                info!("stopped by signal {number}");
            }
            println!("s UNKNOWN");
        }
    }

    if should_log_statistics() {
        solver.backend().prover().log_statistics();
        log_statistic_postfix();
    }

    Ok(())
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "gz")
}

fn read_trace(path: &Path) -> KestrelSolverResult<ResolutionTrace> {
    let file = File::open(path)?;

    let steps = if is_gzipped(path) {
        read_gzipped_steps(file)?
    } else {
        TraceReader::new(file).read_all()?
    };

    Ok(ResolutionTrace::from_tracecheck(steps)?)
}

fn write_trace(trace: &ResolutionTrace, path: &Path) -> KestrelSolverResult<()> {
    let file = File::create(path)?;

    if is_gzipped(path) {
        write_gzipped_trace(trace, file)
    } else {
        let mut writer = TraceWriter::new(file);
        trace.write_tracecheck(&mut writer)?;
        Ok(())
    }
}

#[cfg(feature = "gzipped-traces")]
fn read_gzipped_steps(file: File) -> KestrelSolverResult<Vec<Step>> {
    Ok(TraceReader::new(flate2::read::GzDecoder::new(file)).read_all()?)
}

#[cfg(not(feature = "gzipped-traces"))]
fn read_gzipped_steps(_file: File) -> KestrelSolverResult<Vec<Step>> {
    Err(result::KestrelSolverError::GzipNotSupported)
}

#[cfg(feature = "gzipped-traces")]
fn write_gzipped_trace(trace: &ResolutionTrace, file: File) -> KestrelSolverResult<()> {
    let mut writer = TraceWriter::new(flate2::write::GzEncoder::new(
        file,
        flate2::Compression::fast(),
    ));
    trace.write_tracecheck(&mut writer)?;
    let _ = writer.into_inner()?.finish()?;
    Ok(())
}

#[cfg(not(feature = "gzipped-traces"))]
fn write_gzipped_trace(_trace: &ResolutionTrace, _file: File) -> KestrelSolverResult<()> {
    Err(result::KestrelSolverError::GzipNotSupported)
}
