//! Implements the parsing of TraceCheck files.
//!
//! See [`TraceReader`] for information on how to parse a trace.

mod error;
mod parser;

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

pub use error::Error;
use parser::LineParser;

use crate::Step;

/// Used to read and parse TraceCheck traces.
///
/// The reader reads the trace line-by-line. Empty lines and lines starting with `c` (comments)
/// are skipped. The reader does not check that the trace is a valid refutation; it only checks
/// that every line is well-formed. Notably, the `*` shorthand for resolvents whose literals have
/// to be recomputed is rejected, since literals are required downstream.
///
/// # Example
/// ```
/// use std::num::NonZeroI32;
/// use std::num::NonZeroU64;
///
/// use tracecheck_format::reader::TraceReader;
/// use tracecheck_format::Step;
///
/// let source = r#"
/// 1 1 0 0
/// 2 -1 0 0
/// 3 0 1 2 0
/// "#;
///
/// let mut reader = TraceReader::new(source.as_bytes());
/// let lit = |num: i32| NonZeroI32::new(num).unwrap();
/// let id = |num: u64| NonZeroU64::new(num).unwrap();
///
/// let first = reader.next_step().expect("valid step");
/// assert_eq!(
///     Some(Step {
///         id: id(1),
///         literals: vec![lit(1)],
///         antecedents: vec![],
///     }),
///     first
/// );
///
/// let _ = reader.next_step().expect("valid step");
///
/// let resolvent = reader.next_step().expect("valid step").expect("not at the end");
/// assert!(resolvent.is_empty_clause());
/// assert_eq!(vec![id(1), id(2)], resolvent.antecedents);
///
/// assert_eq!(None, reader.next_step().expect("finished reading"));
/// ```
#[derive(Debug)]
pub struct TraceReader<R> {
    source: BufReader<R>,
    buffer: Vec<u8>,
    line_nr: usize,
}

impl<R: Read> TraceReader<R> {
    /// Construct a new trace reader which reads from `source`.
    pub fn new(source: R) -> TraceReader<R> {
        TraceReader {
            source: BufReader::new(source),
            buffer: Vec::new(),
            line_nr: 0,
        }
    }

    /// Read the next step in the trace.
    ///
    /// If reading is successful, `Some(step)` is returned with the next step, or `None` if the end
    /// of the trace is reached. On an error, be it from IO or other, the `Err` variant is
    /// returned.
    pub fn next_step(&mut self) -> Result<Option<Step>, Error> {
        loop {
            self.buffer.clear();
            let read_bytes = self.source.read_until(b'\n', &mut self.buffer)?;

            if read_bytes == 0 {
                // The end of the file has been reached.
                return Ok(None);
            }

            self.line_nr += 1;

            if let Some(step) = LineParser::new(&self.buffer, self.line_nr).parse()? {
                return Ok(Some(step));
            }
        }
    }

    /// Read all remaining steps.
    pub fn read_all(mut self) -> Result<Vec<Step>, Error> {
        let mut steps = vec![];

        while let Some(step) = self.next_step()? {
            steps.push(step);
        }

        Ok(steps)
    }
}
