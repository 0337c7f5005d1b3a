use std::io::BufWriter;
use std::io::Write;
use std::num::NonZeroI32;
use std::num::NonZeroU64;

use crate::StepId;

/// Abstraction for writing TraceCheck resolution traces.
///
/// Step ids are handed out by the writer in increasing order, starting at 1.
///
/// # Example
/// ```
/// # use std::num::NonZeroI32;
/// # use tracecheck_format::writer::TraceWriter;
/// let mut trace: Vec<u8> = Vec::new();
/// let mut writer = TraceWriter::new(&mut trace);
///
/// let lit = |num: i32| NonZeroI32::new(num).unwrap();
/// let a = writer.log_axiom([lit(1)]).unwrap();
/// let b = writer.log_axiom([lit(-1)]).unwrap();
/// let _ = writer.log_resolvent([], [a, b]).unwrap();
/// writer.flush().unwrap();
/// drop(writer);
///
/// let expected = "
/// 1 1 0 0
/// 2 -1 0 0
/// 3 0 1 2 0
/// ";
/// assert_eq!(trace, expected.trim_start().as_bytes());
/// ```
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    /// The writer to the underlying sink.
    writer: BufWriter<W>,
    /// The id for the next step which is logged.
    next_step_id: StepId,
}

impl<W: Write> TraceWriter<W> {
    /// Create a new trace writer which writes the trace to an underlying sink implementing
    /// [`Write`].
    pub fn new(writer: W) -> Self {
        TraceWriter {
            writer: BufWriter::new(writer),
            next_step_id: NonZeroU64::MIN,
        }
    }

    /// Write an input clause to the trace and return the id it was given.
    ///
    /// This function wraps an IO operation, which is why it can fail with an IO error.
    pub fn log_axiom(
        &mut self,
        literals: impl IntoIterator<Item = NonZeroI32>,
    ) -> std::io::Result<StepId> {
        self.log_step(literals, [])
    }

    /// Write a derived clause with its antecedents to the trace and return the id it was given.
    ///
    /// This function wraps an IO operation, which is why it can fail with an IO error.
    pub fn log_resolvent(
        &mut self,
        literals: impl IntoIterator<Item = NonZeroI32>,
        antecedents: impl IntoIterator<Item = StepId>,
    ) -> std::io::Result<StepId> {
        self.log_step(literals, antecedents)
    }

    /// Flush the buffered steps to the underlying sink.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    /// Flush the buffered steps and hand back the underlying sink.
    pub fn into_inner(self) -> std::io::Result<W> {
        self.writer
            .into_inner()
            .map_err(|error| error.into_error())
    }

    fn log_step(
        &mut self,
        literals: impl IntoIterator<Item = NonZeroI32>,
        antecedents: impl IntoIterator<Item = StepId>,
    ) -> std::io::Result<StepId> {
        let id = self.next_step_id;
        self.next_step_id = id
            .checked_add(1)
            .ok_or_else(|| std::io::Error::other("step ids exhausted"))?;

        write!(self.writer, "{id}")?;
        for literal in literals {
            write!(self.writer, " {literal}")?;
        }
        write!(self.writer, " 0")?;
        for antecedent in antecedents {
            write!(self.writer, " {antecedent}")?;
        }
        writeln!(self.writer, " 0")?;

        Ok(id)
    }
}
