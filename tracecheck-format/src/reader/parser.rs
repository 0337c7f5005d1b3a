use std::iter::Copied;
use std::iter::Peekable;
use std::num::NonZeroI32;
use std::num::NonZeroU64;
use std::slice::Iter;

use crate::reader::Error;
use crate::Step;
use crate::StepId;

/// Parses a single line to possibly return a trace step.
///
/// See [`LineParser::parse`] for more information.
pub(super) struct LineParser<'src> {
    bytes: Peekable<Copied<Iter<'src, u8>>>,
    position: usize,
    line_nr: usize,
}

impl<'src> LineParser<'src> {
    pub(super) fn new(line: &'src [u8], line_nr: usize) -> Self {
        LineParser {
            bytes: line.iter().copied().peekable(),
            position: 0,
            line_nr,
        }
    }

    /// Parses a single line from a trace in the following shape:
    /// ```ignored
    /// <unsigned non-zero u64> (<signed non-zero i32>)* "0" (<unsigned non-zero u64>)* "0"
    /// ```
    ///
    /// The line may be empty or a comment, in which case this returns `Ok(None)`.
    pub(super) fn parse(mut self) -> Result<Option<Step>, Error> {
        self.consume_optional_whitespace();

        match self.peek() {
            None | Some(b'\n') | Some(b'c') => return Ok(None),
            Some(_) => {}
        }

        let id = self.consume_step_id()?;

        let mut literals = vec![];
        loop {
            self.consume_separator()?;

            if self.peek() == Some(b'*') {
                return Err(self.error("implicit resolvent literals ('*') are not supported"));
            }

            let start = self.position;
            let code = self.consume_signed_integer()?;
            if code == 0 {
                break;
            }

            let literal = i32::try_from(code)
                .ok()
                .and_then(NonZeroI32::new)
                .ok_or_else(|| Error::ParseError {
                    line_nr: self.line_nr,
                    reason: format!("literal {code} is out of range"),
                    span: (start, self.position),
                })?;
            literals.push(literal);
        }

        let mut antecedents = vec![];
        loop {
            self.consume_separator()?;

            let value = self.consume_unsigned_integer()?;
            match NonZeroU64::new(value) {
                Some(antecedent) => antecedents.push(antecedent),
                None => break,
            }
        }

        self.consume_optional_whitespace();
        if let Some(byte) = self.next() {
            if byte != b'\n' {
                return Err(Error::ParseError {
                    line_nr: self.line_nr,
                    reason: "unexpected input after the terminating 0".to_owned(),
                    span: (self.position - 1, self.position),
                });
            }
        }

        Ok(Some(Step {
            id,
            literals,
            antecedents,
        }))
    }

    fn consume_step_id(&mut self) -> Result<StepId, Error> {
        let start = self.position;
        let value = self.consume_unsigned_integer()?;

        NonZeroU64::new(value).ok_or_else(|| Error::ParseError {
            line_nr: self.line_nr,
            reason: "unexpected input: step ids must be non-zero".to_owned(),
            span: (start, self.position),
        })
    }

    fn consume_optional_whitespace(&mut self) {
        while self.peek().is_some_and(is_separator) {
            let _ = self.next();
        }
    }

    /// Consume at least one whitespace (not new-line).
    fn consume_separator(&mut self) -> Result<(), Error> {
        let byte = self.consume("whitespace")?;

        if is_separator(byte) {
            self.consume_optional_whitespace();
            Ok(())
        } else {
            Err(Error::ParseError {
                line_nr: self.line_nr,
                reason: if byte.is_ascii() {
                    format!("expected whitespace. got '{}'", byte as char)
                } else {
                    "expected whitespace".to_owned()
                },
                span: (self.position - 1, self.position),
            })
        }
    }

    fn consume_unsigned_integer(&mut self) -> Result<u64, Error> {
        let start = self.position;
        let mut number = u64::from(self.consume_digit()?);

        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            let digit = u64::from(self.consume_digit()?);
            number = number
                .checked_mul(10)
                .and_then(|shifted| shifted.checked_add(digit))
                .ok_or_else(|| Error::ParseError {
                    line_nr: self.line_nr,
                    reason: "integer overflow".to_owned(),
                    span: (start, self.position),
                })?;
        }

        Ok(number)
    }

    fn consume_signed_integer(&mut self) -> Result<i64, Error> {
        // Remove an optional leading '-'.
        let is_positive = if let Some(b'-') = self.peek() {
            let _ = self.next();
            false
        } else {
            true
        };

        let start = self.position;
        let magnitude = self.consume_unsigned_integer()?;
        let number = i64::try_from(magnitude).map_err(|_| Error::ParseError {
            line_nr: self.line_nr,
            reason: "integer overflow".to_owned(),
            span: (start, self.position),
        })?;

        Ok(if is_positive { number } else { -number })
    }

    fn consume_digit(&mut self) -> Result<u8, Error> {
        let byte = self.consume("digit")?;

        if byte.is_ascii_digit() {
            Ok(byte - b'0')
        } else {
            Err(Error::ParseError {
                line_nr: self.line_nr,
                reason: "unexpected input: expected digit".to_owned(),
                span: (self.position - 1, self.position),
            })
        }
    }

    /// Consume the next byte in the input, and error if it does not exist.
    fn consume(&mut self, expected: &str) -> Result<u8, Error> {
        self.next().ok_or_else(|| Error::ParseError {
            line_nr: self.line_nr,
            reason: format!("unexpected input: expected {expected} - got EOL"),
            span: (self.position, self.position + 1),
        })
    }

    /// Consume the next byte in the input.
    fn next(&mut self) -> Option<u8> {
        let byte = self.bytes.next()?;
        self.position += 1;
        Some(byte)
    }

    /// Look one character ahead.
    fn peek(&mut self) -> Option<u8> {
        self.bytes.peek().copied()
    }

    fn error(&self, reason: &str) -> Error {
        Error::ParseError {
            line_nr: self.line_nr,
            reason: reason.to_owned(),
            span: (self.position, self.position + 1),
        }
    }
}

fn is_separator(byte: u8) -> bool {
    byte == b' ' || byte == b'\t' || byte == b'\r'
}
