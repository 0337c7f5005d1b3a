//! A parser for DIMACS CNF files in which the top-level constraints can be annotated.
//!
//! A comment line of the form
//! ```text
//! c root <variable> [name]
//! ```
//! declares `<variable>` to be the root variable of a top-level constraint. The clauses of the
//! constraint are expected to be in the file, including the unit clause which asserts the root
//! variable; all other clauses which define the constraint should have the root variable as their
//! largest variable. A root variable may not occur in any other clause. Files without root annotations are treated as if every clause is a
//! top-level constraint of its own.
//!
//! Given that DIMACS files can be very large, the file is read in chunks, and the parser re-uses
//! its buffers rather than allocating for every clause.
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::num::NonZeroI32;
use std::str::FromStr;

use thiserror::Error;

/// The contents of an annotated DIMACS file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AnnotatedCnf {
    pub(crate) num_variables: u32,
    pub(crate) clauses: Vec<Vec<NonZeroI32>>,
    pub(crate) roots: Vec<RootAnnotation>,
}

/// A `c root` annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RootAnnotation {
    pub(crate) variable: u32,
    pub(crate) name: Option<String>,
}

#[derive(Debug, Error)]
pub(crate) enum DimacsParseError {
    #[error("failed to read file")]
    Io(#[from] std::io::Error),

    #[error("missing dimacs header")]
    MissingHeader,

    #[error("'{0}' is an invalid header")]
    InvalidHeader(String),

    #[error("multiple dimacs headers found")]
    DuplicateHeader,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("'{0}' is an invalid DIMACS literal")]
    InvalidLiteral(String),

    #[error("'{0}' is an invalid root annotation")]
    InvalidRootAnnotation(String),

    #[error("variable {variable} exceeds the {num_variables} variables declared in the header")]
    VariableOutOfRange { variable: u32, num_variables: u32 },

    #[error("the last clause in the source is not terminated with a '0'")]
    UnterminatedClause,

    #[error("expected to parse {expected} clauses, but parsed {parsed}")]
    IncorrectClauseCount { expected: usize, parsed: usize },
}

pub(crate) fn parse_annotated_cnf(source: impl Read) -> Result<AnnotatedCnf, DimacsParseError> {
    let mut reader = BufReader::new(source);
    let mut parser = DimacsParser::default();

    loop {
        let num_bytes = {
            let data = reader.fill_buf()?;

            if data.is_empty() {
                return parser.complete();
            }

            parser.parse_chunk(data)?;
            data.len()
        };

        reader.consume(num_bytes);
    }
}

#[derive(Debug, Default)]
struct DimacsParser {
    header: Option<CnfHeader>,
    formula: AnnotatedCnf,
    buffer: String,
    clause: Vec<NonZeroI32>,
    state: ParseState,
}

#[derive(Debug, Default)]
enum ParseState {
    #[default]
    StartLine,
    Header,
    Comment,
    Literal,
    NegativeLiteral,
    Clause,
}

impl DimacsParser {
    /// Parse the next chunk of bytes. This may start in the middle of parsing a clause or file
    /// header, and may end in such a state as well.
    fn parse_chunk(&mut self, chunk: &[u8]) -> Result<(), DimacsParseError> {
        for byte in chunk {
            match self.state {
                ParseState::StartLine => match byte {
                    b if b.is_ascii_whitespace() => {}

                    b'p' => {
                        self.state = ParseState::Header;
                        self.buffer.clear();
                        self.buffer.push('p');
                    }

                    b'c' => {
                        self.state = ParseState::Comment;
                        self.buffer.clear();
                    }

                    b @ b'1'..=b'9' => self.start_literal(b, true),

                    // An empty clause.
                    b'0' => self.finish_clause()?,

                    b'-' => self.start_literal(&b'-', false),

                    b => return Err(DimacsParseError::UnexpectedCharacter(*b as char)),
                },

                ParseState::Header => match byte {
                    b'\n' => {
                        self.init_formula()?;
                        self.state = ParseState::StartLine;
                    }

                    b => self.buffer.push(*b as char),
                },

                ParseState::Comment => match byte {
                    b'\n' => {
                        self.finish_comment()?;
                        self.state = ParseState::StartLine;
                    }

                    b => self.buffer.push(*b as char),
                },

                ParseState::Literal => match byte {
                    b if b.is_ascii_whitespace() => {
                        self.finish_literal()?;

                        if *b == b'\n' {
                            self.state = ParseState::StartLine;
                        }
                    }

                    b @ b'0'..=b'9' => self.buffer.push(*b as char),

                    b => return Err(DimacsParseError::UnexpectedCharacter(*b as char)),
                },

                ParseState::NegativeLiteral => match byte {
                    b @ b'1'..=b'9' => {
                        self.buffer.push(*b as char);
                        self.state = ParseState::Literal;
                    }

                    b => return Err(DimacsParseError::UnexpectedCharacter(*b as char)),
                },

                ParseState::Clause => match byte {
                    b'0' => self.finish_clause()?,

                    // A new-line does not terminate the clause. The literals parsed so far are
                    // kept, and parsing continues after any comments or leading whitespace.
                    b'\n' => self.state = ParseState::StartLine,
                    b if b.is_ascii_whitespace() => {}

                    b @ b'1'..=b'9' => self.start_literal(b, true),
                    b'-' => self.start_literal(&b'-', false),

                    b => return Err(DimacsParseError::UnexpectedCharacter(*b as char)),
                },
            }
        }

        Ok(())
    }

    fn start_literal(&mut self, b: &u8, is_positive: bool) {
        self.state = if is_positive {
            ParseState::Literal
        } else {
            ParseState::NegativeLiteral
        };

        self.buffer.clear();
        self.buffer.push(*b as char);
    }

    fn complete(mut self) -> Result<AnnotatedCnf, DimacsParseError> {
        // The last line of the source does not have to end with a new-line.
        match self.state {
            ParseState::Header => self.init_formula()?,
            ParseState::Comment => self.finish_comment()?,
            ParseState::Literal => self.finish_literal()?,
            _ => {}
        }

        let header = self.header.ok_or(DimacsParseError::MissingHeader)?;

        if !self.clause.is_empty() {
            return Err(DimacsParseError::UnterminatedClause);
        }

        if header.num_clauses != self.formula.clauses.len() {
            return Err(DimacsParseError::IncorrectClauseCount {
                expected: header.num_clauses,
                parsed: self.formula.clauses.len(),
            });
        }

        if let Some(root) = self
            .formula
            .roots
            .iter()
            .find(|root| root.variable > header.num_variables)
        {
            return Err(DimacsParseError::VariableOutOfRange {
                variable: root.variable,
                num_variables: header.num_variables,
            });
        }

        Ok(self.formula)
    }

    fn init_formula(&mut self) -> Result<(), DimacsParseError> {
        if self.header.is_some() {
            return Err(DimacsParseError::DuplicateHeader);
        }

        let header = self.buffer.trim().parse::<CnfHeader>()?;
        self.formula.num_variables = header.num_variables;
        self.header = Some(header);

        Ok(())
    }

    fn finish_comment(&mut self) -> Result<(), DimacsParseError> {
        let mut words = self.buffer.split_whitespace();
        if words.next() != Some("root") {
            return Ok(());
        }

        let variable = words
            .next()
            .and_then(|word| word.parse::<u32>().ok())
            .filter(|&variable| variable > 0)
            .ok_or_else(|| DimacsParseError::InvalidRootAnnotation(self.buffer.trim().to_owned()))?;

        let name = words.collect::<Vec<_>>().join(" ");

        self.formula.roots.push(RootAnnotation {
            variable,
            name: (!name.is_empty()).then_some(name),
        });

        Ok(())
    }

    fn finish_literal(&mut self) -> Result<(), DimacsParseError> {
        let literal = self
            .buffer
            .parse::<i32>()
            .ok()
            .and_then(NonZeroI32::new)
            .ok_or_else(|| DimacsParseError::InvalidLiteral(self.buffer.clone()))?;

        let header = self.header.as_ref().ok_or(DimacsParseError::MissingHeader)?;
        if literal.unsigned_abs().get() > header.num_variables {
            return Err(DimacsParseError::VariableOutOfRange {
                variable: literal.unsigned_abs().get(),
                num_variables: header.num_variables,
            });
        }

        self.clause.push(literal);
        self.state = ParseState::Clause;

        Ok(())
    }

    fn finish_clause(&mut self) -> Result<(), DimacsParseError> {
        if self.header.is_none() {
            return Err(DimacsParseError::MissingHeader);
        }

        self.formula.clauses.push(std::mem::take(&mut self.clause));
        self.state = ParseState::Clause;

        Ok(())
    }
}

#[derive(Debug)]
struct CnfHeader {
    num_variables: u32,
    num_clauses: usize,
}

impl FromStr for CnfHeader {
    type Err = DimacsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("p cnf ") {
            return Err(DimacsParseError::InvalidHeader(s.to_owned()));
        }

        let mut components = s.split_whitespace().skip(2);

        let num_variables = next_header_component::<u32>(&mut components, s)?;
        let num_clauses = next_header_component::<usize>(&mut components, s)?;

        if components.next().is_some() {
            return Err(DimacsParseError::InvalidHeader(s.to_owned()));
        }

        Ok(Self {
            num_variables,
            num_clauses,
        })
    }
}

fn next_header_component<'a, Num: FromStr>(
    components: &mut impl Iterator<Item = &'a str>,
    header: &str,
) -> Result<Num, DimacsParseError> {
    components
        .next()
        .ok_or_else(|| DimacsParseError::InvalidHeader(header.to_owned()))?
        .parse::<Num>()
        .map_err(|_| DimacsParseError::InvalidHeader(header.to_owned()))
}
