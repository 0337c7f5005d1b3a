use std::fmt::Display;
use std::fmt::Formatter;
use std::num::NonZeroI32;
use std::num::NonZeroU32;
use std::ops::Not;

use crate::containers::StorageKey;

/// A boolean variable. Variables are numbered from 1, following the DIMACS convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroU32);

impl Variable {
    /// The largest variable index which can still be negated into a [`Literal`].
    pub const MAX_INDEX: u32 = i32::MAX as u32;

    /// Create the variable with the given (1-based) index. Returns `None` if the index is zero or
    /// larger than [`Variable::MAX_INDEX`].
    pub fn new(index: u32) -> Option<Variable> {
        if index > Self::MAX_INDEX {
            return None;
        }

        NonZeroU32::new(index).map(Variable)
    }

    /// The (1-based) index of this variable.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn positive(self) -> Literal {
        Literal::new(self, true)
    }

    pub fn negative(self) -> Literal {
        Literal::new(self, false)
    }
}

impl StorageKey for Variable {
    fn index(&self) -> usize {
        self.0.get() as usize - 1
    }

    fn create_from_index(index: usize) -> Self {
        let index = u32::try_from(index + 1).expect("variable indices fit in u32");
        Variable::new(index).expect("variable index is within range")
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A signed variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(NonZeroI32);

impl Literal {
    pub fn new(variable: Variable, is_positive: bool) -> Literal {
        // Variables never exceed `i32::MAX`, see `Variable::new`.
        let code = variable.get() as i32;
        let code = if is_positive { code } else { -code };

        Literal(NonZeroI32::new(code).expect("variables are non-zero"))
    }

    /// Interpret a non-zero DIMACS integer as a literal.
    pub fn from_dimacs(code: i32) -> Option<Literal> {
        if code == i32::MIN {
            return None;
        }

        NonZeroI32::new(code).map(Literal)
    }

    /// The DIMACS code of this literal.
    pub fn to_dimacs(self) -> NonZeroI32 {
        self.0
    }

    pub fn variable(self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    pub fn is_positive(self) -> bool {
        self.0.is_positive()
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal(-self.0)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
