mod assignment;
mod errors;
mod literal;

pub use assignment::Assignment;
pub use errors::*;
pub use literal::Literal;
pub use literal::Variable;
