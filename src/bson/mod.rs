//! BSON utilities: extended JSON conversion and literal rendering of values.

mod formatter;
mod parser;

pub use formatter::*;
pub use parser::*;
