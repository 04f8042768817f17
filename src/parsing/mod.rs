pub mod extract;
pub mod grammar;
pub mod lexer;

pub use extract::extract_records;
