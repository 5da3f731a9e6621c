pub mod number;
pub mod parse;
