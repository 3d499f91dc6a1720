//! # llvm-ir-parser
//!
//! Lexer, recursive-descent parser, and printer for the textual IR
//! assembly format used to feed modules into and read them back out of
//! the optimizer pipeline.

pub mod lexer;
pub mod parser;
pub mod printer;

pub use lexer::{LexError, Lexer, Token};
pub use parser::{parse_module, ParseError, Parser};
pub use printer::print_module;
