//! Shared data types for the dbscript toolchain: source spans, interned
//! case-insensitive identifiers, tokens and the syntax tree arena consumed by
//! the evaluator.

pub mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
