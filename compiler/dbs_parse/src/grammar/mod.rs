//! Grammar rules, split by construct.

mod class;
mod expr;
mod stmt;
