//! The `dbs` command-line driver.
//!
//! Each command runs a prefix of the pipeline:
//! preprocess → lex → parse → collect → exec.

pub mod commands;
pub mod options;
mod tracing_setup;

pub use options::{Options, OptionsError};
pub use tracing_setup::init_tracing;
