//! Text preprocessor for dbscript sources.
//!
//! Runs before lexing. Handles `#include "file"`, object-like and
//! function-like `#define` (with `#param` stringize and `a##b` token
//! paste), and `#ifdef`/`#ifndef`/`#else`/`#endif` conditional regions.
//!
//! ```text
//! #define GREETING "hello"
//! #define SQUARE(x) ((x) * (x))
//! #ifdef DEBUG
//! ? "debug build"
//! #endif
//! ? GREETING, SQUARE(4)
//! ```
//!
//! Output is plain text plus an [`Origin`](dbs_diagnostic::Origin) per
//! output line, so later phases can report positions in the file the user
//! actually wrote.

mod conditional;
mod config;
mod directive;
mod error;
mod macros;
mod preprocessor;

pub use config::{PreprocessorConfig, DEFAULT_MAX_EXPANSION_PASSES};
pub use error::PreprocessError;
pub use preprocessor::{Preprocessed, Preprocessor};

#[cfg(test)]
mod tests;
