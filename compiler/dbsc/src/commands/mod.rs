//! Command handlers for the `dbs` CLI.
//!
//! Handlers report failures as rendered diagnostics on stderr and exit
//! with status 1. Shared pipeline steps live here in the module root.

use std::io::IsTerminal;

use dbs_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use dbs_diagnostic::Diagnostic;
use dbs_ir::ast::SyntaxTree;
use dbs_ir::{StringInterner, TokenList};
use dbs_preproc::{Preprocessed, Preprocessor};

use crate::options::{Options, INCLUDE_PATH_VAR};

mod debug;
mod explain;
mod run;

pub use debug::{lex_file, parse_file, preprocess_file};
pub use explain::explain_error;
pub use run::run_file;

/// A stderr emitter honoring `--color`.
pub(crate) fn stderr_emitter<'a>(color: ColorMode) -> TerminalEmitter<'a, std::io::Stderr> {
    TerminalEmitter::stderr(color, std::io::stderr().is_terminal())
}

/// Emit `diagnostic` and exit with status 1.
pub(crate) fn fail(
    emitter: &mut TerminalEmitter<'_, std::io::Stderr>,
    diagnostic: &Diagnostic,
) -> ! {
    emitter.emit(diagnostic);
    emitter.flush();
    std::process::exit(1);
}

/// Run the preprocessor over `options.file`.
pub(crate) fn preprocess(options: &Options) -> Preprocessed {
    let env_paths = std::env::var_os(INCLUDE_PATH_VAR);
    let config = options.preprocessor_config(env_paths.as_deref());
    let mut preprocessor = Preprocessor::new(config);
    match preprocessor.process_mapped(&options.file) {
        Ok(program) => program,
        Err(err) => fail(&mut stderr_emitter(options.color), &err.to_diagnostic()),
    }
}

pub(crate) fn tokens(
    program: &Preprocessed,
    interner: &StringInterner,
) -> Result<TokenList, Diagnostic> {
    dbs_lexer::lex(&program.text, interner).map_err(|err| err.to_diagnostic())
}

pub(crate) fn syntax_tree(
    program: &Preprocessed,
    interner: &StringInterner,
) -> Result<SyntaxTree, Diagnostic> {
    let tokens = tokens(program, interner)?;
    dbs_parse::parse(&tokens, interner).map_err(|err| err.to_diagnostic())
}
