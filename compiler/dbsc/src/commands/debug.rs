//! Debug commands: `pp`, `lex` and `parse` for inspecting the front end.

use dbs_ir::ast::StmtKind;
use dbs_ir::StringInterner;

use super::{fail, preprocess, stderr_emitter, syntax_tree, tokens};
use crate::options::Options;

/// Print the preprocessed text.
pub fn preprocess_file(options: &Options) {
    let program = preprocess(options);
    print!("{}", program.text);
}

/// Lex a file and display the token stream.
pub fn lex_file(options: &Options) {
    let program = preprocess(options);
    let interner = StringInterner::new();
    let toks = match tokens(&program, &interner) {
        Ok(toks) => toks,
        Err(diagnostic) => {
            let mut emitter = stderr_emitter(options.color)
                .with_source(&program.text)
                .with_origins(&program.origins);
            fail(&mut emitter, &diagnostic)
        }
    };

    let path = options.file.display();
    println!("Tokens for '{path}' ({} tokens):", toks.len());
    for tok in &toks {
        println!("  {tok:?}");
    }
}

/// Parse a file and display the syntax tree.
pub fn parse_file(options: &Options) {
    let program = preprocess(options);
    let interner = StringInterner::new();
    let tree = match syntax_tree(&program, &interner) {
        Ok(tree) => tree,
        Err(diagnostic) => {
            let mut emitter = stderr_emitter(options.color)
                .with_source(&program.text)
                .with_origins(&program.origins);
            fail(&mut emitter, &diagnostic)
        }
    };

    let classes = tree
        .items()
        .iter()
        .filter(|&&id| matches!(tree.stmt(id).kind, StmtKind::ClassDecl(_)))
        .count();

    println!("Parse result for '{}':", options.file.display());
    println!("  Classes: {classes}");
    println!("  Statements: {}", tree.stmt_count());
    println!("  Expressions: {}", tree.expr_count());
    println!();
    print!("{}", tree.dump(&interner));
}
