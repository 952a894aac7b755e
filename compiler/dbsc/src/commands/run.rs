//! The `run` command: preprocess, parse and execute a program.

use dbs_diagnostic::emitter::DiagnosticEmitter;
use dbs_eval::{InterpreterBuilder, RecordingBackend};
use dbs_ir::StringInterner;

use super::{fail, preprocess, stderr_emitter, syntax_tree};
use crate::options::Options;

/// Run a program with the headless backend.
///
/// With `--trace-ui` every backend call is printed to stderr once the
/// program finishes, whether or not it failed.
pub fn run_file(options: &Options) {
    let program = preprocess(options);
    let interner = StringInterner::new();
    let mut emitter = stderr_emitter(options.color)
        .with_source(&program.text)
        .with_origins(&program.origins);

    let tree = match syntax_tree(&program, &interner) {
        Ok(tree) => tree,
        Err(diagnostic) => fail(&mut emitter, &diagnostic),
    };

    let recording = RecordingBackend::new();
    let mut builder = InterpreterBuilder::new(&tree, &interner);
    if options.trace_ui {
        builder = builder.backend(recording.clone());
    }
    let result = builder.build().run();

    if options.trace_ui {
        for line in recording.transcript() {
            eprintln!("ui: {line}");
        }
    }
    if let Err(err) = result {
        fail(&mut emitter, &err.to_diagnostic());
    }
    emitter.flush();
}
