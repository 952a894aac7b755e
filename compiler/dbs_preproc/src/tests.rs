#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::fs;
use std::path::Path;

use dbs_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn run(source: &str) -> Result<String, PreprocessError> {
    Preprocessor::new(PreprocessorConfig::default())
        .process_source(Path::new("main.prg"), source)
        .map(|out| out.text)
}

fn run_with(config: PreprocessorConfig, source: &str) -> Result<String, PreprocessError> {
    Preprocessor::new(config)
        .process_source(Path::new("main.prg"), source)
        .map(|out| out.text)
}

#[test]
fn plain_lines_pass_through_with_comments() {
    let out = run("x = 1 // one\n? x && show\n").unwrap();
    assert_eq!(out, "x = 1 // one\n? x && show\n");
}

#[test]
fn define_and_expand() {
    let src = "#define MAX 10\n#define SQ(x) ((x)*(x))\n? MAX, SQ(MAX)\n";
    assert_eq!(run(src).unwrap(), "? 10, ((10)*(10))\n");
}

#[test]
fn stringize_argument() {
    let src = "#define STR(x) #x\n? STR(a+b)\n";
    assert_eq!(run(src).unwrap(), "? \"a+b\"\n");
}

#[test]
fn paste_arguments() {
    let src = "#define CAT(a, b) a##b\nCAT(foo, bar) = 1\n";
    assert_eq!(run(src).unwrap(), "foobar = 1\n");
}

#[test]
fn nested_conditionals_emit_only_inner_true_lines() {
    let src = "\
#define A
#ifdef A
outer
#ifndef B
inner
#else
inner-else
#endif
#else
outer-else
#endif
";
    assert_eq!(run(src).unwrap(), "outer\ninner\n");
}

#[test]
fn directives_inside_inactive_region_are_skipped() {
    let src = "\
#ifdef NOPE
#define HIDDEN 1
#include \"missing.h\"
#ifdef ALSO_NOPE
#endif
#endif
#ifdef HIDDEN
bad
#endif
done
";
    assert_eq!(run(src).unwrap(), "done\n");
}

#[test]
fn commented_directives_still_match() {
    let src = "#define DEBUG // on\n#ifdef DEBUG && check\nyes\n#endif ** end\n";
    assert_eq!(run(src).unwrap(), "yes\n");
}

#[test]
fn predefined_macros_from_config() {
    let config = PreprocessorConfig::default().with_define("TARGET", "\"qt\"");
    let src = "#ifdef TARGET\n? TARGET\n#endif\n";
    assert_eq!(run_with(config, src).unwrap(), "? \"qt\"\n");
}

#[test]
fn duplicate_else() {
    let err = run("#ifdef A\n#else\n#else\n#endif\n").unwrap_err();
    assert!(matches!(err, PreprocessError::DuplicateElse { line: 3, .. }));
    assert_eq!(err.error_code(), ErrorCode::E0005);
}

#[test]
fn missing_endif_names_opener() {
    let err = run("x\n#ifndef GUARD\ny\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing #endif for #ifndef GUARD (opened at main.prg:2)"
    );
}

#[test]
fn stray_endif() {
    let err = run("#endif\n").unwrap_err();
    assert_eq!(err.to_string(), "#endif without #ifdef/#ifndef");
    assert_eq!(err.error_code(), ErrorCode::E0004);
}

#[test]
fn malformed_function_define() {
    let err = run("\n#define F(a, b a+b\n").unwrap_err();
    assert!(matches!(err, PreprocessError::MalformedDefine { line: 2, .. }));
}

#[test]
fn macro_arity() {
    let err = run("#define F(a, b) a+b\n? F(1)\n").unwrap_err();
    assert!(matches!(
        err,
        PreprocessError::MacroArity {
            expected: 2,
            found: 1,
            line: 2,
            ..
        }
    ));
}

#[test]
fn expansion_limit_is_an_error() {
    let err = run("#define X X+1\n? X\n").unwrap_err();
    assert!(matches!(
        err,
        PreprocessError::ExpansionLimit { passes: 50, line: 2, .. }
    ));
    assert_eq!(err.error_code(), ErrorCode::E0007);
}

#[test]
fn expansion_limit_is_configurable() {
    // Defined last-to-first, so each pass resolves one link of the chain.
    let src = "#define D E\n#define C D\n#define B C\n#define A B\n? A\n";
    assert_eq!(run(src).unwrap(), "? E\n");

    let config = PreprocessorConfig {
        max_expansion_passes: 2,
        ..PreprocessorConfig::default()
    };
    let err = run_with(config, src).unwrap_err();
    assert!(matches!(
        err,
        PreprocessError::ExpansionLimit { passes: 2, line: 5, .. }
    ));
}

#[test]
fn include_not_found() {
    let err = run("\n#include \"nowhere.h\"\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "include file not found: \"nowhere.h\" (from main.prg:2)"
    );
    assert_eq!(err.error_code(), ErrorCode::E0002);
}

#[test]
fn include_splices_text_and_maps_origins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("defs.h"), "#define GREETING \"hi\"\nshared\n").unwrap();
    let main = dir.path().join("main.prg");
    fs::write(&main, "first\n#include \"defs.h\"\n? GREETING\n").unwrap();

    let out = Preprocessor::new(PreprocessorConfig::default())
        .process_mapped(&main)
        .unwrap();
    assert_eq!(out.text, "first\nshared\n? \"hi\"\n");

    let lines: Vec<(String, u32)> = out
        .origins
        .iter()
        .map(|o| {
            let name = Path::new(&o.file).file_name().unwrap();
            (name.to_string_lossy().into_owned(), o.line)
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            ("main.prg".to_string(), 1),
            ("defs.h".to_string(), 2),
            ("main.prg".to_string(), 3),
        ]
    );
    assert_eq!(out.origin(3).map(|o| o.line), Some(3));
    assert_eq!(out.origin(0), None);
}

#[test]
fn include_paths_are_searched_after_own_dir() {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("lib");
    let src = dir.path().join("src");
    fs::create_dir_all(&lib).unwrap();
    fs::create_dir_all(&src).unwrap();
    fs::write(lib.join("common.h"), "from-lib\n").unwrap();
    let main = src.join("main.prg");
    fs::write(&main, "#include \"common.h\"\n").unwrap();

    let config = PreprocessorConfig::default().with_include_path(&lib);
    let out = Preprocessor::new(config).process(&main).unwrap();
    assert_eq!(out, "from-lib\n");

    fs::write(src.join("common.h"), "from-src\n").unwrap();
    let config = PreprocessorConfig::default().with_include_path(&lib);
    let out = Preprocessor::new(config).process(&main).unwrap();
    assert_eq!(out, "from-src\n");
}

#[test]
fn circular_include_names_both_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.prg"), "#include \"b.h\"\n").unwrap();
    fs::write(dir.path().join("b.h"), "#include \"a.prg\"\n").unwrap();

    let err = Preprocessor::new(PreprocessorConfig::default())
        .process(&dir.path().join("a.prg"))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("circular include detected: "), "{message}");
    assert!(message.contains("a.prg -> "), "{message}");
    assert!(message.contains("b.h -> "), "{message}");
    assert!(message.ends_with("a.prg"), "{message}");
}

#[test]
fn defines_from_included_file_are_visible_after_include() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("guard.h"),
        "#ifndef GUARD_H\n#define GUARD_H\nonce\n#endif\n",
    )
    .unwrap();
    let main = dir.path().join("main.prg");
    fs::write(&main, "#include \"guard.h\"\n#include \"guard.h\"\n").unwrap();

    let mut pp = Preprocessor::new(PreprocessorConfig::default());
    assert_eq!(pp.process(&main).unwrap(), "once\n");
    assert!(pp.is_defined("GUARD_H"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Preprocessor::new(PreprocessorConfig::default())
        .process(&dir.path().join("absent.prg"))
        .unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::E0008);
}

#[test]
fn diagnostic_carries_location() {
    let err = run("#define F(a) a\n\n? F(1, 2)\n").unwrap_err();
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E0006);
    let location = diag.location.unwrap();
    assert_eq!((location.file.as_str(), location.line), ("main.prg", 3));
}

fn preprocessor_with_macros() -> Preprocessor {
    let mut pp = Preprocessor::new(PreprocessorConfig::default());
    pp.process_source(
        Path::new("defs.h"),
        "#define MAX 10\n#define SQ(x) ((x)*(x))\n#define CAT(a, b) a##b\n#define STR(x) #x\n",
    )
    .unwrap();
    pp
}

proptest! {
    #[test]
    fn expansion_is_idempotent(line in "[A-Za-z0-9_ +*(),\"]{0,40}") {
        let pp = preprocessor_with_macros();
        if let Ok(once) = pp.expand_line(&line) {
            let twice = pp.expand_line(&once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
