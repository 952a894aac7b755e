//! The `explain` command: describe an error code.

use dbs_diagnostic::parse_error_code;

pub fn explain_error(code_str: &str) {
    let Some(code) = parse_error_code(code_str) else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E0001, E1010, E3004");
        std::process::exit(1);
    };
    println!("{code} ({} error)", code.phase());
    println!();
    println!("{}", code.description());
}
