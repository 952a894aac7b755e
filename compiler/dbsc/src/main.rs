//! dbscript CLI

use dbsc::commands::{explain_error, lex_file, parse_file, preprocess_file, run_file};
use dbsc::{init_tracing, Options};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let handler: fn(&Options) = match command.as_str() {
        "run" => run_file,
        "pp" => preprocess_file,
        "lex" => lex_file,
        "parse" => parse_file,
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-v" => {
            println!("dbscript {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: dbs explain <ERROR_CODE>");
                eprintln!("Example: dbs explain E3004");
                std::process::exit(1);
            }
            explain_error(&args[2]);
            return;
        }
        _ => {
            // A bare program path runs it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("prg"))
            {
                run_with(run_file, &args[1..]);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
            return;
        }
    };
    run_with(handler, &args[2..]);
}

fn run_with(handler: fn(&Options), args: &[String]) {
    match Options::parse(args) {
        Ok(options) => handler(&options),
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("dbscript interpreter");
    println!();
    println!("Usage: dbs <command> <file.prg> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.prg>       Preprocess, parse and run a program");
    println!("  pp <file.prg>        Print the preprocessed text");
    println!("  lex <file.prg>       Tokenize and display tokens");
    println!("  parse <file.prg>     Parse and display classes and statements");
    println!("  explain <code>       Explain an error code (e.g., E3004)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  -I <dir>             Add an include directory (repeatable)");
    println!("  -D <NAME[=value]>    Define a macro; the value defaults to 1");
    println!("  --trace-ui           Print UI backend calls after `run`");
    println!("  --color=<mode>       Diagnostics coloring: auto, always, never");
    println!();
    println!("Environment:");
    println!("  DBS_INCLUDE_PATH     Extra include directories, searched after -I");
    println!("  RUST_LOG             Enable tracing (e.g. RUST_LOG=dbs_eval=debug)");
    println!("  DBS_LOG_TREE=1       Render tracing as an indented tree");
}
