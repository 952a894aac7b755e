//! Error codes for all dbscript diagnostics.

use std::fmt;

/// Error codes, `E####`, where the first digit names the phase:
/// - E0xxx: preprocessor
/// - E1xxx: lexer and parser
/// - E2xxx: class collection (semantic checks)
/// - E3xxx: runtime
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Preprocessor (E0xxx)
    /// Circular `#include`
    E0001,
    /// `#include` target not found
    E0002,
    /// Malformed `#define`
    E0003,
    /// Unbalanced `#ifdef`/`#ifndef`/`#else`/`#endif`
    E0004,
    /// Second `#else` for one conditional
    E0005,
    /// Function-like macro called with the wrong number of arguments
    E0006,
    /// Macro expansion did not settle within the pass limit
    E0007,
    /// Source file could not be read
    E0008,

    // Lexer and parser (E1xxx)
    /// Invalid character
    E1001,
    /// Unterminated string literal
    E1002,
    /// Unterminated block comment
    E1003,
    /// Unexpected token
    E1010,
    /// Expected an expression
    E1011,
    /// Block not closed before end of input
    E1012,

    // Class collection (E2xxx)
    /// Method or property declared twice in one class
    E2001,
    /// Class declared twice
    E2002,
    /// Parent class does not exist
    E2003,
    /// Class inherits from itself
    E2004,

    // Runtime (E3xxx)
    /// Undefined name
    E3001,
    /// Unknown class
    E3002,
    /// Member not found
    E3003,
    /// Method not found
    E3004,
    /// `SUPER::` call with no parent method to resolve
    E3005,
    /// Assignment target is not assignable
    E3006,
    /// `BREAK` outside a loop
    E3007,
    /// `RETURN` outside a method
    E3008,
    /// Operand kinds do not fit the operator
    E3010,
    /// Division by zero
    E3011,
    /// Value is not callable
    E3012,
    /// `FOR` loop with `STEP 0`
    E3013,
    /// `DO WHILE` exceeded the iteration cap
    E3014,
    /// Delegate target no longer exists
    E3015,
    /// UI backend reported a failure
    E3016,
    /// Property default constructs an instance of its own class
    E3017,
}

impl ErrorCode {
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E0006,
        ErrorCode::E0007,
        ErrorCode::E0008,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1010,
        ErrorCode::E1011,
        ErrorCode::E1012,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E3006,
        ErrorCode::E3007,
        ErrorCode::E3008,
        ErrorCode::E3010,
        ErrorCode::E3011,
        ErrorCode::E3012,
        ErrorCode::E3013,
        ErrorCode::E3014,
        ErrorCode::E3015,
        ErrorCode::E3016,
        ErrorCode::E3017,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0008 => "E0008",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            ErrorCode::E1012 => "E1012",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E3011 => "E3011",
            ErrorCode::E3012 => "E3012",
            ErrorCode::E3013 => "E3013",
            ErrorCode::E3014 => "E3014",
            ErrorCode::E3015 => "E3015",
            ErrorCode::E3016 => "E3016",
            ErrorCode::E3017 => "E3017",
        }
    }

    /// One-line description, used by `dbs explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "Circular `#include`",
            ErrorCode::E0002 => "`#include` target not found",
            ErrorCode::E0003 => "Malformed `#define`",
            ErrorCode::E0004 => "Unbalanced `#ifdef`/`#ifndef`/`#else`/`#endif`",
            ErrorCode::E0005 => "Second `#else` for one conditional",
            ErrorCode::E0006 => "Function-like macro called with the wrong number of arguments",
            ErrorCode::E0007 => "Macro expansion did not settle within the pass limit",
            ErrorCode::E0008 => "Source file could not be read",
            ErrorCode::E1001 => "Invalid character",
            ErrorCode::E1002 => "Unterminated string literal",
            ErrorCode::E1003 => "Unterminated block comment",
            ErrorCode::E1010 => "Unexpected token",
            ErrorCode::E1011 => "Expected an expression",
            ErrorCode::E1012 => "Block not closed before end of input",
            ErrorCode::E2001 => "Method or property declared twice in one class",
            ErrorCode::E2002 => "Class declared twice",
            ErrorCode::E2003 => "Parent class does not exist",
            ErrorCode::E2004 => "Class inherits from itself",
            ErrorCode::E3001 => "Undefined name",
            ErrorCode::E3002 => "Unknown class",
            ErrorCode::E3003 => "Member not found",
            ErrorCode::E3004 => "Method not found",
            ErrorCode::E3005 => "`SUPER::` call with no parent method to resolve",
            ErrorCode::E3006 => "Assignment target is not assignable",
            ErrorCode::E3007 => "`BREAK` outside a loop",
            ErrorCode::E3008 => "`RETURN` outside a method",
            ErrorCode::E3010 => "Operand kinds do not fit the operator",
            ErrorCode::E3011 => "Division by zero",
            ErrorCode::E3012 => "Value is not callable",
            ErrorCode::E3013 => "`FOR` loop with `STEP 0`",
            ErrorCode::E3014 => "`DO WHILE` exceeded the iteration cap",
            ErrorCode::E3015 => "Delegate target no longer exists",
            ErrorCode::E3016 => "UI backend reported a failure",
            ErrorCode::E3017 => "Property default constructs an instance of its own class",
        }
    }

    /// Phase name, derived from the first digit.
    pub fn phase(&self) -> &'static str {
        match self.as_str().as_bytes().get(1) {
            Some(b'0') => "preprocessor",
            Some(b'1') => "parser",
            Some(b'2') => "class collection",
            _ => "runtime",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a code like `"E3001"` (case-insensitive).
pub fn parse_error_code(text: &str) -> Option<ErrorCode> {
    ErrorCode::ALL
        .iter()
        .copied()
        .find(|code| code.as_str().eq_ignore_ascii_case(text))
}
