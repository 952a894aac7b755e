//! Directive recognition.
//!
//! A line is a directive only when, after trailing comments are cut, the
//! whole line matches one of the directive shapes. Anything else (including
//! a malformed `#include`) is ordinary text.

/// Same-line comment markers cut before directive matching.
const COMMENT_MARKERS: [&str; 4] = ["&&", "**", "//", "/*"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Directive<'a> {
    Include(&'a str),
    /// `#define NAME tail`, tail trimmed.
    Define { name: &'a str, tail: &'a str },
    Ifdef(&'a str),
    Ifndef(&'a str),
    Else,
    Endif,
}

/// Cut the line at the earliest comment marker.
pub(crate) fn strip_trailing_comment(line: &str) -> &str {
    let cut = COMMENT_MARKERS
        .iter()
        .filter_map(|marker| line.find(marker))
        .min();
    match cut {
        Some(pos) => &line[..pos],
        None => line,
    }
}

pub(crate) fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let line = strip_trailing_comment(line).trim_end_matches(['\r', '\n']);
    let rest = line.trim_start().strip_prefix('#')?;

    if let Some(after) = rest.strip_prefix("include") {
        return parse_include(after).map(Directive::Include);
    }
    if let Some(after) = rest.strip_prefix("define") {
        let after = require_space(after)?;
        let (name, tail) = split_identifier(after)?;
        return Some(Directive::Define {
            name,
            tail: tail.trim(),
        });
    }
    if let Some(after) = rest.strip_prefix("ifndef") {
        return parse_guard_name(after).map(Directive::Ifndef);
    }
    if let Some(after) = rest.strip_prefix("ifdef") {
        return parse_guard_name(after).map(Directive::Ifdef);
    }
    if let Some(after) = rest.strip_prefix("else") {
        return after.trim().is_empty().then_some(Directive::Else);
    }
    if let Some(after) = rest.strip_prefix("endif") {
        return after.trim().is_empty().then_some(Directive::Endif);
    }
    None
}

/// `\s+"([^"]+)"\s*$`
fn parse_include(after: &str) -> Option<&str> {
    let after = require_space(after)?;
    let quoted = after.strip_prefix('"')?;
    let close = quoted.find('"')?;
    let (name, trailing) = quoted.split_at(close);
    if name.is_empty() || !trailing[1..].trim().is_empty() {
        return None;
    }
    Some(name)
}

/// `\s+([A-Za-z_]\w*)\s*$`
fn parse_guard_name(after: &str) -> Option<&str> {
    let after = require_space(after)?;
    let (name, tail) = split_identifier(after)?;
    tail.trim().is_empty().then_some(name)
}

/// At least one whitespace character, then everything after the run.
fn require_space(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    (trimmed.len() < text.len()).then_some(trimmed)
}

/// Split a leading `[A-Za-z_]\w*` identifier off `text`.
pub(crate) fn split_identifier(text: &str) -> Option<(&str, &str)> {
    let first = text.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let end = text
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(text.len(), |(i, _)| i);
    Some(text.split_at(end))
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_each_directive() {
        assert_eq!(
            parse_directive("#include \"defs.h\""),
            Some(Directive::Include("defs.h"))
        );
        assert_eq!(
            parse_directive("  #define MAX 10  "),
            Some(Directive::Define {
                name: "MAX",
                tail: "10"
            })
        );
        assert_eq!(
            parse_directive("#define SQR(x) ((x)*(x))"),
            Some(Directive::Define {
                name: "SQR",
                tail: "(x) ((x)*(x))"
            })
        );
        assert_eq!(parse_directive("#ifdef DEBUG"), Some(Directive::Ifdef("DEBUG")));
        assert_eq!(parse_directive("#ifndef DEBUG"), Some(Directive::Ifndef("DEBUG")));
        assert_eq!(parse_directive("\t#else"), Some(Directive::Else));
        assert_eq!(parse_directive("#endif\r\n"), Some(Directive::Endif));
    }

    #[test]
    fn trailing_comments_are_ignored() {
        assert_eq!(
            parse_directive("#ifdef DEBUG // only in debug builds"),
            Some(Directive::Ifdef("DEBUG"))
        );
        assert_eq!(parse_directive("#endif && DEBUG"), Some(Directive::Endif));
        assert_eq!(parse_directive("#else ** flip"), Some(Directive::Else));
        assert_eq!(
            parse_directive("#define EMPTY /* nothing */"),
            Some(Directive::Define {
                name: "EMPTY",
                tail: ""
            })
        );
    }

    #[test]
    fn earliest_marker_wins() {
        assert_eq!(strip_trailing_comment("a ** b // c"), "a ");
        assert_eq!(strip_trailing_comment("a // b ** c"), "a ");
        assert_eq!(strip_trailing_comment("plain"), "plain");
    }

    #[test]
    fn near_misses_are_plain_text() {
        assert_eq!(parse_directive("#include defs.h"), None);
        assert_eq!(parse_directive("#include \"\""), None);
        assert_eq!(parse_directive("#include \"a.h\" extra"), None);
        assert_eq!(parse_directive("#IFDEF DEBUG"), None);
        assert_eq!(parse_directive("# ifdef DEBUG"), None);
        assert_eq!(parse_directive("#ifdef"), None);
        assert_eq!(parse_directive("#ifdef A B"), None);
        assert_eq!(parse_directive("#defineX 1"), None);
        assert_eq!(parse_directive("#define 1X"), None);
        assert_eq!(parse_directive("#endif junk"), None);
        assert_eq!(parse_directive("x = 1"), None);
    }
}
