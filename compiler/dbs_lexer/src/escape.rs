//! String literal escapes.

/// Resolve `\n \t \r \\ \" \'`. Any other backslash is kept as written, so
/// Windows paths survive unquoted backslashes.
pub(crate) fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(e @ ('\\' | '"' | '\'')) => out.push(e),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// `[...]` strings have no escapes; `]]` stands for one `]`.
pub(crate) fn unbracket(content: &str) -> String {
    content.replace("]]", "]")
}
