//! Macro table and line expansion.

use rustc_hash::FxHashMap;

use crate::directive::is_word_char;

#[derive(Clone, Debug)]
pub(crate) struct Macro {
    name: String,
    /// `None` for object-like macros.
    params: Option<Vec<String>>,
    body: String,
}

/// Expansion failure, without file context.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ExpandError {
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    Limit {
        passes: usize,
    },
}

/// Defined macros in definition order.
#[derive(Clone, Debug, Default)]
pub(crate) struct MacroTable {
    macros: Vec<Macro>,
    index: FxHashMap<String, usize>,
}

impl MacroTable {
    pub(crate) fn define(&mut self, name: &str, params: Option<Vec<String>>, body: &str) {
        let mac = Macro {
            name: name.to_string(),
            params,
            body: body.to_string(),
        };
        if let Some(&slot) = self.index.get(name) {
            self.macros[slot] = mac;
        } else {
            self.index.insert(name.to_string(), self.macros.len());
            self.macros.push(mac);
        }
    }

    pub(crate) fn is_defined(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Expand until a pass changes nothing.
    ///
    /// After `max_passes` changing passes one more pass runs; if that one
    /// still changes the line, expansion is runaway.
    pub(crate) fn expand_line(&self, line: &str, max_passes: usize) -> Result<String, ExpandError> {
        if self.macros.is_empty() {
            return Ok(line.to_string());
        }
        let mut current = line.to_string();
        for _ in 0..max_passes {
            let next = self.expand_pass(&current)?;
            if next == current {
                return Ok(current);
            }
            current = next;
        }
        let next = self.expand_pass(&current)?;
        if next == current {
            Ok(current)
        } else {
            Err(ExpandError::Limit { passes: max_passes })
        }
    }

    fn expand_pass(&self, line: &str) -> Result<String, ExpandError> {
        let mut out = line.to_string();
        for mac in &self.macros {
            if let Some(params) = &mac.params {
                out = expand_calls(&out, mac, params)?;
            }
        }
        for mac in &self.macros {
            if mac.params.is_none() {
                out = replace_words(&out, &mac.name, &mac.body);
            }
        }
        Ok(out)
    }
}

fn expand_calls(text: &str, mac: &Macro, params: &[String]) -> Result<String, ExpandError> {
    let mut out = text.to_string();
    let mut from = 0;
    while let Some(start) = find_call(&out, &mac.name, from) {
        let open = start + mac.name.len();
        let Some(close) = matching_paren(&out, open) else {
            break;
        };
        let args = split_args(&out[open + 1..close], params.len());
        if args.len() != params.len() {
            return Err(ExpandError::Arity {
                name: mac.name.clone(),
                expected: params.len(),
                found: args.len(),
            });
        }
        let replacement = substitute_body(&mac.body, params, &args);
        out.replace_range(start..=close, &replacement);
        from = start + replacement.len();
    }
    Ok(out)
}

/// Walks `text`, reporting which byte offsets lie outside string literals.
struct QuoteState {
    quote: Option<char>,
    escaped: bool,
}

impl QuoteState {
    fn new() -> Self {
        QuoteState {
            quote: None,
            escaped: false,
        }
    }

    /// Feed one character. Returns true if it is code (outside quotes and
    /// not a quote delimiter).
    fn step(&mut self, c: char) -> bool {
        match self.quote {
            Some(q) => {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == q {
                    self.quote = None;
                }
                false
            }
            None if c == '"' || c == '\'' => {
                self.quote = Some(c);
                false
            }
            None => true,
        }
    }
}

/// First `NAME(` at or after `from`, at an identifier boundary and outside
/// string literals.
fn find_call(text: &str, name: &str, from: usize) -> Option<usize> {
    let mut state = QuoteState::new();
    let mut prev_word = false;
    for (i, c) in text.char_indices() {
        let code = state.step(c);
        if code && i >= from && !prev_word {
            let rest = &text[i..];
            if rest.starts_with(name) && rest[name.len()..].starts_with('(') {
                return Some(i);
            }
        }
        prev_word = code && is_word_char(c);
    }
    None
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut state = QuoteState::new();
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        if !state.step(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split call arguments on top-level commas, trimmed.
///
/// An empty argument list is one empty argument for a single-parameter
/// macro and no arguments otherwise.
fn split_args(inside: &str, param_count: usize) -> Vec<String> {
    if inside.trim().is_empty() {
        return if param_count == 1 {
            vec![String::new()]
        } else {
            Vec::new()
        };
    }
    let mut args = Vec::new();
    let mut state = QuoteState::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inside.char_indices() {
        if !state.step(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inside[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inside[start..].trim().to_string());
    args
}

/// Replace whole-word occurrences of `name` outside string literals.
fn replace_words(text: &str, name: &str, body: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = QuoteState::new();
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !state.step(c) || !is_word_char(c) {
            out.push(c);
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !is_word_char(next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        let word = &text[i..end];
        out.push_str(if word == name { body } else { word });
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
enum BodyToken {
    Ident(String),
    Str(String),
    Space(String),
    Hash,
    HashHash,
    Other(char),
    /// Result of `##`; never substituted again.
    Pasted(String),
}

impl BodyToken {
    fn text(&self) -> String {
        match self {
            BodyToken::Ident(s) | BodyToken::Str(s) | BodyToken::Space(s) | BodyToken::Pasted(s) => {
                s.clone()
            }
            BodyToken::Hash => "#".to_string(),
            BodyToken::HashHash => "##".to_string(),
            BodyToken::Other(c) => c.to_string(),
        }
    }
}

fn tokenize_body(body: &str) -> Vec<BodyToken> {
    let mut tokens = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '#' if chars.peek() == Some(&'#') => {
                chars.next();
                tokens.push(BodyToken::HashHash);
            }
            '#' => tokens.push(BodyToken::Hash),
            '"' | '\'' => {
                let mut lit = String::from(c);
                let mut escaped = false;
                for next in chars.by_ref() {
                    lit.push(next);
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == c {
                        break;
                    }
                }
                tokens.push(BodyToken::Str(lit));
            }
            c if c.is_whitespace() => {
                let mut run = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_whitespace() {
                        break;
                    }
                    run.push(next);
                    chars.next();
                }
                tokens.push(BodyToken::Space(run));
            }
            c if is_word_char(c) => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                tokens.push(BodyToken::Ident(word));
            }
            other => tokens.push(BodyToken::Other(other)),
        }
    }
    tokens
}

fn stringize(arg: &str) -> String {
    let collapsed = arg.split_whitespace().collect::<Vec<_>>().join(" ");
    let escaped = collapsed.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn unquote(text: &str) -> Option<&str> {
    (text.len() >= 2 && text.starts_with('"') && text.ends_with('"')).then(|| &text[1..text.len() - 1])
}

/// Stringize, then paste, then plain parameter substitution.
fn substitute_body(body: &str, params: &[String], args: &[String]) -> String {
    let arg_of = |name: &str| {
        params
            .iter()
            .position(|p| p == name)
            .map(|i| args[i].as_str())
    };

    // #param
    let mut stage = Vec::new();
    let mut tokens = tokenize_body(body).into_iter().peekable();
    while let Some(tok) = tokens.next() {
        if tok == BodyToken::Hash {
            let mut lookahead = tokens.clone();
            let space = matches!(lookahead.peek(), Some(BodyToken::Space(_)));
            if space {
                lookahead.next();
            }
            if let Some(BodyToken::Ident(name)) = lookahead.peek() {
                if let Some(arg) = arg_of(name) {
                    stage.push(BodyToken::Str(stringize(arg)));
                    if space {
                        tokens.next();
                    }
                    tokens.next();
                    continue;
                }
            }
        }
        stage.push(tok);
    }

    // left ## right
    let value_of = |tok: &BodyToken| match tok {
        BodyToken::Ident(name) => arg_of(name).map_or_else(|| name.clone(), str::to_string),
        other => other.text(),
    };
    let mut pasted: Vec<BodyToken> = Vec::new();
    let mut rest = stage.into_iter().peekable();
    while let Some(tok) = rest.next() {
        if tok != BodyToken::HashHash {
            pasted.push(tok);
            continue;
        }
        while matches!(pasted.last(), Some(BodyToken::Space(_))) {
            pasted.pop();
        }
        while matches!(rest.peek(), Some(BodyToken::Space(_))) {
            rest.next();
        }
        let Some(right) = rest.next() else {
            pasted.push(BodyToken::HashHash);
            continue;
        };
        let Some(left) = pasted.pop() else {
            pasted.push(BodyToken::HashHash);
            pasted.push(right);
            continue;
        };
        let (left, right) = (value_of(&left), value_of(&right));
        let glued = match (unquote(&left), unquote(&right)) {
            (None, None) => format!("{left}{right}"),
            (l, r) => format!(
                "\"{}{}\"",
                l.unwrap_or(left.as_str()),
                r.unwrap_or(right.as_str())
            ),
        };
        pasted.push(BodyToken::Pasted(glued));
    }

    pasted
        .iter()
        .map(|tok| match tok {
            BodyToken::Ident(name) => arg_of(name).map_or_else(|| name.clone(), str::to_string),
            other => other.text(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(defs: &[(&str, Option<&[&str]>, &str)]) -> MacroTable {
        let mut t = MacroTable::default();
        for (name, params, body) in defs {
            let params = params.map(|ps| ps.iter().map(|p| (*p).to_string()).collect());
            t.define(name, params, body);
        }
        t
    }

    fn expand(t: &MacroTable, line: &str) -> String {
        t.expand_line(line, 50).unwrap_or_else(|e| panic!("{e:?}"))
    }

    #[test]
    fn object_like_whole_words_only() {
        let t = table(&[("MAX", None, "10")]);
        assert_eq!(expand(&t, "x = MAX + MAXIMUM + _MAX"), "x = 10 + MAXIMUM + _MAX");
    }

    #[test]
    fn strings_are_not_expanded_into() {
        let t = table(&[("MAX", None, "10"), ("SQ", Some(&["x"]), "x*x")]);
        assert_eq!(
            expand(&t, r#"? "MAX is", MAX, 'SQ(2)', SQ(2)"#),
            r#"? "MAX is", 10, 'SQ(2)', 2*2"#
        );
    }

    #[test]
    fn stringize_collapses_and_escapes() {
        let t = table(&[("STR", Some(&["x"]), "#x")]);
        assert_eq!(expand(&t, "STR(a+b)"), "\"a+b\"");
        assert_eq!(expand(&t, "STR( a   +  b )"), "\"a + b\"");
        assert_eq!(expand(&t, r#"STR(say "hi")"#), r#""say \"hi\"""#);
    }

    #[test]
    fn paste_joins_arguments() {
        let t = table(&[("CAT", Some(&["a", "b"]), "a##b")]);
        assert_eq!(expand(&t, "CAT(foo, bar)"), "foobar");
        let spaced = table(&[("CAT", Some(&["a", "b"]), "a ## b")]);
        assert_eq!(expand(&spaced, "CAT(foo,bar)"), "foobar");
    }

    #[test]
    fn paste_with_string_side_requotes() {
        let t = table(&[("CAT", Some(&["a", "b"]), "a##b")]);
        assert_eq!(expand(&t, r#"CAT("foo", bar)"#), "\"foobar\"");
        assert_eq!(expand(&t, r#"CAT(foo, "bar")"#), "\"foobar\"");
    }

    #[test]
    fn params_substitute_simultaneously() {
        let t = table(&[("SWAP", Some(&["a", "b"]), "b, a")]);
        assert_eq!(expand(&t, "f(SWAP(b, a))"), "f(a, b)");
    }

    #[test]
    fn nested_parens_and_quoted_commas() {
        let t = table(&[("FIRST", Some(&["a", "b"]), "a")]);
        assert_eq!(expand(&t, "FIRST(g(1, 2), 3)"), "g(1, 2)");
        assert_eq!(expand(&t, r#"FIRST("x, y", 3)"#), r#""x, y""#);
    }

    #[test]
    fn unbalanced_call_left_alone() {
        let t = table(&[("F", Some(&["a"]), "[a]")]);
        assert_eq!(expand(&t, "F(1"), "F(1");
    }

    #[test]
    fn empty_call_arguments() {
        let t = table(&[("ONE", Some(&["a"]), "<a>"), ("NONE", Some(&[]), "nil")]);
        assert_eq!(expand(&t, "ONE()"), "<>");
        assert_eq!(expand(&t, "NONE()"), "nil");
    }

    #[test]
    fn arity_mismatch() {
        let t = table(&[("PAIR", Some(&["a", "b"]), "a")]);
        assert_eq!(
            t.expand_line("PAIR(1)", 50),
            Err(ExpandError::Arity {
                name: "PAIR".to_string(),
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn macros_expand_through_each_other() {
        let t = table(&[
            ("TWICE", Some(&["x"]), "(x + x)"),
            ("BASE", None, "LIMIT"),
            ("LIMIT", None, "5"),
        ]);
        assert_eq!(expand(&t, "y = TWICE(BASE)"), "y = (5 + 5)");
    }

    #[test]
    fn self_reference_hits_limit() {
        let t = table(&[("LOOP", None, "LOOP + 1")]);
        assert_eq!(
            t.expand_line("LOOP", 50),
            Err(ExpandError::Limit { passes: 50 })
        );
    }

    #[test]
    fn settling_on_the_last_pass_is_fine() {
        let t = table(&[("A", None, "B"), ("B", None, "C")]);
        // One pass resolves the chain in definition order; a second confirms.
        assert_eq!(t.expand_line("A", 1), Ok("C".to_string()));
    }

    #[test]
    fn redefinition_keeps_position() {
        let mut t = table(&[("A", None, "1"), ("B", None, "A")]);
        t.define("A", None, "2");
        assert_eq!(expand(&t, "B"), "2");
    }
}
