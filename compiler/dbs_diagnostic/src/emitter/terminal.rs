//! Human-readable diagnostic output with optional ANSI colors.

use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Origin, Severity};

use super::{ColorMode, DiagnosticEmitter};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Renders diagnostics as
///
/// ```text
/// error[E3001]: undefined name 'COUNT'
///   --> main.prg:4:7
///    |
///  4 | WRITE count
///    |       ^^^^^ not found in any scope
/// ```
///
/// Spans are offsets into the preprocessed source given to
/// [`with_source`](Self::with_source); [`with_origins`](Self::with_origins)
/// maps each preprocessed line back to the file and line it came from.
pub struct TerminalEmitter<'a, W: Write> {
    writer: W,
    colors: bool,
    source: Option<(&'a str, LineOffsetTable)>,
    file_path: Option<&'a str>,
    origins: &'a [Origin],
}

impl<'a, W: Write> TerminalEmitter<'a, W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
            file_path: None,
            origins: &[],
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some((source, LineOffsetTable::build(source)));
        self
    }

    #[must_use]
    pub fn with_file_path(mut self, path: &'a str) -> Self {
        self.file_path = Some(path);
        self
    }

    #[must_use]
    pub fn with_origins(mut self, origins: &'a [Origin]) -> Self {
        self.origins = origins;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn paint(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_header(&mut self, diagnostic: &Diagnostic) {
        let color = match diagnostic.severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        };
        self.paint(&diagnostic.severity.to_string(), color);
        self.paint(&format!("[{}]", diagnostic.code), colors::BOLD);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);
    }

    /// `file:line` for a preprocessed line, following the origin table.
    fn location_of(&self, line: u32) -> (String, u32) {
        let origin = usize::try_from(line.saturating_sub(1))
            .ok()
            .and_then(|index| self.origins.get(index));
        match origin {
            Some(origin) => (origin.file.clone(), origin.line),
            None => (self.file_path.unwrap_or("<input>").to_string(), line),
        }
    }

    fn write_label(&mut self, span: dbs_ir::Span, message: &str, is_primary: bool) {
        let Some((source, table)) = self.source.as_ref() else {
            let marker = if is_primary { "-->" } else { "   " };
            let _ = writeln!(self.writer, "  {marker} {span:?}: {message}");
            return;
        };
        let (line, col) = table.line_col(source, span.start);
        let text = table.line_text(source, line).unwrap_or("").to_string();
        let (file, origin_line) = self.location_of(line);

        if is_primary {
            self.paint("  --> ", colors::GUTTER);
            let _ = writeln!(self.writer, "{file}:{origin_line}:{col}");
        }
        let number = origin_line.to_string();
        let pad = " ".repeat(number.len());
        self.paint(&format!(" {pad} |"), colors::GUTTER);
        let _ = writeln!(self.writer);
        self.paint(&format!(" {number} | "), colors::GUTTER);
        let _ = writeln!(self.writer, "{text}");
        self.paint(&format!(" {pad} | "), colors::GUTTER);

        let indent = " ".repeat(col.saturating_sub(1) as usize);
        let width = text
            .chars()
            .skip(col.saturating_sub(1) as usize)
            .count()
            .min(span.len().max(1) as usize)
            .max(1);
        let marker = if is_primary { "^" } else { "-" };
        let underline = format!("{}{} {message}", indent, marker.repeat(width));
        let color = if is_primary { colors::ERROR } else { colors::GUTTER };
        self.paint(&underline, color);
        let _ = writeln!(self.writer);
    }
}

impl<'a> TerminalEmitter<'a, io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        Self::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_header(diagnostic);

        if let Some(origin) = &diagnostic.location {
            self.paint("  --> ", colors::GUTTER);
            let _ = writeln!(self.writer, "{}:{}", origin.file, origin.line);
        }
        for label in &diagnostic.labels {
            self.write_label(label.span, &label.message, label.is_primary);
        }
        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.paint("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use dbs_ir::Span;
    use pretty_assertions::assert_eq;

    fn render(source: &str, origins: &[Origin], diagnostic: &Diagnostic) -> String {
        let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false)
            .with_source(source)
            .with_file_path("main.prg")
            .with_origins(origins);
        emitter.emit(diagnostic);
        emitter.flush();
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    #[test]
    fn renders_snippet_with_caret() {
        let source = "x = 1\nWRITE count\n";
        let diag = Diagnostic::error(ErrorCode::E3001)
            .with_message("undefined name 'COUNT'")
            .with_label(Span::new(12, 17), "not found in any scope");

        let expected = "\
error[E3001]: undefined name 'COUNT'
  --> main.prg:2:7
   |
 2 | WRITE count
   |       ^^^^^ not found in any scope

";
        assert_eq!(render(source, &[], &diag), expected);
    }

    #[test]
    fn origins_redirect_file_and_line() {
        let source = "WRITE 1\nWRITE oops\n";
        let origins = vec![
            Origin {
                file: "main.prg".to_string(),
                line: 1,
            },
            Origin {
                file: "lib.h".to_string(),
                line: 12,
            },
        ];
        let diag = Diagnostic::error(ErrorCode::E3001)
            .with_message("undefined name 'OOPS'")
            .with_label(Span::new(14, 18), "here");

        let text = render(source, &origins, &diag);
        assert!(text.contains("--> lib.h:12:7"), "{text}");
        assert!(text.contains("12 | WRITE oops"), "{text}");
    }

    #[test]
    fn location_without_labels() {
        let diag = Diagnostic::error(ErrorCode::E0002)
            .with_message("include file not found: \"missing.h\"")
            .with_location("main.prg", 3)
            .with_note("searched: includes");
        let text = render("", &[], &diag);
        assert!(text.starts_with("error[E0002]: include file not found"));
        assert!(text.contains("--> main.prg:3"));
        assert!(text.contains("= note: searched: includes"));
    }

    #[test]
    fn colors_emit_escape_codes() {
        let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
        emitter.emit(&Diagnostic::error(ErrorCode::E3011).with_message("division by zero"));
        let text = String::from_utf8(emitter.into_inner()).unwrap();
        assert!(text.contains("\x1b["));
        assert!(text.contains("E3011"));
    }
}
