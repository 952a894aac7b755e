//! Byte offset to line/column conversion.

use dbs_ir::Span;

/// Byte offset of every line start, for O(log L) line lookup.
///
/// ```
/// use dbs_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "WRITE 1\nWRITE 2\n";
/// let table = LineOffsetTable::build(source);
/// assert_eq!(table.line_col(source, 8), (2, 1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: u32) -> u32 {
        let index = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(index + 1).unwrap_or(u32::MAX)
    }

    /// 1-based (line, column); the column counts characters, not bytes.
    pub fn line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_of(offset);
        let start = self.line_start(line).unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let chars = source.get(start..end).map_or(0, |s| s.chars().count());
        (line, u32::try_from(chars + 1).unwrap_or(u32::MAX))
    }

    /// Byte offset where 1-based `line` begins.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        let index = usize::try_from(line.checked_sub(1)?).ok()?;
        self.offsets.get(index).copied()
    }

    /// Text of 1-based `line` without its line terminator.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> Option<&'s str> {
        let start = self.line_start(line)? as usize;
        let end = self
            .line_start(line + 1)
            .map_or(source.len(), |next| next as usize);
        source
            .get(start..end)
            .map(|text| text.trim_end_matches(['\n', '\r']))
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// One-shot (line, column) of a span's start. Prefer [`LineOffsetTable`]
/// when resolving many spans against one source.
pub fn span_line_col(source: &str, span: Span) -> (u32, u32) {
    LineOffsetTable::build(source).line_col(source, span.start)
}
