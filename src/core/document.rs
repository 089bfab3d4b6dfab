use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A zero-based location in a text buffer.
///
/// `character` counts chars, not bytes, so positions stay meaningful for
/// lines that contain multi-byte text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Users read line numbers 1-based.
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Start and end of one physical line, excluding its line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An immutable view of one physical line of a `TextSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Zero-based line index.
    pub number: usize,
    /// The raw line text without its line break.
    pub text: String,
    /// Column (in chars) of the first non-whitespace character. Equals the line
    /// length for whitespace-only lines.
    pub first_non_whitespace_character_index: usize,
    pub range: TextRange,
}

impl Line {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        let first_non_whitespace_character_index = text
            .chars()
            .position(|c| !c.is_whitespace())
            .unwrap_or(length);

        Self {
            number,
            range: TextRange {
                start: Position::new(number, 0),
                end: Position::new(number, length),
            },
            first_non_whitespace_character_index,
            text,
        }
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// The whitespace a generated comment has to carry to line up with this line.
    pub fn indent(&self) -> String {
        self.text
            .chars()
            .take(self.first_non_whitespace_character_index)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// An inclusive, zero-based range of line indices to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            anyhow::bail!(
                "Invalid line range: start line {} is after end line {}",
                start + 1,
                end + 1
            );
        }
        Ok(Self { start, end })
    }

    /// Parses a user selection of the form `START:END` with 1-based, inclusive
    /// line numbers, the way line numbers are shown in an editor.
    pub fn parse_selection(selection: &str) -> Result<Self> {
        let parts: Vec<&str> = selection.split(':').collect();
        if parts.len() != 2 {
            anyhow::bail!("Line selection must be in format 'start:end'");
        }

        let start: usize = parts[0]
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid start line: {}", parts[0]))?;
        let end: usize = parts[1]
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid end line: {}", parts[1]))?;

        if start == 0 || end == 0 {
            anyhow::bail!("Line numbers start from 1, not 0");
        }

        Self::new(start - 1, end - 1)
    }

    /// Clamps the range to a source with `line_count` lines. Returns `None`
    /// when the range lies entirely past the end of the source.
    pub fn clamp_to(&self, line_count: usize) -> Option<Self> {
        if line_count == 0 || self.start >= line_count {
            return None;
        }
        Some(Self {
            start: self.start,
            end: self.end.min(line_count - 1),
        })
    }
}

/// Read access to the text being documented.
///
/// The engine only ever reads through this trait. Editor integrations expose
/// their buffers through it; the CLI uses [`Document`].
pub trait TextSource {
    fn line_count(&self) -> usize;

    /// Returns the line at a zero-based index, or `None` past the end.
    fn line_at(&self, index: usize) -> Option<Line>;

    /// The language/dialect identifier of the content, e.g. `javascript`.
    fn language_id(&self) -> &str;

    /// The whole source as one range, or `None` when it has no lines.
    fn full_range(&self) -> Option<LineRange> {
        match self.line_count() {
            0 => None,
            count => Some(LineRange {
                start: 0,
                end: count - 1,
            }),
        }
    }
}

/// An in-memory text buffer.
///
/// Every line keeps the break that ended it, so a file with mixed line endings
/// is written back with each untouched line exactly as it was read.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    /// `"\r\n"`, `"\n"`, or `""` for the final line.
    breaks: Vec<&'static str>,
    language_id: String,
    line_ending: &'static str,
}

impl Document {
    pub fn new(content: &str, language_id: impl Into<String>) -> Self {
        let mut lines = Vec::new();
        let mut breaks = Vec::new();
        let (mut crlf, mut lf) = (0usize, 0usize);

        let mut rest = content;
        while let Some(at) = rest.find('\n') {
            let raw = &rest[..at];
            match raw.strip_suffix('\r') {
                Some(text) => {
                    lines.push(text.to_string());
                    breaks.push("\r\n");
                    crlf += 1;
                }
                None => {
                    lines.push(raw.to_string());
                    breaks.push("\n");
                    lf += 1;
                }
            }
            rest = &rest[at + 1..];
        }
        lines.push(rest.to_string());
        breaks.push("");

        Self {
            lines,
            breaks,
            language_id: language_id.into(),
            line_ending: if crlf > lf { "\r\n" } else { "\n" },
        }
    }

    /// Creates a document whose language is inferred from the file extension.
    pub fn for_path(path: &Path, content: &str) -> Self {
        Self::new(content, language_for_path(path))
    }

    /// The raw lines, without line breaks.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The break that ended line `index` in the source.
    pub fn line_break(&self, index: usize) -> &'static str {
        self.breaks.get(index).copied().unwrap_or("")
    }

    /// The line ending used for new text: whichever of `\r\n` and `\n`
    /// ends most lines, `\n` on a tie.
    pub fn line_ending(&self) -> &'static str {
        self.line_ending
    }
}

impl TextSource for Document {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_at(&self, index: usize) -> Option<Line> {
        self.lines.get(index).map(|text| Line::new(index, text.as_str()))
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }
}

/// Maps a file extension to the language identifier editors use for it.
pub fn language_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("js") | Some("mjs") | Some("cjs") => "javascript",
        Some("jsx") => "javascriptreact",
        Some("ts") | Some("mts") | Some("cts") => "typescript",
        Some("tsx") => "typescriptreact",
        _ => "plaintext",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_indent_and_trim() {
        let line = Line::new(3, "    const sum = (x, y) => {");
        assert_eq!(line.first_non_whitespace_character_index, 4);
        assert_eq!(line.indent(), "    ");
        assert_eq!(line.trimmed(), "const sum = (x, y) => {");
        assert_eq!(line.range.start, Position::new(3, 0));
        assert_eq!(line.range.end, Position::new(3, 27));
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(Line::new(0, "").is_empty());
        let blank = Line::new(0, "   ");
        assert!(!blank.is_empty());
        assert_eq!(blank.trimmed(), "");
        assert_eq!(blank.first_non_whitespace_character_index, 3);
    }

    #[test]
    fn test_indent_keeps_tabs() {
        let line = Line::new(0, "\t\tfoo() {");
        assert_eq!(line.indent(), "\t\t");
    }

    #[test]
    fn test_document_strips_carriage_returns() {
        let doc = Document::new("a\r\nb\r\n", "javascript");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_at(0).unwrap().text, "a");
        assert_eq!(doc.line_at(1).unwrap().text, "b");
        assert_eq!(doc.line_at(2).unwrap().text, "");
        assert!(doc.line_at(3).is_none());
    }

    #[test]
    fn test_document_remembers_each_line_break() {
        let doc = Document::new("a();\r\nb();\nc();\n", "javascript");
        assert_eq!(doc.line_break(0), "\r\n");
        assert_eq!(doc.line_break(1), "\n");
        assert_eq!(doc.line_break(3), "");
        assert_eq!(doc.line_ending(), "\n");
        assert_eq!(Document::new("a\r\nb\r\nc\n", "javascript").line_ending(), "\r\n");
    }

    #[test]
    fn test_language_detection() {
        assert_eq!(language_for_path(Path::new("a/b.js")), "javascript");
        assert_eq!(language_for_path(Path::new("widget.tsx")), "typescriptreact");
        assert_eq!(language_for_path(Path::new("README.md")), "plaintext");
        assert_eq!(language_for_path(Path::new("Makefile")), "plaintext");
    }

    #[test]
    fn test_parse_selection() {
        let range = LineRange::parse_selection("3:7").unwrap();
        assert_eq!(range, LineRange { start: 2, end: 6 });
        assert!(LineRange::parse_selection("0:4").is_err());
        assert!(LineRange::parse_selection("9:4").is_err());
        assert!(LineRange::parse_selection("4").is_err());
        assert!(LineRange::parse_selection("a:b").is_err());
    }

    #[test]
    fn test_clamp_range() {
        let range = LineRange::new(2, 40).unwrap();
        assert_eq!(range.clamp_to(10), Some(LineRange { start: 2, end: 9 }));
        assert_eq!(range.clamp_to(2), None);
        assert_eq!(range.clamp_to(0), None);
    }
}
