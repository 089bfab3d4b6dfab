use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::builders::formatter::format_comment;
use crate::builders::patterns;
use crate::builders::synthesizer::CommentSynthesizer;
use crate::builders::validator::{CommentValidator, StandardValidator};
use crate::core::config::GeneratorConfig;
use crate::core::document::{Line, LineRange, Position, TextSource};
use crate::core::edits::EditSink;

/// Counters reported after one scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// New comments inserted above declarations.
    pub generated: usize,
    /// Existing blocks re-emitted with normalized indentation.
    pub normalized: usize,
    /// Blocks still open when the range ended. Nothing is emitted for them.
    pub unterminated: usize,
    /// Declarations left alone because the line above closes a comment.
    pub skipped_documented: usize,
}

/// An existing `/** ... */` block being read.
#[derive(Debug)]
struct CommentBlock {
    start: Position,
    indent: String,
    lines: Vec<String>,
}

impl CommentBlock {
    fn open(line: &Line) -> Self {
        Self {
            start: line.range.start,
            indent: line.indent(),
            lines: vec![line.trimmed().to_string()],
        }
    }
}

#[derive(Debug)]
enum ScanState {
    Scanning,
    InsideComment(CommentBlock),
}

fn opens_comment(trimmed: &str) -> bool {
    trimmed.starts_with("/**")
}

fn closes_comment(trimmed: &str) -> bool {
    trimmed.starts_with("*/") || trimmed.ends_with("*/")
}

/// Finds the first `*/` at or after byte `from` and returns the text that
/// follows it, trimmed. `None` when the comment is still open at the end of
/// the line.
fn text_after_closer(trimmed: &str, from: usize) -> Option<&str> {
    let tail = trimmed.get(from..)?;
    tail.find("*/").map(|at| tail[at + "*/".len()..].trim_start())
}

/// Lines that are already comment text and never declarations.
fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with("/*")
}

/// Walks line ranges of a `TextSource`, generating YUIDoc comments above
/// declarations and normalizing existing comment blocks.
///
/// Every scan owns its own state, so one engine can serve any number of
/// sources, one after another or from different threads.
pub struct CommentEngine {
    config: GeneratorConfig,
    validator: Box<dyn CommentValidator + Send + Sync>,
}

impl CommentEngine {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            validator: Box::new(StandardValidator::new()),
        }
    }

    /// Scans the whole source.
    pub fn generate_all(
        &self,
        source: &dyn TextSource,
        sink: &mut dyn EditSink,
    ) -> Result<ScanResult> {
        match source.full_range() {
            Some(range) => self.generate_for_range(source, range, sink),
            None => {
                self.check_language(source)?;
                Ok(ScanResult::default())
            }
        }
    }

    /// Scans a user selection.
    pub fn generate_selected(
        &self,
        source: &dyn TextSource,
        selection: LineRange,
        sink: &mut dyn EditSink,
    ) -> Result<ScanResult> {
        self.generate_for_range(source, selection, sink)
    }

    /// Scans `range` (inclusive) and emits edits into `sink`.
    ///
    /// All positions handed to `sink` refer to the source as it was before the
    /// scan; the sink is expected to apply them as one transaction.
    pub fn generate_for_range(
        &self,
        source: &dyn TextSource,
        range: LineRange,
        sink: &mut dyn EditSink,
    ) -> Result<ScanResult> {
        self.check_language(source)?;

        let mut result = ScanResult::default();
        let Some(range) = range.clamp_to(source.line_count()) else {
            debug!(?range, lines = source.line_count(), "range is past the end of the source");
            return Ok(result);
        };
        debug!(
            start = range.start,
            end = range.end,
            language = source.language_id(),
            "scanning"
        );

        let synthesizer = CommentSynthesizer::new(&self.config.template);
        let mut state = ScanState::Scanning;

        // A comment that ends right above the selection documents its first line.
        let mut after_comment = range.start > 0
            && source
                .line_at(range.start - 1)
                .is_some_and(|line| closes_comment(line.trimmed()));

        for index in range.start..=range.end {
            let Some(line) = source.line_at(index) else {
                break;
            };
            let trimmed = line.trimmed();

            state = match state {
                ScanState::InsideComment(mut block) => {
                    block.lines.push(trimmed.to_string());
                    match text_after_closer(trimmed, 0) {
                        None => ScanState::InsideComment(block),
                        Some("") => {
                            self.close_block(block, &line, sink, &mut result);
                            after_comment = true;
                            ScanState::Scanning
                        }
                        Some(_) => {
                            // Code shares the closing line and must not be re-indented.
                            debug!(
                                start = %block.start,
                                line = index + 1,
                                "code follows the comment closer, leaving block untouched"
                            );
                            after_comment = false;
                            ScanState::Scanning
                        }
                    }
                }
                ScanState::Scanning if line.is_empty() => {
                    after_comment = false;
                    ScanState::Scanning
                }
                ScanState::Scanning if opens_comment(trimmed) => {
                    let block = CommentBlock::open(&line);
                    // `/**/` closes itself, so the search starts inside the opener.
                    match text_after_closer(trimmed, "/*".len()) {
                        None => ScanState::InsideComment(block),
                        Some("") => {
                            self.close_block(block, &line, sink, &mut result);
                            after_comment = true;
                            ScanState::Scanning
                        }
                        Some(_) => {
                            debug!(
                                line = index + 1,
                                "inline comment before code, leaving line untouched"
                            );
                            after_comment = false;
                            ScanState::Scanning
                        }
                    }
                }
                ScanState::Scanning => {
                    if !is_comment_line(trimmed)
                        && let Some(declaration) = patterns::classify(trimmed)
                    {
                        let documented = after_comment
                            && (index == range.start || self.config.scan.skip_documented);
                        if documented {
                            debug!(line = index + 1, kind = %declaration.kind, "already documented");
                            result.skipped_documented += 1;
                        } else {
                            debug!(
                                line = index + 1,
                                kind = %declaration.kind,
                                name = declaration.name.as_deref().unwrap_or(""),
                                "generating comment"
                            );
                            let comment = synthesizer.synthesize(&declaration);
                            sink.insert(line.range.start, format_comment(&comment, &line.indent()));
                            result.generated += 1;
                        }
                    }
                    after_comment = closes_comment(trimmed);
                    ScanState::Scanning
                }
            };
        }

        if let ScanState::InsideComment(block) = state {
            warn!(
                start = %block.start,
                lines = block.lines.len(),
                "comment block is not closed before the end of the range, leaving it untouched"
            );
            result.unterminated += 1;
        }

        Ok(result)
    }

    fn check_language(&self, source: &dyn TextSource) -> Result<()> {
        let language_id = source.language_id();
        if !self.config.scan.accepts_language(language_id) {
            anyhow::bail!(
                "Language '{}' is not enabled (enabled: {})",
                language_id,
                self.config.scan.languages.join(", ")
            );
        }
        Ok(())
    }

    /// Replaces a finished block with its validated form.
    fn close_block(
        &self,
        block: CommentBlock,
        end: &Line,
        sink: &mut dyn EditSink,
        result: &mut ScanResult,
    ) {
        if !self.config.scan.normalize_existing {
            return;
        }

        let validated = self.validator.validate_comment(&block.lines, &block.indent);
        let text = validated
            .text
            .strip_suffix('\n')
            .unwrap_or(&validated.text)
            .to_string();
        debug!(
            start = %block.start,
            end = %end.range.end,
            tags = validated.tags.len(),
            "normalizing existing comment"
        );
        sink.replace(block.start, end.range.end, text);
        result.normalized += 1;
    }
}
