use serde::Serialize;
use thiserror::Error;

use crate::core::document::{Document, Position};

/// Failures of an edit transaction. Either every edit of a batch applies or
/// none does, so these are reported for the batch as a whole.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Edit position {position} is outside the document")]
    OutOfBounds { position: Position },

    #[error("Replacement ending at {end} starts after it ends (start {start})")]
    InvertedRange { start: Position, end: Position },

    #[error("Edit at {position} overlaps a text span already replaced by this batch")]
    Overlap { position: Position },
}

/// One edit instruction: insert `text` at `position`, optionally replacing
/// the text from `position` up to `replaces_until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insertion {
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaces_until: Option<Position>,
    pub text: String,
}

/// Receives the edits computed by a scan.
///
/// Implementations decide how edits reach the buffer. The scanner never reads
/// back what it wrote; all positions refer to the snapshot that was scanned.
pub trait EditSink {
    /// Inserts `text` at `position` without removing anything.
    fn insert(&mut self, position: Position, text: String);

    /// Replaces the text between `start` and `end` with `text`.
    ///
    /// # Arguments
    /// * `start`: The first replaced character.
    /// * `end`: The position just past the last replaced character.
    /// * `text`: The replacement; it may span several lines.
    fn replace(&mut self, start: Position, end: Position, text: String);
}

/// Collects the edits of one scan and applies them as a single transaction.
#[derive(Debug, Default, Clone)]
pub struct EditBatch {
    insertions: Vec<Insertion>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insertions(&self) -> &[Insertion] {
        &self.insertions
    }

    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.insertions.len()
    }

    /// Applies every collected edit to `document` and returns the new text.
    ///
    /// Edits at the same position keep the order they were emitted in. The
    /// document is never partially edited: the first invalid edit aborts the
    /// whole batch.
    pub fn apply(&self, document: &Document) -> Result<String, EditError> {
        let eol = document.line_ending();
        let lines = document.lines();

        let mut line_starts = Vec::with_capacity(lines.len());
        let mut source = String::new();
        for (index, line) in lines.iter().enumerate() {
            line_starts.push(source.len());
            source.push_str(line);
            source.push_str(document.line_break(index));
        }

        let to_offset = |position: Position| -> Result<usize, EditError> {
            let line = lines
                .get(position.line)
                .ok_or(EditError::OutOfBounds { position })?;
            let within = if position.character == line.chars().count() {
                line.len()
            } else {
                line.char_indices()
                    .nth(position.character)
                    .map(|(byte, _)| byte)
                    .ok_or(EditError::OutOfBounds { position })?
            };
            Ok(line_starts[position.line] + within)
        };

        let mut resolved = Vec::with_capacity(self.insertions.len());
        for (order, insertion) in self.insertions.iter().enumerate() {
            let start = to_offset(insertion.position)?;
            let end = match insertion.replaces_until {
                Some(until) => {
                    if until < insertion.position {
                        return Err(EditError::InvertedRange {
                            start: insertion.position,
                            end: until,
                        });
                    }
                    to_offset(until)?
                }
                None => start,
            };
            resolved.push((start, order, end, insertion));
        }
        resolved.sort_by_key(|(start, order, _, _)| (*start, *order));

        let mut output = String::with_capacity(source.len());
        let mut cursor = 0;
        for (start, _, end, insertion) in resolved {
            if start < cursor {
                return Err(EditError::Overlap {
                    position: insertion.position,
                });
            }
            output.push_str(&source[cursor..start]);
            if eol == "\n" {
                output.push_str(&insertion.text);
            } else {
                output.push_str(&insertion.text.replace('\n', eol));
            }
            cursor = end;
        }
        output.push_str(&source[cursor..]);

        Ok(output)
    }
}

impl EditSink for EditBatch {
    fn insert(&mut self, position: Position, text: String) {
        self.insertions.push(Insertion {
            position,
            replaces_until: None,
            text,
        });
    }

    fn replace(&mut self, start: Position, end: Position, text: String) {
        self.insertions.push(Insertion {
            position: start,
            replaces_until: Some(end),
            text,
        });
    }
}
