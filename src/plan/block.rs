//! Recursive block parser
//!
//! A single forward-only [`LineCursor`] is passed down the call stack; each
//! parse function consumes lines up to and including its own terminator and
//! returns the finished node, or the first error encountered.

use std::io::BufRead;

use tracing::trace;

use super::attribute::{BlockHeader, array_item_from_line, scalar_from_line};
use super::error::{PlanParseError, Result};
use super::line::{BlockKind, ChangeMarker, Line, LineKind, normalize};
use super::types::{
    ArrayChange, AttributeChange, HeredocChange, JsonEncodeChange, MapChange, UpdateType,
};

/// Forward-only cursor over normalized input lines
pub struct LineCursor<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
        }
    }

    /// Read the next line, uncolored and trimmed; `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }

        self.line_number += 1;
        Ok(Some(normalize(&self.buf)))
    }

    /// 1-based number of the line most recently read
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Attach the current line number to a line-level error
    pub fn locate(&self, err: PlanParseError) -> PlanParseError {
        err.at_line(self.line_number)
    }

    fn structural_error(&self, line: &str, context: &'static str) -> PlanParseError {
        PlanParseError::UnexpectedStructuralLine {
            line_number: self.line_number,
            line: line.to_string(),
            context,
        }
    }
}

/// Parse the composite attribute opened by `line`
pub fn parse_composite<R: BufRead>(
    cursor: &mut LineCursor<R>,
    kind: BlockKind,
    line: &Line<'_>,
) -> Result<AttributeChange> {
    let header = BlockHeader::from_line(line);

    let attribute = match kind {
        BlockKind::Map => {
            let children = if line.is_one_line_empty() {
                Vec::new()
            } else {
                parse_map_body(cursor, kind.context())?
            };
            AttributeChange::Map(MapChange {
                name: header.name,
                children,
                update_type: header.update_type,
            })
        }
        BlockKind::Array => {
            let children = if line.is_one_line_empty() {
                Vec::new()
            } else {
                parse_array_body(cursor)?
            };
            AttributeChange::Array(ArrayChange {
                name: header.name,
                children,
                update_type: header.update_type,
            })
        }
        BlockKind::Heredoc => AttributeChange::Heredoc(parse_heredoc_body(cursor, header)?),
        BlockKind::JsonEncode => AttributeChange::JsonEncode(JsonEncodeChange {
            name: header.name,
            children: parse_jsonencode_body(cursor)?,
            update_type: header.update_type,
        }),
    };

    Ok(attribute)
}

/// Parse the children of a map up to its `}` terminator
///
/// Resource bodies are parsed with this too, with `context` naming them.
pub fn parse_map_body<R: BufRead>(
    cursor: &mut LineCursor<R>,
    context: &'static str,
) -> Result<Vec<AttributeChange>> {
    let mut children = Vec::new();

    while let Some(text) = cursor.next_line()? {
        let line = Line::new(&text);
        match line.kind() {
            LineKind::Terminator(BlockKind::Map) => return Ok(children),
            LineKind::ResourceComment | LineKind::PlanSummary => {
                return Err(cursor.structural_error(&text, context));
            }
            LineKind::CompositeStart(kind) => {
                children.push(parse_composite(cursor, kind, &line)?);
            }
            LineKind::Scalar => {
                let scalar = scalar_from_line(&line).map_err(|e| cursor.locate(e))?;
                children.push(AttributeChange::Scalar(scalar));
            }
            // Unknown annotations and block headers are tolerated
            _ => {
                trace!(
                    line_number = cursor.line_number(),
                    line = %text,
                    "skipping line in {}",
                    context
                );
            }
        }
    }

    Err(PlanParseError::UnexpectedEndOfInput { context })
}

/// Parse the unnamed elements of an array up to its `]` terminator
pub fn parse_array_body<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Vec<AttributeChange>> {
    let context = BlockKind::Array.context();
    let mut children = Vec::new();

    while let Some(text) = cursor.next_line()? {
        let line = Line::new(&text);
        match line.kind() {
            LineKind::Terminator(BlockKind::Array) => return Ok(children),
            LineKind::ResourceComment | LineKind::PlanSummary => {
                return Err(cursor.structural_error(&text, context));
            }
            LineKind::CompositeStart(kind) => {
                children.push(parse_composite(cursor, kind, &line)?);
            }
            LineKind::Scalar | LineKind::Unrecognized => {
                let item = array_item_from_line(&line).map_err(|e| cursor.locate(e))?;
                children.push(AttributeChange::Scalar(item));
            }
            LineKind::Blank
            | LineKind::Annotation
            | LineKind::ResourceBlockStart
            | LineKind::Terminator(_) => {
                trace!(
                    line_number = cursor.line_number(),
                    line = %text,
                    "skipping line in {}",
                    context
                );
            }
        }
    }

    Err(PlanParseError::UnexpectedEndOfInput { context })
}

/// Collect heredoc content up to the `EOT` terminator
///
/// Content lines are never classified. New heredocs fill only the "after"
/// lines, destroyed ones only the "before" lines, and anything else fills
/// both with the same text.
pub fn parse_heredoc_body<R: BufRead>(
    cursor: &mut LineCursor<R>,
    header: BlockHeader,
) -> Result<HeredocChange> {
    let mut before = Vec::new();
    let mut after = Vec::new();

    while let Some(text) = cursor.next_line()? {
        let line = Line::new(&text);
        if line.marker() == ChangeMarker::None && line.terminator() == Some(BlockKind::Heredoc) {
            return Ok(HeredocChange {
                name: header.name,
                before,
                after,
                update_type: header.update_type,
            });
        }

        match header.update_type {
            UpdateType::New => after.push(text),
            UpdateType::Destroy => before.push(text),
            _ => {
                before.push(text.clone());
                after.push(text);
            }
        }
    }

    Err(PlanParseError::UnexpectedEndOfInput {
        context: BlockKind::Heredoc.context(),
    })
}

/// Parse a `jsonencode(` body up to its `)` terminator
///
/// The body holds exactly one unnamed composite, normally a map.
pub fn parse_jsonencode_body<R: BufRead>(
    cursor: &mut LineCursor<R>,
) -> Result<Vec<AttributeChange>> {
    let context = BlockKind::JsonEncode.context();
    let mut children = Vec::new();

    while let Some(text) = cursor.next_line()? {
        let line = Line::new(&text);
        match line.kind() {
            LineKind::Terminator(BlockKind::JsonEncode) => return Ok(children),
            LineKind::ResourceComment | LineKind::PlanSummary => {
                return Err(cursor.structural_error(&text, context));
            }
            LineKind::CompositeStart(_) if !children.is_empty() => {
                let err = PlanParseError::malformed(&text, "more than one jsonencode value");
                return Err(cursor.locate(err));
            }
            LineKind::CompositeStart(kind) => {
                children.push(parse_composite(cursor, kind, &line)?);
            }
            _ => {
                trace!(
                    line_number = cursor.line_number(),
                    line = %text,
                    "skipping line in {}",
                    context
                );
            }
        }
    }

    Err(PlanParseError::UnexpectedEndOfInput { context })
}
