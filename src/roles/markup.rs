//! Tag extraction and segment scanning for tag-conditional markup.
//!
//! Markup has the shape `<tag>body`, where the body may contain `{target}`
//! cross-references between runs of plain text.

use serde::Serialize;

use crate::error::MarkupError;

/// One unit of rendered role output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Segment {
    /// Literal text, rendered verbatim
    Text(String),
    /// Cross-reference target, handed to the host resolver
    Reference(String),
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }

    pub fn reference(target: impl Into<String>) -> Self {
        Segment::Reference(target.into())
    }

    /// The literal text or the reference target
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text(text) | Segment::Reference(text) => text,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Segment::Reference(_))
    }
}

/// Markup split into its controlling tag and the remaining body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedMarkup {
    pub tag: String,
    pub body: String,
}

/// Split `markup` at its first `<...>` span.
///
/// Text before `<` and after `>` is kept, in order, as the body. Without any
/// `<` the tag is empty and the body is the whole input.
pub fn extract_tag(markup: &str) -> Result<TaggedMarkup, MarkupError> {
    let Some(start) = markup.find('<') else {
        return Ok(TaggedMarkup {
            tag: String::new(),
            body: markup.to_string(),
        });
    };

    let Some(len) = markup[start + 1..].find('>') else {
        return Err(MarkupError::UnterminatedTag { offset: start });
    };
    let end = start + 1 + len;

    let mut body = String::with_capacity(markup.len() - (end + 1 - start));
    body.push_str(&markup[..start]);
    body.push_str(&markup[end + 1..]);

    Ok(TaggedMarkup {
        tag: markup[start + 1..end].to_string(),
        body,
    })
}

/// Result of scanning a body for `{target}` references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBody {
    pub segments: Vec<Segment>,
    /// Text following a `{` that was never closed. It is dropped from the
    /// output; callers may report it.
    pub dangling: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    PlainText,
    InReference,
}

/// Scan `body` left to right into text and reference segments.
pub fn parse_segments(body: &str) -> ParsedBody {
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut state = ScanState::PlainText;

    for c in body.chars() {
        match c {
            '{' => {
                if !pending.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut pending)));
                }
                state = ScanState::InReference;
            }
            '}' => {
                segments.push(Segment::Reference(std::mem::take(&mut pending)));
                state = ScanState::PlainText;
            }
            _ => pending.push(c),
        }
    }

    let dangling = match state {
        ScanState::PlainText => {
            if !pending.is_empty() {
                segments.push(Segment::Text(pending));
            }
            None
        }
        ScanState::InReference => Some(pending),
    };

    ParsedBody { segments, dangling }
}
