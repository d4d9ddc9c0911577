//! Turning segments into host output.

use super::markup::Segment;

/// Host capability that renders text and resolves cross-reference targets.
///
/// Whether a target actually exists is the host's concern; roles only hand
/// over the target string.
pub trait ReferenceResolver {
    type Node;

    fn text(&self, text: &str) -> Self::Node;

    fn resolve(&self, target: &str) -> Self::Node;

    fn render_segment(&self, segment: &Segment) -> Self::Node {
        match segment {
            Segment::Text(text) => self.text(text),
            Segment::Reference(target) => self.resolve(target),
        }
    }
}

/// Displays every reference as its literal target
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralResolver;

impl ReferenceResolver for LiteralResolver {
    type Node = String;

    fn text(&self, text: &str) -> String {
        text.to_string()
    }

    fn resolve(&self, target: &str) -> String {
        target.to_string()
    }
}

/// Emits reStructuredText, with references as numbered-reference roles
#[derive(Debug, Clone)]
pub struct RstResolver {
    role: String,
}

impl RstResolver {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }

    /// Join rendered segments into one reST fragment.
    ///
    /// Inline markup must be preceded and followed by whitespace or certain
    /// punctuation, so a reference touching other characters is separated
    /// from them by an escaped space.
    pub fn join(&self, segments: &[Segment]) -> String {
        let mut out = String::new();
        let mut after_reference = false;

        for segment in segments {
            let rendered = self.render_segment(segment);
            let needs_separator = if segment.is_reference() {
                out.chars()
                    .next_back()
                    .is_some_and(|c| !c.is_whitespace() && !MARKUP_START_PRECEDERS.contains(c))
            } else {
                after_reference
                    && rendered
                        .chars()
                        .next()
                        .is_some_and(|c| !c.is_whitespace() && !MARKUP_END_FOLLOWERS.contains(c))
            };
            if needs_separator {
                out.push_str("\\ ");
            }
            out.push_str(&rendered);
            after_reference = segment.is_reference();
        }

        out
    }
}

/// Characters allowed right before an inline markup start-string
const MARKUP_START_PRECEDERS: &str = "-:/'\"<([{";

/// Characters allowed right after an inline markup end-string
const MARKUP_END_FOLLOWERS: &str = "-.,:;!?\\/'\")]}>";

/// Characters that open or close reST inline markup
const INLINE_MARKUP_CHARS: &str = "\\*`_|";

impl Default for RstResolver {
    fn default() -> Self {
        Self::new("numref")
    }
}

impl ReferenceResolver for RstResolver {
    type Node = String;

    fn text(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            if INLINE_MARKUP_CHARS.contains(c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    fn resolve(&self, target: &str) -> String {
        format!(":{}:`{}`", self.role, target)
    }
}
