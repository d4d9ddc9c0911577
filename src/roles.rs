//! Tag-conditional inline roles
//!
//! The `only` family of roles shows a piece of inline markup only when its
//! leading `<tag>` is active for the current build:
//!
//! ```text
//! :only:`<Open>See {fig-architecture} for the layout`
//! ```
//!
//! All three built-in roles share one scanner and differ only in the
//! [`RoleShape`] of their output.

use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

pub mod markup;
pub mod resolver;

pub use markup::{extract_tag, parse_segments, ParsedBody, Segment, TaggedMarkup};
pub use resolver::{LiteralResolver, ReferenceResolver, RstResolver};

use crate::error::MarkupError;
use crate::tags::TagSet;

/// How a role interprets its body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleShape {
    /// The whole body is one text segment; braces are literal
    Text,
    /// The whole body is one reference target
    Reference,
    /// Text with embedded `{target}` references
    Mixed,
}

impl fmt::Display for RoleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleShape::Text => write!(f, "text"),
            RoleShape::Reference => write!(f, "reference"),
            RoleShape::Mixed => write!(f, "mixed"),
        }
    }
}

/// Result of role validation
#[derive(Debug, Clone, PartialEq)]
pub enum RoleValidationResult {
    /// Role is valid
    Valid,
    /// Role has warnings but still renders
    Warning(String),
    /// Role cannot be interpreted
    Error(String),
    /// Role is unknown/unregistered
    Unknown,
}

/// A tag-conditional role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlyRole {
    name: String,
    shape: RoleShape,
}

impl OnlyRole {
    pub fn new(name: impl Into<String>, shape: RoleShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> RoleShape {
        self.shape
    }

    /// Interpret `markup` against the active tags.
    ///
    /// An inactive tag yields no segments at all. Unterminated references are
    /// dropped and logged.
    pub fn segments<T>(&self, markup: &str, tags: &T) -> Result<Vec<Segment>, MarkupError>
    where
        T: TagSet + ?Sized,
    {
        let TaggedMarkup { tag, body } = extract_tag(markup)?;

        if !tags.contains(&tag) {
            debug!("{}: tag '{}' inactive, hiding content", self.name, tag);
            return Ok(Vec::new());
        }

        let segments = match self.shape {
            RoleShape::Text if body.is_empty() => Vec::new(),
            RoleShape::Text => vec![Segment::Text(body)],
            RoleShape::Reference => vec![Segment::Reference(body)],
            RoleShape::Mixed => {
                let ParsedBody { segments, dangling } = parse_segments(&body);
                if let Some(dropped) = dangling {
                    warn!(
                        "{}: unterminated reference '{{{}' dropped from '{}'",
                        self.name, dropped, markup
                    );
                }
                segments
            }
        };

        Ok(segments)
    }

    /// Render `markup` through a host resolver.
    pub fn render<T, R>(
        &self,
        markup: &str,
        tags: &T,
        resolver: &R,
    ) -> Result<Vec<R::Node>, MarkupError>
    where
        T: TagSet + ?Sized,
        R: ReferenceResolver,
    {
        let segments = self.segments(markup, tags)?;
        Ok(segments
            .iter()
            .map(|segment| resolver.render_segment(segment))
            .collect())
    }

    /// Render without failing: malformed markup is logged and produces no output.
    pub fn run<T, R>(&self, markup: &str, tags: &T, resolver: &R) -> Vec<R::Node>
    where
        T: TagSet + ?Sized,
        R: ReferenceResolver,
    {
        match self.render(markup, tags, resolver) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!("{}: {} in '{}'", self.name, e, markup);
                Vec::new()
            }
        }
    }

    /// Check `markup` for authoring problems without needing any tags.
    pub fn validate(&self, markup: &str) -> RoleValidationResult {
        let TaggedMarkup { tag, body } = match extract_tag(markup) {
            Ok(split) => split,
            Err(e) => return RoleValidationResult::Error(e.to_string()),
        };

        if tag.trim().is_empty() {
            return RoleValidationResult::Warning(format!(
                "The '{}' role has no <tag>; its content is never shown",
                self.name
            ));
        }

        match self.shape {
            RoleShape::Text => RoleValidationResult::Valid,
            RoleShape::Reference if body.is_empty() => RoleValidationResult::Warning(format!(
                "The '{}' role requires a reference target",
                self.name
            )),
            RoleShape::Reference => RoleValidationResult::Valid,
            RoleShape::Mixed => {
                let parsed = parse_segments(&body);
                if let Some(dropped) = parsed.dangling {
                    return RoleValidationResult::Warning(format!(
                        "Unterminated reference '{{{}' will be dropped",
                        dropped
                    ));
                }
                if parsed
                    .segments
                    .iter()
                    .any(|s| s.is_reference() && s.as_str().is_empty())
                {
                    return RoleValidationResult::Warning(
                        "Empty reference target '{}'".to_string(),
                    );
                }
                RoleValidationResult::Valid
            }
        }
    }
}

/// Registry of tag-conditional roles by name
#[derive(Debug, Default, Clone)]
pub struct RoleRegistry {
    roles: HashMap<String, OnlyRole>,
}

impl RoleRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with `only-text`, `only-numref` and `only`
    pub fn with_builtin_roles() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_roles();
        registry
    }

    pub fn register_builtin_roles(&mut self) {
        self.register(OnlyRole::new("only-text", RoleShape::Text));
        self.register(OnlyRole::new("only-numref", RoleShape::Reference));
        self.register(OnlyRole::new("only", RoleShape::Mixed));
    }

    /// Registers a role, replacing any role with the same name
    pub fn register(&mut self, role: OnlyRole) {
        self.roles.insert(role.name().to_string(), role);
    }

    pub fn get(&self, name: &str) -> Option<&OnlyRole> {
        self.roles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Registered role names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validates `markup` for the named role
    pub fn validate(&self, name: &str, markup: &str) -> RoleValidationResult {
        match self.get(name) {
            Some(role) => role.validate(markup),
            None => RoleValidationResult::Unknown,
        }
    }
}
