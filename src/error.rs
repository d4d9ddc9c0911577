//! Error types for role markup and sitemap generation.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed inline markup that cannot be interpreted.
///
/// Unterminated references are not errors; see [`crate::roles::markup::ParsedBody`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unterminated tag: '<' at byte {offset} has no closing '>'")]
    UnterminatedTag { offset: usize },
}

/// Failures while generating a sitemap. All of them abort the run.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("site configuration has an empty version")]
    EmptyVersion,
}
