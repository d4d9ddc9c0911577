//! Sphinx Only
//!
//! Tag-conditional inline roles (`only-text`, `only-numref`, `only`) for
//! reStructuredText manuals, plus sitemap generation for the published site.

pub mod config;
pub mod error;
pub mod expand;
pub mod roles;
pub mod sitemap;
pub mod tags;

pub use config::{PageDescriptor, SiteConfig, TableOfContents, TocSection};
pub use error::{MarkupError, SitemapError};
pub use expand::{expand_files, expand_source, ExpandStats, Expansion};
pub use roles::{
    extract_tag, parse_segments, LiteralResolver, OnlyRole, ParsedBody, ReferenceResolver,
    RoleRegistry, RoleShape, RoleValidationResult, RstResolver, Segment, TaggedMarkup,
};
pub use sitemap::{build_entries, render_xml, ChangeFreq, Priority, SitemapEntry, SitemapGenerator};
pub use tags::{TagSet, Tags};
