//! Expanding tag-conditional roles in reStructuredText sources.
//!
//! Role invocations like ``:only:`<Open>See {fig-arch}` `` are replaced by the
//! plain reST they render to for the active tags. Roles that are not
//! registered are left untouched.

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use rayon::prelude::*;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::roles::{RoleRegistry, RstResolver, Segment};
use crate::tags::TagSet;

lazy_static! {
    /// Regex for matching interpreted-text roles with backquoted content
    static ref ROLE_REGEX: Regex = Regex::new(
        r"( ?):([a-zA-Z][a-zA-Z0-9_-]*):`([^`]*)`"
    ).unwrap();
}

/// Result of expanding one source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    /// Roles whose tag was active
    pub shown: usize,
    /// Roles removed because their tag was inactive or their markup was malformed
    pub hidden: usize,
}

/// Replace every registered role in `source` with its rendered reST.
pub fn expand_source<T>(source: &str, registry: &RoleRegistry, tags: &T) -> Expansion
where
    T: TagSet + ?Sized,
{
    let resolver = RstResolver::default();
    let mut shown = 0;
    let mut hidden = 0;

    let text = ROLE_REGEX.replace_all(source, |caps: &Captures| {
        let Some(role) = registry.get(&caps[2]) else {
            return caps[0].to_string();
        };
        let leading = &caps[1];

        let segments = match role.segments(&caps[3], tags) {
            Ok(segments) => drop_empty_references(role.name(), segments),
            Err(e) => {
                warn!("{}: {} in '{}'", role.name(), e, caps[0].trim_start());
                Vec::new()
            }
        };

        if segments.is_empty() {
            hidden += 1;
            let end = caps.get(0).map_or(source.len(), |m| m.end());
            return collapse_space(leading, source[end..].chars().next());
        }

        shown += 1;
        format!("{}{}", leading, resolver.join(&segments))
    });

    Expansion {
        text: text.into_owned(),
        shown,
        hidden,
    }
}

/// Empty targets cannot be written as reST roles, so they are left out.
fn drop_empty_references(role: &str, segments: Vec<Segment>) -> Vec<Segment> {
    segments
        .into_iter()
        .filter(|segment| {
            let empty = segment.is_reference() && segment.as_str().trim().is_empty();
            if empty {
                warn!("{}: dropping empty reference target", role);
            }
            !empty
        })
        .collect()
}

/// Space to keep in place of a removed role, given the character after it.
fn collapse_space(leading: &str, next: Option<char>) -> String {
    match next {
        None => String::new(),
        Some(c) if c.is_whitespace() || ".,;!?)".contains(c) => String::new(),
        Some(_) => leading.to_string(),
    }
}

/// Totals for a batch expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandStats {
    pub files_processed: usize,
    pub roles_shown: usize,
    pub roles_hidden: usize,
}

/// Collect `.rst` files from the inputs.
///
/// Files are taken as given; directories are walked. Each path is paired with
/// its location relative to the input it came from. Two sources landing on
/// the same relative location is an error.
pub fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut sources: Vec<(PathBuf, PathBuf)> = Vec::new();

    for input in inputs {
        if input.is_file() {
            let name = input
                .file_name()
                .map(PathBuf::from)
                .with_context(|| format!("Invalid source path: {}", input.display()))?;
            sources.push((input.clone(), name));
            continue;
        }

        for entry in WalkDir::new(input).follow_links(true) {
            let entry = entry.with_context(|| format!("Failed to walk {}", input.display()))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "rst") {
                let relative = path.strip_prefix(input)?.to_path_buf();
                sources.push((path.to_path_buf(), relative));
            }
        }
    }

    let mut targets: HashMap<&Path, &Path> = HashMap::new();
    for (source, relative) in &sources {
        if let Some(previous) = targets.insert(relative.as_path(), source.as_path()) {
            bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                source.display(),
                relative.display()
            );
        }
    }

    debug!("Collected {} source files", sources.len());
    Ok(sources)
}

/// Expand every source under `inputs` into `output_dir`, preserving layout.
pub fn expand_files<T>(
    inputs: &[PathBuf],
    output_dir: &Path,
    registry: &RoleRegistry,
    tags: &T,
) -> Result<ExpandStats>
where
    T: TagSet + Sync + ?Sized,
{
    let sources = collect_sources(inputs)?;

    let results: Vec<Expansion> = sources
        .par_iter()
        .map(|(source, relative)| -> Result<Expansion> {
            let content = fs::read_to_string(source)
                .with_context(|| format!("Failed to read {}", source.display()))?;
            let expansion = expand_source(&content, registry, tags);

            let target = output_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&target, &expansion.text)
                .with_context(|| format!("Failed to write {}", target.display()))?;

            debug!(
                "Expanded {} ({} shown, {} hidden)",
                source.display(),
                expansion.shown,
                expansion.hidden
            );
            Ok(expansion)
        })
        .collect::<Result<_>>()?;

    let stats = results.iter().fold(
        ExpandStats {
            files_processed: results.len(),
            ..Default::default()
        },
        |mut stats, expansion| {
            stats.roles_shown += expansion.shown;
            stats.roles_hidden += expansion.hidden;
            stats
        },
    );

    info!(
        "Expanded {} files: {} roles shown, {} hidden",
        stats.files_processed, stats.roles_shown, stats.roles_hidden
    );
    Ok(stats)
}
