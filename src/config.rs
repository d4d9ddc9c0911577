//! Site configuration and table-of-contents files read by the sitemap generator.

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SitemapError;

/// Published site URL used when the configuration does not name one
pub const DEFAULT_SITE_URL: &str = "https://open.xdmod.org";

/// Site-wide settings from `_config.yml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteConfig {
    /// Published version, also the path segment of every page
    #[serde(deserialize_with = "version_string")]
    pub version: String,

    #[serde(default = "default_site_url")]
    pub url: String,

    /// Tags enabled for this site variant, merged with command-line tags
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

/// Unquoted versions like `10.10` are read by YAML as floats and lose their
/// text, so only strings and integers are accepted.
fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        serde_yaml::Value::Number(n) => Err(D::Error::custom(format!(
            "version {} must be quoted, e.g. version: '{}'",
            n, n
        ))),
        other => Err(D::Error::custom(format!(
            "version must be a string, found {:?}",
            other
        ))),
    }
}

impl SiteConfig {
    pub fn load(path: &Path) -> Result<Self, SitemapError> {
        let config: SiteConfig = load_yaml(path)?;
        if config.version.trim().is_empty() {
            return Err(SitemapError::EmptyVersion);
        }
        Ok(config)
    }

    /// Location of this version's table of contents under `toc_dir`
    pub fn toc_path(&self, toc_dir: &Path) -> PathBuf {
        toc_dir.join(&self.version).join("toc.yml")
    }

    /// Base URL of the published version, without a trailing slash
    pub fn version_base(&self) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), self.version.trim())
    }
}

/// One page listed in the table of contents
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageDescriptor {
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
}

/// A titled group of pages
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TocSection {
    pub title: String,
    #[serde(default, alias = "pages")]
    pub docs: Vec<PageDescriptor>,
}

/// Ordered sections of one published version
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TableOfContents {
    pub sections: Vec<TocSection>,
}

impl TableOfContents {
    pub fn load(path: &Path) -> Result<Self, SitemapError> {
        load_yaml(path)
    }

    /// Every page in reading order
    pub fn pages(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.sections.iter().flat_map(|section| section.docs.iter())
    }
}

fn load_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SitemapError> {
    let content = fs::read_to_string(path).map_err(|source| SitemapError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| SitemapError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_accepts_strings_and_integers() {
        let config: SiteConfig = serde_yaml::from_str("version: '10.10'\n").unwrap();
        assert_eq!(config.version, "10.10");
        assert_eq!(config.url, DEFAULT_SITE_URL);
        assert!(config.tags.is_empty());

        let config: SiteConfig = serde_yaml::from_str("version: 11\n").unwrap();
        assert_eq!(config.version, "11");
    }

    #[test]
    fn test_version_rejects_unquoted_floats() {
        let err = serde_yaml::from_str::<SiteConfig>("version: 10.10\n").unwrap_err();
        assert!(err.to_string().contains("must be quoted"));

        assert!(serde_yaml::from_str::<SiteConfig>("version: [10]\n").is_err());
    }

    #[test]
    fn test_version_base() {
        let config: SiteConfig =
            serde_yaml::from_str("version: '11.0'\nurl: https://docs.example.org/\n").unwrap();
        assert_eq!(config.version_base(), "https://docs.example.org/11.0");
        assert_eq!(
            config.toc_path(Path::new("_data")),
            Path::new("_data").join("11.0").join("toc.yml")
        );
    }

    #[test]
    fn test_toc_pages_in_order() {
        let yaml = r#"
- title: Getting Started
  docs:
    - title: Overview
      url: /
    - url: /install.html
- title: Reference
  pages:
    - url: /api/
"#;
        let toc: TableOfContents = serde_yaml::from_str(yaml).unwrap();
        let urls: Vec<&str> = toc.pages().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/", "/install.html", "/api/"]);
    }

    #[test]
    fn test_toc_missing_url_is_rejected() {
        let yaml = "- title: Broken\n  docs:\n    - title: No url\n";
        assert!(serde_yaml::from_str::<TableOfContents>(yaml).is_err());
    }
}
