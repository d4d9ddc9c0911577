//! Sitemap generation for a published documentation version.
//!
//! Every page in the version's table of contents becomes one `<url>` entry.
//! Section index pages (URLs ending in `/`) are ranked above ordinary pages.

use chrono::NaiveDate;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::{PageDescriptor, SiteConfig, TableOfContents};
use crate::error::SitemapError;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Sitemap protocol change frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Section index page
    Section,
    Page,
}

impl Priority {
    pub fn for_url(url: &str) -> Self {
        if url.ends_with('/') {
            Priority::Section
        } else {
            Priority::Page
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Section => "1.0",
            Priority::Page => "0.5",
        }
    }
}

/// One `<url>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: Priority,
}

impl SitemapEntry {
    fn write_xml(&self, xml: &mut String) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            html_escape::encode_text(&self.loc)
        ));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            self.lastmod.format("%Y-%m-%d")
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            self.changefreq
        ));
        xml.push_str(&format!(
            "    <priority>{}</priority>\n",
            self.priority.as_str()
        ));
        xml.push_str("  </url>\n");
    }
}

/// Build entries for every site-relative page, in order.
///
/// Pages whose URL does not start with `/` (external links, anchors) are skipped.
pub fn build_entries<'a, I>(base: &str, date: NaiveDate, pages: I) -> Vec<SitemapEntry>
where
    I: IntoIterator<Item = &'a PageDescriptor>,
{
    let base = base.trim_end_matches('/');

    pages
        .into_iter()
        .filter(|page| {
            let keep = page.url.starts_with('/');
            if !keep {
                debug!("Skipping non site-relative url: {}", page.url);
            }
            keep
        })
        .map(|page| SitemapEntry {
            loc: format!("{}{}", base, page.url),
            lastmod: date,
            changefreq: ChangeFreq::Monthly,
            priority: Priority::for_url(&page.url),
        })
        .collect()
}

/// Serialize entries as a sitemap document with a single `urlset` root
pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{}\">\n",
        SITEMAP_NAMESPACE
    );
    for entry in entries {
        entry.write_xml(&mut xml);
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Sitemap for one published version, loaded from its configuration files
#[derive(Debug)]
pub struct SitemapGenerator {
    config: SiteConfig,
    toc: TableOfContents,
    date: NaiveDate,
}

impl SitemapGenerator {
    pub fn new(config: SiteConfig, toc: TableOfContents, date: NaiveDate) -> Self {
        Self { config, toc, date }
    }

    /// Load `config_path` and the matching table of contents under `toc_dir`.
    pub fn load(config_path: &Path, toc_dir: &Path, date: NaiveDate) -> Result<Self, SitemapError> {
        let config = SiteConfig::load(config_path)?;
        let toc_path = config.toc_path(toc_dir);
        debug!("Loading table of contents from {}", toc_path.display());
        let toc = TableOfContents::load(&toc_path)?;
        Ok(Self::new(config, toc, date))
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn entries(&self) -> Vec<SitemapEntry> {
        build_entries(&self.config.version_base(), self.date, self.toc.pages())
    }

    pub fn generate(&self) -> String {
        render_xml(&self.entries())
    }

    /// Write the sitemap to `output`, returning the number of entries.
    ///
    /// The document is rendered in full before anything touches the disk.
    pub fn write(&self, output: &Path) -> Result<usize, SitemapError> {
        let entries = self.entries();
        let xml = render_xml(&entries);

        fs::write(output, xml).map_err(|source| SitemapError::Write {
            path: output.to_path_buf(),
            source,
        })?;

        info!(
            "Wrote {} entries for version {} to {}",
            entries.len(),
            self.config.version,
            output.display()
        );
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str) -> PageDescriptor {
        PageDescriptor {
            title: None,
            url: url.to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_priority_rule() {
        assert_eq!(Priority::for_url("/").as_str(), "1.0");
        assert_eq!(Priority::for_url("/guide/").as_str(), "1.0");
        assert_eq!(Priority::for_url("/install.html").as_str(), "0.5");
    }

    #[test]
    fn test_build_entries_skips_external_urls() {
        let pages = vec![
            page("/"),
            page("https://example.org/"),
            page("install.html"),
            page("/install.html"),
        ];
        let entries = build_entries("https://docs.example.org/10.5/", date(), &pages);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].loc, "https://docs.example.org/10.5/");
        assert_eq!(entries[0].priority, Priority::Section);
        assert_eq!(entries[1].loc, "https://docs.example.org/10.5/install.html");
        assert_eq!(entries[1].priority, Priority::Page);
        assert!(entries
            .iter()
            .all(|e| e.changefreq == ChangeFreq::Monthly && e.lastmod == date()));
    }

    #[test]
    fn test_render_xml() {
        let entries = build_entries("https://x.org", date(), &[page("/a?b=1&c=2")]);
        let xml = render_xml(&entries);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(&format!("<urlset xmlns=\"{}\">", SITEMAP_NAMESPACE)));
        assert!(xml.contains("<loc>https://x.org/a?b=1&amp;c=2</loc>"));
        assert!(xml.contains("<lastmod>2024-03-01</lastmod>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<priority>0.5</priority>"));
        assert_eq!(xml.matches("<urlset").count(), 1);
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_render_xml_empty() {
        let xml = render_xml(&[]);
        assert!(!xml.contains("<url>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_generator_entries_and_debug() {
        let config: SiteConfig = serde_yaml::from_str("version: '10.10'\n").unwrap();
        let toc = TableOfContents {
            sections: vec![crate::config::TocSection {
                title: "Home".to_string(),
                docs: vec![page("/")],
            }],
        };
        let generator = SitemapGenerator::new(config, toc, date());

        assert_eq!(generator.entries()[0].loc, "https://open.xdmod.org/10.10/");
        assert!(format!("{:?}", generator).starts_with("SitemapGenerator"));
    }
}
