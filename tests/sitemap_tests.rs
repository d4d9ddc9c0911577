//! Integration tests for sitemap generation from configuration files.

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

use sphinx_only::{SitemapError, SitemapGenerator};

fn write_site(root: &std::path::Path, toc: &str) {
    fs::write(
        root.join("_config.yml"),
        "version: '10.5'\nurl: https://open.xdmod.org/\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("_data/10.5")).unwrap();
    fs::write(root.join("_data/10.5/toc.yml"), toc).unwrap();
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

#[test]
fn test_generate_sitemap_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_site(
        root,
        r#"
- title: Overview
  docs:
    - title: Home
      url: /
    - title: Install
      url: /install.html
- title: Links
  docs:
    - title: Source
      url: https://github.com/ubccr/xdmod
"#,
    );

    let generator = SitemapGenerator::load(&root.join("_config.yml"), &root.join("_data"), date())
        .unwrap();
    let output = root.join("sitemap.xml");
    let count = generator.write(&output).unwrap();
    assert_eq!(count, 2);

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<loc>https://open.xdmod.org/10.5/</loc>"));
    assert!(xml.contains("<loc>https://open.xdmod.org/10.5/install.html</loc>"));
    assert!(!xml.contains("github.com"));
    assert_eq!(xml.matches("<lastmod>2024-05-17</lastmod>").count(), 2);
    assert_eq!(xml.matches("<priority>1.0</priority>").count(), 1);
    assert_eq!(xml.matches("<priority>0.5</priority>").count(), 1);
}

#[test]
fn test_missing_url_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_site(root, "- title: Broken\n  docs:\n    - title: Home\n");

    let result = SitemapGenerator::load(&root.join("_config.yml"), &root.join("_data"), date());
    assert!(matches!(result, Err(SitemapError::Parse { .. })));
}

#[test]
fn test_missing_toc_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("_config.yml"), "version: '11.0'\n").unwrap();

    let result = SitemapGenerator::load(&root.join("_config.yml"), &root.join("_data"), date());
    assert!(matches!(result, Err(SitemapError::Read { .. })));
}

#[test]
fn test_empty_version_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("_config.yml"), "version: ''\n").unwrap();

    let result = SitemapGenerator::load(&root.join("_config.yml"), &root.join("_data"), date());
    assert!(matches!(result, Err(SitemapError::EmptyVersion)));
}

#[test]
fn test_unquoted_float_version_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("_config.yml"), "version: 10.10\n").unwrap();

    let result = SitemapGenerator::load(&root.join("_config.yml"), &root.join("_data"), date());
    assert!(matches!(result, Err(SitemapError::Parse { .. })));
}
