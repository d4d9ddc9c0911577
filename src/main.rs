use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;

use sphinx_only::{
    expand_files, LiteralResolver, ReferenceResolver, RoleRegistry, RoleValidationResult, SiteConfig,
    SitemapGenerator, Tags,
};

#[derive(Parser)]
#[command(name = "sphinx-only")]
#[command(about = "Tag-conditional roles and sitemap generation for Sphinx manuals")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sitemap.xml for the configured version
    Sitemap {
        /// Site configuration file
        #[arg(short, long, default_value = "_config.yml")]
        config: PathBuf,

        /// Directory holding <version>/toc.yml
        #[arg(long, default_value = "_data")]
        toc_dir: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "sitemap.xml")]
        output: PathBuf,

        /// Last-modified date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Render one role invocation and print its segments
    Render {
        /// Role name
        #[arg(short, long, default_value = "only")]
        role: String,

        /// Active tag (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Print segments as JSON
        #[arg(long)]
        json: bool,

        /// Role content, e.g. "<Open>See {fig-arch}"
        markup: String,
    },

    /// Expand tag-conditional roles in reST sources
    Expand {
        /// Active tag (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Site configuration whose `tags` are also enabled
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "_expanded")]
        out: PathBuf,

        /// Source files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Sitemap {
            config,
            toc_dir,
            output,
            date,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let generator = SitemapGenerator::load(&config, &toc_dir, date)
                .context("Failed to load sitemap inputs")?;
            let count = generator
                .write(&output)
                .context("Failed to write sitemap")?;
            println!("{} ({} urls)", output.display(), count);
        }
        Commands::Render {
            role,
            tags,
            json,
            markup,
        } => {
            let registry = RoleRegistry::with_builtin_roles();
            let Some(only) = registry.get(&role) else {
                bail!(
                    "Unknown role '{}' (available: {})",
                    role,
                    registry.names().join(", ")
                );
            };

            match only.validate(&markup) {
                RoleValidationResult::Warning(message) => warn!("{}", message),
                RoleValidationResult::Error(message) => bail!("{}", message),
                RoleValidationResult::Valid | RoleValidationResult::Unknown => {}
            }

            let tags: Tags = tags.into_iter().collect();
            let segments = only.segments(&markup, &tags)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&segments)?);
            } else {
                for segment in &segments {
                    let node = LiteralResolver.render_segment(segment);
                    if segment.is_reference() {
                        println!("ref: {}", node);
                    } else {
                        println!("text: {}", node);
                    }
                }
            }
        }
        Commands::Expand {
            tags,
            config,
            out,
            inputs,
        } => {
            let mut active: Tags = tags.into_iter().collect();
            if let Some(path) = config {
                let site = SiteConfig::load(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                active.extend(site.tags.iter());
            }
            info!("Active tags: {}", active);

            let registry = RoleRegistry::with_builtin_roles();
            let stats = expand_files(&inputs, &out, &registry, &active)?;
            println!(
                "Expanded {} files into {} ({} shown, {} hidden)",
                stats.files_processed,
                out.display(),
                stats.roles_shown,
                stats.roles_hidden
            );
        }
    }

    Ok(())
}
