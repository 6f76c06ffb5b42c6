//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod build;
pub mod completions;
pub mod download;
pub mod info;
pub mod install;
pub mod manifest;
pub mod pages;
pub mod readmes;
pub mod screenshots;
pub mod serve;
pub mod sitemap;
pub mod stats;
pub mod validate;
pub mod version;

use std::fmt::Display;
use std::path::PathBuf;

use crate::cli::args::{Cli, Commands, ManifestSubcommand, PagesSubcommand};
use crate::config::{SiteConfig, load_site_config};
use crate::error::Y1ThemesError;
use crate::theme::scan::{ThemeFolder, discover_themes};

/// Site root and configuration shared by every site command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Site root directory.
    pub root: PathBuf,
    /// Loaded site configuration.
    pub site: SiteConfig,
    /// Suppress status lines.
    pub quiet: bool,
}

impl Context {
    /// Resolves the site root and loads its configuration.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the root is not a directory, or a config
    /// error if the site configuration cannot be loaded.
    pub fn load(cli: &Cli) -> Result<Self, Y1ThemesError> {
        if !cli.root.is_dir() {
            return Err(Y1ThemesError::Usage(format!(
                "site root {} is not a directory",
                cli.root.display()
            )));
        }
        let site = load_site_config(&cli.root, cli.config.as_deref())?;
        tracing::debug!(root = %cli.root.display(), site_url = %site.site_url, "site context loaded");
        Ok(Self {
            root: cli.root.clone(),
            site,
            quiet: cli.quiet,
        })
    }

    /// Path of the shared manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.site.manifest)
    }

    /// Candidate theme folders under the root.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the root cannot be listed.
    pub fn theme_folders(&self) -> Result<Vec<ThemeFolder>, Y1ThemesError> {
        Ok(discover_themes(&self.root, |n| self.site.is_excluded(n))?)
    }

    /// Prints a status line to stderr unless `--quiet`.
    pub fn status(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }
}

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), Y1ThemesError> {
    match &cli.command {
        Commands::Completions(args) => {
            completions::run(args);
            return Ok(());
        }
        Commands::Version(args) => {
            version::run(args);
            return Ok(());
        }
        _ => {}
    }

    let ctx = Context::load(&cli)?;
    match cli.command {
        Commands::Manifest(cmd) => match cmd.subcommand {
            ManifestSubcommand::Sync(args) => manifest::sync(&ctx, &args),
            ManifestSubcommand::List(args) => manifest::list(&ctx, &args),
        },
        Commands::Pages(cmd) => match cmd.subcommand {
            PagesSubcommand::Generate(args) => pages::generate(&ctx, &args),
            PagesSubcommand::Refresh(args) => pages::refresh(&ctx, &args),
        },
        Commands::Sitemap(args) => sitemap::run(&ctx, &args),
        Commands::Readmes(args) => readmes::run(&ctx, &args),
        Commands::Stats(args) => stats::run(&ctx, &args),
        Commands::Screenshots(args) => screenshots::run(&ctx, &args),
        Commands::Validate(args) => validate::run(&ctx, &args),
        Commands::Info(args) => info::run(&ctx, &args).await,
        Commands::Install(args) => install::run(&ctx, &args).await,
        Commands::Download(args) => download::run(&ctx, &args).await,
        Commands::Serve(args) => serve::run(&ctx, &args).await,
        Commands::Build(args) => build::run(&ctx, &args),
        Commands::Completions(_) | Commands::Version(_) => Ok(()),
    }
}
