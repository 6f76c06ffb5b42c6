//! CLI argument definitions
//!
//! All Clap derive structs for `y1themes` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::preview::DEFAULT_BIND;
use crate::site::screenshots::DEFAULT_QUALITY;

// ============================================================================
// Root CLI
// ============================================================================

/// Build, check and publish the Innioasis Y1 theme gallery.
#[derive(Parser, Debug)]
#[command(name = "y1themes", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "Y1THEMES_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "Y1THEMES_LOG_FORMAT")]
    pub log_format: LogFormatChoice,

    /// Site root containing the theme folders and the manifest.
    #[arg(long, default_value = ".", global = true, env = "Y1THEMES_ROOT")]
    pub root: PathBuf,

    /// Site configuration file (default: `<root>/themes-site.yaml` when present).
    #[arg(long, global = true, env = "Y1THEMES_CONFIG")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Maintain the shared theme manifest.
    Manifest(ManifestCommand),

    /// Generate or refresh theme pages.
    Pages(PagesCommand),

    /// Write the XML sitemap.
    Sitemap(SitemapArgs),

    /// Rewrite theme README files.
    Readmes(ReadmesArgs),

    /// Create release download-tracking files.
    Stats(StatsArgs),

    /// Convert screenshot PNGs to JPEG.
    Screenshots(ScreenshotsArgs),

    /// Check the manifest and theme folders for problems.
    Validate(ValidateArgs),

    /// Show a theme's resolved details.
    Info(InfoArgs),

    /// Install a published theme into a local Themes folder.
    Install(InstallArgs),

    /// Download a published theme as a ZIP.
    Download(DownloadArgs),

    /// Preview the site locally.
    Serve(ServeArgs),

    /// Sync the manifest, generate pages and write the sitemap.
    Build(BuildArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Manifest Command
// ============================================================================

/// Manifest commands.
#[derive(Args, Debug)]
pub struct ManifestCommand {
    /// Manifest subcommand.
    #[command(subcommand)]
    pub subcommand: ManifestSubcommand,
}

/// Manifest subcommands.
#[derive(Subcommand, Debug)]
pub enum ManifestSubcommand {
    /// Add theme folders with a cover image and drop stale entries.
    Sync(ManifestSyncArgs),

    /// List manifest themes with resolved details.
    List(ManifestListArgs),
}

/// Arguments for `manifest sync`.
#[derive(Args, Debug)]
pub struct ManifestSyncArgs {
    /// Keep entries whose folder no longer exists.
    #[arg(long)]
    pub keep_missing: bool,

    /// Report changes without writing; exit non-zero if any.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for `manifest list`.
#[derive(Args, Debug)]
pub struct ManifestListArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Pages Command
// ============================================================================

/// Page commands.
#[derive(Args, Debug)]
pub struct PagesCommand {
    /// Pages subcommand.
    #[command(subcommand)]
    pub subcommand: PagesSubcommand,
}

/// Page subcommands.
#[derive(Subcommand, Debug)]
pub enum PagesSubcommand {
    /// Write `index.html` for every manifest theme.
    Generate(PagesGenerateArgs),

    /// Copy the template theme's page over every other theme page.
    Refresh(PagesRefreshArgs),
}

/// Arguments for `pages generate`.
#[derive(Args, Debug)]
pub struct PagesGenerateArgs {
    /// Also write the root gallery page.
    #[arg(long)]
    pub index: bool,
}

/// Arguments for `pages refresh`.
#[derive(Args, Debug)]
pub struct PagesRefreshArgs {
    /// Template theme folder (default from site config).
    #[arg(long)]
    pub template: Option<String>,
}

// ============================================================================
// Site Artifacts
// ============================================================================

/// Arguments for `sitemap`.
#[derive(Args, Debug)]
pub struct SitemapArgs {
    /// Output path (default: `<root>/sitemap.xml`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `readmes`.
#[derive(Args, Debug)]
pub struct ReadmesArgs {
    /// Template theme folder (default from site config).
    #[arg(long)]
    pub template: Option<String>,

    /// Create a README in folders that have none.
    #[arg(long)]
    pub create: bool,
}

/// Arguments for `stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Directory to write the stat files to.
    #[arg(short, long, default_value = "theme_stats")]
    pub output: PathBuf,
}

/// Arguments for `screenshots`.
#[derive(Args, Debug)]
pub struct ScreenshotsArgs {
    /// JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Report what would change without touching files.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Theme Commands
// ============================================================================

/// Arguments for `info`.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Theme folder name.
    pub folder: String,

    /// Resolve from the published site instead of the local checkout.
    #[arg(long)]
    pub remote: bool,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `install`.
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Theme folder name.
    pub folder: String,

    /// Themes directory on the device.
    #[arg(short, long)]
    pub dest: PathBuf,
}

/// Arguments for `download`.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Theme folder name.
    pub folder: String,

    /// Output path (default: `<folder>.zip`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address, `[host:]port`.
    #[arg(long, default_value = DEFAULT_BIND, env = "Y1THEMES_BIND")]
    pub bind: String,
}

/// Arguments for `build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Keep manifest entries whose folder no longer exists.
    #[arg(long)]
    pub keep_missing: bool,

    /// Also write the root gallery page.
    #[arg(long)]
    pub index: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatChoice {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
