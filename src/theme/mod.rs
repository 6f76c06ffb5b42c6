//! Theme data model
//!
//! The shared manifest (`themes.json`), per-theme `config.json`, folder
//! scanning by naming convention, and the override chain that resolves a
//! theme's display details.

pub mod config;
pub mod manifest;
pub mod resolve;
pub mod scan;

pub use config::{ThemeConfig, ThemeInfo};
pub use manifest::{Manifest, SyncOptions, SyncReport, ThemeEntry};
pub use resolve::{ThemeDetails, resolve_details, suggest_folder};
pub use scan::{ThemeFolder, discover_themes, theme_folders_with};
