//! Site configuration
//!
//! Loads the optional `themes-site.yaml` that describes where the site is
//! published and which repository hosts the theme files.

pub mod site;

pub use site::{Repository, SiteConfig, load_site_config};
