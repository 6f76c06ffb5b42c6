//! `y1themes` - site tooling for the Innioasis Y1 theme gallery
//!
//! This library keeps the shared theme manifest in sync with the theme
//! folders, generates the static gallery pages, and installs or packages
//! published themes for local use.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod preview;
pub mod remote;
pub mod site;
pub mod theme;
pub mod validate;
