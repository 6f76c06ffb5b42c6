//! Remote theme access
//!
//! Listing theme folders through the contents API, reading published
//! metadata, and transferring a theme to local storage or a ZIP archive.
//! All transfers are sequential: one request in flight at a time.

pub mod archive;
pub mod catalog;
pub mod install;
pub mod listing;

pub use archive::{default_zip_name, download_zip};
pub use catalog::RemoteCatalog;
pub use install::{TransferReport, check_folder, install_theme};
pub use listing::{ContentEntry, ContentSource, EntryKind, GitHubContents, RemoteFile, list_recursive};
