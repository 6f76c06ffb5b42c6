//! Static site generation
//!
//! Per-theme landing pages, the root gallery page, the sitemap, theme
//! READMEs, release stat files and screenshot optimization.

pub mod index;
pub mod page;
pub mod readme;
pub mod refresh;
pub mod screenshots;
pub mod sitemap;
pub mod stats;
pub mod template;

pub use index::{render_index_page, write_index_page};
pub use page::{PageReport, render_gallery, render_theme_page, write_theme_pages};
pub use refresh::{RefreshReport, refresh_pages};
pub use sitemap::render_sitemap;
