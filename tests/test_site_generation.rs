mod common;

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use common::{SiteFixture, assert_success, png_bytes};
use proptest::prelude::*;
use y1themes::config::SiteConfig;
use y1themes::site::{render_sitemap, write_theme_pages};
use y1themes::theme::{Manifest, SyncOptions, discover_themes};

fn snapshot(site: &SiteFixture, files: &[&str]) -> Vec<String> {
    files.iter().map(|f| site.read(f)).collect()
}

// ============================================================================
// build command
// ============================================================================

#[test]
fn build_writes_manifest_pages_and_sitemap() {
    let site = SiteFixture::new();
    site.theme(
        "XFiles",
        Some(r#"{"theme_info": {"title": "The X Files", "author": "Mulder"}, "itemConfig": {"background": "1.png"}}"#),
    )
    .theme("Retro", None);
    site.write("XFiles/1.png", png_bytes(2, 2));
    site.write("XFiles/1_YS.png", png_bytes(2, 2));
    site.write("XFiles/screenshot.png", png_bytes(2, 2));
    site.write("docs/cover.png", png_bytes(2, 2));

    let output = site.run(&["build", "--index"]);
    assert_success(&output, "build");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Generated index.html for XFiles with 2 images"),
        "stderr: {stderr}"
    );

    let page = site.read("XFiles/index.html");
    assert!(page.contains("The X Files"));
    assert!(page.contains("const CAROUSEL_IMAGES = [\"1_YS.png\"];"));
    assert!(page.contains("src=\"screenshot.png\""));
    assert!(!page.contains("{{"));

    assert!(site.path("Retro/index.html").is_file());
    assert!(!site.path("docs/index.html").exists(), "excluded dirs are not themes");

    let index = site.read("index.html");
    assert!(index.contains("href=\"XFiles/\""));
    assert!(index.contains("href=\"Retro/\""));

    let sitemap = site.read("sitemap.xml");
    assert_eq!(sitemap.matches("<url>").count(), 3);
    assert!(sitemap.contains("<loc>https://themes.innioasis.app/XFiles</loc>"));
}

#[test]
fn build_is_byte_identical_on_rerun() {
    let site = SiteFixture::new();
    site.theme("XFiles", Some(r#"{"theme_info": {"author": "Mulder"}}"#))
        .theme("Neon Dreams", None)
        .theme("Retro", None);

    let files = [
        "themes.json",
        "index.html",
        "XFiles/index.html",
        "Neon Dreams/index.html",
        "Retro/index.html",
    ];

    assert_success(&site.run(&["build", "--index"]), "first build");
    let first = snapshot(&site, &files);
    assert_success(&site.run(&["build", "--index"]), "second build");
    assert_eq!(snapshot(&site, &files), first);

    assert!(site.read("sitemap.xml").contains("/Neon%20Dreams</loc>"));
}

#[test]
fn custom_site_config_flows_into_pages() {
    let site = SiteFixture::new();
    site.theme("XFiles", None);
    site.write(
        "themes-site.yaml",
        "site_url: https://example.org/themes\ntitle: Test Gallery\nrepository:\n  owner: someone\n  name: Themes\n  branch: dev\n",
    );

    assert_success(&site.run(&["build"]), "build with config");
    let page = site.read("XFiles/index.html");
    assert!(page.contains("https://example.org/themes/XFiles"));
    assert!(page.contains("Test Gallery"));
    assert!(page.contains("/repos/someone/Themes/contents/"));
    assert!(page.contains("const CONTENTS_REF = \"dev\";"));
}

#[test]
fn screenshots_dry_run_leaves_files() {
    let site = SiteFixture::new();
    site.theme("XFiles", None);
    site.write("XFiles/screenshot.png", png_bytes(64, 64));
    site.write(
        "themes.json",
        r#"{"themes": [{"folder": "XFiles", "screenshot": "XFiles/screenshot.png"}]}"#,
    );
    let before = site.read("themes.json");

    assert_success(&site.run(&["screenshots", "--dry-run"]), "screenshots --dry-run");
    assert!(site.path("XFiles/screenshot.png").is_file());
    assert!(!site.path("XFiles/screenshot.jpg").exists());
    assert_eq!(site.read("themes.json"), before);
}

// ============================================================================
// Generation properties
// ============================================================================

fn build_tree(root: &Path, covered: &BTreeSet<String>, bare: &BTreeSet<String>) {
    for folder in covered {
        std::fs::create_dir_all(root.join(folder)).unwrap();
        std::fs::write(root.join(folder).join("cover.png"), b"png").unwrap();
    }
    for folder in bare.difference(covered) {
        std::fs::create_dir_all(root.join(folder)).unwrap();
    }
}

fn folder_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,11}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn sync_lists_every_covered_folder_once(
        covered in proptest::collection::btree_set(folder_name(), 0..8),
        bare in proptest::collection::btree_set(folder_name(), 0..4),
        stale in proptest::collection::btree_set(folder_name(), 0..3),
    ) {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path(), &covered, &bare);

        let mut manifest = Manifest::default();
        for folder in &stale {
            manifest.themes.push(y1themes::theme::ThemeEntry::new(folder.as_str()));
        }
        let folders = discover_themes(dir.path(), |_| false).unwrap();
        manifest.sync(dir.path(), &folders, SyncOptions::default());

        let listed: Vec<&str> = manifest.folders();
        let unique: BTreeSet<&str> = listed.iter().copied().collect();
        prop_assert_eq!(unique.len(), listed.len());
        for folder in &covered {
            prop_assert!(unique.contains(folder.as_str()));
        }
        for folder in &listed {
            prop_assert!(dir.path().join(folder).is_dir());
        }

        let rerun_json = {
            let mut again = Manifest::from_json(&manifest.to_json().unwrap(), Path::new("themes.json")).unwrap();
            prop_assert!(again.sync(dir.path(), &folders, SyncOptions::default()).is_unchanged());
            again.to_json().unwrap()
        };
        prop_assert_eq!(rerun_json, manifest.to_json().unwrap());
    }

    #[test]
    fn sitemap_has_one_url_per_theme_plus_root(
        covered in proptest::collection::btree_set(folder_name(), 0..8),
    ) {
        let dir = tempfile::tempdir().unwrap();
        build_tree(dir.path(), &covered, &BTreeSet::new());

        let mut manifest = Manifest::default();
        let folders = discover_themes(dir.path(), |_| false).unwrap();
        manifest.sync(dir.path(), &folders, SyncOptions::default());

        let site = SiteConfig::default();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let xml = render_sitemap(&site.site_url, manifest.folders(), date).unwrap();
        prop_assert_eq!(xml.matches("<url>").count(), covered.len() + 1);

        let report = write_theme_pages(dir.path(), &manifest, &site).unwrap();
        prop_assert_eq!(report.written.len(), covered.len());
        prop_assert!(report.failed.is_empty());
    }
}
