//! Shared integration-test harness: builds theme site trees in a temporary
//! directory and runs the `y1themes` binary against them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

use tempfile::TempDir;

/// Encodes a `width` x `height` PNG filled with a color pattern.
#[allow(clippy::missing_panics_doc, clippy::cast_possible_truncation)]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7) as u8, (y * 13) as u8, ((x ^ y) * 29) as u8])
    });
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("failed to encode PNG");
    buf.into_inner()
}

/// A theme site rooted in a temporary directory.
///
/// The directory is removed on drop.
pub struct SiteFixture {
    dir: TempDir,
}

impl SiteFixture {
    /// Creates an empty site.
    #[allow(clippy::missing_panics_doc)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// Site root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the site.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Writes `relative` with `content`, creating parent directories.
    #[allow(clippy::missing_panics_doc)]
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, content).expect("failed to write fixture file");
        self
    }

    /// Adds a theme folder with a cover image and optional `config.json`.
    pub fn theme(&self, folder: &str, config: Option<&str>) -> &Self {
        self.write(&format!("{folder}/cover.png"), png_bytes(4, 4));
        if let Some(config) = config {
            self.write(&format!("{folder}/config.json"), config);
        }
        self
    }

    /// Reads `relative` as UTF-8.
    #[allow(clippy::missing_panics_doc)]
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
    }

    /// Runs `y1themes --root <site> <args>`.
    pub fn run(&self, args: &[&str]) -> Output {
        Y1ThemesProcess::run_in(self.root(), args)
    }
}

/// Runs the `y1themes` binary as a child process.
pub struct Y1ThemesProcess;

impl Y1ThemesProcess {
    /// Runs a one-shot command and returns its output.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_y1themes"))
            .args(args)
            .env_remove("Y1THEMES_ROOT")
            .env_remove("Y1THEMES_CONFIG")
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to run y1themes")
    }

    /// Starts a command against the site at `root` without waiting for it.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_in(root: &Path, args: &[&str]) -> Child {
        Command::new(env!("CARGO_BIN_EXE_y1themes"))
            .arg("--root")
            .arg(root)
            .args(args)
            .env_remove("Y1THEMES_ROOT")
            .env_remove("Y1THEMES_CONFIG")
            .env("NO_COLOR", "1")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to start y1themes")
    }

    /// Runs a command against the site at `root`.
    #[allow(clippy::missing_panics_doc)]
    pub fn run_in(root: &Path, args: &[&str]) -> Output {
        let mut full = vec!["--root", root.to_str().expect("non-UTF-8 temp path")];
        full.extend_from_slice(args);
        Self::spawn_command(&full)
    }
}

/// Asserts the command succeeded, showing stderr otherwise.
pub fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{what} should exit 0, got {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}
