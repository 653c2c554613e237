#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch home directory with its own database file.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        TestEnv {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("journal").join("fieldnotes.db")
    }

    /// Creates a `Command` for the `fieldnotes` binary with a clean,
    /// non-interactive environment pointing at this scratch directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("fieldnotes").expect("fieldnotes binary not built");
        cmd.env_clear();
        if let Ok(path) = std::env::var("PATH") {
            cmd.env("PATH", path);
        }
        cmd.env("HOME", self.path())
            .env("FIELDNOTES_DB", self.db_path())
            .env("FIELDNOTES_UTC_OFFSET", "-05:00")
            .env("RUST_LOG", "warn")
            .current_dir(self.path());
        cmd
    }

    /// Records an entry through the CLI and returns its id.
    pub fn add(&self, args: &[&str]) -> String {
        let output = self
            .command()
            .arg("add")
            .args(args)
            .output()
            .expect("failed to run fieldnotes add");
        assert!(
            output.status.success(),
            "add failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8(output.stdout).expect("stdout not utf-8");
        stdout
            .trim()
            .strip_prefix("Saved entry ")
            .expect("unexpected add output")
            .split_whitespace()
            .next()
            .expect("missing entry id")
            .to_string()
    }
}
