//! Isolated test environment for CLI tests.

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temp directory used as the spanlens data directory.
///
/// # Example
/// ```no_run
/// use spanlens_testing::TestWorld;
///
/// let world = TestWorld::new();
/// let path = world.write_file("sessions.jsonl", "{\"spans\": []}\n").unwrap();
/// world.command().arg("compare").arg(&path).assert().success();
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file relative to the world root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read_file(&self, relative: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path(relative))?)
    }

    /// A `spanlens` command rooted at this world, with logging and colors quiet.
    #[allow(deprecated)]
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("spanlens").expect("spanlens binary not built");
        cmd.current_dir(self.root())
            .arg("--data-dir")
            .arg(self.root())
            .env_remove("SPANLENS_PATH")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}
