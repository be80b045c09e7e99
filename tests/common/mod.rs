//! Shared test utilities for integration and E2E tests.
//!
//! This module provides release snippets and a fixture that lays out a
//! release directory in a temporary location.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ReleaseFixture::new()
//!         .with_release(releases::SINGLE_ARCHIVE)
//!         .with_package("mypkg", "package: mypkg\n");
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::releases;
    pub use super::ReleaseFixture;
}

/// Common `release.yaml` snippets for testing.
#[allow(dead_code)]
pub mod releases {
    /// One archive, priority left to its default.
    pub const SINGLE_ARCHIVE: &str = r#"
format: v1
archives:
  ubuntu:
    version: "22.04"
    suites: [jammy, jammy-security, jammy-updates]
    components: [main, universe]
    public-keys: [ubuntu-archive-key]
public-keys:
  ubuntu-archive-key:
    id: 871920D1991BC93C
    armor: |
      -----BEGIN PGP PUBLIC KEY BLOCK-----
      mQINBFufwdoBEADv/Gxytx/LcSXYuM0MwKojbBye81s0G1nEx+lz6VAUpIUZnbkq
      -----END PGP PUBLIC KEY BLOCK-----
"#;

    /// Two archives with distinct priorities.
    pub const TWO_ARCHIVES: &str = r#"
format: v1
archives:
  ubuntu:
    version: "22.04"
    suites: [jammy]
    components: [main]
    priority: 10
    public-keys: [ubuntu-archive-key]
  fips:
    version: "22.04"
    suites: [jammy]
    components: [main]
    pro: fips
    priority: 20
    public-keys: [ubuntu-archive-key]
public-keys:
  ubuntu-archive-key:
    id: 871920D1991BC93C
    armor: key
"#;

    /// Not YAML at all.
    pub const INVALID_YAML: &str = "format: [v1";
}

/// A temporary release directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = ReleaseFixture::new()
///     .with_release(releases::SINGLE_ARCHIVE)
///     .with_package("libc6", LIBC6);
///
/// let release = sliceplan::read_release(fixture.path()).unwrap();
/// ```
pub struct ReleaseFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl ReleaseFixture {
    /// Create a fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `release.yaml` with the given content.
    pub fn with_release(self, content: &str) -> Self {
        self.with_file("release.yaml", content)
    }

    /// Write `slices/<name>.yaml` with the given content.
    pub fn with_package(self, name: &str, content: &str) -> Self {
        let path = format!("slices/{}.yaml", name);
        self.with_file(&path, content)
    }

    /// Write any file relative to the release directory.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Path to the release directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for ReleaseFixture {
    fn default() -> Self {
        Self::new()
    }
}
