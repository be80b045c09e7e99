//! Release data model
//!
//! Pure data: a [`Release`] owns its packages and archives, packages own their
//! slices, and slices map filesystem paths to [`PathInfo`] entries. All maps are
//! ordered so that walking the model always visits entries in the same order.

use std::collections::BTreeMap;
use std::fmt;

use super::key::SliceKey;

/// A collection of package slices targeting one distribution version.
#[derive(Debug, Clone, Default)]
pub struct Release {
    /// Directory the release was read from; empty for releases built in memory.
    pub path: String,
    pub packages: BTreeMap<String, Package>,
    pub archives: BTreeMap<String, Archive>,
}

/// A location binary packages are obtained from.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    pub name: String,
    pub version: String,
    pub suites: Vec<String>,
    pub components: Vec<String>,
    /// Unique across the archives of a release.
    pub priority: i32,
    /// Pro tier marker, e.g. `fips`. Empty when the archive is public.
    pub pro: String,
    pub public_keys: Vec<PublicKey>,
}

/// A trusted archive key, kept as opaque configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicKey {
    pub id: String,
    pub armor: String,
}

/// A package and the slices carved out of it.
#[derive(Debug, Clone, Default)]
pub struct Package {
    pub name: String,
    /// Definition file the package was read from.
    pub path: String,
    /// Archive the package is pinned to, if any.
    pub archive: Option<String>,
    pub slices: BTreeMap<String, Slice>,
}

/// A named, partial extraction of a package.
#[derive(Debug, Clone, Default)]
pub struct Slice {
    pub package: String,
    pub name: String,
    /// Slices that must be materialized before this one.
    pub essential: Vec<SliceKey>,
    pub contents: BTreeMap<String, PathInfo>,
    pub scripts: SliceScripts,
}

impl Slice {
    pub fn key(&self) -> SliceKey {
        SliceKey::new(&self.package, &self.name)
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.package, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceScripts {
    pub mutate: String,
}

/// How a path is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PathKind {
    Dir,
    #[default]
    Copy,
    Glob,
    Text,
    Symlink,
    Generate,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathKind::Dir => "dir",
            PathKind::Copy => "copy",
            PathKind::Glob => "glob",
            PathKind::Text => "text",
            PathKind::Symlink => "symlink",
            PathKind::Generate => "generate",
        };
        f.write_str(name)
    }
}

/// When a path stops being part of the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PathUntil {
    #[default]
    None,
    /// Dropped once mutation scripts have run.
    Mutate,
}

/// What kind of content a `generate` path produces.
///
/// Unrecognized values are kept as written and only rejected when a slice
/// carrying them is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum GenerateKind {
    #[default]
    None,
    Manifest,
    Unknown(String),
}

impl GenerateKind {
    pub fn from_value(value: &str) -> Self {
        match value {
            "" => GenerateKind::None,
            "manifest" => GenerateKind::Manifest,
            other => GenerateKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            GenerateKind::None => "",
            GenerateKind::Manifest => "manifest",
            GenerateKind::Unknown(value) => value,
        }
    }
}

/// Describes how one filesystem path is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathInfo {
    pub kind: PathKind,
    /// Copy source, text body or symlink target, depending on `kind`.
    pub info: String,
    pub mode: u32,
    pub mutable: bool,
    pub until: PathUntil,
    pub arch: Vec<String>,
    pub generate: GenerateKind,
    /// Package whose content wins for this path.
    pub prefer: Option<String>,
}

impl PathInfo {
    /// Returns whether both entries produce the same file or directory.
    ///
    /// `prefer` and `arch` do not change the resulting entry and are ignored.
    /// `mutable` must match since it states the content is not fixed upfront.
    pub fn same_content(&self, other: &PathInfo) -> bool {
        self.kind == other.kind
            && self.info == other.info
            && self.mode == other.mode
            && self.mutable == other.mutable
            && self.generate == other.generate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(body: &str) -> PathInfo {
        PathInfo {
            kind: PathKind::Text,
            info: body.to_string(),
            mode: 0o644,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_content_is_reflexive_and_symmetric() {
        let a = text("hello");
        let b = text("hello");
        let c = text("bye");
        assert!(a.same_content(&a));
        assert!(a.same_content(&b) && b.same_content(&a));
        assert!(!a.same_content(&c) && !c.same_content(&a));
    }

    #[test]
    fn test_same_content_ignores_prefer_and_arch() {
        let a = text("hello");
        let b = PathInfo {
            prefer: Some("other".to_string()),
            arch: vec!["amd64".to_string()],
            ..text("hello")
        };
        assert!(a.same_content(&b));
    }

    #[test]
    fn test_same_content_compares_mode_mutable_and_generate() {
        let a = text("hello");
        assert!(!a.same_content(&PathInfo { mode: 0o755, ..text("hello") }));
        assert!(!a.same_content(&PathInfo { mutable: true, ..text("hello") }));
        assert!(!a.same_content(&PathInfo {
            generate: GenerateKind::Manifest,
            ..text("hello")
        }));
    }

    #[test]
    fn test_generate_kind_from_value() {
        assert_eq!(GenerateKind::from_value(""), GenerateKind::None);
        assert_eq!(GenerateKind::from_value("manifest"), GenerateKind::Manifest);
        let unknown = GenerateKind::from_value("foo");
        assert_eq!(unknown, GenerateKind::Unknown("foo".to_string()));
        assert_eq!(unknown.as_str(), "foo");
    }

    #[test]
    fn test_slice_display_and_key() {
        let slice = Slice {
            package: "libc6".to_string(),
            name: "libs".to_string(),
            ..Default::default()
        };
        assert_eq!(slice.to_string(), "libc6_libs");
        assert_eq!(slice.key(), SliceKey::new("libc6", "libs"));
    }
}
