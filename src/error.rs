//! # Error Handling
//!
//! This module defines the centralized error type for `sliceplan`. It uses the
//! `thiserror` library to build a single `Error` enum covering every way a
//! release can fail to load, validate or select.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. Each variant carries the
//!   package, slice and path names needed to act on it, and its `Display`
//!   output is the user-facing message.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants fall into four groups:
//!
//! - Structural errors: unknown packages or slices, malformed slice keys,
//!   duplicate package definitions, undefined or clashing archives.
//! - Graph errors: essential loops and prefer loops.
//! - Conflict errors: slices disagreeing on a path, globs overlapping other
//!   paths, and broken prefer declarations.
//! - Selection errors: invalid `generate` values on selected slices.
//!
//! Whenever a message names two entities of the same kind, the caller sorts
//! them before building the variant so the text is identical on every run.
//! Essential loops list their members in the order the graph search found them.

use thiserror::Error;

/// Main error type for sliceplan operations
#[derive(Error, Debug)]
pub enum Error {
    /// A release or package definition file could not be understood.
    #[error("{path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A string that should name a slice is not of the form `package_slice`.
    #[error("invalid slice reference: {0:?}")]
    InvalidSliceKey(String),

    /// A requested slice belongs to a package the release does not define.
    #[error("slices of package {package:?} not found")]
    PackageNotFound { package: String },

    /// A requested slice does not exist in its package.
    #[error("slice {key} not found")]
    SliceNotFound { key: String },

    /// A slice lists an essential slice that does not exist.
    #[error("{slice} requires {essential}, but slice is missing")]
    MissingEssential { slice: String, essential: String },

    /// Essential dependencies form a cycle.
    #[error("essential loop detected: {}", .members.join(", "))]
    EssentialLoop { members: Vec<String> },

    /// The same package definition was found in two files.
    #[error("package {package:?} slices defined more than once: {first} and {second}")]
    DuplicatePackage {
        package: String,
        first: String,
        second: String,
    },

    /// A package pins an archive that is not defined in the release.
    #[error("{path}: package refers to undefined archive {archive:?}")]
    UndefinedArchive { path: String, archive: String },

    /// Two archives share a priority value.
    #[error("archives {old:?} and {new:?} have the same priority value of {priority}")]
    DuplicatePriority {
        old: String,
        new: String,
        priority: i32,
    },

    /// A path declares a preference for a package the release does not define.
    #[error("slice {slice} path {path} 'prefer' refers to undefined package {package:?}")]
    UndefinedPreferPackage {
        slice: String,
        path: String,
        package: String,
    },

    /// One package prefers two different packages for the same path.
    #[error("package {package:?} has conflicting prefers for {path}: {first} != {second}")]
    ConflictingPrefers {
        package: String,
        path: String,
        first: String,
        second: String,
    },

    /// Two packages prefer the same package for the same path.
    #[error("packages {first:?} and {second:?} cannot both prefer {target:?} for {path}")]
    DuplicatePrefer {
        first: String,
        second: String,
        target: String,
        path: String,
    },

    /// Following prefer declarations on a path leads back to where it started.
    #[error("package {package:?} is part of a prefer loop on {path}")]
    PreferLoop { package: String, path: String },

    /// Two packages provide a path that requires a prefer relationship, but
    /// neither prefers the other.
    #[error("package {first:?} and {second:?} conflict on {path} without prefer relationship")]
    PreferConflict {
        first: String,
        second: String,
        path: String,
    },

    /// A package prefers another package for a path the latter never provides.
    #[error("package {source_package} prefers package {target:?} which does not contain path {path}")]
    PreferMissingPath {
        source_package: String,
        target: String,
        path: String,
    },

    /// Two slices declare incompatible content for the same path.
    #[error("slices {old} and {new} conflict on {path}")]
    PathConflict {
        old: String,
        new: String,
        path: String,
    },

    /// A glob or generate path overlaps a different path of another slice.
    #[error("slices {old} and {new} conflict on {old_path} and {new_path}")]
    GlobConflict {
        old: String,
        new: String,
        old_path: String,
        new_path: String,
    },

    /// A selected slice carries an unknown `generate` value.
    #[error("slice {slice} has invalid 'generate' for path {path}: {value:?}")]
    InvalidGenerate {
        slice: String,
        path: String,
        value: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
