//! # Sliceplan Library
//!
//! This library validates release definitions made of package slices and
//! plans which slices to install. It is used by the `sliceplan` command-line
//! tool but can be embedded by anything that needs to reason about slices
//! without touching package archives.
//!
//! ## Quick Example
//!
//! ```
//! use sliceplan::release::{select, PathInfo, Package, Release, Slice, SliceKey};
//!
//! let mut release = Release::default();
//! for (name, essential) in [("libc6", vec![]), ("bash", vec![SliceKey::new("libc6", "libs")])] {
//!     let slice_name = if name == "libc6" { "libs" } else { "bins" };
//!     let mut package = Package {
//!         name: name.to_string(),
//!         ..Default::default()
//!     };
//!     package.slices.insert(
//!         slice_name.to_string(),
//!         Slice {
//!             package: name.to_string(),
//!             name: slice_name.to_string(),
//!             essential,
//!             contents: [(format!("/usr/share/{}", name), PathInfo::default())].into(),
//!             ..Default::default()
//!         },
//!     );
//!     release.packages.insert(name.to_string(), package);
//! }
//!
//! release.validate().unwrap();
//! let selection = select(&release, &["bash_bins".parse().unwrap()]).unwrap();
//! let order: Vec<String> = selection.slices.iter().map(|s| s.to_string()).collect();
//! assert_eq!(order, ["libc6_libs", "bash_bins"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Release (`release`)**: The in-memory model of packages, slices, the
//!   paths each slice provides, and the archives packages come from. It also
//!   holds the resolver: validation, essential ordering, prefer resolution
//!   and selection.
//! - **Loading (`config`)**: Reads a release directory (`release.yaml` plus
//!   `slices/**/*.yaml`) into the model and validates it.
//! - **Path patterns (`path`)**: Decides whether two wildcard paths may
//!   match a common file.
//! - **Errors (`error`)**: Every failure the library reports.

pub mod config;
pub mod error;
pub mod path;
pub mod release;

#[cfg(test)]
mod path_proptest;

pub use config::read_release;
pub use error::{Error, Result};
