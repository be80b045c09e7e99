//! Prefer relationships
//!
//! A path entry may say `prefer: <package>`, meaning that when several
//! packages provide the path, content from `<package>` should be used. Each
//! declaration is an edge `declaring package -> preferred package` scoped to
//! one path. Edges are not acyclic by construction, so every walk over them
//! tracks the packages it has already visited.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use super::model::Release;
use crate::error::{Error, Result};

/// All prefer edges of a release, indexed in both directions.
#[derive(Debug, Clone, Default)]
pub struct PreferIndex {
    /// `(path, package)` to the package it prefers for that path.
    prefers: BTreeMap<(String, String), String>,
    /// `(path, package)` to the package that prefers it for that path.
    preferred_by: BTreeMap<(String, String), String>,
    /// Paths that must be settled through a prefer relationship, each with
    /// one package that declared a preference there.
    enforced: BTreeMap<String, String>,
}

impl PreferIndex {
    /// Package preferred by `package` for `path`, if any.
    pub fn target(&self, path: &str, package: &str) -> Option<&str> {
        self.prefers
            .get(&(path.to_string(), package.to_string()))
            .map(String::as_str)
    }

    /// A package that declared a preference on `path`, if any did.
    pub fn enforcer(&self, path: &str) -> Option<&str> {
        self.enforced.get(path).map(String::as_str)
    }

    pub fn is_enforced(&self, path: &str) -> bool {
        self.enforced.contains_key(path)
    }

    /// Iterates `(path, preferred package, declaring package)` in path order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.preferred_by
            .iter()
            .map(|((path, target), source)| (path.as_str(), target.as_str(), source.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.prefers.is_empty()
    }

    fn insert(&mut self, path: &str, source: &str, target: &str) -> Result<()> {
        let target_key = (path.to_string(), source.to_string());
        let source_key = (path.to_string(), target.to_string());
        if let Some(existing) = self.prefers.get(&target_key) {
            if existing != target {
                let (first, second) = sort_pair(existing, target);
                return Err(Error::ConflictingPrefers {
                    package: source.to_string(),
                    path: path.to_string(),
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
            return Ok(());
        }
        if let Some(existing) = self.preferred_by.get(&source_key) {
            if existing != source {
                let (first, second) = sort_pair(existing, source);
                return Err(Error::DuplicatePrefer {
                    first: first.to_string(),
                    second: second.to_string(),
                    target: target.to_string(),
                    path: path.to_string(),
                });
            }
            return Ok(());
        }
        self.prefers.insert(target_key, target.to_string());
        self.preferred_by.insert(source_key, source.to_string());
        self.enforced
            .entry(path.to_string())
            .or_insert_with(|| source.to_string());
        Ok(())
    }
}

impl Release {
    /// Collects every prefer declaration of the release into a [`PreferIndex`].
    pub fn prefers(&self) -> Result<PreferIndex> {
        let mut index = PreferIndex::default();
        for package in self.packages.values() {
            for slice in package.slices.values() {
                for (path, info) in &slice.contents {
                    let Some(prefer) = info.prefer.as_deref() else {
                        continue;
                    };
                    if !self.packages.contains_key(prefer) {
                        return Err(Error::UndefinedPreferPackage {
                            slice: slice.to_string(),
                            path: path.clone(),
                            package: prefer.to_string(),
                        });
                    }
                    index.insert(path, &package.name, prefer)?;
                }
            }
        }
        debug!("Collected {} prefer relationships", index.prefers.len());
        Ok(index)
    }
}

/// Outcome of arbitrating a path between two packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preference {
    /// The named package wins.
    Package(String),
    /// Neither package prefers the other and the path needs no arbitration.
    Unrelated,
}

/// Decides which of two packages supplies `path`.
///
/// A package wins when it can be reached from the other by following prefer
/// edges. The answer does not depend on the argument order.
pub fn preferred_path_package(
    path: &str,
    pkg1: &str,
    pkg2: &str,
    index: &PreferIndex,
) -> Result<Preference> {
    let (pkg1, pkg2) = sort_pair(pkg1, pkg2);
    let prefer1 = find_prefer(path, pkg2, pkg1, index)?;
    let prefer2 = find_prefer(path, pkg1, pkg2, index)?;
    match (prefer1, prefer2) {
        (true, true) => Err(Error::PreferLoop {
            package: pkg1.to_string(),
            path: path.to_string(),
        }),
        (true, false) => Ok(Preference::Package(pkg1.to_string())),
        (false, true) => Ok(Preference::Package(pkg2.to_string())),
        (false, false) => match index.enforcer(path) {
            Some(sample) => {
                let conflict = if pkg1 == sample { pkg2 } else { pkg1 };
                let (first, second) = sort_pair(conflict, sample);
                Err(Error::PreferConflict {
                    first: first.to_string(),
                    second: second.to_string(),
                    path: path.to_string(),
                })
            }
            None => Ok(Preference::Unrelated),
        },
    }
}

/// Walks the prefer chain starting at `from` looking for `wanted`.
fn find_prefer(path: &str, from: &str, wanted: &str, index: &PreferIndex) -> Result<bool> {
    let mut visited = HashSet::from([from]);
    let mut current = from;
    while let Some(next) = index.target(path, current) {
        if next == wanted {
            return Ok(true);
        }
        if !visited.insert(next) {
            return Err(Error::PreferLoop {
                package: next.to_string(),
                path: path.to_string(),
            });
        }
        current = next;
    }
    Ok(false)
}

pub(crate) fn sort_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
