//! Release-wide validation
//!
//! Conflicts are checked without looking at package archives. Content taken
//! from the same package is always the same, so slices of one package never
//! conflict with each other. Across packages, two declarations of a path are
//! only compatible when they produce the same entry and neither is extracted
//! from its package, unless a prefer relationship picks the winner. Glob and
//! generate paths also conflict with any other path they would match.

use std::collections::BTreeMap;

use log::debug;

use super::key::SliceKey;
use super::model::{Archive, PathKind, Release, Slice};
use super::order::order;
use super::prefer::{preferred_path_package, PreferIndex, Preference};
use crate::error::{Error, Result};
use crate::path::glob_overlap;

impl Release {
    /// Checks the release as a whole, stopping at the first problem found.
    pub fn validate(&self) -> Result<()> {
        let prefers = self.prefers()?;
        let paths = self.check_path_conflicts(&prefers)?;
        check_prefer_sources(&prefers, &paths)?;
        check_glob_conflicts(&paths)?;

        // Every slice at once, so loops are found even if nobody selects them.
        let keys: Vec<SliceKey> = self
            .packages
            .values()
            .flat_map(|pkg| pkg.slices.values().map(Slice::key))
            .collect();
        order(&self.packages, &keys)?;

        self.check_archives()?;
        debug!(
            "Validated {} packages and {} archives",
            self.packages.len(),
            self.archives.len()
        );
        Ok(())
    }

    /// Groups slices by the paths they declare, failing on incompatible pairs.
    fn check_path_conflicts<'a>(
        &'a self,
        prefers: &PreferIndex,
    ) -> Result<BTreeMap<&'a str, Vec<&'a Slice>>> {
        let mut paths: BTreeMap<&str, Vec<&Slice>> = BTreeMap::new();
        for package in self.packages.values() {
            for new in package.slices.values() {
                for (new_path, new_info) in &new.contents {
                    let slices = paths.entry(new_path.as_str()).or_default();
                    for old in slices.iter() {
                        if old.package == new.package {
                            continue;
                        }
                        match preferred_path_package(new_path, &new.package, &old.package, prefers)? {
                            Preference::Package(_) => continue,
                            Preference::Unrelated => {}
                        }
                        let old_info = &old.contents[new_path];
                        let extracted = matches!(new_info.kind, PathKind::Copy | PathKind::Glob)
                            || matches!(old_info.kind, PathKind::Copy | PathKind::Glob);
                        if !new_info.same_content(old_info) || extracted {
                            let (old, new) = sort_slices(old, new);
                            return Err(Error::PathConflict {
                                old: old.to_string(),
                                new: new.to_string(),
                                path: new_path.clone(),
                            });
                        }
                    }
                    slices.push(new);
                }
            }
        }
        Ok(paths)
    }

    fn check_archives(&self) -> Result<()> {
        check_priorities(self.archives.values())?;

        for package in self.packages.values() {
            let Some(archive) = &package.archive else {
                continue;
            };
            if !self.archives.contains_key(archive) {
                return Err(Error::UndefinedArchive {
                    path: package.path.clone(),
                    archive: archive.clone(),
                });
            }
        }
        Ok(())
    }
}

/// No two archives may share a priority value.
fn check_priorities<'a>(archives: impl IntoIterator<Item = &'a Archive>) -> Result<()> {
    let mut priorities: BTreeMap<i32, &str> = BTreeMap::new();
    for archive in archives {
        if let Some(old) = priorities.insert(archive.priority, &archive.name) {
            let (old, new) = sort_pair_owned(old, &archive.name);
            return Err(Error::DuplicatePriority {
                old,
                new,
                priority: archive.priority,
            });
        }
    }
    Ok(())
}

/// Every prefer edge must point at a package that provides the path.
fn check_prefer_sources(prefers: &PreferIndex, paths: &BTreeMap<&str, Vec<&Slice>>) -> Result<()> {
    for (path, target, source) in prefers.edges() {
        let provided = paths
            .get(path)
            .is_some_and(|slices| slices.iter().any(|s| s.package == target));
        if !provided {
            return Err(Error::PreferMissingPath {
                source_package: source.to_string(),
                target: target.to_string(),
                path: path.to_string(),
            });
        }
    }
    Ok(())
}

/// Glob and generate paths may not match a different path of another slice.
fn check_glob_conflicts(paths: &BTreeMap<&str, Vec<&Slice>>) -> Result<()> {
    for (&old_path, old_slices) in paths {
        for old in old_slices {
            let old_kind = old.contents[old_path].kind;
            if !matches!(old_kind, PathKind::Glob | PathKind::Generate) {
                continue;
            }
            for (&new_path, new_slices) in paths {
                if new_path == old_path {
                    continue;
                }
                for new in new_slices {
                    let new_kind = new.contents[new_path].kind;
                    if old_kind == PathKind::Glob
                        && matches!(new_kind, PathKind::Glob | PathKind::Copy)
                        && new.package == old.package
                    {
                        continue;
                    }
                    if glob_overlap(new_path, old_path) {
                        let (mut old, mut new) = (*old, *new);
                        let (mut old_path, mut new_path) = (old_path, new_path);
                        if (&old.package, &old.name, old_path) > (&new.package, &new.name, new_path) {
                            std::mem::swap(&mut old, &mut new);
                            std::mem::swap(&mut old_path, &mut new_path);
                        }
                        return Err(Error::GlobConflict {
                            old: old.to_string(),
                            new: new.to_string(),
                            old_path: old_path.to_string(),
                            new_path: new_path.to_string(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Orders two slices by package, then slice name.
fn sort_slices<'a>(a: &'a Slice, b: &'a Slice) -> (&'a Slice, &'a Slice) {
    if (&a.package, &a.name) <= (&b.package, &b.name) {
        (a, b)
    } else {
        (b, a)
    }
}

fn sort_pair_owned(a: &str, b: &str) -> (String, String) {
    let (a, b) = super::prefer::sort_pair(a, b);
    (a.to_string(), b.to_string())
}
