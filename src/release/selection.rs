//! Slice selection
//!
//! A [`Selection`] is the plan for a set of requested slices: the slices in
//! the order they must be materialized, essentials first. It is still an
//! abstract proposal, since nothing has been read from the package archives
//! yet, so a selected path may still turn out to be missing.

use std::collections::BTreeMap;

use log::{debug, info};

use super::key::SliceKey;
use super::model::{GenerateKind, Package, Release, Slice};
use super::order::order;
use super::prefer::{preferred_path_package, Preference};
use crate::error::{Error, Result};

/// Ordered slices chosen from a release.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub release: &'a Release,
    pub slices: Vec<&'a Slice>,
}

impl<'a> Selection<'a> {
    /// Maps each selected path that takes part in a prefer relationship to
    /// the package it must be extracted from. Other paths are absent.
    pub fn prefers(&self) -> Result<BTreeMap<String, &'a Package>> {
        let release = self.release;
        let index = release.prefers()?;
        let mut winners: BTreeMap<String, &'a Package> = BTreeMap::new();
        if index.is_empty() {
            return Ok(winners);
        }

        for slice in &self.slices {
            let Some(package) = release.packages.get(&slice.package) else {
                continue;
            };
            for path in slice.contents.keys() {
                if !index.is_enforced(path) {
                    continue;
                }
                let Some(&old) = winners.get(path) else {
                    winners.insert(path.clone(), package);
                    continue;
                };
                if old.name == package.name {
                    continue;
                }
                match preferred_path_package(path, &old.name, &package.name, &index)? {
                    Preference::Package(name) => {
                        if let Some(preferred) = release.packages.get(&name) {
                            winners.insert(path.clone(), preferred);
                        }
                    }
                    // Enforced paths always resolve or fail above.
                    Preference::Unrelated => {}
                }
            }
        }
        debug!("Resolved prefer winners for {} paths", winners.len());
        Ok(winners)
    }
}

/// Builds the selection for `keys`, pulling in everything they require.
pub fn select<'a>(release: &'a Release, keys: &[SliceKey]) -> Result<Selection<'a>> {
    info!("Selecting slices...");

    let sorted = order(&release.packages, keys)?;
    let mut slices = Vec::with_capacity(sorted.len());
    for key in &sorted {
        let slice = release
            .packages
            .get(&key.package)
            .and_then(|pkg| pkg.slices.get(&key.slice))
            .ok_or_else(|| Error::SliceNotFound {
                key: key.to_string(),
            })?;
        slices.push(slice);
    }

    // An unknown generate value only matters once its slice is selected.
    for slice in &slices {
        for (path, info) in &slice.contents {
            match &info.generate {
                GenerateKind::None => {}
                GenerateKind::Manifest => {
                    debug!("Slice {} generates {} at {}", slice, info.generate.as_str(), path);
                }
                GenerateKind::Unknown(value) => {
                    return Err(Error::InvalidGenerate {
                        slice: slice.to_string(),
                        path: path.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
    }

    Ok(Selection { release, slices })
}
