//! # Release Definition Parsing
//!
//! This module reads a release directory from disk and turns it into the
//! in-memory [`Release`] model, then validates it.
//!
//! ## Layout
//!
//! ```text
//! <dir>/release.yaml              archives and public keys
//! <dir>/slices/**/<package>.yaml  one file per package
//! ```
//!
//! ## Key Components
//!
//! - **`read_release`**: Reads, parses and validates a whole release directory.
//!   This is the entry point used by the command-line tool.
//! - **`parse_release`**: Parses the content of `release.yaml`.
//! - **`parse_package`**: Parses the content of one package definition file.
//!
//! The YAML structures below mirror the files one to one and are converted
//! into the model types, deriving each path's kind from the options given
//! for it. Checks that only involve a single file happen here; checks that
//! relate slices to each other belong to [`Release::validate`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::has_wildcards;
use crate::release::{
    parse_slice_key, Archive, GenerateKind, Package, PathInfo, PathKind, PathUntil, PublicKey,
    Release, Slice, SliceKey, SliceScripts,
};

/// Name of the release definition file inside a release directory.
pub const RELEASE_FILE: &str = "release.yaml";

/// Directory holding the package definition files.
pub const SLICES_DIR: &str = "slices";

/// Architectures a path may be restricted to.
pub const KNOWN_ARCHES: &[&str] = &[
    "amd64", "arm64", "armhf", "i386", "ppc64el", "riscv64", "s390x",
];

static PACKAGE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9][a-z0-9.+-]*)\.yaml$").expect("valid package file regex")
});

static SLICE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid slice name regex"));

/// `release.yaml` content
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReleaseYaml {
    format: String,
    #[serde(default)]
    archives: BTreeMap<String, ArchiveYaml>,
    #[serde(default, rename = "public-keys")]
    public_keys: BTreeMap<String, PublicKeyYaml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArchiveYaml {
    #[serde(default)]
    version: String,
    #[serde(default)]
    suites: Vec<String>,
    #[serde(default)]
    components: Vec<String>,
    #[serde(default)]
    priority: Option<i32>,
    #[serde(default)]
    pro: Option<String>,
    #[serde(default, rename = "public-keys")]
    public_keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PublicKeyYaml {
    id: String,
    armor: String,
}

/// `slices/<package>.yaml` content
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageYaml {
    package: String,
    #[serde(default)]
    archive: Option<String>,
    #[serde(default)]
    essential: Vec<String>,
    #[serde(default)]
    slices: BTreeMap<String, SliceYaml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SliceYaml {
    #[serde(default)]
    essential: Vec<String>,
    #[serde(default)]
    contents: BTreeMap<String, Option<PathYaml>>,
    #[serde(default)]
    mutate: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathYaml {
    #[serde(default)]
    copy: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    symlink: Option<String>,
    #[serde(default)]
    make: bool,
    #[serde(default)]
    mode: Option<ModeYaml>,
    #[serde(default)]
    mutable: bool,
    #[serde(default)]
    until: Option<String>,
    #[serde(default)]
    arch: Option<ArchYaml>,
    #[serde(default)]
    generate: Option<String>,
    #[serde(default)]
    prefer: Option<String>,
}

/// File mode, either a plain integer or an octal string such as `"0755"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModeYaml {
    Number(u32),
    Octal(String),
}

/// A single architecture or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArchYaml {
    One(String),
    Many(Vec<String>),
}

impl ArchYaml {
    fn into_vec(self) -> Vec<String> {
        match self {
            ArchYaml::One(arch) => vec![arch],
            ArchYaml::Many(arches) => arches,
        }
    }
}

fn parse_error(path: &str, message: impl Into<String>) -> Error {
    Error::ConfigParse {
        path: path.to_string(),
        message: message.into(),
    }
}

/// Read, parse and validate the release stored in `dir`.
pub fn read_release<P: AsRef<Path>>(dir: P) -> Result<Release> {
    let dir = dir.as_ref();
    info!("Processing {} release...", dir.display());

    let file_path = dir.join(RELEASE_FILE);
    let data = std::fs::read_to_string(&file_path).map_err(|e| {
        parse_error(RELEASE_FILE, format!("cannot read release definition: {}", e))
    })?;
    let mut release = parse_release(&dir.to_string_lossy(), &data)?;
    read_slices(&mut release, dir)?;

    release.validate()?;
    Ok(release)
}

/// Parse the content of `release.yaml`.
///
/// The returned release has archives but no packages yet.
pub fn parse_release(base_dir: &str, data: &str) -> Result<Release> {
    let yaml: ReleaseYaml = serde_yaml::from_str(data)
        .map_err(|e| parse_error(RELEASE_FILE, format!("cannot parse release definition: {}", e)))?;

    if yaml.format != "v1" {
        return Err(parse_error(
            RELEASE_FILE,
            format!("unknown format {:?}", yaml.format),
        ));
    }
    if yaml.archives.is_empty() {
        return Err(parse_error(RELEASE_FILE, "no archives defined"));
    }

    let single = yaml.archives.len() == 1;
    let mut archives = BTreeMap::new();
    for (name, details) in yaml.archives {
        let archive = convert_archive(&name, details, &yaml.public_keys, single)?;
        archives.insert(name, archive);
    }

    Ok(Release {
        path: base_dir.to_string(),
        packages: BTreeMap::new(),
        archives,
    })
}

fn convert_archive(
    name: &str,
    details: ArchiveYaml,
    keys: &BTreeMap<String, PublicKeyYaml>,
    single: bool,
) -> Result<Archive> {
    if details.version.is_empty() {
        return Err(parse_error(
            RELEASE_FILE,
            format!("archive {:?} missing version field", name),
        ));
    }
    if details.suites.is_empty() {
        return Err(parse_error(
            RELEASE_FILE,
            format!("archive {:?} missing suites field", name),
        ));
    }
    if details.components.is_empty() {
        return Err(parse_error(
            RELEASE_FILE,
            format!("archive {:?} missing components field", name),
        ));
    }
    if details.public_keys.is_empty() {
        return Err(parse_error(
            RELEASE_FILE,
            format!("archive {:?} missing public-keys field", name),
        ));
    }
    let priority = match details.priority {
        Some(priority) => priority,
        None if single => 0,
        None => {
            return Err(parse_error(
                RELEASE_FILE,
                format!("archive {:?} is missing the priority setting", name),
            ))
        }
    };

    let mut public_keys = Vec::with_capacity(details.public_keys.len());
    for key_name in &details.public_keys {
        let key = keys.get(key_name).ok_or_else(|| {
            parse_error(
                RELEASE_FILE,
                format!("archive {:?} refers to undefined public key {:?}", name, key_name),
            )
        })?;
        public_keys.push(PublicKey {
            id: key.id.clone(),
            armor: key.armor.clone(),
        });
    }

    Ok(Archive {
        name: name.to_string(),
        version: details.version,
        suites: details.suites,
        components: details.components,
        priority,
        pro: details.pro.unwrap_or_default(),
        public_keys,
    })
}

/// Walk `<dir>/slices` and add every package definition found to `release`.
fn read_slices(release: &mut Release, dir: &Path) -> Result<()> {
    let slices_dir = dir.join(SLICES_DIR);
    if !slices_dir.is_dir() {
        return Err(parse_error(
            SLICES_DIR,
            format!("cannot read {}/ directory", SLICES_DIR),
        ));
    }

    for entry in WalkDir::new(&slices_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| parse_error(SLICES_DIR, e.to_string()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel_path = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .into_owned();
        let file_name = entry.file_name().to_string_lossy();
        if !file_name.ends_with(".yaml") {
            warn!("Ignoring {}: not a package definition", rel_path);
            continue;
        }
        let captures = PACKAGE_FILE.captures(&file_name).ok_or_else(|| {
            parse_error(
                &rel_path,
                format!("invalid slice definition filename: {:?}", file_name),
            )
        })?;
        let name = captures[1].to_string();

        if let Some(existing) = release.packages.get(&name) {
            return Err(Error::DuplicatePackage {
                package: name,
                first: existing.path.clone(),
                second: rel_path,
            });
        }
        let data = std::fs::read_to_string(entry.path())?;
        let package = parse_package(&name, &rel_path, &data)?;
        debug!(
            "Read package {} with {} slices from {}",
            package.name,
            package.slices.len(),
            rel_path
        );
        release.packages.insert(name, package);
    }
    Ok(())
}

/// Parse the content of the definition file of package `name` found at `path`.
pub fn parse_package(name: &str, path: &str, data: &str) -> Result<Package> {
    let yaml: PackageYaml = serde_yaml::from_str(data)
        .map_err(|e| parse_error(path, format!("cannot parse package {:?}: {}", name, e)))?;

    if yaml.package != name {
        return Err(parse_error(
            path,
            format!("filename and 'package' field ({:?}) disagree", yaml.package),
        ));
    }

    let package_essential = parse_essential_list(path, &yaml.essential)?;

    let mut slices = BTreeMap::new();
    for (slice_name, details) in yaml.slices {
        if !SLICE_NAME.is_match(&slice_name) {
            return Err(parse_error(
                path,
                format!("invalid slice name {:?}", slice_name),
            ));
        }
        let own_key = SliceKey::new(name, &slice_name);
        let mut essential: Vec<SliceKey> = Vec::new();
        for key in &package_essential {
            // A package-wide essential does not apply to the slice it names.
            if *key != own_key {
                essential.push(key.clone());
            }
        }
        for key in parse_essential_list(path, &details.essential)? {
            if key == own_key {
                return Err(parse_error(
                    path,
                    format!("cannot add slice to itself as essential {}", key),
                ));
            }
            if essential.contains(&key) {
                return Err(parse_error(
                    path,
                    format!("slice {} defined with redundant essential slice: {}", own_key, key),
                ));
            }
            essential.push(key);
        }

        let mut contents = BTreeMap::new();
        for (content_path, options) in details.contents {
            let info = convert_path(path, &own_key, &content_path, options.unwrap_or_default())?;
            contents.insert(content_path, info);
        }

        slices.insert(
            slice_name.clone(),
            Slice {
                package: name.to_string(),
                name: slice_name,
                essential,
                contents,
                scripts: SliceScripts {
                    mutate: details.mutate,
                },
            },
        );
    }

    Ok(Package {
        name: name.to_string(),
        path: path.to_string(),
        archive: yaml.archive,
        slices,
    })
}

fn parse_essential_list(path: &str, refs: &[String]) -> Result<Vec<SliceKey>> {
    let mut keys: Vec<SliceKey> = Vec::with_capacity(refs.len());
    for raw in refs {
        let key = parse_slice_key(raw)
            .map_err(|_| parse_error(path, format!("invalid essential slice reference: {:?}", raw)))?;
        if keys.contains(&key) {
            return Err(parse_error(
                path,
                format!("essential slice {} listed more than once", key),
            ));
        }
        keys.push(key);
    }
    Ok(keys)
}

/// Derive the [`PathInfo`] for one entry of a slice's contents.
fn convert_path(file: &str, slice: &SliceKey, path: &str, yaml: PathYaml) -> Result<PathInfo> {
    let fail = |message: String| parse_error(file, format!("slice {} path {} {}", slice, path, message));

    if !path.starts_with('/') {
        return Err(fail("must be absolute".to_string()));
    }

    let declared: Vec<String> = [
        (PathKind::Copy, yaml.copy.is_some()),
        (PathKind::Text, yaml.text.is_some()),
        (PathKind::Symlink, yaml.symlink.is_some()),
        (PathKind::Dir, yaml.make),
        (PathKind::Generate, yaml.generate.is_some()),
    ]
    .iter()
    .filter(|(_, set)| *set)
    .map(|(kind, _)| kind.to_string())
    .collect();
    if declared.len() > 1 {
        return Err(fail(format!("has multiple kinds: {}", declared.join(", "))));
    }

    let mut generate = GenerateKind::None;
    let (kind, info) = if let Some(value) = yaml.generate {
        if !path.ends_with("/**") || has_wildcards(&path[..path.len() - 3]) {
            return Err(fail("has invalid generate path: must end with /** and have no other wildcards".to_string()));
        }
        generate = GenerateKind::from_value(&value);
        (PathKind::Generate, String::new())
    } else if has_wildcards(path) {
        if !declared.is_empty() {
            return Err(fail("has invalid wildcard options".to_string()));
        }
        (PathKind::Glob, String::new())
    } else if yaml.make {
        if !path.ends_with('/') {
            return Err(fail("must end in / for 'make' to be valid".to_string()));
        }
        (PathKind::Dir, String::new())
    } else if let Some(text) = yaml.text {
        (PathKind::Text, text)
    } else if let Some(target) = yaml.symlink {
        (PathKind::Symlink, target)
    } else {
        (PathKind::Copy, yaml.copy.unwrap_or_default())
    };

    let until = match yaml.until.as_deref() {
        None | Some("") => PathUntil::None,
        Some("mutate") => PathUntil::Mutate,
        Some(other) => return Err(fail(format!("has invalid 'until' value: {:?}", other))),
    };

    let arch = yaml.arch.map(ArchYaml::into_vec).unwrap_or_default();
    for entry in &arch {
        if !KNOWN_ARCHES.contains(&entry.as_str()) {
            return Err(fail(format!("has invalid 'arch' value: {:?}", entry)));
        }
    }

    let mode = match yaml.mode {
        None => 0,
        Some(ModeYaml::Number(mode)) => mode,
        Some(ModeYaml::Octal(raw)) => {
            let digits = raw.trim_start_matches("0o");
            u32::from_str_radix(digits, 8)
                .map_err(|_| fail(format!("has invalid mode: {:?}", raw)))?
        }
    };

    if let Some(prefer) = &yaml.prefer {
        if *prefer == slice.package {
            return Err(fail("'prefer' refers to its own package".to_string()));
        }
    }

    Ok(PathInfo {
        kind,
        info,
        mode,
        mutable: yaml.mutable,
        until,
        arch,
        generate,
        prefer: yaml.prefer,
    })
}
