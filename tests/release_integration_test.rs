//! Integration tests for loading, validating and selecting from a release
//! directory on disk.

mod common;

use common::prelude::*;
use sliceplan::release::{select, PathKind, SliceKey};
use sliceplan::{read_release, Error};

const LIBC6: &str = r#"
package: libc6
essential:
  - libc6_copyright
slices:
  libs:
    contents:
      /usr/lib/*-linux-*/libc.so.*:
      /usr/lib/*-linux-*/ld-linux-*.so.*:
  config:
    contents:
      /etc/ld.so.conf.d/: {make: true, mode: 0755}
      /etc/ld.so.conf: {text: "include /etc/ld.so.conf.d/*.conf\n", mutable: true}
  copyright:
    contents:
      /usr/share/doc/libc6/copyright:
"#;

const BASE_FILES: &str = r#"
package: base-files
slices:
  base:
    essential:
      - libc6_config
    contents:
      /etc/ld.so.conf.d/: {make: true, mode: 0755}
      /bin: {symlink: usr/bin}
      /var/lib/dpkg/**: {generate: manifest}
"#;

const BASH: &str = r#"
package: bash
slices:
  bins:
    essential:
      - libc6_libs
      - base-files_base
    contents:
      /usr/bin/bash:
      /usr/bin/sh: {symlink: bash}
"#;

fn ubuntu_release() -> ReleaseFixture {
    ReleaseFixture::new()
        .with_release(releases::SINGLE_ARCHIVE)
        .with_package("libc6", LIBC6)
        .with_package("base-files", BASE_FILES)
        .with_package("bash", BASH)
}

#[test]
fn test_read_valid_release() {
    let fixture = ubuntu_release();
    let release = read_release(fixture.path()).unwrap();

    assert_eq!(release.packages.len(), 3);
    assert_eq!(release.archives["ubuntu"].priority, 0);

    let libs = &release.packages["libc6"].slices["libs"];
    assert_eq!(libs.essential, [SliceKey::new("libc6", "copyright")]);
    assert_eq!(
        libs.contents["/usr/lib/*-linux-*/libc.so.*"].kind,
        PathKind::Glob
    );
    assert_eq!(release.packages["bash"].path, "slices/bash.yaml");
}

#[test]
fn test_select_orders_essentials_first() {
    let fixture = ubuntu_release();
    let release = read_release(fixture.path()).unwrap();

    let selection = select(&release, &[SliceKey::new("bash", "bins")]).unwrap();
    let order: Vec<String> = selection.slices.iter().map(|s| s.to_string()).collect();
    assert_eq!(order.len(), 5);
    let pos = |n: &str| order.iter().position(|s| s == n).unwrap();
    assert!(pos("libc6_copyright") < pos("libc6_libs"));
    assert!(pos("libc6_copyright") < pos("libc6_config"));
    assert!(pos("libc6_config") < pos("base-files_base"));
    assert!(pos("libc6_libs") < pos("bash_bins"));
    assert!(pos("base-files_base") < pos("bash_bins"));
    assert_eq!(order.last().map(String::as_str), Some("bash_bins"));
}

#[test]
fn test_same_directory_from_two_packages_is_compatible() {
    // Both libc6_config and base-files_base make /etc/ld.so.conf.d/ with the same mode.
    let fixture = ubuntu_release();
    assert!(read_release(fixture.path()).is_ok());
}

#[test]
fn test_directory_mode_mismatch_conflicts() {
    let fixture = ubuntu_release().with_package(
        "base-files",
        &BASE_FILES.replace("{make: true, mode: 0755}", "{make: true, mode: 0700}"),
    );
    let err = read_release(fixture.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "slices base-files_base and libc6_config conflict on /etc/ld.so.conf.d/"
    );
}

#[test]
fn test_copied_path_from_two_packages_conflicts() {
    let fixture = ubuntu_release().with_package(
        "dash",
        "package: dash\nslices:\n  bins:\n    contents:\n      /usr/bin/sh:\n",
    );
    let err = read_release(fixture.path()).unwrap_err();
    assert!(matches!(err, Error::PathConflict { .. }));
    assert_eq!(
        err.to_string(),
        "slices bash_bins and dash_bins conflict on /usr/bin/sh"
    );
}

#[test]
fn test_prefer_settles_conflict() {
    let fixture = ubuntu_release()
        .with_package(
            "dash",
            "package: dash\nslices:\n  bins:\n    contents:\n      /usr/bin/sh: {prefer: bash}\n",
        );
    let release = read_release(fixture.path()).unwrap();

    let keys = [SliceKey::new("dash", "bins"), SliceKey::new("bash", "bins")];
    let selection = select(&release, &keys).unwrap();
    let prefers = selection.prefers().unwrap();
    assert_eq!(prefers.len(), 1);
    assert_eq!(prefers["/usr/bin/sh"].name, "bash");
}

#[test]
fn test_glob_overlapping_other_package_conflicts() {
    let fixture = ubuntu_release().with_package(
        "musl",
        "package: musl\nslices:\n  libs:\n    contents:\n      /usr/lib/x86_64-linux-gnu/libc.so.6:\n",
    );
    let err = read_release(fixture.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "slices libc6_libs and musl_libs conflict on /usr/lib/*-linux-*/libc.so.* and /usr/lib/x86_64-linux-gnu/libc.so.6"
    );
}

#[test]
fn test_generate_path_shadows_other_paths() {
    let fixture = ubuntu_release().with_package(
        "dpkg",
        "package: dpkg\nslices:\n  db:\n    contents:\n      /var/lib/dpkg/status: {text: \"\"}\n",
    );
    let err = read_release(fixture.path()).unwrap_err();
    assert!(matches!(err, Error::GlobConflict { .. }));
}

#[test]
fn test_essential_loop_is_rejected() {
    let fixture = ubuntu_release().with_package(
        "libc6",
        &LIBC6.replace(
            "  copyright:\n",
            "  copyright:\n    essential:\n      - bash_bins\n",
        ),
    );
    let err = read_release(fixture.path()).unwrap_err();
    let Error::EssentialLoop { members } = &err else {
        panic!("expected an essential loop, got {}", err);
    };
    assert!(members.contains(&"bash_bins".to_string()));
    assert!(members.contains(&"libc6_copyright".to_string()));
}

#[test]
fn test_missing_essential_is_rejected() {
    let fixture = ubuntu_release().with_package(
        "bash",
        &BASH.replace("libc6_libs", "libc6_nope"),
    );
    let err = read_release(fixture.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "bash_bins requires libc6_nope, but slice is missing"
    );
}

#[test]
fn test_duplicate_package_in_subdirectories() {
    let fixture = ubuntu_release().with_file("slices/extra/bash.yaml", BASH);
    let err = read_release(fixture.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "package \"bash\" slices defined more than once: slices/bash.yaml and slices/extra/bash.yaml"
    );
}

#[test]
fn test_non_yaml_files_are_ignored() {
    let fixture = ubuntu_release().with_file("slices/README.md", "# notes\n");
    assert!(read_release(fixture.path()).is_ok());
}

#[test]
fn test_pinned_archive_must_exist() {
    let fixture = ReleaseFixture::new()
        .with_release(releases::TWO_ARCHIVES)
        .with_package("openssl", "package: openssl\narchive: fips\n")
        .with_package("zlib", "package: zlib\narchive: debian\n");
    let err = read_release(fixture.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "slices/zlib.yaml: package refers to undefined archive \"debian\""
    );
}

#[test]
fn test_duplicate_priority_is_rejected() {
    let fixture = ReleaseFixture::new()
        .with_release(&releases::TWO_ARCHIVES.replace("priority: 20", "priority: 10"))
        .with_package("zlib", "package: zlib\n");
    let err = read_release(fixture.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "archives \"fips\" and \"ubuntu\" have the same priority value of 10"
    );
}

#[test]
fn test_missing_release_file() {
    let fixture = ReleaseFixture::new().with_package("zlib", "package: zlib\n");
    let err = read_release(fixture.path()).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("release.yaml: cannot read release definition"));
}

#[test]
fn test_missing_slices_directory() {
    let fixture = ReleaseFixture::new().with_release(releases::SINGLE_ARCHIVE);
    let err = read_release(fixture.path()).unwrap_err();
    assert_eq!(err.to_string(), "slices: cannot read slices/ directory");
}
