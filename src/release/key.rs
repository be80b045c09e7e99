//! Slice identity

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static SLICE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9][a-z0-9.+-]*)_([a-z0-9][a-z0-9-]*)$").expect("valid slice key regex")
});

/// Identifies a slice by its package and slice name.
///
/// The textual form is `package_slice`. Package names never contain an
/// underscore, so the first underscore always separates the two halves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SliceKey {
    pub package: String,
    pub slice: String,
}

impl SliceKey {
    pub fn new(package: impl Into<String>, slice: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            slice: slice.into(),
        }
    }
}

impl fmt::Display for SliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.package, self.slice)
    }
}

impl FromStr for SliceKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_slice_key(s)
    }
}

/// Parse a `package_slice` string into a [`SliceKey`].
pub fn parse_slice_key(s: &str) -> Result<SliceKey> {
    let captures = SLICE_KEY
        .captures(s)
        .ok_or_else(|| Error::InvalidSliceKey(s.to_string()))?;
    Ok(SliceKey::new(&captures[1], &captures[2]))
}
