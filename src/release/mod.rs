//! The release graph resolver.
//!
//! ## Overview
//!
//! A release is checked and turned into a plan in these steps:
//! 1. Prefer index - collect every `prefer` declaration into a lookup usable
//!    in both directions
//! 2. Path conflicts - make sure slices declaring the same path agree, or
//!    that a prefer relationship settles who wins
//! 3. Prefer coverage - every preferred package must provide the path
//! 4. Glob overlaps - glob and generate paths may not shadow other paths
//! 5. Essential cycles - order the whole release once to reject loops
//! 6. Archives - unique priorities and defined pins
//!
//! On request, [`select`] orders the requested slices and what they require,
//! and [`Selection::prefers`] tells which package supplies each contested path.

pub mod key;
pub mod model;
pub mod order;
pub mod prefer;
pub mod selection;
pub mod validate;

pub use key::{parse_slice_key, SliceKey};
pub use model::{
    Archive, GenerateKind, Package, PathInfo, PathKind, PathUntil, PublicKey, Release, Slice,
    SliceScripts,
};
pub use order::order;
pub use prefer::{preferred_path_package, PreferIndex, Preference};
pub use selection::{select, Selection};
