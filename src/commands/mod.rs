//! # CLI Command Implementations
//!
//! Each subcommand of the `sliceplan` tool lives in its own file and
//! provides:
//! - An `Args` struct that defines the command-specific arguments, derived
//!   using `clap`.
//! - An `execute` function that takes the parsed `Args`, calls into the
//!   `sliceplan` library and reports the outcome.

pub mod select;
pub mod validate;
