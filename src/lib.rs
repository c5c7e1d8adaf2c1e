//! Collects the license files listed in a `license-checker --json` manifest and writes a
//! `THIRD_PARTY_LICENSES.md` notice that links to them.

/// command line arguments and their validation
pub mod cli;
/// errors that stop the notice from being written
pub mod error;
/// json manifest structures
pub mod manifest;
/// routines for generating the notice and copying license files
pub mod notice;
