//! Report renderers for completed audits.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects
//!   `--verbose` / `--quiet`.
//! - [`pdf`] — training-data disclosure form: filer information, source
//!   summary, high-risk detail table and attestation section.

pub mod pdf;
pub mod terminal;
