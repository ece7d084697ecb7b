//! Report renderers for resolved license batches.
//!
//! - [`terminal`]: colored table with a risk column and a summary line;
//!   respects `--show-text` / `--quiet`.
//!
//! JSON output is the process response envelope and is written by `main`.

pub mod terminal;
