//! Risk-family labelling of resolved license types.
//!
//! - [`spdx`] maps one license identifier or registry name to a family.
//! - [`classifier`] handles whole license labels: the resolution sentinels,
//!   `Modified <id>`, `Custom`, and `OR`/`AND` expressions.

pub mod classifier;
pub mod spdx;
