//! Identifier matching for reconciliation.
//!
//! Serial numbers and model strings reported by firmware are noisy: EDID readers
//! add or drop leading zeros, BIOS vendors ship placeholder serials, and monitor
//! models carry a manufacturer code prefix. This module canonicalizes those
//! identifiers and decides when two of them name the same physical unit.

pub mod normalize;
pub mod serial;

pub use normalize::{
    clean_model_name, is_placeholder_serial, normalize_model_name, normalize_serial,
};
pub use serial::{model_name_matches, serials_match, MAX_EDIT_DISTANCE};
