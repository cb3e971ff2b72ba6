//! Encoding and decoding for world snapshots.
//!
//! Three layers, lowest first:
//! - [`json`]: document text <-> dynamic value trees
//! - [`document`]: value trees <-> worlds (palette compression)
//! - [`protocol`]: live token streams -> block layers

pub mod document;
pub mod json;
pub mod protocol;

pub use document::{decode_world, encode_world};
pub use protocol::{Token, WORLD_END, WORLD_START, looks_like_placement_header};
