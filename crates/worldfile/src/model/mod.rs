//! Data model types for world snapshots.
//!
//! This module contains the core types the codecs operate on:
//! - Dynamic values (the tagged union documents are made of)
//! - Blocks (tile definitions placed at grid cells)
//! - Format identifiers (versioned document-schema tags)
//! - The world store itself

pub mod block;
pub mod format;
pub mod value;
pub mod world;

pub use block::Block;
pub use format::FormatId;
pub use value::Value;
pub use world::{BACKGROUND, FOREGROUND, World};
