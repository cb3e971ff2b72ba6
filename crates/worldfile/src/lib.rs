//! Palette-compressed save files for two-layer tile worlds.
//!
//! This crate decodes a live game-world token stream into an in-memory
//! two-layer block grid, and reversibly serializes that grid to and from a
//! compact, versioned, JSON-like persistent format.
//!
//! # Overview
//!
//! A [`World`] is two equal-sized grids of [`Block`]s (foreground and
//! background) plus a per-entity auxiliary data store. Persisted documents
//! keep worlds small with per-layer palettes: each layer stores a list of
//! its unique non-default blocks once and an integer index matrix instead
//! of repeating block definitions per cell.
//!
//! Documents are read and written by a self-contained dynamic-value parser
//! and writer — not a conforming JSON library. The format's escaping is
//! deliberately incomplete (quotes are protected while splitting members
//! but escape sequences are never decoded, and the writer never escapes),
//! and existing documents depend on that behavior.
//!
//! # Quick Start
//!
//! ```rust
//! use worldfile::{Block, FOREGROUND, FormatId, Value, World};
//!
//! // Build a small world and place a block on the foreground layer.
//! let mut world = World::new(4, 3);
//! world.set_block(FOREGROUND, 1, 2, Block::with_args(5, vec![Value::from("spawn")]))?;
//! world.set_data("bot-1", "owner", Value::from("iku"));
//!
//! // Serialize to the standard document format and load it back.
//! let text = world.to_json(FormatId::standard(), true)?;
//! let restored = World::from_json(&text)?;
//! assert_eq!(restored.get_block(FOREGROUND, 1, 2)?.id(), 5);
//! assert_eq!(restored.get_data("bot-1", "owner"), Some(&Value::from("iku")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`model`]: core data types ([`Value`], [`Block`], [`FormatId`], [`World`])
//! - [`codec`]: document text parsing/writing, palette compression, and
//!   the live-protocol decoder
//! - [`error`]: error types
//! - [`limits`]: limits for decoding untrusted input
//!
//! # Concurrency
//!
//! Everything here is strictly single-threaded, synchronous, and blocking.
//! A [`World`] is an owned value with no internal synchronization; each
//! operation runs to completion with no suspension points.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{Token, WORLD_END, WORLD_START, decode_world, encode_world, looks_like_placement_header};
pub use error::{DecodeError, EncodeError, FormatError, OutOfRange, ParseError, ProtocolError};
pub use model::{BACKGROUND, Block, FOREGROUND, FormatId, Value, World};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tag of the one persisted-format variant this crate implements.
pub const FORMAT_STANDARD: &str = "standard_2";
