//! Error types for document parsing, world codecs, and store access.
//!
//! Every error is raised synchronously at the point of detection and never
//! retried internally; there is no partial-success mode. A load either
//! yields a fully populated [`World`](crate::World) or fails before any
//! store exists, and a save either yields a complete document string or
//! fails before producing anything.

use thiserror::Error;

/// Error parsing document text into a value tree.
///
/// Every variant is a malformed-document condition; the parser fails fast
/// at the first structural error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("malformed document: {context}")]
    MalformedDocument { context: &'static str },

    #[error("malformed document: invalid number token {token:?}")]
    InvalidNumber { token: String },

    #[error("malformed document: unknown literal {token:?}")]
    UnknownLiteral { token: String },

    #[error("malformed document: nesting depth exceeds {max}")]
    DepthLimitExceeded { max: usize },
}

/// Error parsing a format identifier tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The tag has no integer version suffix after its last underscore.
    #[error("invalid version in format tag {tag:?}: expected an integer suffix")]
    InvalidVersion { tag: String },
}

/// Error decoding a persisted document into a world.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("document is missing required field {field:?}")]
    MissingField { field: &'static str },

    #[error("unsupported format {format:?}")]
    UnsupportedFormat { format: String },

    #[error("field {field:?} has unexpected type: expected {expected}, found {found}")]
    UnexpectedType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{list} palette index {index} out of bounds (palette size: {size})")]
    IndexOutOfBounds {
        list: &'static str,
        index: i64,
        size: usize,
    },
}

/// Error encoding a world into a persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("unsupported format {format:?}")]
    UnsupportedFormat { format: String },
}

/// A grid coordinate or layer selector outside the store's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{what} {index} out of range (limit {limit})")]
pub struct OutOfRange {
    /// Which selector was out of range: `"x"`, `"y"`, or `"layer"`.
    pub what: &'static str,
    /// The rejected value.
    pub index: usize,
    /// The exclusive upper bound the value must stay under.
    pub limit: usize,
}

/// Error decoding the live-protocol token stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    #[error("world data start sentinel not found")]
    MissingStart,

    #[error("token stream ended before the world data end sentinel")]
    MissingEnd,

    #[error("unexpected token at position {pos}: expected {expected}")]
    UnexpectedToken { pos: usize, expected: &'static str },

    #[error("argument at position {pos} has no document representation")]
    UnsupportedArgument { pos: usize },

    #[error("coordinate arrays differ in length ({xs} x bytes, {ys} y bytes)")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("placement at ({x}, {y}) outside the {width}x{height} grid")]
    PlacementOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}
