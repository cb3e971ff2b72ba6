//! Live-protocol world data decoding.
//!
//! The session layer delivers world data as an indexable sequence of
//! typed tokens: a start sentinel, interleaved placement records of the
//! shape `(uint id, int layer, byte[] xs, byte[] ys, arg0, arg1, ...)`,
//! and an end sentinel. The decoder walks the sequence strictly forward,
//! single-pass, and never re-reads earlier positions.

use crate::error::ProtocolError;
use crate::model::{BACKGROUND, Block, FOREGROUND, Value};

/// Text sentinel opening the world-data section.
pub const WORLD_START: &str = "ws";
/// Text sentinel closing the world-data section.
pub const WORLD_END: &str = "we";

/// A dynamically-typed protocol token.
///
/// The wire keeps these runtime types distinct, and the placement
/// lookahead relies on telling `UInt`, `Int`, and `Bytes` apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unsigned 32-bit integer (block ids).
    UInt(u32),
    /// Signed 32-bit integer (layer selectors).
    Int(i32),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 text (sentinels and text arguments).
    Text(String),
    /// Raw byte array (coordinate runs).
    Bytes(Vec<u8>),
}

impl Token {
    fn is_end(&self) -> bool {
        matches!(self, Token::Text(s) if s == WORLD_END)
    }
}

/// Returns true when the four tokens starting at `pos` have the shape of
/// a placement header: `(uint id, int layer, byte[] xs, byte[] ys)`.
///
/// This is the heuristic that delimits variable-length argument lists on
/// a wire with no length prefix: a placement's arguments end where the
/// next header begins. An argument run that happens to match the shape is
/// indistinguishable from a real header and will be consumed as one; the
/// paired encoder never produces such a run in practice.
pub fn looks_like_placement_header(tokens: &[Token], pos: usize) -> bool {
    matches!(
        (tokens.get(pos), tokens.get(pos + 1), tokens.get(pos + 2), tokens.get(pos + 3)),
        (
            Some(Token::UInt(_)),
            Some(Token::Int(_)),
            Some(Token::Bytes(_)),
            Some(Token::Bytes(_))
        )
    )
}

/// Reconstructs both block layers from a protocol token stream.
///
/// Returns row-major `width * height` buffers `(foreground, background)`.
/// Cells no placement touches keep the default block.
pub fn decode(
    tokens: &[Token],
    width: usize,
    height: usize,
) -> Result<(Vec<Block>, Vec<Block>), ProtocolError> {
    let mut foreground = vec![Block::default(); width * height];
    let mut background = vec![Block::default(); width * height];

    let mut pos = tokens
        .iter()
        .position(|t| matches!(t, Token::Text(s) if s == WORLD_START))
        .ok_or(ProtocolError::MissingStart)?
        + 1;

    loop {
        let token = tokens.get(pos).ok_or(ProtocolError::MissingEnd)?;
        if token.is_end() {
            break;
        }

        let id = match token {
            Token::UInt(id) => *id,
            _ => {
                return Err(ProtocolError::UnexpectedToken { pos, expected: "block id (uint)" });
            }
        };
        pos += 1;

        let layer = match tokens.get(pos).ok_or(ProtocolError::MissingEnd)? {
            Token::Int(layer) => *layer,
            _ => {
                return Err(ProtocolError::UnexpectedToken { pos, expected: "layer selector (int)" });
            }
        };
        pos += 1;

        let xs = match tokens.get(pos).ok_or(ProtocolError::MissingEnd)? {
            Token::Bytes(xs) => xs,
            _ => {
                return Err(ProtocolError::UnexpectedToken { pos, expected: "x coordinates (bytes)" });
            }
        };
        pos += 1;

        let ys = match tokens.get(pos).ok_or(ProtocolError::MissingEnd)? {
            Token::Bytes(ys) => ys,
            _ => {
                return Err(ProtocolError::UnexpectedToken { pos, expected: "y coordinates (bytes)" });
            }
        };
        pos += 1;

        // Greedily consume arguments until the end sentinel or something
        // shaped like the next placement header.
        let mut args = Vec::new();
        loop {
            let token = tokens.get(pos).ok_or(ProtocolError::MissingEnd)?;
            if token.is_end() || looks_like_placement_header(tokens, pos) {
                break;
            }
            args.push(argument_value(token, pos)?);
            pos += 1;
        }

        // Placements for any other layer value are decoded but never
        // placed; the wire allows them.
        let layer = match layer {
            0 => FOREGROUND,
            1 => BACKGROUND,
            _ => continue,
        };

        if xs.len() != ys.len() {
            return Err(ProtocolError::LengthMismatch { xs: xs.len(), ys: ys.len() });
        }

        let block = Block::with_args(id, args);
        let grid = if layer == FOREGROUND { &mut foreground } else { &mut background };
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let (x, y) = (usize::from(x), usize::from(y));
            if x >= width || y >= height {
                return Err(ProtocolError::PlacementOutOfBounds { x, y, width, height });
            }
            grid[y * width + x] = block.clone();
        }
    }

    Ok((foreground, background))
}

fn argument_value(token: &Token, pos: usize) -> Result<Value, ProtocolError> {
    match token {
        Token::UInt(v) => Ok(Value::Int(i64::from(*v))),
        Token::Int(v) => Ok(Value::Int(i64::from(*v))),
        Token::Float(v) => Ok(Value::Float(*v)),
        Token::Text(s) => Ok(Value::Text(s.clone())),
        // the value model has no bytes variant, so such an argument could
        // never be persisted by the save path
        Token::Bytes(_) => Err(ProtocolError::UnsupportedArgument { pos }),
    }
}
