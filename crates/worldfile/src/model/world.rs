//! The in-memory world store: two block layers plus auxiliary data.

use rustc_hash::FxHashMap;

use crate::codec::protocol::Token;
use crate::codec::{document, json, protocol};
use crate::error::{DecodeError, EncodeError, OutOfRange, ProtocolError};
use crate::model::{Block, FormatId, Value};

/// Layer selector for the foreground plane.
pub const FOREGROUND: usize = 0;
/// Layer selector for the background plane.
pub const BACKGROUND: usize = 1;

/// A two-layer tile grid with a per-entity auxiliary data store.
///
/// Both layers share the same `width x height` dimensions and every cell
/// holds a valid block (the default block until explicitly set). The store
/// is an owned, exclusively-mutated value: mutation happens only through
/// [`set_block`](World::set_block) and [`set_data`](World::set_data).
///
/// The grids are flat row-major buffers behind bounds-checked accessors;
/// rows are never shared or aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    width: usize,
    height: usize,
    foreground: Vec<Block>,
    background: Vec<Block>,
    data: FxHashMap<String, FxHashMap<String, Value>>,
}

impl World {
    /// Creates an empty world at fixed dimensions, every cell holding the
    /// default block.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            foreground: vec![Block::default(); width * height],
            background: vec![Block::default(); width * height],
            data: FxHashMap::default(),
        }
    }

    /// Assembles a world from decoded parts. Both buffers must be
    /// row-major `width * height`.
    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        foreground: Vec<Block>,
        background: Vec<Block>,
        data: FxHashMap<String, FxHashMap<String, Value>>,
    ) -> Self {
        debug_assert_eq!(foreground.len(), width * height);
        debug_assert_eq!(background.len(), width * height);
        Self { width, height, foreground, background, data }
    }

    /// Reconstructs a world from a live protocol token stream.
    pub fn from_tokens(
        tokens: &[Token],
        width: usize,
        height: usize,
    ) -> Result<World, ProtocolError> {
        let (foreground, background) = protocol::decode(tokens, width, height)?;
        Ok(World::from_parts(width, height, foreground, background, FxHashMap::default()))
    }

    /// Parses persisted document text into a world.
    pub fn from_json(text: &str) -> Result<World, DecodeError> {
        let document = json::parse(text)?;
        document::decode_world(&document)
    }

    /// Encodes this world into a persisted document tree.
    pub fn to_document(&self, format: &FormatId) -> Result<Value, EncodeError> {
        document::encode_world(self, format)
    }

    /// Serializes this world to document text.
    pub fn to_json(&self, format: &FormatId, pretty: bool) -> Result<String, EncodeError> {
        Ok(json::write(&self.to_document(format)?, pretty))
    }

    /// The grid width shared by both layers.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The grid height shared by both layers.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the block at `(x, y)` on the given layer.
    pub fn get_block(&self, layer: usize, x: usize, y: usize) -> Result<&Block, OutOfRange> {
        self.check_bounds(layer, x, y)?;
        Ok(self.cell(layer, x, y))
    }

    /// Places a block at `(x, y)` on the given layer.
    pub fn set_block(
        &mut self,
        layer: usize,
        x: usize,
        y: usize,
        block: Block,
    ) -> Result<(), OutOfRange> {
        self.check_bounds(layer, x, y)?;
        let index = y * self.width + x;
        let cells = if layer == FOREGROUND { &mut self.foreground } else { &mut self.background };
        cells[index] = block;
        Ok(())
    }

    /// Returns true when the entity has any auxiliary data.
    pub fn contains_entity_data(&self, entity: &str) -> bool {
        self.data.contains_key(entity)
    }

    /// Returns the auxiliary value stored under `entity`/`tag`, if any.
    pub fn get_data(&self, entity: &str, tag: &str) -> Option<&Value> {
        self.data.get(entity)?.get(tag)
    }

    /// Stores an auxiliary value under `entity`/`tag`, replacing any
    /// previous value.
    pub fn set_data(&mut self, entity: impl Into<String>, tag: impl Into<String>, value: Value) {
        self.data.entry(entity.into()).or_default().insert(tag.into(), value);
    }

    /// Unchecked cell access for the codecs; `layer`, `x`, `y` must be in
    /// bounds.
    pub(crate) fn cell(&self, layer: usize, x: usize, y: usize) -> &Block {
        let cells = if layer == FOREGROUND { &self.foreground } else { &self.background };
        &cells[y * self.width + x]
    }

    pub(crate) fn entity_data(&self) -> &FxHashMap<String, FxHashMap<String, Value>> {
        &self.data
    }

    fn check_bounds(&self, layer: usize, x: usize, y: usize) -> Result<(), OutOfRange> {
        if x >= self.width {
            return Err(OutOfRange { what: "x", index: x, limit: self.width });
        }
        if y >= self.height {
            return Err(OutOfRange { what: "y", index: y, limit: self.height });
        }
        if layer > BACKGROUND {
            return Err(OutOfRange { what: "layer", index: layer, limit: BACKGROUND + 1 });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_default_filled() {
        let world = World::new(3, 2);
        assert_eq!(world.width(), 3);
        assert_eq!(world.height(), 2);
        for layer in [FOREGROUND, BACKGROUND] {
            for x in 0..3 {
                for y in 0..2 {
                    assert!(world.get_block(layer, x, y).unwrap().is_default());
                }
            }
        }
    }

    #[test]
    fn test_set_and_get_block() {
        let mut world = World::new(4, 4);
        let block = Block::with_args(7, vec![Value::Int(1)]);
        world.set_block(BACKGROUND, 2, 3, block.clone()).unwrap();
        assert_eq!(world.get_block(BACKGROUND, 2, 3).unwrap(), &block);
        // the other layer is untouched
        assert!(world.get_block(FOREGROUND, 2, 3).unwrap().is_default());
    }

    #[test]
    fn test_coordinate_bounds() {
        let mut world = World::new(5, 4);

        let err = world.get_block(FOREGROUND, 5, 0).unwrap_err();
        assert_eq!(err, OutOfRange { what: "x", index: 5, limit: 5 });

        let err = world.get_block(FOREGROUND, 0, 4).unwrap_err();
        assert_eq!(err, OutOfRange { what: "y", index: 4, limit: 4 });

        let err = world.get_block(2, 0, 0).unwrap_err();
        assert_eq!(err, OutOfRange { what: "layer", index: 2, limit: 2 });

        let err = world.set_block(2, 0, 0, Block::new(1)).unwrap_err();
        assert_eq!(err, OutOfRange { what: "layer", index: 2, limit: 2 });
        assert!(world.set_block(BACKGROUND, 4, 3, Block::new(1)).is_ok());
    }

    #[test]
    fn test_auxiliary_data() {
        let mut world = World::new(1, 1);
        assert!(!world.contains_entity_data("bot"));
        assert_eq!(world.get_data("bot", "owner"), None);

        world.set_data("bot", "owner", Value::Text("iku".into()));
        assert!(world.contains_entity_data("bot"));
        assert_eq!(world.get_data("bot", "owner"), Some(&Value::Text("iku".into())));
        assert_eq!(world.get_data("bot", "missing"), None);

        world.set_data("bot", "owner", Value::Int(2));
        assert_eq!(world.get_data("bot", "owner"), Some(&Value::Int(2)));
    }
}
