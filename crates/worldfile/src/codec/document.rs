//! Standard-format document encoding and decoding.
//!
//! A persisted world document references a small per-layer palette of
//! unique non-default blocks instead of repeating the block definition at
//! every cell. Palette index 0 is implicit and reserved for the default
//! block, so the index matrices persist `0` for empty cells and
//! `1 + palette slot` otherwise.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::error::{DecodeError, EncodeError};
use crate::model::{BACKGROUND, Block, FOREGROUND, FormatId, Value, World};

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a world into a persisted document tree.
///
/// Fails with [`EncodeError::UnsupportedFormat`] when `format` is not the
/// one implemented variant.
pub fn encode_world(world: &World, format: &FormatId) -> Result<Value, EncodeError> {
    if format != FormatId::standard() {
        return Err(EncodeError::UnsupportedFormat { format: format.to_string() });
    }
    Ok(encode_standard(world))
}

/// Palette accumulator: the first occurrence of a block defines its slot.
///
/// Blocks hold float arguments and so cannot be hashed; lookup is a linear
/// value-equality scan, which stays cheap because palettes only hold the
/// distinct blocks of a world.
struct PaletteBuilder {
    blocks: Vec<Block>,
}

impl PaletteBuilder {
    fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Returns the persisted index for a cell, growing the palette on
    /// first occurrence. The default block is always index 0.
    fn index_of(&mut self, block: &Block) -> i64 {
        if block.is_default() {
            return 0;
        }
        let slot = match self.blocks.iter().position(|b| b == block) {
            Some(slot) => slot,
            None => {
                self.blocks.push(block.clone());
                self.blocks.len() - 1
            }
        };
        (slot + 1) as i64
    }

    /// Renders the palette entries: a bare integer id when the block has
    /// no arguments, else `[id, arg0, arg1, ...]`.
    fn into_entries(self) -> Vec<Value> {
        self.blocks
            .into_iter()
            .map(|block| {
                if block.args().is_empty() {
                    Value::from(block.id())
                } else {
                    let mut items = Vec::with_capacity(block.args().len() + 1);
                    items.push(Value::from(block.id()));
                    items.extend(block.args().iter().cloned());
                    Value::List(items)
                }
            })
            .collect()
    }
}

fn encode_standard(world: &World) -> Value {
    let mut fg_keys = PaletteBuilder::new();
    let mut bg_keys = PaletteBuilder::new();

    let mut blocks = Vec::with_capacity(world.height());
    let mut backgrounds = Vec::with_capacity(world.height());
    for y in 0..world.height() {
        let mut fg_row = Vec::with_capacity(world.width());
        let mut bg_row = Vec::with_capacity(world.width());
        for x in 0..world.width() {
            fg_row.push(Value::Int(fg_keys.index_of(world.cell(FOREGROUND, x, y))));
            bg_row.push(Value::Int(bg_keys.index_of(world.cell(BACKGROUND, x, y))));
        }
        blocks.push(Value::List(fg_row));
        backgrounds.push(Value::List(bg_row));
    }

    let data = world
        .entity_data()
        .iter()
        .map(|(entity, tags)| {
            let tags: BTreeMap<String, Value> =
                tags.iter().map(|(tag, value)| (tag.clone(), value.clone())).collect();
            (entity.clone(), Value::Map(tags))
        })
        .collect::<BTreeMap<String, Value>>();

    let mut doc = BTreeMap::new();
    doc.insert("format".to_string(), Value::Text(FormatId::standard().to_string()));
    doc.insert("blist".to_string(), Value::List(fg_keys.into_entries()));
    doc.insert("bglist".to_string(), Value::List(bg_keys.into_entries()));
    doc.insert("blocks".to_string(), Value::List(blocks));
    doc.insert("backgrounds".to_string(), Value::List(backgrounds));
    doc.insert("data".to_string(), Value::Map(data));
    Value::Map(doc)
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a persisted document into a world.
///
/// The document must carry the implemented format identifier; dimensions
/// are inferred from the index matrices, and ragged matrices load
/// leniently with missing cells resolving to the default block.
pub fn decode_world(document: &Value) -> Result<World, DecodeError> {
    let doc = match document {
        Value::Map(entries) => entries,
        other => {
            return Err(DecodeError::UnexpectedType {
                field: "document",
                expected: "map",
                found: other.type_name(),
            });
        }
    };

    let format_tag = match require(doc, "format")? {
        Value::Text(tag) => tag,
        other => {
            return Err(DecodeError::UnexpectedType {
                field: "format",
                expected: "text",
                found: other.type_name(),
            });
        }
    };
    let format = FormatId::parse(format_tag)?;
    if &format != FormatId::standard() {
        return Err(DecodeError::UnsupportedFormat { format: format.to_string() });
    }

    decode_standard(doc)
}

fn decode_standard(doc: &BTreeMap<String, Value>) -> Result<World, DecodeError> {
    for field in ["blist", "bglist", "blocks", "backgrounds", "data"] {
        if !doc.contains_key(field) {
            return Err(DecodeError::MissingField { field });
        }
    }

    let blist = require_list(doc, "blist")?;
    let bglist = require_list(doc, "bglist")?;
    let block_rows = require_list(doc, "blocks")?;
    let background_rows = require_list(doc, "backgrounds")?;

    let height = block_rows.len().max(background_rows.len());
    let width = max_row_width(block_rows, "blocks")?.max(max_row_width(background_rows, "backgrounds")?);

    let fg_keys = decode_palette(blist, "blist")?;
    let bg_keys = decode_palette(bglist, "bglist")?;

    let foreground = fill_layer(block_rows, &fg_keys, width, height, "blist")?;
    let background = fill_layer(background_rows, &bg_keys, width, height, "bglist")?;

    let data = decode_data(&doc["data"])?;

    Ok(World::from_parts(width, height, foreground, background, data))
}

fn require<'a>(doc: &'a BTreeMap<String, Value>, field: &'static str) -> Result<&'a Value, DecodeError> {
    doc.get(field).ok_or(DecodeError::MissingField { field })
}

fn require_list<'a>(
    doc: &'a BTreeMap<String, Value>,
    field: &'static str,
) -> Result<&'a [Value], DecodeError> {
    match require(doc, field)? {
        Value::List(items) => Ok(items),
        other => Err(DecodeError::UnexpectedType {
            field,
            expected: "list",
            found: other.type_name(),
        }),
    }
}

fn max_row_width(rows: &[Value], field: &'static str) -> Result<usize, DecodeError> {
    let mut width = 0;
    for row in rows {
        match row {
            Value::List(cells) => width = width.max(cells.len()),
            other => {
                return Err(DecodeError::UnexpectedType {
                    field,
                    expected: "list of rows",
                    found: other.type_name(),
                });
            }
        }
    }
    Ok(width)
}

/// Rebuilds a palette: the implicit default block at index 0, then one
/// block per entry. A bare integer is an id with no arguments; a list is
/// `[id, arg0, arg1, ...]`.
fn decode_palette(entries: &[Value], field: &'static str) -> Result<Vec<Block>, DecodeError> {
    let mut palette = Vec::with_capacity(entries.len() + 1);
    palette.push(Block::default());
    for entry in entries {
        // ids narrow with an unchecked cast, as the paired encoder widens
        let block = match entry {
            Value::Int(id) => Block::new(*id as u32),
            Value::List(items) => match items.first() {
                Some(Value::Int(id)) => Block::with_args(*id as u32, items[1..].to_vec()),
                Some(other) => {
                    return Err(DecodeError::UnexpectedType {
                        field,
                        expected: "integer block id",
                        found: other.type_name(),
                    });
                }
                None => {
                    return Err(DecodeError::UnexpectedType {
                        field,
                        expected: "integer block id",
                        found: "empty list",
                    });
                }
            },
            other => {
                return Err(DecodeError::UnexpectedType {
                    field,
                    expected: "integer or list",
                    found: other.type_name(),
                });
            }
        };
        palette.push(block);
    }
    Ok(palette)
}

/// Fills a `width * height` layer row-major from an index matrix. Missing
/// rows and short rows resolve to the default block; a present index must
/// point into the palette.
fn fill_layer(
    rows: &[Value],
    palette: &[Block],
    width: usize,
    height: usize,
    list_name: &'static str,
) -> Result<Vec<Block>, DecodeError> {
    let mut cells = vec![Block::default(); width * height];
    for (y, row) in rows.iter().enumerate().take(height) {
        let Value::List(row) = row else {
            // max_row_width already rejected non-list rows
            continue;
        };
        for (x, cell) in row.iter().enumerate().take(width) {
            let index = match cell {
                Value::Int(index) => *index,
                other => {
                    return Err(DecodeError::UnexpectedType {
                        field: list_name,
                        expected: "integer palette index",
                        found: other.type_name(),
                    });
                }
            };
            let block = usize::try_from(index)
                .ok()
                .and_then(|slot| palette.get(slot))
                .ok_or(DecodeError::IndexOutOfBounds {
                    list: list_name,
                    index,
                    size: palette.len(),
                })?;
            cells[y * width + x] = block.clone();
        }
    }
    Ok(cells)
}

fn decode_data(value: &Value) -> Result<FxHashMap<String, FxHashMap<String, Value>>, DecodeError> {
    let entries = match value {
        Value::Map(entries) => entries,
        other => {
            return Err(DecodeError::UnexpectedType {
                field: "data",
                expected: "map",
                found: other.type_name(),
            });
        }
    };

    let mut data = FxHashMap::default();
    for (entity, tags) in entries {
        let tags = match tags {
            Value::Map(tags) => tags.iter().map(|(tag, value)| (tag.clone(), value.clone())).collect(),
            other => {
                return Err(DecodeError::UnexpectedType {
                    field: "data",
                    expected: "map of tag maps",
                    found: other.type_name(),
                });
            }
        };
        data.insert(entity.clone(), tags);
    }
    Ok(data)
}
