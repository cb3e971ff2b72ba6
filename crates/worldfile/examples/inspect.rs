//! Simple inspector for saved world files.

use std::fs;

use worldfile::{BACKGROUND, FOREGROUND, World};

fn count_blocks(world: &World, layer: usize) -> usize {
    let mut count = 0;
    for y in 0..world.height() {
        for x in 0..world.width() {
            if !world.get_block(layer, x, y).expect("in-bounds cell").is_default() {
                count += 1;
            }
        }
    }
    count
}

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "world.json".to_string());

    println!("Reading: {path}");

    let text = fs::read_to_string(&path).expect("Failed to read file");
    println!("File size: {} bytes", text.len());

    let world = World::from_json(&text).expect("Failed to decode world");

    println!("\n=== World Info ===");
    println!("Dimensions: {}x{}", world.width(), world.height());
    println!("Foreground blocks: {}", count_blocks(&world, FOREGROUND));
    println!("Background blocks: {}", count_blocks(&world, BACKGROUND));
}
