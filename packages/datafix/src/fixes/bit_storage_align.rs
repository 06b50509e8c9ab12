use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V2527,
    type_ref::{
        FixTarget,
        TypeRef,
    },
    version::SchemaVersion,
};
use chunk_data::{
    NUM_SLIS,
    packed_words,
    palette_bits,
    words_needed,
};
use data_tree::Tree;


// entries per heightmap, one per column
const HEIGHTMAP_LEN: usize = 256;


/// Packed arrays whose width is not a power of two are repacked to the next
/// power of two.
#[derive(Debug)]
pub struct BitStorageAlignFix;

impl Fixer for BitStorageAlignFix {
    fn name(&self) -> &'static str {
        "BitStorageAlignFix"
    }

    fn version(&self) -> SchemaVersion {
        V2527
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::Chunk)
    }

    fn fix(&self, mut chunk: Tree, _: &FixContext) -> Result<Tree> {
        if let Some(level) = chunk.get_mut("Level") {
            align_level(level);
        }
        Ok(chunk)
    }
}

fn align_level(level: &mut Tree) {
    if let Some(sections) = level.get_mut("Sections").and_then(Tree::as_list_mut) {
        for section in sections {
            let palette_len = match section.get("Palette").and_then(Tree::as_list) {
                Some(palette) => palette.len(),
                None => continue,
            };
            let y = section.get_i32_or("Y", 0);
            if let Some(words) = section.get_mut("BlockStates") {
                align(words, palette_bits(palette_len), NUM_SLIS, &format!("section {}", y));
            }
        }
    }

    if let Some(heightmaps) = level.get_mut("Heightmaps").and_then(Tree::as_map_mut) {
        for (name, words) in heightmaps {
            let bits = match words.as_long_array() {
                Some(array) if array.len() * 64 % HEIGHTMAP_LEN == 0 => {
                    (array.len() * 64 / HEIGHTMAP_LEN) as u32
                }
                Some(array) => {
                    warn!(heightmap = %name, len = array.len(), "not aligning heightmap of odd length");
                    continue;
                }
                None => continue,
            };
            align(words, bits, HEIGHTMAP_LEN, name);
        }
    }
}

/// Repack a long array of `count` entries of width `bits` to the next power
/// of two width, if it is not already one. Arrays of the wrong length are
/// left as they are.
fn align(words: &mut Tree, bits: u32, count: usize, what: &str) {
    let array = match words.as_long_array() {
        Some(array) => array,
        None => return,
    };
    if bits == 0 || bits > 32 || array.len() != words_needed(count, bits) {
        warn!(what, bits, len = array.len(), "not aligning packed array with wrong length");
        return;
    }
    if bits.is_power_of_two() {
        return;
    }
    let aligned = bits.next_power_of_two();
    trace!(what, bits, aligned, "aligning packed array");
    *words = Tree::from(packed_words::repack(array, bits, aligned, count));
}
