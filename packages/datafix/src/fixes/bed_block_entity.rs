use crate::{
    error::Result,
    fixer::{
        Fixer,
        FixContext,
    },
    schemas::V1125,
    type_ref::{
        FixTarget,
        TypeRef,
        ID_FIELD,
    },
    version::SchemaVersion,
};
use chunk_data::{
    NUM_SLIS,
    sli_get_x,
    sli_get_y,
    sli_get_z,
};
use data_tree::Tree;
use std::collections::HashSet;


const LEGACY_BED: u8 = 26;
// wool order index of red, the color of every bed before beds were dyeable
const DEFAULT_BED_COLOR: i32 = 14;


/// Gives every legacy bed block a bed block entity, which carries its color
/// from here on.
#[derive(Debug)]
pub struct ChunkBedBlockEntityInjecterFix;

impl Fixer for ChunkBedBlockEntityInjecterFix {
    fn name(&self) -> &'static str {
        "ChunkBedBlockEntityInjecterFix"
    }

    fn version(&self) -> SchemaVersion {
        V1125
    }

    fn target(&self) -> FixTarget {
        FixTarget::all(TypeRef::Chunk)
    }

    fn fix(&self, mut chunk: Tree, _: &FixContext) -> Result<Tree> {
        if let Some(level) = chunk.get_mut("Level") {
            inject_beds(level);
        }
        Ok(chunk)
    }
}

fn position(tree: &Tree) -> (i32, i32, i32) {
    (tree.get_i32_or("x", 0), tree.get_i32_or("y", 0), tree.get_i32_or("z", 0))
}

fn inject_beds(level: &mut Tree) {
    let block_x = level.get_i32_or("xPos", 0) << 4;
    let block_z = level.get_i32_or("zPos", 0) << 4;

    let mut beds = Vec::new();
    for section in level.get("Sections").and_then(Tree::as_list).unwrap_or(&[]) {
        let block_y = section.get_i32_or("Y", 0) << 4;
        let blocks = match section.get("Blocks").and_then(Tree::as_byte_array) {
            Some(blocks) => blocks,
            None => continue,
        };
        for (sli, &block) in blocks.iter().enumerate().take(NUM_SLIS) {
            if block as u8 == LEGACY_BED {
                let sli = sli as u16;
                beds.push((
                    block_x + sli_get_x(sli) as i32,
                    block_y + sli_get_y(sli) as i32,
                    block_z + sli_get_z(sli) as i32,
                ));
            }
        }
    }
    if beds.is_empty() {
        return;
    }

    let existing = level.get("TileEntities")
        .and_then(Tree::as_list)
        .unwrap_or(&[])
        .iter()
        .map(position)
        .collect::<HashSet<_>>();
    let injected = beds.into_iter()
        .filter(|bed| !existing.contains(bed))
        .map(|(x, y, z)| Tree::empty_map()
            .with(ID_FIELD, "minecraft:bed")
            .with("x", x)
            .with("y", y)
            .with("z", z)
            .with("color", DEFAULT_BED_COLOR))
        .collect::<Vec<_>>();
    if injected.is_empty() {
        return;
    }

    if !level.contains_key("TileEntities") {
        level.set("TileEntities", Vec::<Tree>::new());
    }
    match level.get_mut("TileEntities").and_then(Tree::as_list_mut) {
        Some(list) => {
            debug!(beds = injected.len(), "injecting bed block entities");
            list.extend(injected);
        }
        None => warn!("not injecting bed block entities, block entities are not a list"),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(tile_entities: Vec<Tree>) -> Tree {
        let mut blocks = vec![0i8; NUM_SLIS];
        // <3,1,2> and <4,1,2> in section 2
        blocks[1 << 8 | 2 << 4 | 3] = LEGACY_BED as i8;
        blocks[1 << 8 | 2 << 4 | 4] = LEGACY_BED as i8;
        Tree::empty_map().with("Level", Tree::empty_map()
            .with("xPos", 1i32)
            .with("zPos", -1i32)
            .with("Sections", vec![Tree::empty_map()
                .with("Y", 2i8)
                .with("Blocks", blocks)])
            .with("TileEntities", tile_entities))
    }

    #[test]
    fn test_inject_missing_beds() {
        let ctx = FixContext { from: crate::schemas::V99, to: V1125 };
        let existing = Tree::empty_map()
            .with(ID_FIELD, "minecraft:bed")
            .with("x", 19i32)
            .with("y", 33i32)
            .with("z", -14i32)
            .with("color", 3i32);
        let fixed = ChunkBedBlockEntityInjecterFix.fix(chunk(vec![existing.clone()]), &ctx).unwrap();
        let list = fixed.get_path(&["Level", "TileEntities"]).unwrap().as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], existing);
        assert_eq!(position(&list[1]), (20, 33, -14));
        assert_eq!(list[1].get_i32_or("color", -1), DEFAULT_BED_COLOR);
        assert_eq!(list[1].get_str_or(ID_FIELD, ""), "minecraft:bed");
    }

    #[test]
    fn test_no_level() {
        let ctx = FixContext { from: crate::schemas::V99, to: V1125 };
        let chunk = Tree::empty_map().with("xPos", 3i32);
        assert_eq!(ChunkBedBlockEntityInjecterFix.fix(chunk.clone(), &ctx).unwrap(), chunk);
    }
}
