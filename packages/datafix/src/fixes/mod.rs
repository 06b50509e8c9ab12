//! The fixers of the world format.

pub mod entity_skeleton_split;
pub mod block_entity_id;
pub mod entity_id;
pub mod options_lang;
pub mod item_rename;
pub mod bed_block_entity;
pub mod chunk_palette;
pub mod banner_color;
pub mod jukebox;
pub mod block_rename;
pub mod leaves;
pub mod bit_storage_align;

use self::{
    bed_block_entity::ChunkBedBlockEntityInjecterFix,
    banner_color::BlockEntityBannerColorFix,
    bit_storage_align::BitStorageAlignFix,
    block_entity_id::BlockEntityIdFix,
    block_rename::BlockRenameFix,
    chunk_palette::ChunkPalettedStorageFix,
    entity_id::EntityIdFix,
    entity_skeleton_split::EntitySkeletonSplitFix,
    item_rename::ItemRenameFix,
    jukebox::BlockEntityJukeboxFix,
    leaves::LeavesFix,
    options_lang::OptionsLowerCaseLanguageFix,
};
use crate::{
    registry::RegistryBuilder,
    schemas::{
        V820,
        V1475,
        V1490,
    },
};


/// Look up an id in a table of `(old, new)` renames.
pub(crate) fn renamed(
    renames: &'static [(&'static str, &'static str)],
    id: &str,
) -> Option<&'static str> {
    renames.iter().find(|&&(old, _)| old == id).map(|&(_, new)| new)
}


/// Register every fixer, oldest first.
pub fn register_all(builder: &mut RegistryBuilder) {
    builder
        .add_fixer(EntitySkeletonSplitFix)
        .add_fixer(BlockEntityIdFix)
        .add_fixer(EntityIdFix)
        .add_fixer(OptionsLowerCaseLanguageFix)
        .add_fixer(ItemRenameFix {
            name: "ItemRenameFix(totem)",
            version: V820,
            renames: &[("minecraft:totem", "minecraft:totem_of_undying")],
        })
        .add_fixer(ChunkBedBlockEntityInjecterFix)
        .add_fixer(ChunkPalettedStorageFix)
        .add_fixer(BlockEntityBannerColorFix)
        .add_fixer(BlockEntityJukeboxFix)
        .add_fixer(BlockRenameFix {
            name: "BlockRenameFix(flowing)",
            version: V1475,
            renames: &[
                ("minecraft:flowing_water", "minecraft:water"),
                ("minecraft:flowing_lava", "minecraft:lava"),
            ],
        })
        .add_fixer(BlockRenameFix {
            name: "BlockRenameFix(melon)",
            version: V1490,
            renames: &[("minecraft:melon_block", "minecraft:melon")],
        })
        .add_fixer(ItemRenameFix {
            name: "ItemRenameFix(melon)",
            version: V1490,
            renames: &[
                ("minecraft:melon_block", "minecraft:melon"),
                ("minecraft:melon", "minecraft:melon_slice"),
                ("minecraft:speckled_melon", "minecraft:glistering_melon_slice"),
            ],
        })
        .add_fixer(LeavesFix)
        .add_fixer(BitStorageAlignFix);
}
