//! Block states the context-sensitive resolvers can produce.

use crate::{
    block_state::BlockState,
    legacy::DYE_COLORS,
};
use std::{
    collections::HashMap,
    sync::OnceLock,
};


fn block(name: &str) -> BlockState {
    BlockState::new(format!("minecraft:{}", name))
}

fn one_of(value: &str, allowed: &[&str]) -> bool {
    allowed.contains(&value)
}

const BOOLS: &'static [&'static str] = &["true", "false"];
const HORIZONTAL: &'static [&'static str] = &["north", "south", "west", "east"];


/// Snowy variant of a block which has one.
pub fn snowy(name: &str) -> Option<BlockState> {
    match name {
        "minecraft:grass_block" | "minecraft:podzol" | "minecraft:mycelium" => {
            Some(BlockState::new(name).with("snowy", "true"))
        }
        _ => None,
    }
}

pub fn is_snow(name: &str) -> bool {
    name == "minecraft:snow" || name == "minecraft:snow_layer"
}

/// Upper half of the double plant whose lower half has the given name.
pub fn upper_plant(lower: &str) -> Option<BlockState> {
    let plant = lower.strip_prefix("minecraft:")?;
    one_of(plant, &["sunflower", "lilac", "tall_grass", "large_fern", "rose_bush", "peony"])
        .then(|| block(plant).with("half", "upper"))
}

/// Note block with a pitch, clamped to the valid range.
pub fn note_block(powered: bool, note: i32) -> BlockState {
    block("note_block")
        .with("note", note.clamp(0, 24).to_string())
        .with("powered", if powered { "true" } else { "false" })
}

/// One half of a door, if every property has a valid value.
pub fn door(
    name: &str,
    facing: &str,
    half: &str,
    hinge: &str,
    open: &str,
    powered: &str,
) -> Option<BlockState> {
    let valid = one_of(facing, HORIZONTAL)
        && one_of(half, &["lower", "upper"])
        && one_of(hinge, &["left", "right"])
        && one_of(open, BOOLS)
        && one_of(powered, BOOLS);
    valid.then(|| BlockState::new(name)
        .with("facing", facing)
        .with("half", half)
        .with("hinge", hinge)
        .with("open", open)
        .with("powered", powered))
}

/// Bed of a non-default color. Occupied foot halves have no colored
/// variant.
pub fn colored_bed(
    color: &str,
    facing: &str,
    occupied: &str,
    part: &str,
) -> Option<BlockState> {
    let valid = one_of(facing, HORIZONTAL)
        && one_of(occupied, BOOLS)
        && one_of(part, &["head", "foot"])
        && !(occupied == "true" && part == "foot")
        && color != "red";
    valid.then(|| block(&format!("{}_bed", color))
        .with("facing", facing)
        .with("occupied", occupied)
        .with("part", part))
}

/// Banner of a non-default color. `orientation` is the rotation of a
/// standing banner or the facing of a wall banner.
pub fn colored_banner(color: &str, wall: bool, orientation: &str) -> Option<BlockState> {
    if color == "white" {
        return None;
    }
    if wall {
        one_of(orientation, HORIZONTAL).then(|| block(&format!("{}_wall_banner", color))
            .with("facing", orientation))
    } else {
        orientation.parse::<u8>().ok()
            .filter(|&rotation| rotation < 16 && rotation.to_string() == orientation)
            .map(|_| block(&format!("{}_banner", color)).with("rotation", orientation))
    }
}


/// Potted plant for a flower pot's legacy `Item` name concatenated with its
/// `Data` value.
pub fn flower_pot(key: &str) -> Option<&'static BlockState> {
    static TABLE: OnceLock<HashMap<String, BlockState>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        let mut add = |item: &str, data: u8, potted: &str| {
            table.insert(format!("minecraft:{}{}", item, data), block(potted));
        };
        add("air", 0, "flower_pot");
        add("cactus", 0, "flower_pot");
        add("yellow_flower", 0, "potted_dandelion");
        add("red_mushroom", 0, "potted_red_mushroom");
        add("brown_mushroom", 0, "potted_brown_mushroom");
        add("deadbush", 0, "potted_dead_bush");
        add("tallgrass", 2, "potted_fern");
        for (data, flower) in [
            "poppy",
            "blue_orchid",
            "allium",
            "azure_bluet",
            "red_tulip",
            "orange_tulip",
            "white_tulip",
            "pink_tulip",
            "oxeye_daisy",
        ].into_iter().enumerate() {
            add("red_flower", data as u8, &format!("potted_{}", flower));
        }
        for (data, wood) in ["oak", "spruce", "birch", "jungle", "acacia", "dark_oak"]
            .into_iter()
            .enumerate()
        {
            add("sapling", data as u8, &format!("potted_{}_sapling", wood));
        }
        table
    }).get(key)
}

pub fn empty_flower_pot() -> BlockState {
    block("flower_pot")
}


/// Skull for a `SkullType` concatenated with either a wall facing or a
/// floor rotation.
pub fn skull(key: &str) -> Option<&'static BlockState> {
    static TABLE: OnceLock<HashMap<String, BlockState>> = OnceLock::new();
    TABLE.get_or_init(|| {
        const MOBS: [(&'static str, &'static str); 6] = [
            ("skeleton", "skull"),
            ("wither_skeleton", "skull"),
            ("zombie", "head"),
            ("player", "head"),
            ("creeper", "head"),
            ("dragon", "head"),
        ];
        let mut table = HashMap::new();
        for (skull_type, (mob, kind)) in MOBS.into_iter().enumerate() {
            for &facing in HORIZONTAL {
                table.insert(
                    format!("{}{}", skull_type, facing),
                    block(&format!("{}_wall_{}", mob, kind)).with("facing", facing),
                );
            }
            for rotation in 0..16 {
                table.insert(
                    format!("{}{}", skull_type, rotation),
                    block(&format!("{}_{}", mob, kind)).with("rotation", rotation.to_string()),
                );
            }
        }
        table
    }).get(key)
}

pub fn default_skull() -> &'static BlockState {
    static DEFAULT: OnceLock<BlockState> = OnceLock::new();
    DEFAULT.get_or_init(|| block("skeleton_wall_skull").with("facing", "north"))
}

/// Dye color a banner's legacy `Base` stands for. Banner bases count dyes
/// backwards relative to wool.
pub fn banner_color(base: i32) -> Option<&'static str> {
    (0..16).contains(&base).then(|| DYE_COLORS[(15 - base) as usize])
}
