//! Static mapping from legacy composite block keys to flattened block
//! states.
//!
//! The table covers numeric ids 0 through 255 with every auxiliary data
//! value that was ever written for them. Keys carrying an add nibble, and
//! data values an id never used, are resolved by falling back to the id's
//! data-0 entry and then to the filter sentinel.

use crate::block_state::{
    BlockState,
    filter_me,
};
use super::DYE_COLORS;
use std::sync::OnceLock;


/// Number of composite keys with a zero add nibble.
pub const NUM_LEGACY_KEYS: usize = 1 << 12;

const WOODS: [&'static str; 6] = ["oak", "spruce", "birch", "jungle", "acacia", "dark_oak"];

// facing per `data & 3` of most horizontally oriented blocks
const SWNE: [&'static str; 4] = ["south", "west", "north", "east"];

// facing per `data & 7` of blocks which can point any direction
const FACING_6: [&'static str; 6] = ["down", "up", "north", "south", "west", "east"];

// facing per `data & 3` of stairs and doors
const STAIRS_FACING: [&'static str; 4] = ["east", "west", "south", "north"];
const DOOR_FACING: [&'static str; 4] = ["east", "south", "west", "north"];

const RAIL_SHAPES: [&'static str; 10] = [
    "north_south",
    "east_west",
    "ascending_east",
    "ascending_west",
    "ascending_north",
    "ascending_south",
    "south_east",
    "south_west",
    "north_west",
    "north_east",
];

const SLABS: [&'static str; 8] = [
    "stone",
    "sandstone",
    "petrified_oak",
    "cobblestone",
    "brick",
    "stone_brick",
    "nether_brick",
    "quartz",
];


/// Block state of a composite key, with fallback to the id's data-0 entry
/// and then to the filter sentinel.
pub fn lookup(key: u16) -> &'static BlockState {
    lookup_exact(key)
        .or_else(|| lookup_exact(key & !0xf))
        .unwrap_or_else(|| filter_me())
}

/// Block state of a composite key, if the table has an entry for exactly it.
pub fn lookup_exact(key: u16) -> Option<&'static BlockState> {
    static TABLE: OnceLock<Vec<Option<BlockState>>> = OnceLock::new();
    TABLE.get_or_init(build)
        .get(key as usize)
        .and_then(Option::as_ref)
}


fn block(name: &str) -> BlockState {
    BlockState::new(format!("minecraft:{}", name))
}

fn bool_str(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

fn bit(data: u8, mask: u8) -> &'static str {
    bool_str(data & mask != 0)
}

// facing of chests, ladders, wall signs, furnaces and wall banners
fn facing_2_to_5(data: u8) -> &'static str {
    match data {
        3 => "south",
        4 => "west",
        5 => "east",
        _ => "north",
    }
}

// axis of logs and pillars, from the upper two bits
fn axis(data: u8) -> Option<&'static str> {
    ["y", "x", "z"].get((data >> 2) as usize).copied()
}


struct TableBuilder {
    states: Vec<Option<BlockState>>,
}

impl TableBuilder {
    fn set(&mut self, id: u8, data: u8, state: BlockState) {
        debug_assert!(data < 16);
        self.states[(id as usize) << 4 | data as usize] = Some(state);
    }

    fn simple(&mut self, id: u8, name: &str) {
        self.set(id, 0, block(name));
    }

    fn variants<S: AsRef<str>>(&mut self, id: u8, names: &[S]) {
        for (data, name) in names.iter().enumerate() {
            self.set(id, data as u8, block(name.as_ref()));
        }
    }

    /// Set every data value for which `f` returns a state.
    fn each_data<F>(&mut self, id: u8, mut f: F)
    where
        F: FnMut(u8) -> Option<BlockState>,
    {
        for data in 0..16 {
            if let Some(state) = f(data) {
                self.set(id, data, state);
            }
        }
    }

    fn colored(&mut self, id: u8, suffix: &str) {
        self.variants(id, &DYE_COLORS.map(|color| format!("{}_{}", color, suffix)));
    }

    fn stairs(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| (data < 8).then(|| block(name)
            .with("facing", STAIRS_FACING[(data & 3) as usize])
            .with("half", if data & 4 != 0 { "top" } else { "bottom" })
            .with("shape", "straight")));
    }

    fn door(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| Some(if data < 8 {
            block(name)
                .with("facing", DOOR_FACING[(data & 3) as usize])
                .with("half", "lower")
                .with("hinge", "right")
                .with("open", bit(data, 4))
                .with("powered", "false")
        } else {
            block(name)
                .with("facing", "east")
                .with("half", "upper")
                .with("hinge", if data & 1 != 0 { "right" } else { "left" })
                .with("open", "false")
                .with("powered", bit(data, 2))
        }));
    }

    fn fence_gate(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| Some(block(name)
            .with("facing", SWNE[(data & 3) as usize])
            .with("in_wall", "false")
            .with("open", bit(data, 4))
            .with("powered", bit(data, 8))));
    }

    fn trapdoor(&mut self, id: u8, name: &str) {
        const FACING: [&'static str; 4] = ["north", "south", "west", "east"];
        self.each_data(id, |data| Some(block(name)
            .with("facing", FACING[(data & 3) as usize])
            .with("half", if data & 8 != 0 { "top" } else { "bottom" })
            .with("open", bit(data, 4))
            .with("powered", "false")));
    }

    fn horizontal(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| (data < 4).then(|| block(name)
            .with("facing", SWNE[data as usize])));
    }

    fn facing_2_to_5(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| (data < 6).then(|| block(name)
            .with("facing", facing_2_to_5(data))));
    }

    fn directional(&mut self, id: u8, name: &str, flag: &str) {
        self.each_data(id, |data| FACING_6.get((data & 7) as usize).map(|&facing| block(name)
            .with("facing", facing)
            .with(flag, bit(data, 8))));
    }

    fn rail(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| RAIL_SHAPES.get((data & 7) as usize)
            .filter(|_| data & 7 < 6)
            .map(|&shape| block(name)
                .with("powered", bit(data, 8))
                .with("shape", shape)));
    }

    fn pillar(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| axis(data).map(|axis| block(name).with("axis", axis)));
    }

    fn aged(&mut self, id: u8, name: &str, max_age: u8) {
        self.each_data(id, |data| (data <= max_age).then(|| block(name)
            .with("age", data.to_string())));
    }

    fn torch(&mut self, id: u8, wall: &str, floor: &str, lit: Option<bool>) {
        const FACING: [&'static str; 4] = ["east", "west", "south", "north"];
        self.each_data(id, |data| {
            let state = match data {
                1..=4 => block(wall).with("facing", FACING[data as usize - 1]),
                0 | 5 => block(floor),
                _ => return None,
            };
            Some(match lit {
                Some(lit) => state.with("lit", bool_str(lit)),
                None => state,
            })
        });
    }

    fn button(&mut self, id: u8, name: &str) {
        const WALL: [&'static str; 4] = ["east", "west", "south", "north"];
        self.each_data(id, |data| {
            let (face, facing) = match data & 7 {
                0 => ("ceiling", "north"),
                n @ 1..=4 => ("wall", WALL[n as usize - 1]),
                5 => ("floor", "north"),
                _ => return None,
            };
            Some(block(name)
                .with("face", face)
                .with("facing", facing)
                .with("powered", bit(data, 8)))
        });
    }

    fn powered_plate(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| (data < 2).then(|| block(name)
            .with("powered", bit(data, 1))));
    }

    fn weighted_plate(&mut self, id: u8, name: &str) {
        self.each_data(id, |data| Some(block(name).with("power", data.to_string())));
    }

    fn slab(&mut self, id: u8, names: &[String]) {
        self.each_data(id, |data| names.get((data & 7) as usize).map(|name| block(name)
            .with("type", if data & 8 != 0 { "top" } else { "bottom" })));
    }

    fn double_slab(&mut self, id: u8, names: &[String]) {
        self.each_data(id, |data| names.get(data as usize).map(|name| block(name)
            .with("type", "double")));
    }

    fn redstone_wire(&mut self, id: u8) {
        self.each_data(id, |data| Some(block("redstone_wire")
            .with("east", "none")
            .with("north", "none")
            .with("power", data.to_string())
            .with("south", "none")
            .with("west", "none")));
    }

    fn repeater(&mut self, id: u8, powered: bool) {
        self.each_data(id, |data| Some(block("repeater")
            .with("delay", ((data >> 2) + 1).to_string())
            .with("facing", SWNE[(data & 3) as usize])
            .with("locked", "false")
            .with("powered", bool_str(powered))));
    }

    fn comparator(&mut self, id: u8, powered: bool) {
        self.each_data(id, |data| Some(block("comparator")
            .with("facing", SWNE[(data & 3) as usize])
            .with("mode", if data & 4 != 0 { "subtract" } else { "compare" })
            .with("powered", bool_str(powered || data & 8 != 0))));
    }

    fn daylight_detector(&mut self, id: u8, inverted: bool) {
        self.each_data(id, |data| Some(block("daylight_detector")
            .with("inverted", bool_str(inverted))
            .with("power", data.to_string())));
    }
}


fn build() -> Vec<Option<BlockState>> {
    let mut t = TableBuilder {
        states: vec![None; NUM_LEGACY_KEYS],
    };

    t.simple(0, "air");
    t.variants(1, &[
        "stone",
        "granite",
        "polished_granite",
        "diorite",
        "polished_diorite",
        "andesite",
        "polished_andesite",
    ]);
    t.set(2, 0, block("grass_block").with("snowy", "false"));
    t.variants(3, &["dirt", "coarse_dirt"]);
    t.set(3, 2, block("podzol").with("snowy", "false"));
    t.simple(4, "cobblestone");
    t.variants(5, &WOODS.map(|wood| format!("{}_planks", wood)));
    t.each_data(6, |data| WOODS.get((data & 7) as usize).map(|wood| {
        block(&format!("{}_sapling", wood)).with("stage", if data & 8 != 0 { "1" } else { "0" })
    }));
    t.simple(7, "bedrock");
    for (id, name) in [(8, "flowing_water"), (9, "water"), (10, "flowing_lava"), (11, "lava")] {
        t.each_data(id, |data| Some(block(name).with("level", data.to_string())));
    }
    t.variants(12, &["sand", "red_sand"]);
    t.simple(13, "gravel");
    t.simple(14, "gold_ore");
    t.simple(15, "iron_ore");
    t.simple(16, "coal_ore");
    for (id, woods) in [(17, &WOODS[0..4]), (162, &WOODS[4..6])] {
        t.each_data(id, |data| woods.get((data & 3) as usize).map(|wood| match axis(data) {
            Some(axis) => block(&format!("{}_log", wood)).with("axis", axis),
            None => block(&format!("{}_bark", wood)),
        }));
    }
    for (id, woods) in [(18, &WOODS[0..4]), (161, &WOODS[4..6])] {
        t.each_data(id, |data| woods.get((data & 3) as usize).map(|wood| {
            block(&format!("{}_leaves", wood))
                .with("check_decay", bit(data, 8))
                .with("decayable", bool_str(data & 4 == 0))
        }));
    }
    t.variants(19, &["sponge", "wet_sponge"]);
    t.simple(20, "glass");
    t.simple(21, "lapis_ore");
    t.simple(22, "lapis_block");
    t.directional(23, "dispenser", "triggered");
    t.variants(24, &["sandstone", "chiseled_sandstone", "cut_sandstone"]);
    t.set(25, 0, block("note_block").with("note", "0").with("powered", "false"));
    t.each_data(26, |data| Some(block("red_bed")
        .with("facing", SWNE[(data & 3) as usize])
        .with("occupied", bit(data, 4))
        .with("part", if data & 8 != 0 { "head" } else { "foot" })));
    t.rail(27, "powered_rail");
    t.rail(28, "detector_rail");
    t.directional(29, "sticky_piston", "extended");
    t.simple(30, "cobweb");
    t.variants(31, &["dead_bush", "grass", "fern"]);
    t.simple(32, "dead_bush");
    t.directional(33, "piston", "extended");
    t.each_data(34, |data| FACING_6.get((data & 7) as usize).map(|&facing| block("piston_head")
        .with("facing", facing)
        .with("short", "false")
        .with("type", if data & 8 != 0 { "sticky" } else { "normal" })));
    t.colored(35, "wool");
    t.each_data(36, |data| FACING_6.get((data & 7) as usize).map(|&facing| block("moving_piston")
        .with("facing", facing)
        .with("type", if data & 8 != 0 { "sticky" } else { "normal" })));
    t.simple(37, "dandelion");
    t.variants(38, &[
        "poppy",
        "blue_orchid",
        "allium",
        "azure_bluet",
        "red_tulip",
        "orange_tulip",
        "white_tulip",
        "pink_tulip",
        "oxeye_daisy",
    ]);
    t.simple(39, "brown_mushroom");
    t.simple(40, "red_mushroom");
    t.simple(41, "gold_block");
    t.simple(42, "iron_block");

    let stone_slabs = SLABS.map(|slab| format!("{}_slab", slab));
    t.double_slab(43, &stone_slabs);
    t.simple(45, "bricks");
    t.set(43, 8, block("smooth_stone"));
    t.set(43, 9, block("smooth_sandstone"));
    t.set(43, 15, block("smooth_quartz"));
    t.slab(44, &stone_slabs);

    t.each_data(46, |data| (data < 2).then(|| block("tnt").with("unstable", bit(data, 1))));
    t.simple(47, "bookshelf");
    t.simple(48, "mossy_cobblestone");
    t.simple(49, "obsidian");
    t.torch(50, "wall_torch", "torch", None);
    t.aged(51, "fire", 15);
    t.simple(52, "spawner");
    t.facing_2_to_5(54, "chest");
    t.redstone_wire(55);
    t.simple(56, "diamond_ore");
    t.simple(57, "diamond_block");
    t.simple(58, "crafting_table");
    t.aged(59, "wheat", 7);
    t.each_data(60, |data| (data < 8).then(|| block("farmland").with("moisture", data.to_string())));
    for (id, lit) in [(61, false), (62, true)] {
        t.each_data(id, |data| (data < 6).then(|| block("furnace")
            .with("facing", facing_2_to_5(data))
            .with("lit", bool_str(lit))));
    }
    t.each_data(63, |data| Some(block("sign").with("rotation", data.to_string())));
    t.facing_2_to_5(65, "ladder");
    t.each_data(66, |data| RAIL_SHAPES.get(data as usize).map(|&shape| block("rail")
        .with("shape", shape)));
    t.facing_2_to_5(68, "wall_sign");
    t.each_data(69, |data| {
        let (face, facing) = match data & 7 {
            0 => ("ceiling", "west"),
            1 => ("wall", "east"),
            2 => ("wall", "west"),
            3 => ("wall", "south"),
            4 => ("wall", "north"),
            5 => ("floor", "north"),
            6 => ("floor", "west"),
            _ => ("ceiling", "north"),
        };
        Some(block("lever")
            .with("face", face)
            .with("facing", facing)
            .with("powered", bit(data, 8)))
    });
    t.powered_plate(70, "stone_pressure_plate");
    t.powered_plate(72, "oak_pressure_plate");
    t.set(73, 0, block("redstone_ore").with("lit", "false"));
    t.set(74, 0, block("redstone_ore").with("lit", "true"));
    t.torch(75, "redstone_wall_torch", "redstone_torch", Some(false));
    t.torch(76, "redstone_wall_torch", "redstone_torch", Some(true));
    t.button(77, "stone_button");
    t.button(143, "oak_button");
    t.each_data(78, |data| (data < 8).then(|| block("snow").with("layers", (data + 1).to_string())));
    t.simple(79, "ice");
    t.simple(80, "snow_block");
    t.aged(81, "cactus", 15);
    t.simple(82, "clay");
    t.aged(83, "sugar_cane", 15);
    t.each_data(84, |data| (data < 2).then(|| block("jukebox").with("has_record", bit(data, 1))));
    t.horizontal(86, "carved_pumpkin");
    t.simple(87, "netherrack");
    t.simple(88, "soul_sand");
    t.simple(89, "glowstone");
    t.each_data(90, |data| (data < 3).then(|| block("nether_portal")
        .with("axis", if data == 2 { "z" } else { "x" })));
    t.horizontal(91, "jack_o_lantern");
    t.each_data(92, |data| (data < 7).then(|| block("cake").with("bites", data.to_string())));
    t.repeater(93, false);
    t.repeater(94, true);
    t.colored(95, "stained_glass");
    t.trapdoor(96, "oak_trapdoor");
    t.trapdoor(167, "iron_trapdoor");
    t.variants(97, &[
        "infested_stone",
        "infested_cobblestone",
        "infested_stone_bricks",
        "infested_mossy_stone_bricks",
        "infested_cracked_stone_bricks",
        "infested_chiseled_stone_bricks",
    ]);
    t.variants(98, &[
        "stone_bricks",
        "mossy_stone_bricks",
        "cracked_stone_bricks",
        "chiseled_stone_bricks",
    ]);
    for (id, name) in [(99, "brown_mushroom_block"), (100, "red_mushroom_block")] {
        t.each_data(id, |data| Some(match data {
            10 | 15 => block("mushroom_stem"),
            _ => block(name),
        }));
    }
    t.simple(101, "iron_bars");
    t.simple(102, "glass_pane");
    t.simple(103, "melon_block");
    t.aged(104, "pumpkin_stem", 7);
    t.aged(105, "melon_stem", 7);
    t.each_data(106, |data| Some(block("vine")
        .with("east", bit(data, 8))
        .with("north", bit(data, 4))
        .with("south", bit(data, 1))
        .with("up", "false")
        .with("west", bit(data, 2))));
    t.set(110, 0, block("mycelium").with("snowy", "false"));
    t.simple(111, "lily_pad");
    t.simple(112, "nether_bricks");
    t.aged(115, "nether_wart", 3);
    t.simple(116, "enchanting_table");
    t.each_data(117, |data| (data < 8).then(|| block("brewing_stand")
        .with("has_bottle_0", bit(data, 1))
        .with("has_bottle_1", bit(data, 2))
        .with("has_bottle_2", bit(data, 4))));
    t.each_data(118, |data| (data < 4).then(|| block("cauldron").with("level", data.to_string())));
    t.simple(119, "end_portal");
    t.each_data(120, |data| (data < 8).then(|| block("end_portal_frame")
        .with("eye", bit(data, 4))
        .with("facing", SWNE[(data & 3) as usize])));
    t.simple(121, "end_stone");
    t.simple(122, "dragon_egg");
    t.set(123, 0, block("redstone_lamp").with("lit", "false"));
    t.set(124, 0, block("redstone_lamp").with("lit", "true"));

    let wooden_slabs = WOODS.map(|wood| format!("{}_slab", wood));
    t.double_slab(125, &wooden_slabs);
    t.slab(126, &wooden_slabs);

    t.each_data(127, |data| (data < 12).then(|| block("cocoa")
        .with("age", (data >> 2).to_string())
        .with("facing", SWNE[(data & 3) as usize])));
    t.simple(129, "emerald_ore");
    t.facing_2_to_5(130, "ender_chest");
    t.each_data(131, |data| Some(block("tripwire_hook")
        .with("attached", bit(data, 4))
        .with("facing", SWNE[(data & 3) as usize])
        .with("powered", bit(data, 8))));
    t.each_data(132, |data| Some(block("tripwire")
        .with("attached", bit(data, 4))
        .with("disarmed", bit(data, 8))
        .with("east", "false")
        .with("north", "false")
        .with("powered", bit(data, 1))
        .with("south", "false")
        .with("west", "false")));
    t.simple(133, "emerald_block");
    t.directional(137, "command_block", "conditional");
    t.simple(138, "beacon");
    t.variants(139, &["cobblestone_wall", "mossy_cobblestone_wall"]);
    t.simple(140, "flower_pot");
    t.aged(141, "carrots", 7);
    t.aged(142, "potatoes", 7);
    t.each_data(144, |data| FACING_6.get((data & 7) as usize).map(|&facing| {
        let name = if data & 7 < 2 { "skeleton_skull" } else { "skeleton_wall_skull" };
        block(name)
            .with("facing", facing)
            .with("nodrop", bit(data, 8))
    }));
    t.each_data(145, |data| ["anvil", "chipped_anvil", "damaged_anvil"]
        .get((data >> 2) as usize)
        .map(|name| block(name).with("facing", SWNE[(data & 3) as usize])));
    t.facing_2_to_5(146, "trapped_chest");
    t.weighted_plate(147, "light_weighted_pressure_plate");
    t.weighted_plate(148, "heavy_weighted_pressure_plate");
    t.comparator(149, false);
    t.comparator(150, true);
    t.daylight_detector(151, false);
    t.daylight_detector(178, true);
    t.simple(152, "redstone_block");
    t.simple(153, "nether_quartz_ore");
    t.each_data(154, |data| FACING_6.get((data & 7) as usize)
        .filter(|&&facing| facing != "up")
        .map(|&facing| block("hopper")
            .with("enabled", bool_str(data & 8 == 0))
            .with("facing", facing)));
    t.variants(155, &["quartz_block", "chiseled_quartz_block"]);
    t.set(155, 2, block("quartz_pillar").with("axis", "y"));
    t.set(155, 3, block("quartz_pillar").with("axis", "x"));
    t.set(155, 4, block("quartz_pillar").with("axis", "z"));
    t.rail(157, "activator_rail");
    t.directional(158, "dropper", "triggered");
    t.colored(159, "terracotta");
    t.colored(160, "stained_glass_pane");
    t.simple(165, "slime_block");
    t.simple(166, "barrier");
    t.variants(168, &["prismarine", "prismarine_bricks", "dark_prismarine"]);
    t.simple(169, "sea_lantern");
    t.pillar(170, "hay_block");
    t.colored(171, "carpet");
    t.simple(172, "terracotta");
    t.simple(173, "coal_block");
    t.simple(174, "packed_ice");
    t.each_data(175, |data| {
        const PLANTS: [&'static str; 6] = [
            "sunflower",
            "lilac",
            "tall_grass",
            "large_fern",
            "rose_bush",
            "peony",
        ];
        if data & 8 != 0 {
            // the upper half does not know which plant it belongs to
            Some(block("sunflower").with("half", "upper"))
        } else {
            PLANTS.get(data as usize).map(|plant| block(plant).with("half", "lower"))
        }
    });
    t.each_data(176, |data| Some(block("white_banner").with("rotation", data.to_string())));
    t.facing_2_to_5(177, "white_wall_banner");
    t.variants(179, &["red_sandstone", "chiseled_red_sandstone", "cut_red_sandstone"]);
    t.set(181, 0, block("red_sandstone_slab").with("type", "double"));
    t.set(181, 8, block("smooth_red_sandstone"));
    t.slab(182, &["red_sandstone_slab".to_owned()]);

    for (i, wood) in ["spruce", "birch", "jungle", "dark_oak", "acacia"].into_iter().enumerate() {
        t.fence_gate(183 + i as u8, &format!("{}_fence_gate", wood));
        t.simple(188 + i as u8, &format!("{}_fence", wood));
    }
    t.fence_gate(107, "oak_fence_gate");
    t.simple(85, "oak_fence");
    t.simple(113, "nether_brick_fence");

    t.door(64, "oak_door");
    t.door(71, "iron_door");
    for (i, wood) in ["spruce", "birch", "jungle", "acacia", "dark_oak"].into_iter().enumerate() {
        t.door(193 + i as u8, &format!("{}_door", wood));
    }

    for (id, name) in [
        (53, "oak_stairs"),
        (67, "cobblestone_stairs"),
        (108, "brick_stairs"),
        (109, "stone_brick_stairs"),
        (114, "nether_brick_stairs"),
        (128, "sandstone_stairs"),
        (134, "spruce_stairs"),
        (135, "birch_stairs"),
        (136, "jungle_stairs"),
        (156, "quartz_stairs"),
        (163, "acacia_stairs"),
        (164, "dark_oak_stairs"),
        (180, "red_sandstone_stairs"),
        (203, "purpur_stairs"),
    ] {
        t.stairs(id, name);
    }

    t.each_data(198, |data| FACING_6.get(data as usize).map(|&facing| block("end_rod")
        .with("facing", facing)));
    t.simple(199, "chorus_plant");
    t.aged(200, "chorus_flower", 5);
    t.simple(201, "purpur_block");
    t.pillar(202, "purpur_pillar");
    t.set(204, 0, block("purpur_slab").with("type", "double"));
    t.slab(205, &["purpur_slab".to_owned()]);
    t.simple(206, "end_stone_bricks");
    t.aged(207, "beetroots", 3);
    t.simple(208, "grass_path");
    t.simple(209, "end_gateway");
    t.directional(210, "repeating_command_block", "conditional");
    t.directional(211, "chain_command_block", "conditional");
    t.aged(212, "frosted_ice", 3);
    t.simple(213, "magma_block");
    t.simple(214, "nether_wart_block");
    t.simple(215, "red_nether_bricks");
    t.pillar(216, "bone_block");
    t.simple(217, "structure_void");
    t.directional(218, "observer", "powered");
    for (i, color) in DYE_COLORS.into_iter().enumerate() {
        let shulker_box = format!("{}_shulker_box", color);
        t.each_data(219 + i as u8, |data| FACING_6.get(data as usize).map(|&facing| {
            block(&shulker_box).with("facing", facing)
        }));
        t.horizontal(235 + i as u8, &format!("{}_glazed_terracotta", color));
    }
    t.colored(251, "concrete");
    t.colored(252, "concrete_powder");
    t.each_data(255, |data| ["save", "load", "corner", "data"]
        .get(data as usize)
        .map(|&mode| block("structure_block").with("mode", mode)));

    t.states
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_state::FILTER_ME;

    fn key(id: u16, data: u16) -> u16 {
        id << 4 | data
    }

    #[test]
    fn test_lookup_fallbacks() {
        assert_eq!(lookup(key(1, 3)).name, "minecraft:diorite");
        // unused data value falls back to data 0
        assert_eq!(lookup(key(1, 12)).name, "minecraft:stone");
        // unused id
        assert_eq!(lookup(key(253, 0)).name, FILTER_ME);
        // add nibble set
        assert_eq!(lookup(1 << 12 | key(1, 0)).name, FILTER_ME);
        assert!(lookup_exact(key(1, 12)).is_none());
    }

    #[test]
    fn test_door_halves() {
        let lower = lookup(key(64, 4 | 3));
        assert_eq!(lower.name, "minecraft:oak_door");
        assert_eq!(lower.property("half"), "lower");
        assert_eq!(lower.property("facing"), "north");
        assert_eq!(lower.property("open"), "true");

        let upper = lookup(key(197, 8 | 1 | 2));
        assert_eq!(upper.name, "minecraft:dark_oak_door");
        assert_eq!(upper.property("half"), "upper");
        assert_eq!(upper.property("hinge"), "right");
        assert_eq!(upper.property("powered"), "true");
    }

    #[test]
    fn test_leaves() {
        let leaves = lookup(key(18, 2 | 4));
        assert_eq!(leaves.name, "minecraft:birch_leaves");
        assert_eq!(leaves.property("decayable"), "false");
        assert_eq!(leaves.property("check_decay"), "false");
        assert_eq!(lookup(key(161, 1)).name, "minecraft:dark_oak_leaves");
        assert_eq!(lookup(key(17, 12)).name, "minecraft:oak_bark");
        assert_eq!(lookup(key(162, 1 | 4)).property("axis"), "x");
    }

    #[test]
    fn test_colors_and_ids() {
        assert_eq!(lookup(key(35, 14)).name, "minecraft:red_wool");
        assert_eq!(lookup(key(250, 2)).name, "minecraft:black_glazed_terracotta");
        assert_eq!(lookup(key(234, 1)).name, "minecraft:black_shulker_box");
        assert_eq!(lookup(key(186, 0)).name, "minecraft:dark_oak_fence_gate");
        assert_eq!(lookup(key(192, 0)).name, "minecraft:acacia_fence");
        assert_eq!(lookup(key(2, 0)).property("snowy"), "false");
        assert_eq!(lookup(key(78, 0)).name, "minecraft:snow");
        assert_eq!(lookup(key(175, 9)).property("half"), "upper");
        assert_eq!(lookup(key(144, 1)).property("facing"), "up");
        assert_eq!(lookup(key(144, 3)).name, "minecraft:skeleton_wall_skull");
    }
}
