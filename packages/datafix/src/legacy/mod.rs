//! Tables describing the pre-flattening world format.

mod block_table;

pub use self::block_table::{
    NUM_LEGACY_KEYS,
    lookup,
    lookup_exact,
};


/// Dye colors in wool order, legacy color index 0 to 15.
pub const DYE_COLORS: [&'static str; 16] = [
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "light_gray",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
];

/// Dye color with some wool-order index, if in range.
pub fn dye_color(index: i32) -> Option<&'static str> {
    usize::try_from(index).ok().and_then(|i| DYE_COLORS.get(i)).copied()
}

/// Numeric id portion of a legacy composite block key.
pub fn key_id(key: u16) -> u16 {
    key >> 4
}

/// Auxiliary data portion of a legacy composite block key.
pub fn key_data(key: u16) -> u8 {
    (key & 0xf) as u8
}

/// Compose a legacy composite block key from its parts.
pub fn compose_key(add: u8, id: u8, data: u8) -> u16 {
    (add as u16 & 0xf) << 12 | (id as u16) << 4 | (data as u16 & 0xf)
}


#[test]
fn test_keys() {
    let key = compose_key(1, 0x23, 7);
    assert_eq!(key, 0x1237);
    assert_eq!(key_id(key), 0x123);
    assert_eq!(key_data(key), 7);
    assert_eq!(dye_color(14), Some("red"));
    assert_eq!(dye_color(16), None);
    assert_eq!(dye_color(-1), None);
}
