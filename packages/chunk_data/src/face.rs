//! Directions between tiles, and between columns.

use vek::*;


/// Number of faces.
pub const NUM_FACES: usize = 6;

/// Direction from a tile to one of its six face neighbors.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum Face {
    Down,
    Up,
    /// Negative z.
    North,
    /// Positive z.
    South,
    /// Negative x.
    West,
    /// Positive x.
    East,
}

pub const FACES: [Face; NUM_FACES] = [
    Face::Down,
    Face::Up,
    Face::North,
    Face::South,
    Face::West,
    Face::East,
];

impl Face {
    /// Unit vector pointing this direction.
    pub fn to_vec(self) -> Vec3<i32> {
        match self {
            Face::Down => Vec3::new(0, -1, 0),
            Face::Up => Vec3::new(0, 1, 0),
            Face::North => Vec3::new(0, 0, -1),
            Face::South => Vec3::new(0, 0, 1),
            Face::West => Vec3::new(-1, 0, 0),
            Face::East => Vec3::new(1, 0, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Face::Down => Face::Up,
            Face::Up => Face::Down,
            Face::North => Face::South,
            Face::South => Face::North,
            Face::West => Face::East,
            Face::East => Face::West,
        }
    }
}


/// Number of sides.
pub const NUM_SIDES: usize = 8;

/// Horizontal direction from a column to one of its eight neighbor columns.
///
/// The discriminant is the bit index within `Sides`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum Side {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

pub const SIDES: [Side; NUM_SIDES] = [
    Side::North,
    Side::NorthEast,
    Side::East,
    Side::SouthEast,
    Side::South,
    Side::SouthWest,
    Side::West,
    Side::NorthWest,
];

impl Side {
    /// Single-bit mask of this side.
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }

    /// Offset in column coordinates <x, z> to the neighbor on this side.
    pub fn to_vec(self) -> Vec2<i32> {
        match self {
            Side::North => Vec2::new(0, -1),
            Side::NorthEast => Vec2::new(1, -1),
            Side::East => Vec2::new(1, 0),
            Side::SouthEast => Vec2::new(1, 1),
            Side::South => Vec2::new(0, 1),
            Side::SouthWest => Vec2::new(-1, 1),
            Side::West => Vec2::new(-1, 0),
            Side::NorthWest => Vec2::new(-1, -1),
        }
    }

    /// The side a tile touching the given column edges faces. A tile touching
    /// two edges faces the corner between them.
    pub fn of_edges(west: bool, east: bool, north: bool, south: bool) -> Option<Self> {
        if north {
            if east {
                Some(Side::NorthEast)
            } else if west {
                Some(Side::NorthWest)
            } else {
                Some(Side::North)
            }
        } else if south {
            if west {
                Some(Side::SouthWest)
            } else if east {
                Some(Side::SouthEast)
            } else {
                Some(Side::South)
            }
        } else if east {
            Some(Side::East)
        } else if west {
            Some(Side::West)
        } else {
            None
        }
    }
}


/// Set of sides, as a bit mask.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Sides(pub u8);

impl Sides {
    pub const NONE: Sides = Sides(0);

    /// Sides which a tile at the given x and z within a section or column
    /// touches, as a side mask. Empty for interior tiles.
    pub fn of_tile(x: u16, z: u16) -> Self {
        const EDGE: u16 = crate::coord::SECTION_EXTENT - 1;
        Side::of_edges(x == 0, x == EDGE, z == 0, z == EDGE)
            .map(Sides::from)
            .unwrap_or(Sides::NONE)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, side: Side) -> bool {
        self.0 & side.mask() != 0
    }

    pub fn insert(&mut self, side: Side) {
        self.0 |= side.mask();
    }

    pub fn remove(&mut self, side: Side) {
        self.0 &= !side.mask();
    }

    pub fn union(self, other: Sides) -> Sides {
        Sides(self.0 | other.0)
    }

    /// Iterate over the sides in the set, in discriminant order.
    pub fn iter(self) -> impl Iterator<Item=Side> {
        SIDES.into_iter().filter(move |&side| self.contains(side))
    }
}

impl From<Side> for Sides {
    fn from(side: Side) -> Self {
        Sides(side.mask())
    }
}


#[test]
fn test_side_masks() {
    assert_eq!(Side::North.mask(), 1);
    assert_eq!(Side::NorthEast.mask(), 2);
    assert_eq!(Side::East.mask(), 4);
    assert_eq!(Side::SouthEast.mask(), 8);
    assert_eq!(Side::South.mask(), 16);
    assert_eq!(Side::SouthWest.mask(), 32);
    assert_eq!(Side::West.mask(), 64);
    assert_eq!(Side::NorthWest.mask(), 128);
}

#[test]
fn test_sides_of_tile() {
    assert_eq!(Sides::of_tile(7, 7), Sides::NONE);
    assert_eq!(Sides::of_tile(0, 7).bits(), 64);
    assert_eq!(Sides::of_tile(15, 7).bits(), 4);
    assert_eq!(Sides::of_tile(7, 0).bits(), 1);
    assert_eq!(Sides::of_tile(7, 15).bits(), 16);
    assert_eq!(Sides::of_tile(0, 0).bits(), 128);
    assert_eq!(Sides::of_tile(15, 0).bits(), 2);
    assert_eq!(Sides::of_tile(0, 15).bits(), 32);
    assert_eq!(Sides::of_tile(15, 15).bits(), 8);
}

#[test]
fn test_sides_set_ops() {
    let mut sides = Sides::NONE;
    sides.insert(Side::East);
    sides.insert(Side::NorthWest);
    assert!(sides.contains(Side::East));
    assert!(!sides.contains(Side::West));
    assert_eq!(sides.iter().collect::<Vec<_>>(), vec![Side::East, Side::NorthWest]);
    sides.remove(Side::East);
    assert_eq!(sides, Sides::from(Side::NorthWest));
    assert_eq!(Sides(1).union(Sides(4)).bits(), 5);
}
