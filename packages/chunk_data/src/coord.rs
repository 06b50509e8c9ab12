//! Coordinate bit-fiddling.

use crate::face::Face;
use vek::*;


/// Tiles along each axis of a section.
pub const SECTION_EXTENT: u16 = 16;

/// Number of section local indices.
pub const NUM_SLIS: usize = 0x1000;

/// Number of sections stacked in a column.
pub const NUM_SECTIONS: usize = 16;

/// Number of local column indices.
pub const NUM_LCIS: usize = 0x10000;

/// Max local column coordinate y component.
pub const MAX_LCC_Y: u16 = 0xff;


const XZ_MASK: u16 = 0b1111;
const Y_MASK: u16 = 0b11111111;

const Z_SHIFT: usize = 4;
const Y_SHIFT: usize = 8;
const SECTION_SHIFT: usize = 12;

fn validate<N>(c: Vec3<N>, y_max: u16) -> Vec3<u16>
where
    N: TryInto<u16>,
{
    let x = c.x.try_into().ok().expect("x out of range");
    let y = c.y.try_into().ok().expect("y out of range");
    let z = c.z.try_into().ok().expect("z out of range");

    assert!(x <= XZ_MASK, "x out of range");
    assert!(y <= y_max, "y out of range");
    assert!(z <= XZ_MASK, "z out of range");

    Vec3 { x, y, z }
}

/// Convert section local coordinate to section local index.
///
/// Panics if out of range.
pub fn slc_to_sli<N>(slc: Vec3<N>) -> u16
where
    N: TryInto<u16>,
{
    let slc = validate(slc, XZ_MASK);
    (slc.y << Y_SHIFT) | (slc.z << Z_SHIFT) | slc.x
}

/// Get x component of a section local index or a local column index.
pub fn sli_get_x(sli: u16) -> u16 {
    sli & XZ_MASK
}

/// Get y component of section local index.
pub fn sli_get_y(sli: u16) -> u16 {
    (sli >> Y_SHIFT) & XZ_MASK
}

/// Get z component of a section local index or a local column index.
pub fn sli_get_z(sli: u16) -> u16 {
    (sli >> Z_SHIFT) & XZ_MASK
}

/// Convert section local index to section local coordinate.
pub fn sli_to_slc(sli: u16) -> Vec3<u16> {
    Vec3 {
        x: sli_get_x(sli),
        y: sli_get_y(sli),
        z: sli_get_z(sli),
    }
}

/// Convert local column coordinate, with y in 0..=255, to local column index.
///
/// Panics if out of range.
pub fn lcc_to_lci<N>(lcc: Vec3<N>) -> u16
where
    N: TryInto<u16>,
{
    let lcc = validate(lcc, MAX_LCC_Y);
    (lcc.y << Y_SHIFT) | (lcc.z << Z_SHIFT) | lcc.x
}

/// Convert local column index to local column coordinate.
pub fn lci_to_lcc(lci: u16) -> Vec3<u16> {
    Vec3 {
        x: sli_get_x(lci),
        y: (lci >> Y_SHIFT) & Y_MASK,
        z: sli_get_z(lci),
    }
}

/// Which section of the column a local column index falls in.
pub fn lci_section(lci: u16) -> usize {
    (lci >> SECTION_SHIFT) as usize
}

/// The section local index part of a local column index.
pub fn lci_to_sli(lci: u16) -> u16 {
    lci & (NUM_SLIS as u16 - 1)
}

/// Combine a section number and section local index into a local column
/// index.
///
/// Panics if section out of range.
pub fn section_sli_to_lci(section: usize, sli: u16) -> u16 {
    assert!(section < NUM_SECTIONS, "section out of range");
    ((section as u16) << SECTION_SHIFT) | lci_to_sli(sli)
}

/// The local column index one tile over in the given direction, or `None` if
/// that falls outside the column.
pub fn lci_relative(lci: u16, face: Face) -> Option<u16> {
    let lcc = lci_to_lcc(lci).map(i32::from) + face.to_vec();
    if (0..SECTION_EXTENT as i32).contains(&lcc.x)
        && (0..=MAX_LCC_Y as i32).contains(&lcc.y)
        && (0..SECTION_EXTENT as i32).contains(&lcc.z)
    {
        Some(lcc_to_lci(lcc))
    } else {
        None
    }
}


#[test]
fn test_sli_round_trip() {
    for sli in 0..NUM_SLIS as u16 {
        assert_eq!(slc_to_sli(sli_to_slc(sli)), sli);
    }
    assert_eq!(slc_to_sli(Vec3::new(1, 2, 3)), 2 << 8 | 3 << 4 | 1);
}

#[test]
fn test_lci_layout() {
    let lci = lcc_to_lci(Vec3::new(5, 37, 9));
    assert_eq!(lci_section(lci), 2);
    assert_eq!(sli_to_slc(lci_to_sli(lci)), Vec3::new(5, 5, 9));
    assert_eq!(section_sli_to_lci(2, lci_to_sli(lci)), lci);
    assert_eq!(lci_to_lcc(lci), Vec3::new(5, 37, 9));
}

#[test]
fn test_lci_relative() {
    let lci = lcc_to_lci(Vec3::new(0, 15, 15));
    assert_eq!(lci_relative(lci, Face::Up), Some(lcc_to_lci(Vec3::new(0, 16, 15))));
    assert_eq!(lci_relative(lci, Face::West), None);
    assert_eq!(lci_relative(lci, Face::South), None);
    assert_eq!(lci_relative(lci, Face::North), Some(lcc_to_lci(Vec3::new(0, 15, 14))));
    assert_eq!(lci_relative(lcc_to_lci(Vec3::new(3, 255, 3)), Face::Up), None);
    assert_eq!(lci_relative(lcc_to_lci(Vec3::new(3, 0, 3)), Face::Down), None);
}
