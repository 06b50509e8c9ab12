//! Data structures for the block storage of persisted chunk columns.
//!
//! ## columns, sections
//!
//! A stored chunk is a _column_ of 16 by 16 tiles horizontally and up to 256
//! tiles tall. It is split vertically into up to 16 _sections_ of 16x16x16
//! tiles, each of which stores its blocks independently.
//!
//! ## section local indices
//!
//! Relative to some section, a tile can be identified by a _section local
//! coordinate_ (slc), a 3-vec of integers between <0,0,0> (inclusive) and
//! <16,16,16> (exclusive). These are packed into a _section local index_
//! (sli) as such:
//!
//! ```text
//! y4|y3|y2|y1 | z4|z3|z2|z1 | x4|x3|x2|x1
//! ```
//!
//! which is the order in which per-tile arrays of a section are stored.
//!
//! ## local column indices
//!
//! Relative to a column, a tile can be identified by a _local column
//! coordinate_ (lcc) whose y component extends to 255, packed the same way
//! into a 16-bit _local column index_ (lci). The top 4 bits of an lci are
//! thus the section number and the bottom 12 bits are the sli within it.
//!
//! ## packed storage
//!
//! Per-tile block storage of a section is a `Palette` of distinct block
//! states, plus a `PackedBitArray` of 4096 palette ids, each `palette_bits`
//! wide. Legacy per-tile sub-byte data is stored in `NibbleArray`s.

mod coord;
mod face;
mod nibble;
mod packed;
mod palette;


pub use self::{
    coord::{
        SECTION_EXTENT,
        NUM_SLIS,
        NUM_SECTIONS,
        NUM_LCIS,
        MAX_LCC_Y,
        slc_to_sli,
        sli_get_x,
        sli_get_y,
        sli_get_z,
        sli_to_slc,
        lcc_to_lci,
        lci_to_lcc,
        lci_section,
        lci_to_sli,
        section_sli_to_lci,
        lci_relative,
    },
    face::{
        NUM_FACES,
        FACES,
        Face,
        NUM_SIDES,
        SIDES,
        Side,
        Sides,
    },
    nibble::{
        NIBBLE_ARRAY_BYTES,
        NibbleArray,
    },
    packed::{
        MAX_BITS,
        MIN_PALETTE_BITS,
        PackedBitArray,
        words_needed,
        ceil_log2,
        palette_bits,
    },
    palette::Palette,
};

/// Free functions over raw stored words.
pub mod packed_words {
    pub use crate::packed::{
        encode,
        decode,
        repack,
    };
}
