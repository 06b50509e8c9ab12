
use crate::coord::NUM_SLIS;


/// Length in bytes of a per-section nibble array.
pub const NIBBLE_ARRAY_BYTES: usize = NUM_SLIS / 2;

const MASK: u8 = 0b1111;


/// Per-tile (within a section) storage of `u4`, two per byte. An even index
/// is stored in the low nibble of its byte, an odd index in the high nibble.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct NibbleArray(pub Box<[u8; NIBBLE_ARRAY_BYTES]>);

impl NibbleArray {
    /// Construct with all zeroes.
    pub fn new() -> Self {
        NibbleArray(Box::new([0; NIBBLE_ARRAY_BYTES]))
    }

    /// Read from the signed bytes of a stored byte array. `None` if the array
    /// is not exactly `NIBBLE_ARRAY_BYTES` long.
    pub fn from_bytes(bytes: &[i8]) -> Option<Self> {
        if bytes.len() != NIBBLE_ARRAY_BYTES {
            return None;
        }
        let mut array = Self::new();
        for (dst, &src) in array.0.iter_mut().zip(bytes) {
            *dst = src as u8;
        }
        Some(array)
    }

    /// Convert to signed bytes for storing as a byte array.
    pub fn to_bytes(&self) -> Vec<i8> {
        self.0.iter().map(|&b| b as i8).collect()
    }

    /// Get the value at some section local index.
    pub fn get(&self, sli: u16) -> u8 {
        let field = self.0[sli as usize >> 1];
        (field >> Self::shift(sli)) & MASK
    }

    /// Set the value at some section local index. Panics if value out of
    /// range.
    pub fn set(&mut self, sli: u16, val: u8) {
        assert!((val & !MASK) == 0, "val out of range");
        let shift = Self::shift(sli);
        let field = &mut self.0[sli as usize >> 1];
        *field = (*field & !(MASK << shift)) | (val << shift);
    }

    fn shift(sli: u16) -> u32 {
        (sli as u32 & 1) * 4
    }
}

impl Default for NibbleArray {
    fn default() -> Self {
        NibbleArray::new()
    }
}


#[test]
fn test_nibble_layout() {
    let mut bytes = vec![0i8; NIBBLE_ARRAY_BYTES];
    bytes[0] = 0x21;
    bytes[1] = 0xF3u8 as i8;
    let array = NibbleArray::from_bytes(&bytes).unwrap();
    assert_eq!(array.get(0), 1);
    assert_eq!(array.get(1), 2);
    assert_eq!(array.get(2), 3);
    assert_eq!(array.get(3), 15);
    assert_eq!(array.to_bytes(), bytes);
}

#[test]
fn test_nibble_set() {
    let mut array = NibbleArray::new();
    array.set(4095, 9);
    array.set(4094, 6);
    array.set(4095, 10);
    assert_eq!(array.get(4095), 10);
    assert_eq!(array.get(4094), 6);
    assert_eq!(array.0[2047], 0xA6);
}

#[test]
fn test_nibble_wrong_length() {
    assert!(NibbleArray::from_bytes(&[0; 2047]).is_none());
    assert!(NibbleArray::from_bytes(&[0; 4096]).is_none());
}
