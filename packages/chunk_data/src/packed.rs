//! Fixed-width unsigned integers packed into 64-bit words.
//!
//! Element `i` occupies bits `i * bits .. (i + 1) * bits` of the
//! concatenation of the words, with word 0 holding the lowest bits. An element
//! may straddle two adjacent words, in which case its low bits are the high
//! bits of the first word and its high bits are the low bits of the next.
//! This is the layout block storage was historically written in, so it must
//! not change.
//!
//! Stored arrays are signed (`i64`), the codec works on the same bits as
//! `u64`.


/// Max supported bits per element.
pub const MAX_BITS: u32 = 32;

/// Minimum bits per element of section block storage.
pub const MIN_PALETTE_BITS: u32 = 4;


/// Number of 64-bit words needed to store `len` elements of `bits` bits.
pub fn words_needed(len: usize, bits: u32) -> usize {
    (len * bits as usize + 63) / 64
}

/// Smallest `b` such that `2^b >= n`. Zero for `n <= 1`.
pub fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// Bits per element of section block storage indexing a palette of
/// `palette_len` entries.
pub fn palette_bits(palette_len: usize) -> u32 {
    MIN_PALETTE_BITS.max(ceil_log2(palette_len))
}

fn mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}


/// Fixed-length array of fixed-width unsigned integers.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct PackedBitArray {
    bits: u32,
    len: usize,
    words: Vec<u64>,
}

impl PackedBitArray {
    /// Construct with all zeroes.
    ///
    /// Panics if `bits` is not within `1..=MAX_BITS`.
    pub fn new(bits: u32, len: usize) -> Self {
        assert!((1..=MAX_BITS).contains(&bits), "bits out of range: {}", bits);
        PackedBitArray {
            bits,
            len,
            words: vec![0; words_needed(len, bits)],
        }
    }

    /// Wrap stored words. If there are too few words the missing tail reads
    /// as zero. Extra words are ignored.
    ///
    /// Panics if `bits` is not within `1..=MAX_BITS`.
    pub fn from_raw(bits: u32, len: usize, raw: &[i64]) -> Self {
        let mut array = Self::new(bits, len);
        for (dst, &src) in array.words.iter_mut().zip(raw) {
            *dst = src as u64;
        }
        array
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // (first word, last word, bit offset within first word)
    fn locate(&self, i: usize) -> (usize, usize, u32) {
        assert!(i < self.len, "index {} out of bounds for len {}", i, self.len);
        let bit = i * self.bits as usize;
        let word = bit >> 6;
        let end_word = ((i + 1) * self.bits as usize - 1) >> 6;
        (word, end_word, (bit & 63) as u32)
    }

    /// Get the element at some index. Panics if out of bounds.
    pub fn get(&self, i: usize) -> u32 {
        let (word, end_word, offset) = self.locate(i);
        let mut n = self.words[word] >> offset;
        if end_word != word {
            n |= self.words[end_word] << (64 - offset);
        }
        (n & mask(self.bits)) as u32
    }

    /// Set the element at some index. The value is masked to `bits` bits.
    /// Panics if out of bounds.
    pub fn set(&mut self, i: usize, val: u32) {
        let (word, end_word, offset) = self.locate(i);
        let mask = mask(self.bits);
        let val = val as u64 & mask;
        self.words[word] = self.words[word] & !(mask << offset) | (val << offset);
        if end_word != word {
            let hi_shift = 64 - offset;
            self.words[end_word] = self.words[end_word] & !(mask >> hi_shift) | (val >> hi_shift);
        }
    }

    /// Iterate over elements in index order.
    pub fn iter(&self) -> impl Iterator<Item=u32> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// Copy into a new array with a different element width. Elements which
    /// do not fit the new width are masked.
    pub fn repack(&self, bits: u32) -> Self {
        let mut array = Self::new(bits, self.len);
        for (i, n) in self.iter().enumerate() {
            array.set(i, n);
        }
        array
    }

    /// Words as stored.
    pub fn to_raw(&self) -> Vec<i64> {
        self.words.iter().map(|&w| w as i64).collect()
    }

    pub fn into_raw(self) -> Vec<i64> {
        self.to_raw()
    }
}


/// Pack values into words. Panics if `bits` is not within `1..=MAX_BITS`.
pub fn encode(values: &[u32], bits: u32) -> Vec<i64> {
    let mut array = PackedBitArray::new(bits, values.len());
    for (i, &n) in values.iter().enumerate() {
        array.set(i, n);
    }
    array.into_raw()
}

/// Unpack `count` values from words. Panics if `bits` is not within
/// `1..=MAX_BITS`.
pub fn decode(words: &[i64], bits: u32, count: usize) -> Vec<u32> {
    PackedBitArray::from_raw(bits, count, words).iter().collect()
}

/// Unpack `count` values at one width and pack them at another.
pub fn repack(words: &[i64], from_bits: u32, to_bits: u32, count: usize) -> Vec<i64> {
    PackedBitArray::from_raw(from_bits, count, words).repack(to_bits).into_raw()
}
