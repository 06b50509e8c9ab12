//! Variable-length integers used by the binary codec for lengths and
//! integral numbers.

use crate::error::*;
use std::io::{
    Read,
    Write,
};


const MORE_BIT: u8  = 0b10000000;
const LO_7_BITS: u8 = 0b01111111;

const ENCODED_SIGN_BIT: u8 = 0b01000000;
const LO_6_BITS: u8        = 0b00111111;

// max bytes a 64-bit value can take in either encoding
const MAX_BYTES: usize = 10;


fn read_byte<R: Read>(read: &mut R) -> Result<u8> {
    let mut buf = [0];
    read.read_exact(&mut buf)?;
    let [byte] = buf;
    Ok(byte)
}

/// Write a variable length unsigned int, 7 bits per byte, low bits first.
pub fn write_var_len_uint<W>(
    write: &mut W,
    mut n: u64,
) -> Result<()>
where
    W: Write,
{
    let mut more = true;
    while more {
        let curr_7_bits = (n & (LO_7_BITS as u64)) as u8;
        n >>= 7;
        more = n != 0;
        write.write_all(&[((more as u8) << 7) | curr_7_bits])?;
    }
    Ok(())
}

/// Read a variable length unsigned int.
pub fn read_var_len_uint<R>(
    read: &mut R,
) -> Result<u64>
where
    R: Read,
{
    let mut n: u64 = 0;
    let mut shift = 0;
    for _ in 0..MAX_BYTES {
        let curr_byte = read_byte(read)?;
        n |= ((curr_byte & LO_7_BITS) as u64).checked_shl(shift).unwrap_or(0);
        shift += 7;
        if (curr_byte & MORE_BIT) == 0 {
            return Ok(n);
        }
    }
    bail!(MalformedData, None, "too many bytes in var len uint")
}

/// Write a variable length signed int. The first byte carries the sign bit
/// and 6 bits of magnitude, following bytes carry 7 bits each.
pub fn write_var_len_sint<W>(
    write: &mut W,
    mut n: i64,
) -> Result<()>
where
    W: Write,
{
    let neg = n < 0;
    if neg {
        n = !n;
    }
    let curr_7_bits = ((neg as u8) << 6) | (n & (LO_6_BITS as i64)) as u8;
    n >>= 6;
    let mut more = n != 0;
    write.write_all(&[((more as u8) << 7) | curr_7_bits])?;

    while more {
        let curr_7_bits = (n & (LO_7_BITS as i64)) as u8;
        n >>= 7;
        more = n != 0;
        write.write_all(&[((more as u8) << 7) | curr_7_bits])?;
    }
    Ok(())
}

/// Read a variable length signed int.
pub fn read_var_len_sint<R>(
    read: &mut R,
) -> Result<i64>
where
    R: Read,
{
    let first = read_byte(read)?;
    let neg = (first & ENCODED_SIGN_BIT) != 0;
    let mut n = (first & LO_6_BITS) as i64;
    let mut more = (first & MORE_BIT) != 0;
    let mut shift = 6;
    let mut bytes = 1;

    while more {
        ensure!(
            bytes < MAX_BYTES,
            MalformedData,
            None,
            "too many bytes in var len sint",
        );
        let curr_byte = read_byte(read)?;
        n |= ((curr_byte & LO_7_BITS) as i64).checked_shl(shift).unwrap_or(0);
        shift += 7;
        bytes += 1;
        more = (curr_byte & MORE_BIT) != 0;
    }

    if neg {
        n = !n;
    }
    Ok(n)
}

#[test]
fn test_var_len_uint() {
    let mut buf = Vec::new();
    for n in (0..2 << 10).chain([u32::MAX as u64, u64::MAX]) {
        buf.clear();
        write_var_len_uint(&mut buf, n).unwrap();
        let n2 = read_var_len_uint(&mut buf.as_slice()).unwrap();
        assert_eq!(n, n2);
    }
}

#[test]
fn test_var_len_sint() {
    let mut buf = Vec::new();
    for n in (-(2 << 10)..2 << 10).chain([i64::MIN, i64::MAX]) {
        buf.clear();
        write_var_len_sint(&mut buf, n).unwrap();
        let n2 = read_var_len_sint(&mut buf.as_slice()).unwrap();
        assert_eq!(n, n2);
    }
}

#[test]
fn test_var_len_truncated() {
    let err = read_var_len_uint(&mut [0x80u8, 0x80].as_slice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedData);
    let err = read_var_len_uint(&mut [0xffu8; 11].as_slice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedData);
}
