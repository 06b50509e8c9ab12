//! Compact binary encoding of a `Tree`.
//!
//! Every node is a tag byte followed by its payload:
//!
//! - byte: 1 raw byte
//! - short, int, long: var len sint
//! - float, double: little-endian IEEE bytes
//! - string: var len uint byte length, then UTF-8 bytes
//! - list: var len uint element count, then each element node
//! - map: var len uint entry count, then each key (as a string payload, no
//!   tag) followed by its value node
//! - byte array: var len uint length, then raw bytes
//! - int array, long array: var len uint length, then each var len sint
//!
//! Decoding never panics on bad input. Input which ends partway through a
//! node, has an unknown tag, or has trailing bytes is `MalformedData`.

use crate::{
    error::*,
    number::Number,
    tree::Tree,
    var_len::*,
};
use std::{
    collections::BTreeMap,
    io::{
        self,
        Read,
        Write,
    },
};


/// Maximum nesting depth of lists and maps.
pub const MAX_DEPTH: usize = 512;

// upper bound on speculative allocation from an untrusted length prefix
const MAX_PREALLOC: usize = 4096;

const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_STRING: u8 = 7;
const TAG_LIST: u8 = 8;
const TAG_MAP: u8 = 9;
const TAG_BYTE_ARRAY: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;


/// Encode a tree to bytes.
pub fn encode(tree: &Tree) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_to(tree, &mut buf)?;
    Ok(buf)
}

/// Encode a tree to a writer.
pub fn encode_to<W: Write>(tree: &Tree, write: &mut W) -> Result<()> {
    encode_node(tree, write, 0)
}

/// Decode a tree from bytes, which must contain exactly one tree.
pub fn decode(bytes: &[u8]) -> Result<Tree> {
    let mut read = CountingRead { inner: bytes, pos: 0 };
    let tree = decode_node(&mut read, 0).map_err(|e| e.at(read.pos))?;
    ensure!(
        read.inner.is_empty(),
        MalformedData,
        Some(read.pos),
        "{} trailing bytes after tree",
        read.inner.len(),
    );
    Ok(tree)
}

/// Decode one tree from a reader, leaving any following bytes unread.
pub fn decode_from<R: Read>(read: &mut R) -> Result<Tree> {
    let mut read = CountingRead { inner: read, pos: 0 };
    decode_node(&mut read, 0).map_err(|e| e.at(read.pos))
}


fn encode_len<W: Write>(write: &mut W, len: usize) -> Result<()> {
    write_var_len_uint(write, len as u64)
}

fn encode_str<W: Write>(write: &mut W, s: &str) -> Result<()> {
    encode_len(write, s.len())?;
    write.write_all(s.as_bytes())?;
    Ok(())
}

fn encode_node<W: Write>(tree: &Tree, write: &mut W, depth: usize) -> Result<()> {
    match tree {
        &Tree::Number(Number::Byte(n)) => write.write_all(&[TAG_BYTE, n as u8])?,
        &Tree::Number(Number::Short(n)) => {
            write.write_all(&[TAG_SHORT])?;
            write_var_len_sint(write, n as i64)?;
        }
        &Tree::Number(Number::Int(n)) => {
            write.write_all(&[TAG_INT])?;
            write_var_len_sint(write, n as i64)?;
        }
        &Tree::Number(Number::Long(n)) => {
            write.write_all(&[TAG_LONG])?;
            write_var_len_sint(write, n)?;
        }
        &Tree::Number(Number::Float(n)) => {
            write.write_all(&[TAG_FLOAT])?;
            write.write_all(&n.to_le_bytes())?;
        }
        &Tree::Number(Number::Double(n)) => {
            write.write_all(&[TAG_DOUBLE])?;
            write.write_all(&n.to_le_bytes())?;
        }
        &Tree::String(ref s) => {
            write.write_all(&[TAG_STRING])?;
            encode_str(write, s)?;
        }
        &Tree::List(ref elems) => {
            ensure!(depth < MAX_DEPTH, PlatformLimits, None, "tree nested deeper than {}", MAX_DEPTH);
            write.write_all(&[TAG_LIST])?;
            encode_len(write, elems.len())?;
            for elem in elems {
                encode_node(elem, write, depth + 1)?;
            }
        }
        &Tree::Map(ref fields) => {
            ensure!(depth < MAX_DEPTH, PlatformLimits, None, "tree nested deeper than {}", MAX_DEPTH);
            write.write_all(&[TAG_MAP])?;
            encode_len(write, fields.len())?;
            for (key, value) in fields {
                encode_str(write, key)?;
                encode_node(value, write, depth + 1)?;
            }
        }
        &Tree::ByteArray(ref bytes) => {
            write.write_all(&[TAG_BYTE_ARRAY])?;
            encode_len(write, bytes.len())?;
            let bytes = bytes.iter().map(|&b| b as u8).collect::<Vec<u8>>();
            write.write_all(&bytes)?;
        }
        &Tree::IntArray(ref ints) => {
            write.write_all(&[TAG_INT_ARRAY])?;
            encode_len(write, ints.len())?;
            for &n in ints {
                write_var_len_sint(write, n as i64)?;
            }
        }
        &Tree::LongArray(ref longs) => {
            write.write_all(&[TAG_LONG_ARRAY])?;
            encode_len(write, longs.len())?;
            for &n in longs {
                write_var_len_sint(write, n)?;
            }
        }
    }
    Ok(())
}


// reader wrapper which tracks the byte offset for error messages
struct CountingRead<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> Read for CountingRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

fn decode_len<R: Read>(read: &mut R) -> Result<usize> {
    let len = read_var_len_uint(read)?;
    usize::try_from(len)
        .map_err(|_| error!(PlatformLimits, None, "length {} does not fit in memory", len))
}

fn decode_fixed<R: Read, const N: usize>(read: &mut R) -> Result<[u8; N]> {
    let mut buf = [0; N];
    read.read_exact(&mut buf)?;
    Ok(buf)
}

fn decode_str<R: Read>(read: &mut R) -> Result<String> {
    let len = decode_len(read)?;
    let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
    (&mut *read).take(len as u64).read_to_end(&mut buf)?;
    ensure!(buf.len() == len, MalformedData, None, "string ended early");
    String::from_utf8(buf)
        .map_err(|e| error!(MalformedData, None, "string not UTF-8: {}", e))
}

fn decode_sint_as<R: Read, T: TryFrom<i64>>(read: &mut R, what: &str) -> Result<T> {
    let n = read_var_len_sint(read)?;
    T::try_from(n).map_err(|_| error!(MalformedData, None, "{} out of range: {}", what, n))
}

fn decode_node<R: Read>(read: &mut R, depth: usize) -> Result<Tree> {
    let [tag] = decode_fixed::<_, 1>(read)?;
    Ok(match tag {
        TAG_BYTE => {
            let [b] = decode_fixed::<_, 1>(read)?;
            Tree::Number(Number::Byte(b as i8))
        }
        TAG_SHORT => Tree::Number(Number::Short(decode_sint_as(read, "short")?)),
        TAG_INT => Tree::Number(Number::Int(decode_sint_as(read, "int")?)),
        TAG_LONG => Tree::Number(Number::Long(read_var_len_sint(read)?)),
        TAG_FLOAT => Tree::Number(Number::Float(f32::from_le_bytes(decode_fixed(read)?))),
        TAG_DOUBLE => Tree::Number(Number::Double(f64::from_le_bytes(decode_fixed(read)?))),
        TAG_STRING => Tree::String(decode_str(read)?),
        TAG_LIST => {
            ensure!(depth < MAX_DEPTH, PlatformLimits, None, "tree nested deeper than {}", MAX_DEPTH);
            let len = decode_len(read)?;
            let mut elems = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                elems.push(decode_node(read, depth + 1)?);
            }
            Tree::List(elems)
        }
        TAG_MAP => {
            ensure!(depth < MAX_DEPTH, PlatformLimits, None, "tree nested deeper than {}", MAX_DEPTH);
            let len = decode_len(read)?;
            let mut fields = BTreeMap::new();
            for _ in 0..len {
                let key = decode_str(read)?;
                let value = decode_node(read, depth + 1)?;
                if fields.contains_key(&key) {
                    bail!(MalformedData, None, "duplicate map key {:?}", key);
                }
                fields.insert(key, value);
            }
            Tree::Map(fields)
        }
        TAG_BYTE_ARRAY => {
            let len = decode_len(read)?;
            let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
            (&mut *read).take(len as u64).read_to_end(&mut buf)?;
            ensure!(buf.len() == len, MalformedData, None, "byte array ended early");
            Tree::ByteArray(buf.into_iter().map(|b| b as i8).collect())
        }
        TAG_INT_ARRAY => {
            let len = decode_len(read)?;
            let mut ints = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                ints.push(decode_sint_as(read, "int")?);
            }
            Tree::IntArray(ints)
        }
        TAG_LONG_ARRAY => {
            let len = decode_len(read)?;
            let mut longs = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                longs.push(read_var_len_sint(read)?);
            }
            Tree::LongArray(longs)
        }
        tag => bail!(MalformedData, None, "unknown node tag {}", tag),
    })
}


#[cfg(test)]
fn sample_chunk() -> Tree {
    Tree::empty_map()
        .with("DataVersion", 1343i32)
        .with("Level", Tree::empty_map()
            .with("xPos", -3i32)
            .with("LastUpdate", 99999999999i64)
            .with("convertedFromAlphaFormat", true)
            .with("Sections", vec![
                Tree::empty_map()
                    .with("Y", 2i8)
                    .with("Blocks", vec![-1i8; 4096])
                    .with("Data", vec![7i8; 2048]),
            ])
            .with("Heights", vec![64i32, -1, i32::MAX])
            .with("BlockStates", vec![i64::MIN, 0, 1])
            .with("Name", "ünïcode")
            .with("Scale", 1.5f32)
            .with("Exact", -0.25f64)
            .with("Small", -300i16))
}

#[test]
fn test_codec_round_trip() {
    let tree = sample_chunk();
    let bytes = encode(&tree).unwrap();
    assert_eq!(decode(&bytes).unwrap(), tree);
    assert_eq!(decode_from(&mut bytes.as_slice()).unwrap(), tree);
}

#[test]
fn test_codec_truncated() {
    let bytes = encode(&sample_chunk()).unwrap();
    for len in [0, 1, bytes.len() / 2, bytes.len() - 1] {
        let err = decode(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData, "truncated to {}", len);
        assert!(err.position().is_some());
    }
}

#[test]
fn test_codec_rejects_garbage() {
    assert_eq!(decode(&[200]).unwrap_err().kind(), ErrorKind::MalformedData);
    let mut bytes = encode(&Tree::from(1i8)).unwrap();
    bytes.push(0);
    assert_eq!(decode(&bytes).unwrap_err().kind(), ErrorKind::MalformedData);
    // string claiming to be huge
    let err = decode(&[TAG_STRING, 0xff, 0xff, 0xff, 0x7f]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedData);
}

#[test]
fn test_codec_depth_limit() {
    let mut tree = Tree::empty_map();
    for _ in 0..MAX_DEPTH + 1 {
        tree = Tree::List(vec![tree]);
    }
    assert_eq!(encode(&tree).unwrap_err().kind(), ErrorKind::PlatformLimits);
}
