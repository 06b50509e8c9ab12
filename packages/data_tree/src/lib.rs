//! Dynamically typed tree values, the unit of persisted world data.
//!
//! A `Tree` is a map / list / string / number / byte array / int array /
//! long array. It can be stored as JSON through serde, or with the compact
//! tagged binary encoding in `codec`.

pub mod error;
pub mod number;
pub mod tree;
pub mod codec;
pub mod var_len;

pub use crate::{
    error::{
        Error,
        ErrorKind,
        Result,
    },
    number::Number,
    tree::Tree,
};
