//! Numeric leaf values.

use serde::{Serialize, Deserialize};


/// Numeric leaf of a `Tree`. The width of the stored number is preserved
/// across migration so that a field written as a byte is read back as a byte.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Integral value, truncating floating point numbers toward zero.
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Byte(n) => n as i64,
            Number::Short(n) => n as i64,
            Number::Int(n) => n as i64,
            Number::Long(n) => n,
            Number::Float(n) => n as i64,
            Number::Double(n) => n as i64,
        }
    }

    /// Integral value, truncating to 32 bits the way a narrowing cast would.
    pub fn as_i32(self) -> i32 {
        self.as_i64() as i32
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Float(n) => n as f64,
            Number::Double(n) => n,
            n => n.as_i64() as f64,
        }
    }

    /// Non-zero numbers are true.
    pub fn as_bool(self) -> bool {
        match self {
            Number::Float(n) => n != 0.0,
            Number::Double(n) => n != 0.0,
            n => n.as_i64() != 0,
        }
    }

    /// Whether this number is stored as an integer of some width.
    pub fn is_integral(self) -> bool {
        !matches!(self, Number::Float(_) | Number::Double(_))
    }
}

impl From<i8> for Number {
    fn from(n: i8) -> Self {
        Number::Byte(n)
    }
}

impl From<i16> for Number {
    fn from(n: i16) -> Self {
        Number::Short(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int(n)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Long(n)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::Float(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::Double(n)
    }
}

impl From<bool> for Number {
    fn from(b: bool) -> Self {
        Number::Byte(b as i8)
    }
}


#[test]
fn test_number_conversions() {
    assert_eq!(Number::Byte(-3).as_i32(), -3);
    assert_eq!(Number::Long(1 << 40).as_i32(), 0);
    assert_eq!(Number::Double(2.9).as_i64(), 2);
    assert!(Number::from(true).as_bool());
    assert!(!Number::Float(0.0).as_bool());
    assert!(Number::Short(7).is_integral());
    assert!(!Number::Double(7.0).is_integral());
}
