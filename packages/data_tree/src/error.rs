//! Error types.

use std::fmt::{self, Formatter, Display};


pub type Result<I> = std::result::Result<I, Error>;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    error: Box<dyn std::error::Error + Send + Sync>,
    position: Option<u64>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ErrorKind {
    /// Underlying IO error.
    Io,

    /// (Only when decoding) the bytes being decoded are not a valid encoded
    /// tree. This includes input which ends partway through a node.
    MalformedData,

    /// The tree is valid but exceeds a limit of the codec, such as nesting
    /// depth.
    PlatformLimits,
}

impl Error {
    pub fn new<E>(
        kind: ErrorKind,
        error: E,
        position: Option<u64>,
    ) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            error: error.into(),
            position,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset into the input at which the error was detected, if known.
    pub fn position(&self) -> Option<u64> {
        self.position
    }

    // attach a position if none was recorded closer to the failure
    pub(crate) fn at(mut self, position: u64) -> Self {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }

    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.error
    }

    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.error
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::UnexpectedEof => ErrorKind::MalformedData,
            _ => ErrorKind::Io,
        };
        Self::new(kind, error, None)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::Io => "IO error",
            ErrorKind::MalformedData => "malformed data",
            ErrorKind::PlatformLimits => "platform limits or malformed data",
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.kind, f)?;
        f.write_str(", ")?;
        Display::fmt(&self.error, f)?;
        if let Some(position) = self.position {
            write!(f, " (at byte {})", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner())
    }
}


macro_rules! error {
    ($k:ident, $position:expr, $($e:tt)*)=>{
        $crate::error::Error::new(
            $crate::error::ErrorKind::$k,
            format!($($e)*),
            $position,
        )
    };
}

macro_rules! bail {
    ($($e:tt)*)=>{ return Err($crate::error::error!($($e)*)) };
}

macro_rules! ensure {
    ($c:expr, $($e:tt)*)=>{
        if !$c {
            $crate::error::bail!($($e)*);
        }
    };
}

pub(crate) use error;
pub(crate) use bail;
pub(crate) use ensure;
