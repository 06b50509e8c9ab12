//! Error types.

use std::fmt::{self, Formatter, Display};


pub type Result<I> = std::result::Result<I, Error>;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    error: Box<dyn std::error::Error + Send + Sync>,
    fixer: Option<&'static str>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ErrorKind {
    /// A record, or a sub-record within one, is not shaped the way any
    /// version of its type could be.
    ///
    /// When this comes from a nested sub-record, that sub-record is dropped
    /// and migration of the enclosing record continues.
    MalformedData,

    /// The fixer chain itself is inconsistent: a fixer targets a type or
    /// choice its input schema does not define, or produces one its output
    /// schema does not define.
    ///
    /// This indicates a defect in the registry, not in the data, and always
    /// aborts migration of the record.
    SchemaMismatch,

    /// A migration was requested to a version older than the record's
    /// version, or the record claims a version newer than the registry
    /// knows.
    VersionOrder,
}

impl Error {
    pub fn new<E>(
        kind: ErrorKind,
        error: E,
        fixer: Option<&'static str>,
    ) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            error: error.into(),
            fixer,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Name of the fixer which failed, if the error came from one.
    pub fn fixer(&self) -> Option<&'static str> {
        self.fixer
    }

    /// Attribute to a fixer, unless already attributed.
    pub fn in_fixer(mut self, fixer: &'static str) -> Self {
        self.fixer.get_or_insert(fixer);
        self
    }

    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.error
    }

    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.error
    }
}

impl From<data_tree::Error> for Error {
    fn from(error: data_tree::Error) -> Self {
        Self::new(ErrorKind::MalformedData, error, None)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::MalformedData => "malformed data",
            ErrorKind::SchemaMismatch => "schema mismatch",
            ErrorKind::VersionOrder => "version order error",
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.kind, f)?;
        f.write_str(", ")?;
        Display::fmt(&self.error, f)?;
        if let Some(fixer) = self.fixer {
            f.write_str("\nfixer: ")?;
            f.write_str(fixer)?;
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
    ($k:ident, $fixer:expr, $($e:tt)*)=>{
        $crate::error::Error::new(
            $crate::error::ErrorKind::$k,
            format!($($e)*),
            $fixer,
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
