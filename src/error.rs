//! Error types.
//!
//! The simulator application reports failures as opaque conditions: a spawn
//! either takes or it doesn't, and the engine offers little more than a
//! status string to explain why. Mirroring that, this library uses a single
//! opaque error type that attempts to provide as much information in the
//! display as possible.
use std::{borrow::Cow, error, fmt};

#[derive(Debug, Clone)]
pub struct Error {
    ctx: Cow<'static, str>,
}

impl Error {
    /// Creates a new error from the provided static string.
    ///
    /// This is not implemented as `From<_>` in order to keep the functionality from being exposed
    /// to users of the crate.
    pub(crate) fn new(ctx: &'static str) -> Error {
        Error {
            ctx: Cow::Borrowed(ctx),
        }
    }

    /// Creates a new error from the provided `String`.
    pub(crate) fn with(ctx: String) -> Error {
        Error {
            ctx: Cow::Owned(ctx),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ctx)
    }
}

impl error::Error for Error {}
