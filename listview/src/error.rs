use core::fmt;

/// Errors returned by the explicit setter APIs of [`crate::ListEngine`].
///
/// Queries never fail; they return `None` for indexes outside the list instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The index does not address an item of the list.
    IndexOutOfRange { index: usize, count: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, count } => {
                write!(f, "index {index} is out of range for a list of {count} items")
            }
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T, E = Error> = core::result::Result<T, E>;
