use core::fmt;

use crate::TemplateId;

/// Errors returned by [`crate::ListView`] and its collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The index does not address an item of the list.
    IndexOutOfRange { index: usize, count: usize },
    /// The template set has no default template.
    MissingDefaultTemplate,
    /// A template id that was never registered.
    UnknownTemplate(TemplateId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, count } => {
                write!(f, "index {index} is out of range for a list of {count} items")
            }
            Self::MissingDefaultTemplate => f.write_str("no default template registered"),
            Self::UnknownTemplate(id) => write!(f, "template {} is not registered", id.0),
        }
    }
}

impl core::error::Error for Error {}

impl From<listview::Error> for Error {
    fn from(err: listview::Error) -> Self {
        match err {
            listview::Error::IndexOutOfRange { index, count } => {
                Self::IndexOutOfRange { index, count }
            }
        }
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub(crate) fn check_index(index: usize, count: usize) -> Result<()> {
    if index < count {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { index, count })
    }
}
