use core::fmt;

use scrollwin::LayoutError;

/// Failure surfaced by a [`Scroller`](crate::Scroller) operation.
#[derive(Debug)]
pub enum ScrollerError {
    /// A scroll-to-index target at or past the current item count. Failed
    /// fast, never clamped to the nearest valid index.
    IndexOutOfRange { index: usize, count: usize },
    /// The active layout failed during recomputation. The last emitted
    /// range stays in effect.
    Layout(LayoutError),
}

impl fmt::Display for ScrollerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, count } => {
                write!(f, "scroll-to index {index} out of range (count {count})")
            }
            Self::Layout(err) => write!(f, "layout recomputation failed: {err}"),
        }
    }
}

impl core::error::Error for ScrollerError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutError> for ScrollerError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}
