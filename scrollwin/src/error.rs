use alloc::boxed::Box;
use core::fmt;

/// Failure raised by a layout strategy during recomputation.
///
/// A failing reflow is not retried; the orchestrator keeps the last
/// successfully computed range in effect.
#[derive(Debug)]
pub enum LayoutError {
    /// A scroll-to-index request targets an index at or past the item
    /// count. The pending request is dropped, never clamped.
    TargetOutOfRange { index: usize, count: usize },
    /// A strategy-specific failure.
    Strategy(Box<dyn core::error::Error + Send + Sync>),
}

impl LayoutError {
    /// Wraps a strategy-specific error.
    pub fn strategy(err: impl core::error::Error + Send + Sync + 'static) -> Self {
        Self::Strategy(Box::new(err))
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetOutOfRange { index, count } => {
                write!(f, "scroll-to target {index} out of range (count {count})")
            }
            Self::Strategy(err) => write!(f, "layout strategy failed: {err}"),
        }
    }
}

impl core::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Strategy(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
