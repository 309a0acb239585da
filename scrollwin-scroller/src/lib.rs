//! Scroll orchestration for the `scrollwin` layout core.
//!
//! The core crate computes windows; this crate owns everything around that
//! computation: the [`Scroller`] binds a [`ScrollHost`] (container plus
//! scroll target), holds the item collection and the active layout
//! strategy, turns host signals into layout passes, keeps the host's
//! spacer sized to the simulated extent, and emits the range-change
//! notifications the view layer renders from.
//!
//! View-binding layers keep their per-site configuration (render and key
//! functions) in a [`BindingArena`], an explicit generational store with
//! visible teardown.
//!
//! Everything here is synchronous and single-threaded. The only deferred
//! path is scroll-to-index before the host is attached: the request
//! suspends and the embedder's next [`Scroller::tick`] retries it.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod binding;
mod error;
mod host;
mod key;
mod scroller;

#[cfg(test)]
mod tests;

pub use binding::{BindingArena, BindingConfig, BindingHandle, ConfigError, RenderFn, SiteKeyFn};
pub use error::ScrollerError;
pub use host::ScrollHost;
pub use key::ItemKey;
pub use scroller::{EventFn, KeyFn, Scroller, ScrollerEvent};
