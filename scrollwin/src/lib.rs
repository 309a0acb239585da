//! A windowed scrolling core.
//!
//! This crate holds the math half of a virtualized scrolling engine: given
//! an item count, container geometry, and a scroll offset, a pluggable
//! [`Layout`] strategy decides which index window must be rendered, where
//! each item sits, and how long the simulated scrollable surface is.
//!
//! It is host-agnostic. An orchestration layer (see the
//! `scrollwin-scroller` crate) is expected to provide:
//! - container size and scroll offsets from a real scrollable surface
//! - post-render item measurements
//! - delivery of the computed window to whatever renders children
//!
//! Two strategies ship here: [`FlowLayout`], the reference one-dimensional
//! layout with estimate-then-measure sizing, and [`GridLayout`], a uniform
//! lane-based layout. Both can be picked declaratively via
//! [`LayoutConfig`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod fenwick;
mod flow;
mod grid;
mod layout;
mod types;


pub use error::LayoutError;
pub use flow::{EstimateFn, FlowLayout, FlowOptions};
pub use grid::{GridLayout, GridOptions};
pub use layout::{Layout, LayoutConfig, LayoutKind, LayoutSpec};
pub use types::{
    Align, Direction, LayoutUpdate, PlacedItem, ScrollDirection, ScrollToRequest, Size,
    VisibleRange,
};
