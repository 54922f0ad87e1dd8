#![forbid(unsafe_code)]

//! Core: geometry, input events, and logging for the qgrid engine.
//!
//! # Role in qgrid
//! `qgrid-core` is the boundary layer. The hosting UI runtime translates its
//! native pointer, keyboard, scroll, and resize input into [`event::Event`]
//! values and reports element bounds as [`geometry::Rect`]s. The engine in
//! `qgrid-widgets` consumes only these types, so it never depends on a
//! particular rendering toolkit.

pub mod event;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
