#![forbid(unsafe_code)]

//! Table-view engine for qgrid.
//!
//! - [`columns`] / [`drag`]: per-table column visibility and order, and the
//!   drag-to-reorder controller of the column customizer.
//! - [`filter`] / [`pagination`]: the filter → clamp → paginate pipeline.
//! - [`overlay`] / [`dismiss`] / [`overlay_group`]: anchored floating panels
//!   and their outside-interaction lifecycle.
//! - [`grid`]: one table's state bundled behind a single `view` call.
//! - [`config`]: screen-level settings.

pub mod columns;
pub mod config;
pub mod dismiss;
pub mod drag;
pub mod filter;
pub mod grid;
pub mod overlay;
pub mod overlay_group;
pub mod pagination;

pub(crate) use qgrid_core::{debug, trace, warn};

pub use columns::{Column, ColumnError, ColumnKey, ColumnModel};
pub use config::{ConfigError, GridConfig};
pub use dismiss::{InteractionHub, Subscription};
pub use drag::{ColumnDrag, DragOutcome, DragState};
pub use filter::{DateRange, FieldValue, FilterError, FilterState, Predicate, Record, apply_filters};
pub use grid::{DataGrid, GridView};
pub use overlay::{
    Alignment, Anchor, CloseReason, OverlayAction, OverlayConfig, OverlayState, Placement, Side,
};
pub use overlay_group::{OverlayGroup, OverlayPolicy};
pub use pagination::{Page, PageCursor, PageItem, page_window, paginate, total_pages};
