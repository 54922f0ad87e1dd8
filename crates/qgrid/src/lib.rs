#![forbid(unsafe_code)]

//! qgrid public facade crate.
//!
//! Re-exports the engine types from `qgrid-core` and `qgrid-widgets` and
//! offers a prelude for screens that host data tables.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use qgrid_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};
pub use qgrid_core::geometry::{Rect, Size};

// --- Engine re-exports -----------------------------------------------------

pub use qgrid_widgets::columns::{Column, ColumnError, ColumnKey, ColumnModel};
pub use qgrid_widgets::config::{ConfigError, GridConfig};
pub use qgrid_widgets::dismiss::{InteractionHub, Subscription};
pub use qgrid_widgets::drag::{ColumnDrag, DragOutcome, DragState};
pub use qgrid_widgets::filter::{
    DateRange, FieldValue, FilterError, FilterState, Predicate, Record, apply_filters,
};
pub use qgrid_widgets::grid::{DataGrid, GridView};
pub use qgrid_widgets::overlay::{
    Alignment, Anchor, CloseReason, OverlayAction, OverlayConfig, OverlayState, Placement, Side,
};
pub use qgrid_widgets::overlay_group::{OverlayGroup, OverlayPolicy};
pub use qgrid_widgets::pagination::{
    Page, PageCursor, PageItem, page_window, paginate, total_pages,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for qgrid hosts.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while loading host resources.
    Io(std::io::Error),
    /// A column list or column mutation was rejected.
    Column(ColumnError),
    /// User-entered filter input could not be parsed.
    Filter(FilterError),
    /// Screen configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Column(err) => write!(f, "{err}"),
            Self::Filter(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Column(err) => Some(err),
            Self::Filter(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ColumnError> for Error {
    fn from(err: ColumnError) -> Self {
        Self::Column(err)
    }
}

impl From<FilterError> for Error {
    fn from(err: FilterError) -> Self {
        Self::Filter(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for qgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, Column, ColumnModel, DataGrid, DateRange, Error, Event, FieldValue,
        FilterState, GridConfig, GridView, InteractionHub, KeyCode, OverlayConfig, OverlayGroup,
        OverlayPolicy, OverlayState, Predicate, Record, Rect, Result, Size,
    };

    pub use crate::{core, widgets};
}

pub use qgrid_core as core;
pub use qgrid_widgets as widgets;
