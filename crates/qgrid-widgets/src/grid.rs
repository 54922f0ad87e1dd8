#![forbid(unsafe_code)]

//! One table: its columns, filters, page cursor, and column drag.
//!
//! [`DataGrid`] is what a register screen holds per table. Rendering goes
//! through [`DataGrid::view`], which runs the pipeline in its fixed order:
//! filter, clamp the cursor, paginate, then pair the page with the visible
//! columns in display order.
//!
//! The grid also owns the column customizer overlay. Every way that overlay
//! closes (outside click, Escape, explicit dismissal, unmount) cancels an
//! in-progress column drag.

use std::fmt;

use qgrid_core::event::Event;
use qgrid_core::geometry::Size;

use crate::columns::{Column, ColumnError, ColumnKey, ColumnModel};
use crate::config::GridConfig;
use crate::dismiss::InteractionHub;
use crate::drag::{ColumnDrag, DragOutcome};
use crate::filter::{self, FilterState, Predicate, Record};
use crate::overlay::{Alignment, Anchor, CloseReason, OverlayAction, OverlayState, Placement};
use crate::pagination::{Page, PageItem};

/// Estimated size of the column customizer panel before it is measured.
pub const CUSTOMIZER_SIZE: Size = Size::new(240, 320);

/// A rendered table: rows of the current page and the columns to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView<'a, K, R> {
    pub page: Page<'a, R>,
    /// Visible columns, in display order.
    pub columns: Vec<Column<K>>,
    /// Pagination button strip.
    pub pages: Vec<PageItem>,
}

impl<K: ColumnKey, R> GridView<'_, K, R> {
    /// Ids of the rendered columns, in display order.
    pub fn column_ids(&self) -> Vec<K> {
        self.columns.iter().map(|c| c.id).collect()
    }

    /// Header labels, in display order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Column, filter, and paging state of one table.
#[derive(Debug)]
pub struct DataGrid<K, F> {
    columns: ColumnModel<K>,
    filters: FilterState<F>,
    drag: ColumnDrag<K>,
    customizer: OverlayState,
    config: GridConfig,
}

impl<K: ColumnKey, F: Copy + Eq + fmt::Debug> DataGrid<K, F> {
    /// A table with the given default columns and no filters.
    pub fn new(columns: Vec<Column<K>>, config: GridConfig) -> Result<Self, ColumnError> {
        Ok(Self {
            columns: ColumnModel::new(columns)?,
            filters: FilterState::new(config.items_per_page),
            drag: ColumnDrag::new(),
            customizer: OverlayState::new(config.overlay_config(Alignment::End, CUSTOMIZER_SIZE)),
            config,
        })
    }

    /// Register a named predicate.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, predicate: Predicate<F>) -> Self {
        self.filters.insert(key, predicate);
        self
    }

    pub fn columns(&self) -> &ColumnModel<K> {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnModel<K> {
        &mut self.columns
    }

    pub fn filters(&self) -> &FilterState<F> {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState<F> {
        &mut self.filters
    }

    pub fn drag(&self) -> &ColumnDrag<K> {
        &self.drag
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Current 1-based page.
    pub fn current_page(&self) -> usize {
        self.filters.cursor().current_page()
    }

    /// Toggle a column from the customizer. Locked and unknown ids are no-ops.
    pub fn toggle_column(&mut self, id: K) -> bool {
        self.columns.toggle_visibility(id)
    }

    /// Begin dragging the reorderable column at `index`.
    pub fn start_drag(&mut self, index: usize) -> Result<(), ColumnError> {
        self.drag.start(&self.columns, index)
    }

    /// Live-preview the dragged column at `index`.
    pub fn drag_over(&mut self, index: usize) -> Result<bool, ColumnError> {
        self.drag.over(&mut self.columns, index)
    }

    /// Commit the dragged order.
    pub fn end_drag(&mut self) -> Option<DragOutcome> {
        self.drag.end()
    }

    /// Abandon the drag, restoring the order it started from.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel(&mut self.columns)
    }

    /// Drag input (Escape, focus loss). Returns `true` if consumed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        self.drag.handle_event(&mut self.columns, event)
    }

    /// The column customizer overlay.
    pub fn customizer(&self) -> &OverlayState {
        &self.customizer
    }

    /// Open the column customizer next to its trigger button.
    pub fn open_customizer(&mut self, anchor: &impl Anchor, hub: &InteractionHub) -> Placement {
        self.customizer.open(anchor, hub)
    }

    /// Open the customizer if closed, close it (as dismissed) if open.
    pub fn toggle_customizer(
        &mut self,
        anchor: &impl Anchor,
        hub: &InteractionHub,
    ) -> Option<Placement> {
        let placement = self.customizer.toggle(anchor, hub);
        if placement.is_none() {
            self.customizer_closed(CloseReason::Dismissed);
        }
        placement
    }

    /// Close the customizer. Any drag in progress is cancelled.
    pub fn close_customizer(&mut self, reason: CloseReason) -> Option<CloseReason> {
        let closed = self.customizer.close(reason);
        if let Some(reason) = closed {
            self.customizer_closed(reason);
        }
        closed
    }

    /// Route input to the open customizer and its drag.
    ///
    /// A close reported by the overlay cancels the drag; otherwise Escape and
    /// focus loss still reach the drag controller.
    pub fn handle_customizer_event(
        &mut self,
        event: &Event,
        anchor: &impl Anchor,
    ) -> Option<OverlayAction> {
        let action = self.customizer.handle_event(event, anchor);
        match action {
            Some(OverlayAction::Closed(reason)) => self.customizer_closed(reason),
            _ => {
                self.drag.handle_event(&mut self.columns, event);
            }
        }
        action
    }

    fn customizer_closed(&mut self, reason: CloseReason) {
        if self.drag.cancel(&mut self.columns) {
            crate::debug!(?reason, "grid.drag cancelled by customizer close");
        }
    }

    /// Restore the default column layout, cancelling any drag.
    pub fn reset_columns(&mut self) {
        self.drag.cancel(&mut self.columns);
        self.columns.reset_to_default();
    }

    /// Advance one page within the filtered set. Returns `true` if it moved.
    pub fn next_page<R: Record<Field = F>>(&mut self, records: &[R]) -> bool {
        let filtered = filter::apply_filters(records, self.filters.predicates()).len();
        self.filters.cursor_mut().next_page(filtered)
    }

    /// Go back one page. Returns `true` if it moved.
    pub fn prev_page(&mut self) -> bool {
        self.filters.cursor_mut().prev_page()
    }

    /// Jump to `page`; the next [`Self::view`] clamps it into range.
    pub fn go_to_page(&mut self, page: usize) {
        self.filters.cursor_mut().set_page(page);
    }

    /// Filter, clamp, paginate, and pair the page with the visible columns.
    pub fn view<'a, R: Record<Field = F>>(&mut self, records: &'a [R]) -> GridView<'a, K, R> {
        let page = self.filters.view(records);
        let pages = page.window(self.config.page_window);
        GridView {
            page,
            columns: self.columns.visible_ordered().into_iter().cloned().collect(),
            pages,
        }
    }
}
