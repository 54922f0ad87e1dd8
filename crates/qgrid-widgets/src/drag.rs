#![forbid(unsafe_code)]

//! Drag-to-reorder controller for the column customizer.
//!
//! The host samples its pointer drag events, hit-tests them to a position in
//! the reorderable sub-list, and forwards them here. [`ColumnDrag`] turns
//! that stream into [`ColumnModel::reorder`] calls, giving a live preview
//! while the pointer moves.
//!
//! # Invariants
//!
//! 1. A drag is well-formed: one [`ColumnDrag::start`], zero or more
//!    [`ColumnDrag::over`], then exactly one of [`ColumnDrag::end`] or
//!    [`ColumnDrag::cancel`].
//! 2. `over` with the index the dragged column already sits at is a no-op,
//!    so hosts may call it on every drag-over frame.
//! 3. `cancel` moves the dragged column back to its starting slot and undoes
//!    nothing else. If the column list was replaced during the drag, the
//!    new list is left as it is.
//! 4. Outside a drag the state is [`DragState::Idle`], never a stale index.

use qgrid_core::event::Event;

use crate::columns::{ColumnError, ColumnKey, ColumnModel};

/// Where the customizer's drag interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A column is being dragged.
    Dragging {
        /// Reorderable index the drag started from.
        origin: usize,
        /// Reorderable index the dragged column occupies now.
        current: usize,
    },
}

impl DragState {
    /// Whether a drag is in progress.
    #[inline]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Index the dragged column currently occupies, if dragging.
    #[inline]
    pub const fn current(&self) -> Option<usize> {
        match self {
            Self::Dragging { current, .. } => Some(*current),
            Self::Idle => None,
        }
    }
}

/// Result of a completed drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOutcome {
    /// Reorderable index the column started at.
    pub from: usize,
    /// Reorderable index the column was dropped at.
    pub to: usize,
}

impl DragOutcome {
    /// Whether the drop actually moved the column.
    pub const fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Live-preview drag controller bound to one [`ColumnModel`].
#[derive(Debug, Clone)]
pub struct ColumnDrag<K> {
    state: DragState,
    /// Dragged column and the layout generation it was picked up from.
    dragged: Option<(K, u64)>,
}

impl<K> Default for ColumnDrag<K> {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            dragged: None,
        }
    }
}

impl<K: ColumnKey> ColumnDrag<K> {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Id of the column being dragged.
    pub fn dragged(&self) -> Option<K> {
        self.dragged.map(|(id, _)| id)
    }

    /// Begin dragging the reorderable column at `index`.
    ///
    /// A drag already in progress is committed first.
    pub fn start(&mut self, model: &ColumnModel<K>, index: usize) -> Result<(), ColumnError> {
        let Some(id) = model.reorderable().get(index).map(|c| c.id) else {
            return Err(ColumnError::InvalidIndex {
                index,
                len: model.reorderable_len(),
            });
        };
        if self.is_dragging() {
            let _ = self.end();
        }
        self.dragged = Some((id, model.generation()));
        self.state = DragState::Dragging {
            origin: index,
            current: index,
        };
        crate::trace!(index, column = ?id, "drag.start");
        Ok(())
    }

    /// The pointer is over reorderable position `index`: preview the move.
    ///
    /// Returns `Ok(true)` if the model changed. Calling this while idle is a
    /// no-op. An out-of-range `index` is rejected and the drag continues. If
    /// the column list was replaced since [`Self::start`], the drag is
    /// dropped and the model is left alone.
    pub fn over(&mut self, model: &mut ColumnModel<K>, index: usize) -> Result<bool, ColumnError> {
        let DragState::Dragging { origin, .. } = self.state else {
            return Ok(false);
        };
        let Some(at) = self.live_index(model) else {
            self.abandon();
            return Ok(false);
        };
        if index == at {
            self.state = DragState::Dragging {
                origin,
                current: at,
            };
            return Ok(false);
        }
        model.reorder(at, index)?;
        self.state = DragState::Dragging {
            origin,
            current: index,
        };
        Ok(true)
    }

    /// Drop: keep the previewed order and return to idle.
    pub fn end(&mut self) -> Option<DragOutcome> {
        let DragState::Dragging { origin, current } = std::mem::take(&mut self.state) else {
            return None;
        };
        self.dragged = None;
        crate::trace!(from = origin, to = current, "drag.end");
        Some(DragOutcome {
            from: origin,
            to: current,
        })
    }

    /// Abort: move the dragged column back to where the drag started and
    /// return to idle.
    ///
    /// Only the drag's own move is undone; visibility changes made meanwhile
    /// are kept, and a layout replaced since [`Self::start`] is not touched.
    /// Returns `true` if a drag was cancelled.
    pub fn cancel(&mut self, model: &mut ColumnModel<K>) -> bool {
        let DragState::Dragging { origin, .. } = self.state else {
            return false;
        };
        if let Some(at) = self.live_index(model)
            && let Err(err) = model.reorder(at, origin)
        {
            crate::debug!(%err, "drag.cancel could not restore position");
        }
        self.state = DragState::Idle;
        self.dragged = None;
        crate::trace!(origin, "drag.cancel");
        true
    }

    /// Escape cancels an in-progress drag. Returns `true` if the event was consumed.
    pub fn handle_event(&mut self, model: &mut ColumnModel<K>, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.is_escape_press() => self.cancel(model),
            Event::Focus(false) => self.cancel(model),
            _ => false,
        }
    }

    /// Where the dragged column sits now, unless the layout was replaced.
    fn live_index(&self, model: &ColumnModel<K>) -> Option<usize> {
        let (id, generation) = self.dragged?;
        if generation != model.generation() {
            return None;
        }
        model.reorderable_index(id)
    }

    fn abandon(&mut self) {
        crate::debug!("drag.abandoned after column list replacement");
        self.state = DragState::Idle;
        self.dragged = None;
    }
}
