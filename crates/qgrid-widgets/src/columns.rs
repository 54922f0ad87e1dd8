#![forbid(unsafe_code)]

//! Column model: ordered, hideable, lockable table columns.
//!
//! A [`ColumnModel`] owns the column configuration of exactly one table. The
//! renderer only ever consumes [`ColumnModel::visible_ordered`]; everything
//! else is mutation driven by the column customizer (visibility checkboxes,
//! drag handles, the reset button).
//!
//! # Invariants
//!
//! 1. `order` values are pairwise distinct across the whole column list.
//! 2. Columns are stored sorted by `order`.
//! 3. A locked column's `order` and `visible` flag never change except
//!    through total replacement ([`ColumnModel::replace_defaults`] or
//!    [`ColumnModel::reset_to_default`]).
//! 4. Reordering only permutes the non-locked columns among the `order`
//!    slots they already occupy.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Reorder index out of range | Stale drag index | `ColumnError::InvalidIndex`, state untouched |
//! | Toggle of unknown id | Configuration bug | No-op, returns `false` |
//! | Toggle of locked id | Index/action column | No-op, returns `false` |

use std::fmt;
use std::hash::Hash;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier type for a table's columns.
///
/// Blanket-implemented; in practice a fieldless enum per screen.
pub trait ColumnKey: Copy + Eq + Hash + fmt::Debug {}

impl<T: Copy + Eq + Hash + fmt::Debug> ColumnKey for T {}

/// Errors surfaced by column mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    /// A reorder referenced a position outside the reorderable sub-list.
    #[error("index {index} is out of bounds for {len} reorderable columns")]
    InvalidIndex { index: usize, len: usize },
    /// An id-addressed operation named a column that does not exist.
    #[error("unknown column id {0}")]
    UnknownColumnId(String),
    /// An id-addressed move named a locked column.
    #[error("column {0} is locked")]
    LockedColumn(String),
    /// Two columns in a column list share an id.
    #[error("duplicate column id {0}")]
    DuplicateId(String),
    /// Two columns in a column list share an `order` value.
    #[error("duplicate column order {0}")]
    DuplicateOrder(i32),
}

/// A single table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column<K> {
    /// Stable identifier, unique within the table.
    pub id: K,
    /// Header text.
    pub label: String,
    /// Hidden columns stay in the model but are not rendered.
    pub visible: bool,
    /// Left-to-right position key.
    pub order: i32,
    /// Locked columns cannot be dragged or hidden.
    pub locked: bool,
}

impl<K> Column<K> {
    /// A visible, unlocked column.
    pub fn new(id: K, label: impl Into<String>, order: i32) -> Self {
        Self {
            id,
            label: label.into(),
            visible: true,
            order,
            locked: false,
        }
    }

    /// Mark the column as locked (pinned).
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Start the column hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// The column configuration of one table.
#[derive(Debug, Clone)]
pub struct ColumnModel<K> {
    columns: Vec<Column<K>>,
    defaults: Vec<Column<K>>,
    /// Bumped on every total replacement.
    generation: u64,
}

impl<K: ColumnKey> ColumnModel<K> {
    /// Build a model from a canonical default list.
    ///
    /// The list may be given in any order; it is stored sorted by `order`.
    /// Locked columns are always visible, whatever the default says.
    pub fn new(defaults: Vec<Column<K>>) -> Result<Self, ColumnError> {
        let defaults = normalize(defaults)?;
        Ok(Self {
            columns: defaults.clone(),
            defaults,
            generation: 0,
        })
    }

    /// All columns, hidden ones included, sorted by `order`.
    pub fn columns(&self) -> &[Column<K>] {
        &self.columns
    }

    /// The canonical list restored by [`Self::reset_to_default`].
    pub fn defaults(&self) -> &[Column<K>] {
        &self.defaults
    }

    /// Look up a column by id.
    pub fn get(&self, id: K) -> Option<&Column<K>> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Whether the column exists and is visible.
    pub fn is_visible(&self, id: K) -> bool {
        self.get(id).is_some_and(|c| c.visible)
    }

    /// Visible columns sorted by `order`: the only list the renderer consumes.
    pub fn visible_ordered(&self) -> Vec<&Column<K>> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    /// Number of visible columns.
    pub fn visible_count(&self) -> usize {
        self.columns.iter().filter(|c| c.visible).count()
    }

    /// The non-locked columns in display order; reorder indices address this list.
    pub fn reorderable(&self) -> Vec<&Column<K>> {
        self.columns.iter().filter(|c| !c.locked).collect()
    }

    /// Length of the reorderable sub-list.
    pub fn reorderable_len(&self) -> usize {
        self.columns.iter().filter(|c| !c.locked).count()
    }

    /// Position of `id` in the reorderable sub-list.
    pub fn reorderable_index(&self, id: K) -> Option<usize> {
        self.columns
            .iter()
            .filter(|c| !c.locked)
            .position(|c| c.id == id)
    }

    /// Flip `visible` for one column.
    ///
    /// Returns `true` if a column changed. Unknown and locked ids are a no-op.
    pub fn toggle_visibility(&mut self, id: K) -> bool {
        match self.columns.iter_mut().find(|c| c.id == id) {
            Some(column) if !column.locked => {
                column.visible = !column.visible;
                crate::trace!(column = ?id, visible = column.visible, "columns.toggle");
                true
            }
            Some(_) => {
                crate::debug!(column = ?id, "columns.toggle ignored for locked column");
                false
            }
            None => {
                crate::debug!(column = ?id, "columns.toggle ignored for unknown column");
                false
            }
        }
    }

    /// Set `visible` for one column. Same no-op rules as [`Self::toggle_visibility`].
    pub fn set_visibility(&mut self, id: K, visible: bool) -> bool {
        if self.get(id).is_some_and(|c| !c.locked && c.visible != visible) {
            self.toggle_visibility(id)
        } else {
            false
        }
    }

    /// Make every column visible. Returns how many columns changed.
    pub fn show_all(&mut self) -> usize {
        let mut changed = 0;
        for column in self.columns.iter_mut().filter(|c| !c.visible) {
            column.visible = true;
            changed += 1;
        }
        changed
    }

    /// Move the reorderable column at `dragged` to position `target`.
    ///
    /// Both indices address the reorderable sub-list. On error nothing is
    /// mutated. `reorder(i, i)` is a no-op.
    pub fn reorder(&mut self, dragged: usize, target: usize) -> Result<(), ColumnError> {
        let len = self.reorderable_len();
        for index in [dragged, target] {
            if index >= len {
                crate::warn!(index, len, "columns.reorder rejected");
                return Err(ColumnError::InvalidIndex { index, len });
            }
        }
        if dragged == target {
            return Ok(());
        }

        let (locked, mut movable): (Vec<_>, Vec<_>) = std::mem::take(&mut self.columns)
            .into_iter()
            .partition(|c| c.locked);

        // Storage is sorted, so the slots come out ascending.
        let slots: Vec<i32> = movable.iter().map(|c| c.order).collect();
        let moved = movable.remove(dragged);
        movable.insert(target, moved);
        for (column, slot) in movable.iter_mut().zip(slots) {
            column.order = slot;
        }

        let mut merged = locked;
        merged.append(&mut movable);
        merged.sort_by_key(|c| c.order);
        self.columns = merged;

        crate::trace!(dragged, target, "columns.reorder");
        Ok(())
    }

    /// Move a column one slot towards the leading edge.
    ///
    /// Returns `Ok(false)` if it is already first among the reorderable columns.
    pub fn move_earlier(&mut self, id: K) -> Result<bool, ColumnError> {
        let index = self.movable_index(id)?;
        if index == 0 {
            return Ok(false);
        }
        self.reorder(index, index - 1).map(|()| true)
    }

    /// Move a column one slot towards the trailing edge.
    ///
    /// Returns `Ok(false)` if it is already last among the reorderable columns.
    pub fn move_later(&mut self, id: K) -> Result<bool, ColumnError> {
        let index = self.movable_index(id)?;
        if index + 1 >= self.reorderable_len() {
            return Ok(false);
        }
        self.reorder(index, index + 1).map(|()| true)
    }

    /// Restore the defaults given at construction.
    pub fn reset_to_default(&mut self) {
        self.columns = self.defaults.clone();
        self.generation += 1;
    }

    /// Replace the whole column list, and the stored defaults, with `defaults`.
    ///
    /// Total replacement, not a merge. On error the model is unchanged.
    pub fn replace_defaults(&mut self, defaults: Vec<Column<K>>) -> Result<(), ColumnError> {
        let defaults = normalize(defaults)?;
        self.columns = defaults.clone();
        self.defaults = defaults;
        self.generation += 1;
        Ok(())
    }

    /// Changes whenever the column list is replaced wholesale.
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    fn movable_index(&self, id: K) -> Result<usize, ColumnError> {
        match self.get(id) {
            None => Err(ColumnError::UnknownColumnId(format!("{id:?}"))),
            Some(c) if c.locked => Err(ColumnError::LockedColumn(format!("{id:?}"))),
            Some(_) => self
                .reorderable_index(id)
                .ok_or_else(|| ColumnError::UnknownColumnId(format!("{id:?}"))),
        }
    }
}

fn normalize<K: ColumnKey>(mut columns: Vec<Column<K>>) -> Result<Vec<Column<K>>, ColumnError> {
    let mut ids = AHashSet::with_capacity(columns.len());
    let mut orders = AHashSet::with_capacity(columns.len());
    for column in &columns {
        if !ids.insert(column.id) {
            return Err(ColumnError::DuplicateId(format!("{:?}", column.id)));
        }
        if !orders.insert(column.order) {
            return Err(ColumnError::DuplicateOrder(column.order));
        }
    }
    for column in columns.iter_mut().filter(|c| c.locked) {
        column.visible = true;
    }
    columns.sort_by_key(|c| c.order);
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Doc {
        No,
        Code,
        Title,
        Kind,
        Department,
        Owner,
        Version,
        Status,
        Effective,
        Review,
        Created,
        Action,
    }

    const MIDDLE: [Doc; 10] = [
        Doc::Code,
        Doc::Title,
        Doc::Kind,
        Doc::Department,
        Doc::Owner,
        Doc::Version,
        Doc::Status,
        Doc::Effective,
        Doc::Review,
        Doc::Created,
    ];

    fn document_columns() -> Vec<Column<Doc>> {
        let mut columns = vec![Column::new(Doc::No, "No.", 0).locked()];
        for (i, id) in MIDDLE.iter().enumerate() {
            columns.push(Column::new(*id, format!("{id:?}"), i as i32 + 1));
        }
        columns.push(Column::new(Doc::Action, "Action", 11).locked());
        columns
    }

    fn model() -> ColumnModel<Doc> {
        ColumnModel::new(document_columns()).unwrap()
    }

    fn orders(model: &ColumnModel<Doc>) -> Vec<(Doc, i32)> {
        model.columns().iter().map(|c| (c.id, c.order)).collect()
    }

    #[test]
    fn new_sorts_by_order() {
        let mut columns = document_columns();
        columns.reverse();
        let model = ColumnModel::new(columns).unwrap();
        let ids: Vec<Doc> = model.columns().iter().map(|c| c.id).collect();
        assert_eq!(ids.first(), Some(&Doc::No));
        assert_eq!(ids.last(), Some(&Doc::Action));
    }

    #[test]
    fn new_rejects_duplicate_ids_and_orders() {
        let dup_id = vec![Column::new(Doc::Code, "a", 1), Column::new(Doc::Code, "b", 2)];
        assert_eq!(
            ColumnModel::new(dup_id).unwrap_err(),
            ColumnError::DuplicateId("Code".into())
        );
        let dup_order = vec![Column::new(Doc::Code, "a", 1), Column::new(Doc::Title, "b", 1)];
        assert_eq!(
            ColumnModel::new(dup_order).unwrap_err(),
            ColumnError::DuplicateOrder(1)
        );
    }

    #[test]
    fn locked_columns_are_forced_visible() {
        let model =
            ColumnModel::new(vec![Column::new(Doc::No, "No.", 0).locked().hidden()]).unwrap();
        assert!(model.is_visible(Doc::No));
    }

    #[test]
    fn drag_to_front_shifts_the_rest() {
        let mut model = model();
        model.reorder(3, 0).unwrap();

        assert_eq!(model.get(Doc::Department).unwrap().order, 1);
        assert_eq!(model.get(Doc::Code).unwrap().order, 2);
        assert_eq!(model.get(Doc::Title).unwrap().order, 3);
        assert_eq!(model.get(Doc::Kind).unwrap().order, 4);
        assert_eq!(model.get(Doc::Owner).unwrap().order, 5);
        assert_eq!(model.get(Doc::No).unwrap().order, 0);
        assert_eq!(model.get(Doc::Action).unwrap().order, 11);
    }

    #[test]
    fn drag_towards_back() {
        let mut model = model();
        model.reorder(0, 9).unwrap();
        let reorderable: Vec<Doc> = model.reorderable().iter().map(|c| c.id).collect();
        assert_eq!(reorderable.last(), Some(&Doc::Code));
        assert_eq!(reorderable.first(), Some(&Doc::Title));
        assert_eq!(model.get(Doc::Code).unwrap().order, 10);
    }

    #[test]
    fn same_index_is_a_noop() {
        let mut model = model();
        let before = model.columns().to_vec();
        model.reorder(4, 4).unwrap();
        assert_eq!(model.columns(), before.as_slice());
    }

    #[test]
    fn out_of_bounds_rejected_without_mutation() {
        let mut model = model();
        model.toggle_visibility(Doc::Owner);
        let before = model.columns().to_vec();

        assert_eq!(
            model.reorder(10, 0),
            Err(ColumnError::InvalidIndex { index: 10, len: 10 })
        );
        assert_eq!(
            model.reorder(0, 42),
            Err(ColumnError::InvalidIndex { index: 42, len: 10 })
        );
        assert_eq!(model.columns(), before.as_slice());
    }

    #[test]
    fn reorder_keeps_slots_of_nonconventional_layout() {
        // Locked column in the middle: movable columns keep their own slots.
        let mut model = ColumnModel::new(vec![
            Column::new(Doc::Code, "Code", 10),
            Column::new(Doc::No, "No.", 20).locked(),
            Column::new(Doc::Title, "Title", 30),
            Column::new(Doc::Status, "Status", 40),
        ])
        .unwrap();
        model.reorder(2, 0).unwrap();
        assert_eq!(
            orders(&model),
            vec![
                (Doc::Status, 10),
                (Doc::No, 20),
                (Doc::Code, 30),
                (Doc::Title, 40)
            ]
        );
    }

    #[test]
    fn toggle_changes_only_visibility() {
        let mut model = model();
        let before = orders(&model);
        assert!(model.toggle_visibility(Doc::Status));
        assert!(!model.is_visible(Doc::Status));
        assert_eq!(orders(&model), before);
        assert!(model.toggle_visibility(Doc::Status));
        assert!(model.is_visible(Doc::Status));
    }

    #[test]
    fn toggle_ignores_locked_and_unknown() {
        let mut model = ColumnModel::new(vec![
            Column::new(Doc::No, "No.", 0).locked(),
            Column::new(Doc::Code, "Code", 1),
        ])
        .unwrap();
        assert!(!model.toggle_visibility(Doc::No));
        assert!(model.is_visible(Doc::No));
        assert!(!model.toggle_visibility(Doc::Review));
        assert_eq!(model.visible_count(), 2);
    }

    #[test]
    fn visible_ordered_skips_hidden_and_sorts() {
        let mut model = model();
        model.toggle_visibility(Doc::Title);
        model.reorder(5, 0).unwrap();
        let visible: Vec<Doc> = model.visible_ordered().iter().map(|c| c.id).collect();
        assert_eq!(visible.len(), 11);
        assert_eq!(&visible[..3], &[Doc::No, Doc::Version, Doc::Code]);
        assert!(!visible.contains(&Doc::Title));
        assert_eq!(visible.last(), Some(&Doc::Action));
    }

    #[test]
    fn hidden_columns_still_reorder() {
        let mut model = model();
        model.toggle_visibility(Doc::Code);
        model.reorder(0, 2).unwrap();
        assert_eq!(model.reorderable_index(Doc::Code), Some(2));
        assert!(!model.is_visible(Doc::Code));
    }

    #[test]
    fn set_visibility_and_show_all() {
        let mut model = model();
        assert!(model.set_visibility(Doc::Review, false));
        assert!(!model.set_visibility(Doc::Review, false));
        assert!(model.set_visibility(Doc::Created, false));
        assert_eq!(model.show_all(), 2);
        assert_eq!(model.visible_count(), 12);
    }

    #[test]
    fn move_earlier_and_later() {
        let mut model = model();
        assert_eq!(model.move_earlier(Doc::Title), Ok(true));
        assert_eq!(model.reorderable_index(Doc::Title), Some(0));
        assert_eq!(model.move_earlier(Doc::Title), Ok(false));
        assert_eq!(model.move_later(Doc::Created), Ok(false));
        assert_eq!(model.move_later(Doc::Title), Ok(true));
        assert_eq!(
            model.move_later(Doc::Action),
            Err(ColumnError::LockedColumn("Action".into()))
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut model = model();
        model.toggle_visibility(Doc::Owner);
        model.reorder(9, 0).unwrap();
        model.reset_to_default();
        assert_eq!(model.columns(), model.defaults());
        assert!(model.is_visible(Doc::Owner));
    }

    #[test]
    fn reset_to_is_total_replacement() {
        let mut model = model();
        model
            .replace_defaults(vec![
                Column::new(Doc::No, "#", 0).locked(),
                Column::new(Doc::Title, "Title", 1),
            ])
            .unwrap();
        assert_eq!(model.columns().len(), 2);
        assert!(model.get(Doc::Code).is_none());
        model.toggle_visibility(Doc::Title);
        model.reset_to_default();
        assert!(model.is_visible(Doc::Title));
    }

    #[test]
    fn reset_to_rejects_invalid_list_without_mutation() {
        let mut model = model();
        let before = model.columns().to_vec();
        let bad = vec![Column::new(Doc::No, "#", 0), Column::new(Doc::Code, "C", 0)];
        assert!(model.replace_defaults(bad).is_err());
        assert_eq!(model.columns(), before.as_slice());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ColumnError::InvalidIndex { index: 3, len: 2 }.to_string(),
            "index 3 is out of bounds for 2 reorderable columns"
        );
        assert_eq!(
            ColumnError::UnknownColumnId("Owner".into()).to_string(),
            "unknown column id Owner"
        );
    }

    #[cfg(feature = "tracing")]
    mod tracing_capture {
        use super::*;
        use std::sync::{Arc, Mutex};
        use tracing::Subscriber;
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        struct RejectCapture {
            rejected: Arc<Mutex<usize>>,
        }

        impl<S: Subscriber> Layer<S> for RejectCapture {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                struct MessageVisitor {
                    message: Option<String>,
                }
                impl tracing::field::Visit for MessageVisitor {
                    fn record_debug(
                        &mut self,
                        field: &tracing::field::Field,
                        value: &dyn std::fmt::Debug,
                    ) {
                        if field.name() == "message" {
                            self.message = Some(format!("{value:?}").trim_matches('"').to_owned());
                        }
                    }
                }
                let mut visitor = MessageVisitor { message: None };
                event.record(&mut visitor);
                if visitor.message.as_deref() == Some("columns.reorder rejected") {
                    *self.rejected.lock().expect("capture lock") += 1;
                }
            }
        }

        #[test]
        fn rejected_reorder_is_logged() {
            let rejected = Arc::new(Mutex::new(0));
            let subscriber = tracing_subscriber::registry().with(RejectCapture {
                rejected: Arc::clone(&rejected),
            });
            let _guard = tracing::subscriber::set_default(subscriber);
            tracing::callsite::rebuild_interest_cache();

            let mut model = model();
            assert!(model.reorder(99, 0).is_err());

            assert_eq!(*rejected.lock().expect("capture lock"), 1);
        }
    }
}
