//! Property-based invariant tests for the column model and drag controller.
//!
//! 1. Order totality: after any toggle/reorder sequence every `order` value is
//!    distinct and locked columns keep their `order`.
//! 2. Reorder only permutes the slots the reorderable columns already held.
//! 3. `reorder(i, i)` changes nothing.
//! 4. Toggling changes exactly one `visible` flag and no `order`.
//! 5. A rejected reorder leaves the model untouched.
//! 6. Cancelling a drag restores the pre-drag order and keeps visibility
//!    changes made during the drag.
//! 7. `visible_ordered` is sorted by `order` and only holds visible columns.

use std::collections::BTreeSet;

use proptest::prelude::*;
use qgrid_widgets::columns::{Column, ColumnError, ColumnModel};
use qgrid_widgets::drag::ColumnDrag;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Toggle(u8),
    Reorder(usize, usize),
}

/// `n` reorderable columns between a leading lock at 0 and a trailing lock.
fn conventional(n: u8) -> ColumnModel<u8> {
    let mut columns = vec![Column::new(0u8, "No.", 0).locked()];
    columns.extend((1..=n).map(|id| Column::new(id, format!("Col {id}"), i32::from(id))));
    columns.push(Column::new(n + 1, "Action", i32::from(n) + 1).locked());
    ColumnModel::new(columns).unwrap()
}

/// Columns with arbitrary distinct orders and an arbitrary locked subset.
fn scattered() -> impl Strategy<Value = ColumnModel<u8>> {
    proptest::collection::btree_set(-50i32..50, 2..16)
        .prop_flat_map(|orders| {
            let len = orders.len();
            (
                Just(orders.into_iter().collect::<Vec<_>>()),
                proptest::collection::vec(any::<bool>(), len),
                0..len,
            )
        })
        .prop_map(|(orders, locks, rotate)| {
            let mut columns: Vec<Column<u8>> = orders
                .iter()
                .zip(&locks)
                .enumerate()
                .map(|(id, (&order, &locked))| {
                    let column = Column::new(id as u8, format!("c{id}"), order);
                    if locked { column.locked() } else { column }
                })
                .collect();
            // Present them out of order: construction must sort.
            columns.rotate_left(rotate);
            ColumnModel::new(columns).unwrap()
        })
}

/// A reorderable count with two indices inside it.
fn sized_pair(min: u8) -> impl Strategy<Value = (u8, usize, usize)> {
    (min..=12u8).prop_flat_map(|n| (Just(n), 0..usize::from(n), 0..usize::from(n)))
}

fn ops(max_id: u8) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            (0..=max_id).prop_map(Op::Toggle),
            (0usize..16, 0usize..16).prop_map(|(a, b)| Op::Reorder(a, b)),
        ],
        0..40,
    )
}

fn apply(model: &mut ColumnModel<u8>, op: &Op) {
    match *op {
        Op::Toggle(id) => {
            model.toggle_visibility(id);
        }
        Op::Reorder(a, b) => {
            let _ = model.reorder(a, b);
        }
    }
}

fn locked_orders(model: &ColumnModel<u8>) -> Vec<(u8, i32)> {
    model
        .columns()
        .iter()
        .filter(|c| c.locked)
        .map(|c| (c.id, c.order))
        .collect()
}

fn reorderable_slots(model: &ColumnModel<u8>) -> BTreeSet<i32> {
    model.reorderable().iter().map(|c| c.order).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Order totality, locked columns pinned
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn order_is_total_after_any_sequence(n in 1u8..=12, ops in ops(14)) {
        let mut model = conventional(n);
        let locked = locked_orders(&model);
        for op in &ops {
            apply(&mut model, op);
            let orders: BTreeSet<i32> = model.columns().iter().map(|c| c.order).collect();
            prop_assert_eq!(orders.len(), model.columns().len(), "duplicate order after {:?}", op);
            prop_assert_eq!(&locked_orders(&model), &locked);
            prop_assert!(model.columns().windows(2).all(|w| w[0].order < w[1].order));
        }
    }

    #[test]
    fn scattered_layouts_keep_locked_slots(model in scattered(), ops in ops(16)) {
        let mut model = model;
        let locked = locked_orders(&model);
        for op in &ops {
            apply(&mut model, op);
            prop_assert_eq!(&locked_orders(&model), &locked);
            prop_assert!(model.columns().iter().filter(|c| c.locked).all(|c| c.visible));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Reorder permutes existing slots
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reorder_reuses_slots(model in scattered(), a in 0usize..16, b in 0usize..16) {
        let mut model = model;
        let before = reorderable_slots(&model);
        let ids_before: BTreeSet<u8> = model.reorderable().iter().map(|c| c.id).collect();
        let _ = model.reorder(a, b);
        prop_assert_eq!(reorderable_slots(&model), before);
        let ids_after: BTreeSet<u8> = model.reorderable().iter().map(|c| c.id).collect();
        prop_assert_eq!(ids_after, ids_before);
    }

    #[test]
    fn conventional_layout_reassigns_one_to_n((n, a, b) in sized_pair(1)) {
        let mut model = conventional(n);
        model.reorder(a, b).unwrap();
        let orders: Vec<i32> = model.reorderable().iter().map(|c| c.order).collect();
        prop_assert_eq!(orders, (1..=i32::from(n)).collect::<Vec<_>>());
        prop_assert_eq!(model.reorderable()[b].id, u8::try_from(a + 1).unwrap());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. reorder(i, i) is a no-op
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reorder_same_index_changes_nothing(model in scattered(), i in any::<prop::sample::Index>()) {
        let mut model = model;
        prop_assume!(model.reorderable_len() > 0);
        let i = i.index(model.reorderable_len());
        let before = model.columns().to_vec();
        model.reorder(i, i).unwrap();
        prop_assert_eq!(model.columns(), before.as_slice());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Toggle touches exactly one visible flag
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn toggle_changes_exactly_one_flag(model in scattered(), id in 0u8..20) {
        let mut model = model;
        let before = model.columns().to_vec();
        let changed = model.toggle_visibility(id);
        let after = model.columns();

        for (old, new) in before.iter().zip(after) {
            prop_assert_eq!(old.id, new.id);
            prop_assert_eq!(old.order, new.order);
        }
        let flipped: Vec<u8> = before
            .iter()
            .zip(after)
            .filter(|(old, new)| old.visible != new.visible)
            .map(|(old, _)| old.id)
            .collect();

        let toggleable = before.iter().any(|c| c.id == id && !c.locked);
        prop_assert_eq!(changed, toggleable);
        if toggleable {
            prop_assert_eq!(flipped, vec![id]);
        } else {
            prop_assert!(flipped.is_empty());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Rejected reorders do not mutate
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_bounds_reorder_is_atomic(model in scattered(), a in 0usize..40, b in 0usize..40) {
        let mut model = model;
        let len = model.reorderable_len();
        prop_assume!(a >= len || b >= len);
        let before = model.columns().to_vec();
        let err = model.reorder(a, b).unwrap_err();
        let is_invalid_index = matches!(err, ColumnError::InvalidIndex { len: l, .. } if l == len);
        prop_assert!(is_invalid_index);
        prop_assert_eq!(model.columns(), before.as_slice());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Drag cancel restores the starting order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn drag_cancel_restores((n, start, _) in sized_pair(2), path in proptest::collection::vec(0usize..12, 0..10)) {
        let mut model = conventional(n);
        let before = model.columns().to_vec();

        let mut drag = ColumnDrag::new();
        drag.start(&model, start).unwrap();
        for index in path {
            let _ = drag.over(&mut model, index);
        }
        prop_assert!(drag.cancel(&mut model));
        prop_assert_eq!(model.columns(), before.as_slice());
        prop_assert!(!drag.is_dragging());
    }

    #[test]
    fn drag_cancel_keeps_interleaved_toggles(
        (n, start, _) in sized_pair(2),
        steps in proptest::collection::vec((0usize..12, proptest::option::of(1u8..13)), 0..10),
    ) {
        let mut model = conventional(n);
        let order_before: Vec<u8> = model.columns().iter().map(|c| c.id).collect();

        let mut drag = ColumnDrag::new();
        drag.start(&model, start).unwrap();
        for (index, toggle) in steps {
            let _ = drag.over(&mut model, index);
            if let Some(id) = toggle {
                model.toggle_visibility(id);
            }
        }
        let visible_before_cancel: Vec<(u8, bool)> =
            model.columns().iter().map(|c| (c.id, c.visible)).collect();
        prop_assert!(drag.cancel(&mut model));

        let order_after: Vec<u8> = model.columns().iter().map(|c| c.id).collect();
        prop_assert_eq!(order_after, order_before);
        for (id, visible) in visible_before_cancel {
            prop_assert_eq!(model.is_visible(id), visible);
        }
    }

    #[test]
    fn drag_end_matches_single_reorder((n, from, _) in sized_pair(2), path in proptest::collection::vec(0usize..12, 1..10)) {
        let mut dragged = conventional(n);

        let mut drag = ColumnDrag::new();
        drag.start(&dragged, from).unwrap();
        for &index in &path {
            let _ = drag.over(&mut dragged, index);
        }
        let outcome = drag.end().unwrap();

        let mut direct = conventional(n);
        direct.reorder(outcome.from, outcome.to).unwrap();
        prop_assert_eq!(dragged.columns(), direct.columns());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. visible_ordered
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visible_ordered_is_sorted_and_visible(n in 1u8..=12, ops in ops(14)) {
        let mut model = conventional(n);
        for op in &ops {
            apply(&mut model, op);
        }
        let visible = model.visible_ordered();
        prop_assert!(visible.iter().all(|c| c.visible));
        prop_assert!(visible.windows(2).all(|w| w[0].order < w[1].order));
        prop_assert_eq!(visible.len(), model.visible_count());
        prop_assert_eq!(
            visible.len(),
            model.columns().iter().filter(|c| c.visible).count()
        );
    }
}
