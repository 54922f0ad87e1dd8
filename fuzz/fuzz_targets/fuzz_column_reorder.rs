#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use qgrid_widgets::{Column, ColumnModel};

#[derive(Debug, Arbitrary)]
enum Op {
    Toggle(u8),
    Reorder(u8, u8),
    Earlier(u8),
    Later(u8),
    ShowAll,
    Reset,
}

#[derive(Debug, Arbitrary)]
struct Input {
    /// Bit i set means column i is locked.
    locks: u16,
    count: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let count = usize::from(input.count % 16) + 1;
    let columns: Vec<Column<u8>> = (0..count as u8)
        .map(|i| {
            let column = Column::new(i, format!("c{i}"), i32::from(i) * 3);
            if input.locks & (1 << i) != 0 { column.locked() } else { column }
        })
        .collect();
    let Ok(mut model) = ColumnModel::new(columns) else {
        return;
    };
    let slots: Vec<i32> = model.columns().iter().map(|c| c.order).collect();
    let pinned: Vec<(u8, i32, bool)> = model
        .columns()
        .iter()
        .filter(|c| c.locked)
        .map(|c| (c.id, c.order, c.visible))
        .collect();

    for op in input.ops.iter().take(256) {
        match *op {
            Op::Toggle(id) => {
                model.toggle_visibility(id % 16);
            }
            Op::Reorder(from, to) => {
                let len = model.reorderable_len();
                let result = model.reorder(usize::from(from), usize::from(to));
                assert_eq!(result.is_ok(), usize::from(from) < len && usize::from(to) < len);
            }
            Op::Earlier(id) => {
                let _ = model.move_earlier(id % 16);
            }
            Op::Later(id) => {
                let _ = model.move_later(id % 16);
            }
            Op::ShowAll => {
                model.show_all();
            }
            Op::Reset => model.reset_to_default(),
        }

        let mut orders: Vec<i32> = model.columns().iter().map(|c| c.order).collect();
        assert!(orders.windows(2).all(|w| w[0] < w[1]), "columns not sorted by order");
        orders.sort_unstable();
        assert_eq!(orders, slots, "order slots changed");
        for &(id, order, visible) in &pinned {
            let column = model.get(id).expect("locked column vanished");
            assert_eq!((column.order, column.visible), (order, visible));
        }
        assert_eq!(model.visible_ordered().len(), model.visible_count());
    }
});
