#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use qgrid_core::geometry::{Rect, Size};
use qgrid_widgets::{Alignment, OverlayConfig, Side};

#[derive(Debug, Arbitrary)]
struct Input {
    trigger: (i32, i32, i32, i32),
    viewport: (i32, i32),
    size: (i32, i32),
    margin: i16,
    gap: i16,
    end: bool,
}

fuzz_target!(|input: Input| {
    let (x, y, w, h) = input.trigger;
    let trigger = Rect::new(x, y, w, h);
    let viewport = Size::new(input.viewport.0, input.viewport.1);
    let size = Size::new(input.size.0, input.size.1);
    let config = OverlayConfig::new(size)
        .alignment(if input.end { Alignment::End } else { Alignment::Start })
        .margin(i32::from(input.margin))
        .gap(i32::from(input.gap));

    let placement = config.position(trigger, viewport);
    assert_eq!(placement, config.position(trigger, viewport));
    assert_eq!(placement.size, size);

    // Keep the arithmetic checks away from the i32 edges.
    let sane = |v: i32| (-1_000_000..=1_000_000).contains(&v);
    if ![x, y, w, h, viewport.width, viewport.height, size.width, size.height]
        .into_iter()
        .all(sane)
    {
        return;
    }
    if size.width <= viewport.width {
        assert!(placement.left >= 0 && placement.left + size.width <= viewport.width);
    }
    if size.height <= viewport.height {
        assert!(placement.top >= 0 && placement.top + size.height <= viewport.height);
    }
    if placement.side == Side::Above {
        assert!(placement.top + size.height <= trigger.top() - config.gap);
    }
});
