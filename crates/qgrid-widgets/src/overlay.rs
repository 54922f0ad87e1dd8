#![forbid(unsafe_code)]

//! Anchored floating panels: dropdown menus, date pickers, search suggestions.
//!
//! Overlays render at the top of the visual stack, outside the normal layout
//! hierarchy, so no ancestor can clip them. The price is that their position
//! has to be computed from the trigger element's bounds and kept in sync
//! while the page scrolls or the viewport resizes.
//!
//! # Placement
//!
//! 1. Below the trigger, `gap` away, aligned to the trigger's left edge
//!    ([`Alignment::Start`]) or right edge ([`Alignment::End`]).
//! 2. If the right edge would pass `viewport.width - margin`, shift left; if
//!    the overlay is wider than the viewport, pin it `margin` from the left.
//! 3. If the bottom edge would pass `viewport.height - margin`, flip above
//!    the trigger; if that does not fit either, stay below.
//! 4. Re-clamp so an overlay no larger than the viewport on an axis is
//!    fully inside `[0, viewport]` on that axis.
//!
//! Placement never fails; the worst case is a panel overlapping its trigger.
//!
//! # Example
//!
//! ```
//! use qgrid_core::geometry::{Rect, Size};
//! use qgrid_widgets::overlay::{Alignment, OverlayConfig, Side};
//!
//! let config = OverlayConfig::new(Size::new(200, 120)).alignment(Alignment::End);
//! let trigger = Rect::new(900, 780, 40, 40);
//! let placement = config.position(trigger, Size::new(1024, 800));
//! assert_eq!(placement.side, Side::Above);
//! assert_eq!(placement.top, 652);
//! ```

use qgrid_core::event::{Event, MouseEventKind};
use qgrid_core::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};

use crate::dismiss::{InteractionHub, Subscription};

/// Distance kept from the viewport edges.
pub const DEFAULT_MARGIN: i32 = 8;
/// Distance between trigger and overlay.
pub const DEFAULT_GAP: i32 = 8;

/// Which trigger edge the overlay lines up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Alignment {
    /// Overlay's left edge at the trigger's left edge (search, date panels).
    #[default]
    Start,
    /// Overlay's right edge at the trigger's right edge (row action menus).
    End,
}

/// Which side of the trigger the overlay ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Below,
    Above,
}

/// A computed overlay position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub top: i32,
    pub left: i32,
    /// Size the position was computed for.
    pub size: Size,
    pub side: Side,
}

impl Placement {
    /// The overlay's bounding box.
    pub const fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.size.width, self.size.height)
    }
}

/// Per-call-site placement settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    pub alignment: Alignment,
    /// Expected overlay size until a measured size is reported.
    pub estimated_size: Size,
    pub margin: i32,
    pub gap: i32,
    /// Hold the page scroll lock while open.
    pub lock_scroll: bool,
}

impl OverlayConfig {
    /// Start-aligned overlay of the given estimated size with default spacing.
    pub fn new(estimated_size: Size) -> Self {
        Self {
            alignment: Alignment::Start,
            estimated_size,
            margin: DEFAULT_MARGIN,
            gap: DEFAULT_GAP,
            lock_scroll: false,
        }
    }

    /// Set the alignment.
    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the viewport margin (negative values become 0).
    #[must_use]
    pub fn margin(mut self, margin: i32) -> Self {
        self.margin = margin.max(0);
        self
    }

    /// Set the trigger gap (negative values become 0).
    #[must_use]
    pub fn gap(mut self, gap: i32) -> Self {
        self.gap = gap.max(0);
        self
    }

    /// Hold the scroll lock while open.
    #[must_use]
    pub fn lock_scroll(mut self, lock: bool) -> Self {
        self.lock_scroll = lock;
        self
    }

    /// Position an overlay of `estimated_size` for this trigger and viewport.
    pub fn position(&self, trigger: Rect, viewport: Size) -> Placement {
        self.position_sized(trigger, viewport, self.estimated_size)
    }

    /// Position an overlay of an explicit `size`.
    pub fn position_sized(&self, trigger: Rect, viewport: Size, size: Size) -> Placement {
        let size = Size::new(size.width, size.height);
        let viewport = Size::new(viewport.width, viewport.height);
        let margin = self.margin.max(0);
        let gap = self.gap.max(0);

        let preferred_left = match self.alignment {
            Alignment::Start => trigger.left(),
            Alignment::End => trigger.right().saturating_sub(size.width),
        };
        let left = fit_axis(preferred_left, size.width, viewport.width, margin);

        let below = trigger.bottom().saturating_add(gap);
        let limit = viewport.height.saturating_sub(margin);
        let (top, side) = if below.saturating_add(size.height) <= limit {
            (below, Side::Below)
        } else {
            let above = trigger.top().saturating_sub(gap).saturating_sub(size.height);
            if above >= margin {
                crate::trace!(above, "overlay.flip_above");
                (above, Side::Above)
            } else {
                crate::trace!(below, "overlay.fallback_below");
                (below, Side::Below)
            }
        };
        let top = fit_axis(top, size.height, viewport.height, margin);

        Placement {
            top,
            left,
            size,
            side,
        }
    }
}

/// Clamp a start coordinate on one axis.
///
/// Shift back to fit before `extent - margin`, never start before `margin`,
/// then, if the panel is no larger than the extent, make it fully visible.
fn fit_axis(start: i32, len: i32, extent: i32, margin: i32) -> i32 {
    let max_start = extent.saturating_sub(margin).saturating_sub(len);
    let mut pos = start.min(max_start).max(margin);
    if len <= extent && pos.saturating_add(len) > extent {
        pos = extent.saturating_sub(len);
    }
    pos
}

/// Source of fresh trigger geometry.
///
/// Implemented by the host over its element handle; re-read on every open,
/// scroll, and resize.
pub trait Anchor {
    /// The trigger element's bounding box in viewport coordinates.
    fn trigger_rect(&self) -> Rect;
    /// Current viewport size.
    fn viewport(&self) -> Size;
}

impl Anchor for (Rect, Size) {
    fn trigger_rect(&self) -> Rect {
        self.0
    }

    fn viewport(&self) -> Size {
        self.1
    }
}

impl<A: Anchor + ?Sized> Anchor for &A {
    fn trigger_rect(&self) -> Rect {
        (**self).trigger_rect()
    }

    fn viewport(&self) -> Size {
        (**self).viewport()
    }
}

/// Why an overlay closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// Pointer pressed outside both the overlay and its trigger.
    OutsideClick,
    /// Escape pressed.
    Escape,
    /// Closed by the host (toggle, another overlay opening).
    Dismissed,
    /// An item inside the overlay was chosen.
    Selected,
    /// The owning component went away.
    Unmounted,
}

/// Outcome of [`OverlayState::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Closed(CloseReason),
    Repositioned(Placement),
}

#[derive(Debug)]
struct OpenOverlay {
    trigger: Rect,
    viewport: Size,
    size: Size,
    placement: Placement,
    _subscription: Subscription,
}

/// One overlay instance: closed, or open with its current geometry.
///
/// Nothing survives a close: the next open re-reads the trigger and starts
/// from the configured estimate again.
#[derive(Debug)]
pub struct OverlayState {
    config: OverlayConfig,
    open: Option<OpenOverlay>,
}

impl OverlayState {
    /// A closed overlay.
    pub fn new(config: OverlayConfig) -> Self {
        Self { config, open: None }
    }

    /// Placement settings.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Whether the overlay is open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Current position, if open.
    pub fn placement(&self) -> Option<Placement> {
        self.open.as_ref().map(|o| o.placement)
    }

    /// Current bounding box, if open.
    pub fn rect(&self) -> Option<Rect> {
        self.placement().map(|p| p.rect())
    }

    /// Trigger bounds last read, if open.
    pub fn trigger(&self) -> Option<Rect> {
        self.open.as_ref().map(|o| o.trigger)
    }

    /// Open (or re-open) against fresh geometry.
    pub fn open(&mut self, anchor: &impl Anchor, hub: &InteractionHub) -> Placement {
        let trigger = anchor.trigger_rect();
        let viewport = anchor.viewport();
        let size = self.config.estimated_size;
        let placement = self.config.position_sized(trigger, viewport, size);
        // Release any previous subscription before taking a new one.
        self.open = None;
        self.open = Some(OpenOverlay {
            trigger,
            viewport,
            size,
            placement,
            _subscription: hub.subscribe(self.config.lock_scroll),
        });
        crate::trace!(top = placement.top, left = placement.left, "overlay.open");
        placement
    }

    /// Open if closed, close (as [`CloseReason::Dismissed`]) if open.
    ///
    /// Returns the placement when this call opened the overlay.
    pub fn toggle(&mut self, anchor: &impl Anchor, hub: &InteractionHub) -> Option<Placement> {
        if self.is_open() {
            self.close(CloseReason::Dismissed);
            None
        } else {
            Some(self.open(anchor, hub))
        }
    }

    /// Recompute against fresh geometry (scroll, resize). No-op while closed.
    pub fn reposition(&mut self, anchor: &impl Anchor) -> Option<Placement> {
        let open = self.open.as_mut()?;
        open.trigger = anchor.trigger_rect();
        open.viewport = anchor.viewport();
        open.placement = self
            .config
            .position_sized(open.trigger, open.viewport, open.size);
        Some(open.placement)
    }

    /// Replace the estimate with the rendered size and recompute.
    ///
    /// Only lasts until the overlay closes.
    pub fn set_measured_size(&mut self, size: Size, anchor: &impl Anchor) -> Option<Placement> {
        let open = self.open.as_mut()?;
        open.size = size;
        self.reposition(anchor)
    }

    /// Close and discard all geometry. Returns `None` if already closed.
    pub fn close(&mut self, reason: CloseReason) -> Option<CloseReason> {
        self.open.take().map(|_| {
            crate::trace!(?reason, "overlay.close");
            reason
        })
    }

    /// Route one input event.
    ///
    /// - Escape press closes.
    /// - A pointer press outside both the overlay box and the trigger closes.
    /// - Scroll and resize re-read `anchor` and reposition.
    pub fn handle_event(&mut self, event: &Event, anchor: &impl Anchor) -> Option<OverlayAction> {
        let open = self.open.as_ref()?;
        match event {
            Event::Key(key) if key.is_escape_press() => self
                .close(CloseReason::Escape)
                .map(OverlayAction::Closed),
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                let (x, y) = mouse.position();
                if open.placement.rect().contains(x, y) || open.trigger.contains(x, y) {
                    None
                } else {
                    self.close(CloseReason::OutsideClick)
                        .map(OverlayAction::Closed)
                }
            }
            Event::Resize { .. } | Event::Scroll { .. } => {
                self.reposition(anchor).map(OverlayAction::Repositioned)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgrid_core::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent};

    const VIEWPORT: Size = Size::new(1024, 800);

    fn menu() -> OverlayConfig {
        OverlayConfig::new(Size::new(200, 120)).alignment(Alignment::End)
    }

    #[test]
    fn below_start_aligned() {
        let config = OverlayConfig::new(Size::new(240, 300));
        let placement = config.position(Rect::new(100, 50, 300, 36), VIEWPORT);
        assert_eq!(placement.side, Side::Below);
        assert_eq!(placement.top, 94); // 50 + 36 + 8
        assert_eq!(placement.left, 100);
    }

    #[test]
    fn below_end_aligned() {
        let placement = menu().position(Rect::new(500, 100, 40, 40), VIEWPORT);
        assert_eq!(placement.side, Side::Below);
        assert_eq!(placement.left, 340); // 540 - 200
        assert_eq!(placement.top, 148);
    }

    #[test]
    fn flips_above_near_bottom() {
        let placement = menu().position(Rect::new(900, 780, 40, 40), Size::new(1024, 800));
        assert_eq!(placement.side, Side::Above);
        assert_eq!(placement.top, 652);
        assert_eq!(placement.left, 740);
    }

    #[test]
    fn shifts_left_on_horizontal_overflow() {
        let config = OverlayConfig::new(Size::new(300, 100));
        let placement = config.position(Rect::new(900, 100, 80, 30), VIEWPORT);
        assert_eq!(placement.left, 1024 - 8 - 300);
    }

    #[test]
    fn wider_than_viewport_pins_to_margin() {
        let config = OverlayConfig::new(Size::new(1500, 100));
        let placement = config.position(Rect::new(400, 100, 80, 30), VIEWPORT);
        assert_eq!(placement.left, 8);
    }

    #[test]
    fn negative_size_literal_is_clamped_before_placement() {
        let config = OverlayConfig::new(Size {
            width: -300,
            height: 100,
        })
        .alignment(Alignment::End);
        let placement = config.position(Rect::new(1000, 100, 20, 20), VIEWPORT);
        assert_eq!(placement.size, Size::new(0, 100));
        assert_eq!(placement.left, 1016);
        assert!(placement.rect().fits_within(VIEWPORT));
    }

    #[test]
    fn end_aligned_past_left_edge_clamps_to_margin() {
        let placement = menu().position(Rect::new(20, 100, 40, 40), VIEWPORT);
        assert_eq!(placement.left, 8);
    }

    #[test]
    fn no_room_either_side_falls_back_below_and_stays_on_screen() {
        let config = OverlayConfig::new(Size::new(200, 500));
        let trigger = Rect::new(100, 300, 80, 40);
        let placement = config.position(trigger, VIEWPORT);
        assert_eq!(placement.side, Side::Below);
        assert!(placement.rect().fits_within(VIEWPORT));
        assert_eq!(placement.top, 800 - 8 - 500);
    }

    #[test]
    fn nearly_viewport_sized_overlay_is_fully_visible() {
        let config = OverlayConfig::new(Size::new(1020, 796));
        let placement = config.position(Rect::new(500, 400, 10, 10), VIEWPORT);
        assert!(placement.rect().fits_within(VIEWPORT));
    }

    #[test]
    fn trigger_scrolled_off_top_keeps_overlay_visible() {
        let config = OverlayConfig::new(Size::new(200, 120));
        let placement = config.position(Rect::new(100, -300, 80, 40), VIEWPORT);
        assert!(placement.rect().fits_within(VIEWPORT));
        assert_eq!(placement.top, 8);
    }

    #[test]
    fn trigger_below_viewport_keeps_overlay_visible() {
        let config = OverlayConfig::new(Size::new(200, 120));
        let placement = config.position(Rect::new(100, 2000, 80, 40), VIEWPORT);
        assert!(placement.rect().fits_within(VIEWPORT));
    }

    #[test]
    fn zero_margin_and_gap() {
        let config = OverlayConfig::new(Size::new(100, 50)).margin(0).gap(0);
        let placement = config.position(Rect::new(0, 0, 10, 10), Size::new(100, 100));
        assert_eq!((placement.left, placement.top), (0, 10));
        assert_eq!(OverlayConfig::new(Size::new(1, 1)).margin(-5).margin, 0);
    }

    #[test]
    fn open_reads_geometry_and_subscribes() {
        let hub = InteractionHub::new();
        let mut overlay = OverlayState::new(menu());
        assert!(!overlay.is_open());

        let anchor = (Rect::new(900, 780, 40, 40), Size::new(1024, 800));
        let placement = overlay.open(&anchor, &hub);
        assert_eq!(placement.top, 652);
        assert_eq!(overlay.trigger(), Some(anchor.0));
        assert_eq!(hub.active(), 1);
    }

    #[test]
    fn reopen_does_not_leak_subscriptions() {
        let hub = InteractionHub::new();
        let mut overlay = OverlayState::new(menu());
        let anchor = (Rect::new(10, 10, 40, 40), VIEWPORT);
        overlay.open(&anchor, &hub);
        overlay.open(&anchor, &hub);
        assert_eq!(hub.active(), 1);
    }

    #[test]
    fn every_close_path_releases_subscription() {
        let hub = InteractionHub::new();
        let anchor = (Rect::new(500, 100, 40, 40), VIEWPORT);

        let mut overlay = OverlayState::new(menu().lock_scroll(true));
        overlay.open(&anchor, &hub);
        assert!(hub.is_scroll_locked());
        assert_eq!(
            overlay.handle_event(&Event::key(KeyCode::Escape), &anchor),
            Some(OverlayAction::Closed(CloseReason::Escape))
        );
        assert!(!hub.is_listening());
        assert!(!hub.is_scroll_locked());

        overlay.open(&anchor, &hub);
        assert_eq!(
            overlay.handle_event(&Event::click(5, 5), &anchor),
            Some(OverlayAction::Closed(CloseReason::OutsideClick))
        );
        assert!(!hub.is_listening());

        overlay.open(&anchor, &hub);
        assert_eq!(overlay.close(CloseReason::Selected), Some(CloseReason::Selected));
        assert!(!hub.is_listening());

        overlay.open(&anchor, &hub);
        drop(overlay);
        assert!(!hub.is_listening());
    }

    #[test]
    fn clicks_inside_overlay_or_trigger_keep_it_open() {
        let hub = InteractionHub::new();
        let anchor = (Rect::new(500, 100, 40, 40), VIEWPORT);
        let mut overlay = OverlayState::new(menu());
        let placement = overlay.open(&anchor, &hub);

        assert_eq!(
            overlay.handle_event(&Event::click(placement.left + 1, placement.top + 1), &anchor),
            None
        );
        assert_eq!(overlay.handle_event(&Event::click(510, 110), &anchor), None);
        assert!(overlay.is_open());
    }

    #[test]
    fn non_press_events_are_ignored() {
        let hub = InteractionHub::new();
        let anchor = (Rect::new(500, 100, 40, 40), VIEWPORT);
        let mut overlay = OverlayState::new(menu());
        overlay.open(&anchor, &hub);

        let moved = Event::Mouse(MouseEvent::new(MouseEventKind::Moved, 1, 1));
        let released = Event::Mouse(MouseEvent::new(MouseEventKind::Up(MouseButton::Left), 1, 1));
        let esc_release =
            Event::Key(KeyEvent::new(KeyCode::Escape).with_kind(KeyEventKind::Release));
        for event in [moved, released, esc_release] {
            assert_eq!(overlay.handle_event(&event, &anchor), None);
        }
        assert!(overlay.is_open());
    }

    #[test]
    fn scroll_tracks_trigger() {
        let hub = InteractionHub::new();
        let mut overlay = OverlayState::new(OverlayConfig::new(Size::new(200, 120)));
        overlay.open(&(Rect::new(100, 100, 80, 40), VIEWPORT), &hub);

        let scrolled = (Rect::new(100, 60, 80, 40), VIEWPORT);
        let action = overlay.handle_event(&Event::Scroll { dx: 0, dy: 40 }, &scrolled);
        let Some(OverlayAction::Repositioned(placement)) = action else {
            panic!("expected reposition, got {action:?}");
        };
        assert_eq!(placement.top, 108);
        assert_eq!(overlay.trigger(), Some(scrolled.0));
    }

    #[test]
    fn resize_can_flip() {
        let hub = InteractionHub::new();
        let mut overlay = OverlayState::new(OverlayConfig::new(Size::new(200, 120)));
        let trigger = Rect::new(100, 400, 80, 40);
        let placement = overlay.open(&(trigger, VIEWPORT), &hub);
        assert_eq!(placement.side, Side::Below);

        let small = (trigger, Size::new(1024, 500));
        let action = overlay.handle_event(&Event::Resize { width: 1024, height: 500 }, &small);
        assert!(matches!(
            action,
            Some(OverlayAction::Repositioned(Placement { side: Side::Above, .. }))
        ));
    }

    #[test]
    fn measured_size_lasts_until_close() {
        let hub = InteractionHub::new();
        let anchor = (Rect::new(100, 100, 80, 40), VIEWPORT);
        let mut overlay = OverlayState::new(OverlayConfig::new(Size::new(200, 120)));
        overlay.open(&anchor, &hub);
        let placement = overlay.set_measured_size(Size::new(260, 90), &anchor).unwrap();
        assert_eq!(placement.size, Size::new(260, 90));

        overlay.close(CloseReason::Dismissed);
        let placement = overlay.open(&anchor, &hub);
        assert_eq!(placement.size, Size::new(200, 120));
    }

    #[test]
    fn closed_overlay_ignores_everything() {
        let anchor = (Rect::new(0, 0, 10, 10), VIEWPORT);
        let mut overlay = OverlayState::new(menu());
        assert_eq!(overlay.handle_event(&Event::key(KeyCode::Escape), &anchor), None);
        assert_eq!(overlay.reposition(&anchor), None);
        assert_eq!(overlay.close(CloseReason::Escape), None);
        assert_eq!(overlay.placement(), None);
    }

    #[test]
    fn toggle_opens_then_dismisses() {
        let hub = InteractionHub::new();
        let anchor = (Rect::new(0, 0, 10, 10), VIEWPORT);
        let mut overlay = OverlayState::new(menu());
        assert!(overlay.toggle(&anchor, &hub).is_some());
        assert!(overlay.toggle(&anchor, &hub).is_none());
        assert!(!overlay.is_open());
        assert!(!hub.is_listening());
    }
}
