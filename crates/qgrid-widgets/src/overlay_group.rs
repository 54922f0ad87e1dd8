#![forbid(unsafe_code)]

//! All overlays of one screen, routed together.
//!
//! A screen with several floating panels (row action menus, a column
//! customizer, a date picker) registers each under a key. The group decides
//! whether panels may coexist ([`OverlayPolicy`]) and fans shared input out:
//!
//! - Escape closes only the most recently opened overlay.
//! - A pointer press closes every open overlay whose box and trigger both
//!   miss the point.
//! - Scroll and resize reposition every open overlay. An overlay whose
//!   trigger can no longer be resolved closes with [`CloseReason::Unmounted`].

use std::fmt;
use std::hash::Hash;

use ahash::AHashMap;
use qgrid_core::event::{Event, MouseEventKind};
use serde::{Deserialize, Serialize};

use crate::dismiss::InteractionHub;
use crate::overlay::{Anchor, CloseReason, OverlayAction, OverlayConfig, OverlayState, Placement};

/// Whether overlays on one screen may be open at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverlayPolicy {
    /// Any number may be open.
    #[default]
    Independent,
    /// Opening one dismisses the others.
    Exclusive,
}

/// Keyed collection of [`OverlayState`]s sharing one [`InteractionHub`].
#[derive(Debug)]
pub struct OverlayGroup<K> {
    policy: OverlayPolicy,
    hub: InteractionHub,
    overlays: AHashMap<K, OverlayState>,
    /// Open overlays, oldest first.
    stack: Vec<K>,
}

impl<K: Copy + Eq + Hash + fmt::Debug> OverlayGroup<K> {
    pub fn new(policy: OverlayPolicy, hub: InteractionHub) -> Self {
        Self {
            policy,
            hub,
            overlays: AHashMap::new(),
            stack: Vec::new(),
        }
    }

    pub fn policy(&self) -> OverlayPolicy {
        self.policy
    }

    pub fn hub(&self) -> &InteractionHub {
        &self.hub
    }

    /// Add (or replace, closing it) the overlay for `key`.
    pub fn register(&mut self, key: K, config: OverlayConfig) {
        if self.overlays.insert(key, OverlayState::new(config)).is_some() {
            self.stack.retain(|k| *k != key);
        }
    }

    /// Remove the overlay for `key`, closing it as [`CloseReason::Unmounted`].
    pub fn unregister(&mut self, key: K) -> Option<CloseReason> {
        let mut overlay = self.overlays.remove(&key)?;
        self.stack.retain(|k| *k != key);
        overlay.close(CloseReason::Unmounted)
    }

    pub fn get(&self, key: K) -> Option<&OverlayState> {
        self.overlays.get(&key)
    }

    pub fn is_open(&self, key: K) -> bool {
        self.overlays.get(&key).is_some_and(OverlayState::is_open)
    }

    /// Open overlays, oldest first.
    pub fn open_keys(&self) -> &[K] {
        &self.stack
    }

    /// The most recently opened overlay still open.
    pub fn topmost(&self) -> Option<K> {
        self.stack.last().copied()
    }

    /// Open `key` against fresh geometry.
    ///
    /// Under [`OverlayPolicy::Exclusive`] every other open overlay is
    /// dismissed first. Returns `None` for an unregistered key.
    pub fn open(&mut self, key: K, anchor: &impl Anchor) -> Option<Placement> {
        if !self.overlays.contains_key(&key) {
            crate::debug!(?key, "overlay_group.open unknown key");
            return None;
        }
        if self.policy == OverlayPolicy::Exclusive {
            let others: Vec<K> = self.stack.iter().copied().filter(|k| *k != key).collect();
            for other in others {
                self.close(other, CloseReason::Dismissed);
            }
        }
        let overlay = self.overlays.get_mut(&key)?;
        let placement = overlay.open(anchor, &self.hub);
        self.stack.retain(|k| *k != key);
        self.stack.push(key);
        Some(placement)
    }

    /// Open `key` if closed, dismiss it if open.
    pub fn toggle(&mut self, key: K, anchor: &impl Anchor) -> Option<Placement> {
        if self.is_open(key) {
            self.close(key, CloseReason::Dismissed);
            None
        } else {
            self.open(key, anchor)
        }
    }

    /// Close `key`. Returns `None` if it was not open.
    pub fn close(&mut self, key: K, reason: CloseReason) -> Option<CloseReason> {
        let closed = self.overlays.get_mut(&key)?.close(reason);
        if closed.is_some() {
            self.stack.retain(|k| *k != key);
        }
        closed
    }

    /// Close every open overlay, newest first.
    pub fn close_all(&mut self, reason: CloseReason) -> Vec<K> {
        let keys: Vec<K> = self.stack.iter().rev().copied().collect();
        for key in &keys {
            self.close(*key, reason);
        }
        keys
    }

    /// Route one event to the open overlays.
    ///
    /// `resolve` maps a key to its current trigger geometry; it is only
    /// consulted for scroll and resize.
    pub fn handle_event<A, R>(&mut self, event: &Event, mut resolve: R) -> Vec<(K, OverlayAction)>
    where
        A: Anchor,
        R: FnMut(K) -> Option<A>,
    {
        let mut actions = Vec::new();
        match event {
            Event::Key(key) if key.is_escape_press() => {
                if let Some(top) = self.topmost() {
                    if let Some(reason) = self.close(top, CloseReason::Escape) {
                        actions.push((top, OverlayAction::Closed(reason)));
                    }
                }
            }
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                let (x, y) = mouse.position();
                let missed: Vec<K> = self
                    .stack
                    .iter()
                    .copied()
                    .filter(|k| {
                        self.overlays.get(k).is_some_and(|o| {
                            !o.rect().is_some_and(|r| r.contains(x, y))
                                && !o.trigger().is_some_and(|t| t.contains(x, y))
                        })
                    })
                    .collect();
                for key in missed {
                    if let Some(reason) = self.close(key, CloseReason::OutsideClick) {
                        actions.push((key, OverlayAction::Closed(reason)));
                    }
                }
            }
            Event::Resize { .. } | Event::Scroll { .. } => {
                for key in self.stack.clone() {
                    match resolve(key) {
                        Some(anchor) => {
                            let placement = self
                                .overlays
                                .get_mut(&key)
                                .and_then(|o| o.reposition(&anchor));
                            if let Some(placement) = placement {
                                actions.push((key, OverlayAction::Repositioned(placement)));
                            }
                        }
                        None => {
                            if let Some(reason) = self.close(key, CloseReason::Unmounted) {
                                actions.push((key, OverlayAction::Closed(reason)));
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        actions
    }
}
