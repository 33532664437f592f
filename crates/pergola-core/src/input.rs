//! Input queues and routing.
//!
//! Producers (touch ISR, serial RX) call the `inject_*` primitives, which
//! only push into bounded ring buffers and never touch the tree, so an
//! interrupt can never reenter a traversal. Routing and dispatch happen
//! exclusively in the tick, single-producer/single-consumer style.
//!
//! Touch capture: the widget hit on press owns the whole gesture. Every
//! later pressed sample becomes `TouchMove` and the release `TouchEnd` for
//! that widget, wherever the finger went. Keys go to the focused widget
//! only; focus never moves as a side effect of touch.

use crate::error::InputError;
use crate::event::{KeyInput, TouchSample, TouchState, WidgetEvent};
use crate::geometry::{Point, Rect};
use crate::tree::Ui;
use crate::widget::WidgetId;

/// Touch queue capacity. A controller sampling at interrupt rate produces a
/// handful of samples per tick; 16 absorbs a laggy tick without growing.
pub const TOUCH_QUEUE_LEN: usize = 16;
/// Key queue capacity. Serial bursts are longer than touch bursts.
pub const KEY_QUEUE_LEN: usize = 32;

impl Ui {
    /// Enqueue a raw touch sample. Safe to call from producer context: no
    /// tree access, no dispatch. A saturated queue drops the sample.
    pub fn inject_touch(&mut self, sample: TouchSample) -> Result<(), InputError> {
        self.touch_queue.push_back(sample).map_err(|_| {
            log::warn!("touch queue full, sample dropped");
            InputError::QueueFull
        })
    }

    /// Enqueue a decoded key event. Same discipline as [`Ui::inject_touch`].
    pub fn inject_key(&mut self, key: KeyInput) -> Result<(), InputError> {
        self.key_queue.push_back(key).map_err(|_| {
            log::warn!("key queue full, key dropped");
            InputError::QueueFull
        })
    }

    pub(crate) fn process_touch(&mut self) -> u32 {
        let mut count = 0;
        while let Some(sample) = self.touch_queue.pop_front() {
            self.route_touch(sample);
            count += 1;
        }
        count
    }

    pub(crate) fn process_keys(&mut self) -> u32 {
        let mut count = 0;
        while let Some(key) = self.key_queue.pop_front() {
            match self.focus {
                Some(focused) => {
                    self.dispatch(focused, &WidgetEvent::KeyPress { key });
                }
                None => log::trace!("key {:?} with no focus, dropped", key.ch),
            }
            count += 1;
        }
        count
    }

    fn route_touch(&mut self, sample: TouchSample) {
        let at = sample.point();
        match (sample.state, self.active) {
            // Gesture in progress: the captured widget gets everything.
            (TouchState::Pressed, Some(active)) => {
                self.dispatch(active, &WidgetEvent::TouchMove { at });
            }
            (TouchState::Pressed, None) => {
                if let Some(hit) = self.hit_test(at) {
                    log::trace!("press at {at:?} captured by {hit:?}");
                    self.set_active(hit);
                    self.dispatch(hit, &WidgetEvent::TouchStart { at });
                }
            }
            (TouchState::Released, Some(active)) => {
                self.dispatch(active, &WidgetEvent::TouchEnd { at });
                if self.resolved_rect(active).contains(at) {
                    self.dispatch(active, &WidgetEvent::Click { at });
                }
                self.clear_active();
            }
            // Release with no capture: stale controller chatter.
            (TouchState::Released, None) => {}
        }
    }

    /// Deepest, highest-z-index visible widget containing the point, with
    /// each level clipped by its ancestors. `None` when the point misses
    /// the display entirely.
    pub fn hit_test(&self, at: Point) -> Option<WidgetId> {
        self.hit_test_from(self.root(), at, self.display_rect())
    }

    fn hit_test_from(&self, id: WidgetId, at: Point, clip: Rect) -> Option<WidgetId> {
        let node = self.nodes.get(id)?;
        if !node.is_visible() {
            return None;
        }
        let rect = self.resolved_rect(id).intersect(&clip);
        if !rect.contains(at) {
            return None;
        }
        // Front-most children first: the sibling list is back-to-front.
        for child in self.children_of(id).iter().rev() {
            if let Some(hit) = self.hit_test_from(*child, at, rect) {
                return Some(hit);
            }
        }
        Some(id)
    }
}
