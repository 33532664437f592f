use heapless::Deque;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::color::Color;
use crate::event::{EventOutcome, KeyInput, TouchSample, WidgetCallback, WidgetEvent, unhandled};
use crate::geometry::{Rect, Size};
use crate::input::{KEY_QUEUE_LEN, TOUCH_QUEUE_LEN};
use crate::widget::{TypeFlags, Widget, WidgetFlags, WidgetId, WidgetType};

/// Descriptor for the implicit root widget. The root is the display-sized
/// container every parentless creation lands in; it draws nothing itself.
static ROOT_TYPE: WidgetType = WidgetType {
    name: "root",
    flags: TypeFlags::ALLOW_CHILDREN,
    callback: unhandled,
    colors: &[Color::BLACK],
};

/// The widget engine context: arena, tree shape, input queues, focus and
/// capture references, and the reentrancy guard.
///
/// Exactly one logical thread may drive a `Ui`. Producers hand samples to
/// [`Ui::inject_touch`]/[`Ui::inject_key`]; everything else (dispatch,
/// mutation, removal, redraw) happens inside [`Ui::process`].
pub struct Ui {
    pub(crate) nodes: SlotMap<WidgetId, Widget>,
    root: WidgetId,
    display: Size,
    /// Keyboard sink. At most one widget.
    pub(crate) focus: Option<WidgetId>,
    /// Touch capture. At most one widget, held from press to release.
    pub(crate) active: Option<WidgetId>,
    /// Reentrancy guard depth. Non-zero while a callback or a structural
    /// traversal is on the stack; removals requested then are deferred.
    pub(crate) protect: u32,
    pub(crate) pending_removals: Vec<WidgetId>,
    pub(crate) touch_queue: Deque<TouchSample, TOUCH_QUEUE_LEN>,
    pub(crate) key_queue: Deque<KeyInput, KEY_QUEUE_LEN>,
    next_seq: u64,
}

impl Ui {
    pub fn new(display: Size) -> Self {
        let mut nodes: SlotMap<WidgetId, Widget> = SlotMap::with_key();
        let root = nodes.insert(Widget::new(
            &ROOT_TYPE,
            0,
            0.0,
            0.0,
            display.width as f32,
            display.height as f32,
            None,
            None,
            WidgetFlags::DIRTY,
            0,
        ));
        log::debug!(
            "ui init, display {}x{}",
            display.width,
            display.height
        );
        Ui {
            nodes,
            root,
            display,
            focus: None,
            active: None,
            protect: 0,
            pending_removals: Vec::new(),
            touch_queue: Deque::new(),
            key_queue: Deque::new(),
            next_seq: 1,
        }
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn display_size(&self) -> Size {
        self.display
    }

    /// Resize the logical display. Percent geometry picks the change up on
    /// the next resolution; the root is re-marked for a full repaint.
    pub fn set_display_size(&mut self, display: Size) {
        self.display = display;
        if let Some(root) = self.nodes.get_mut(self.root) {
            root.width = display.width as f32;
            root.height = display.height as f32;
        }
        self.invalidate(self.root);
    }

    /// Per-tick entry point: drain and route queued input, execute pending
    /// removals at the safe point, then run the redraw pass. Returns the
    /// number of events dispatched plus widgets drawn.
    pub fn process(&mut self) -> u32 {
        let mut count = self.process_touch();
        count += self.process_keys();
        self.execute_removals();
        count + self.redraw_pass()
    }

    // ------------------------------------------------------------------
    // Creation and removal
    // ------------------------------------------------------------------

    /// Create a widget and link it under `parent` (`None` means the root).
    ///
    /// Returns `None` when the parent handle is stale or the parent's
    /// descriptor forbids children; those are the only failure cases. On success
    /// the widget has observed `Init` and is marked dirty unless
    /// `IGNORE_INVALIDATE` was part of `flags`.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        ty: &'static WidgetType,
        id: u32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        parent: Option<WidgetId>,
        callback: Option<WidgetCallback>,
        flags: WidgetFlags,
    ) -> Option<WidgetId> {
        let parent_id = parent.unwrap_or(self.root);
        let Some(parent_node) = self.nodes.get(parent_id) else {
            log::warn!("create {}: stale parent handle", ty.name);
            return None;
        };
        if !parent_node.ty.allows_children() {
            log::warn!(
                "create {}: parent {} does not allow children",
                ty.name,
                parent_node.ty.name
            );
            return None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let handle = self.nodes.insert(Widget::new(
            ty,
            id,
            x,
            y,
            width,
            height,
            Some(parent_id),
            callback,
            flags & !(WidgetFlags::DIRTY | WidgetFlags::REMOVE_PENDING),
            seq,
        ));
        if let Some(parent_node) = self.nodes.get_mut(parent_id) {
            parent_node.children.push(handle);
        }
        self.resort_children(parent_id);
        log::trace!("create {} id={id} -> {handle:?}", ty.name);

        self.dispatch(handle, &WidgetEvent::Init);
        if !flags.contains(WidgetFlags::IGNORE_INVALIDATE) {
            self.invalidate(handle);
        }
        Some(handle)
    }

    /// Request removal of a widget and its whole subtree.
    ///
    /// The request is executed immediately when no callback is on the stack,
    /// otherwise deferred to the safe point of the current tick, so a widget
    /// may remove itself (or anything else) from inside its own callback.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        if id == self.root {
            log::warn!("remove: refusing to remove the root");
            return false;
        }
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.flags.insert(WidgetFlags::REMOVE_PENDING);
        self.pending_removals.push(id);
        if self.protect == 0 {
            self.execute_removals();
        }
        true
    }

    /// The removal pass. Runs only at a safe point; drains requests queued
    /// during its own callbacks as well.
    pub(crate) fn execute_removals(&mut self) {
        debug_assert_eq!(self.protect, 0, "removal pass inside a callback");
        if self.protect != 0 {
            return;
        }
        while let Some(id) = self.pending_removals.pop() {
            if self.nodes.contains_key(id) {
                self.remove_subtree(id);
            }
        }
    }

    fn remove_subtree(&mut self, id: WidgetId) {
        // Vacated area is the parent's to repaint.
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) {
            self.mark_dirty(parent);
        }

        let mut order: Vec<WidgetId> = Vec::new();
        self.collect_postorder(id, &mut order);
        log::trace!("remove subtree {id:?} ({} nodes)", order.len());

        for w in order {
            if self.focus == Some(w) {
                self.clear_focus();
            }
            if self.active == Some(w) {
                self.clear_active();
            }
            self.dispatch(w, &WidgetEvent::Remove);
            if let Some(parent) = self.nodes.get(w).and_then(|n| n.parent) {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|c| *c != w);
                }
            }
            self.nodes.remove(w);
        }
    }

    /// Children before parents.
    fn collect_postorder(&self, id: WidgetId, out: &mut Vec<WidgetId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for &child in &node.children {
            self.collect_postorder(child, out);
        }
        out.push(id);
    }

    // ------------------------------------------------------------------
    // Z-order
    // ------------------------------------------------------------------

    /// Move a widget to the top of its sibling z-order: last among the
    /// siblings sharing its z-index. Optionally also takes focus.
    pub fn put_on_front(&mut self, id: WidgetId, take_focus: bool) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if let Some(parent) = node.parent {
            let seq = self.next_seq;
            self.next_seq += 1;
            if let Some(node) = self.nodes.get_mut(id) {
                node.seq = seq;
            }
            self.resort_children(parent);
            self.invalidate(id);
        }
        if take_focus {
            self.set_focus(id);
        }
        true
    }

    /// Restore the (z_index, seq) sibling order after a mutation.
    pub(crate) fn resort_children(&mut self, parent: WidgetId) {
        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return;
        };
        let mut kids = std::mem::take(&mut parent_node.children);
        kids.sort_by_key(|&c| {
            self.nodes
                .get(c)
                .map(|n| (n.z_index, n.seq))
                .unwrap_or((0, 0))
        });
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children = kids;
        }
    }

    /// Children of `id` in back-to-front paint order. Clones the id list so
    /// callers may mutate the tree while iterating.
    pub(crate) fn children_of(&self, id: WidgetId) -> SmallVec<[WidgetId; 4]> {
        self.nodes
            .get(id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// True when `ancestor` lies on `id`'s parent chain.
    pub fn is_child_of(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes.get(p).and_then(|n| n.parent);
        }
        false
    }

    /// Deep search of the whole tree for an application id.
    pub fn find_by_id(&self, id: u32) -> Option<WidgetId> {
        self.find_by_id_in(id, None, true)
    }

    /// Search under `parent` (`None` means the root), shallow or deep.
    pub fn find_by_id_in(&self, id: u32, parent: Option<WidgetId>, deep: bool) -> Option<WidgetId> {
        let start = parent.unwrap_or(self.root);
        for child in self.children_of(start) {
            if self.nodes.get(child).map(|n| n.id) == Some(id) {
                return Some(child);
            }
            if deep {
                if let Some(found) = self.find_by_id_in(id, Some(child), true) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Resolved box of the display itself.
    pub(crate) fn display_rect(&self) -> Rect {
        Rect::from_size(self.display)
    }

    // ------------------------------------------------------------------
    // Focus and capture
    // ------------------------------------------------------------------

    pub fn focused_widget(&self) -> Option<WidgetId> {
        self.focus
    }

    pub fn active_widget(&self) -> Option<WidgetId> {
        self.active
    }

    /// Give a widget keyboard focus. The previous holder observes
    /// `FocusOut`, the new one `FocusIn`; both are re-marked for redraw.
    pub fn set_focus(&mut self, id: WidgetId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        if self.focus == Some(id) {
            return true;
        }
        self.clear_focus();
        self.focus = Some(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.insert(WidgetFlags::FOCUSED);
        }
        self.invalidate(id);
        self.dispatch(id, &WidgetEvent::FocusIn);
        true
    }

    pub fn clear_focus(&mut self) {
        if let Some(old) = self.focus.take() {
            if let Some(node) = self.nodes.get_mut(old) {
                node.flags.remove(WidgetFlags::FOCUSED);
            }
            self.invalidate(old);
            self.dispatch(old, &WidgetEvent::FocusOut);
        }
    }

    pub(crate) fn set_active(&mut self, id: WidgetId) {
        self.clear_active();
        self.active = Some(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.insert(WidgetFlags::ACTIVE);
        }
        self.invalidate(id);
        self.dispatch(id, &WidgetEvent::ActiveIn);
    }

    pub(crate) fn clear_active(&mut self) {
        if let Some(old) = self.active.take() {
            if let Some(node) = self.nodes.get_mut(old) {
                node.flags.remove(WidgetFlags::ACTIVE);
            }
            self.invalidate(old);
            self.dispatch(old, &WidgetEvent::ActiveOut);
        }
    }

    /// Drop focus/capture when `id` or one of its descendants holds it.
    /// Called when a subtree stops being interactable (hide, remove).
    pub(crate) fn release_references_into(&mut self, id: WidgetId) {
        if let Some(f) = self.focus {
            if f == id || self.is_child_of(f, id) {
                self.clear_focus();
            }
        }
        if let Some(a) = self.active {
            if a == id || self.is_child_of(a, id) {
                self.clear_active();
            }
        }
    }

    // ------------------------------------------------------------------
    // Callback dispatch
    // ------------------------------------------------------------------

    /// Invoke a widget's callback: the instance override when present, else
    /// the type-descriptor default. The reentrancy guard is held across the
    /// call, so structural removals requested inside it are deferred.
    ///
    /// Dispatch to a stale handle is a silent no-op.
    pub fn dispatch(&mut self, id: WidgetId, event: &WidgetEvent) -> EventOutcome {
        let Some(node) = self.nodes.get(id) else {
            log::debug!("dispatch to stale handle, dropped: {event:?}");
            return EventOutcome::Ignored;
        };
        let instance = node.callback.clone();
        let default = node.ty.callback;

        self.protect += 1;
        let outcome = match instance {
            Some(cb) => cb(self, id, event),
            None => default(self, id, event),
        };
        self.protect -= 1;
        outcome
    }
}
