//! Invalidation and the redraw pass.
//!
//! Invalidate marks a widget dirty, nothing more; drawing happens only in
//! the pass run from [`Ui::process`]. The pass walks the tree in paint order
//! (parents before children, siblings back-to-front), computes each dirty
//! widget's actually-visible region, and delivers one `Draw` event per
//! surviving clip rect through callback dispatch.

use crate::event::WidgetEvent;
use crate::geometry::Region;
use crate::tree::Ui;
use crate::widget::{WidgetFlags, WidgetId};

impl Ui {
    /// Mark a widget as needing redraw.
    ///
    /// No-op when the widget has `IGNORE_INVALIDATE` set or the handle is
    /// stale. When the widget carries `INVALIDATE_WITH_PARENT`, its
    /// immediate parent is marked too: one level, never transitive.
    pub fn invalidate(&mut self, id: WidgetId) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.flags.contains(WidgetFlags::IGNORE_INVALIDATE) {
            return false;
        }
        node.flags.insert(WidgetFlags::DIRTY);
        if node.flags.contains(WidgetFlags::INVALIDATE_WITH_PARENT) {
            if let Some(parent) = node.parent {
                self.mark_dirty(parent);
            }
        }
        true
    }

    /// Invalidate a widget and, unconditionally, its immediate parent. Used
    /// where the widget's old area becomes the parent's to repaint (hide,
    /// shrink, removal).
    pub fn invalidate_with_parent(&mut self, id: WidgetId) -> bool {
        if !self.invalidate(id) {
            return false;
        }
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) {
            self.mark_dirty(parent);
        }
        true
    }

    /// Dirty bit only, still honoring the target's own IGNORE_INVALIDATE.
    pub(crate) fn mark_dirty(&mut self, id: WidgetId) {
        if let Some(node) = self.nodes.get_mut(id) {
            if !node.flags.contains(WidgetFlags::IGNORE_INVALIDATE) {
                node.flags.insert(WidgetFlags::DIRTY);
            }
        }
    }

    /// The widget's visible region: its resolved box clipped by every
    /// ancestor and the display, minus the cover of every fully-opaque
    /// sibling of strictly higher z-index.
    ///
    /// Hidden and translucent widgets never occlude, but are themselves
    /// occluded like any other.
    pub fn visible_region(&self, id: WidgetId) -> Region {
        let Some(node) = self.nodes.get(id) else {
            return Region::empty();
        };

        let mut clip = self.resolved_rect(id).intersect(&self.display_rect());
        let mut ancestor = node.parent;
        while let Some(a) = ancestor {
            clip = clip.intersect(&self.resolved_rect(a));
            if clip.is_empty() {
                return Region::empty();
            }
            ancestor = self.nodes.get(a).and_then(|n| n.parent);
        }

        let mut region = Region::new(clip);
        if let Some(parent) = node.parent {
            let z = node.z_index;
            for sibling in self.children_of(parent) {
                if sibling == id {
                    continue;
                }
                let Some(sibling_node) = self.nodes.get(sibling) else {
                    continue;
                };
                if sibling_node.z_index <= z || !sibling_node.is_opaque() {
                    continue;
                }
                region.subtract(&self.resolved_rect(sibling));
                if region.is_empty() {
                    break;
                }
            }
        }
        region
    }

    /// Visit dirty widgets in tree order and issue their draw calls. A
    /// widget that draws also redraws its descendants, since its fill would
    /// otherwise overwrite them. Returns the number of widgets drawn.
    pub(crate) fn redraw_pass(&mut self) -> u32 {
        // Dirty bits are harvested (and cleared) before any callback runs,
        // so a callback re-invalidating during the pass lands in the next
        // tick instead of extending this one.
        let mut draw_list: Vec<(WidgetId, Region)> = Vec::new();
        self.collect_dirty(self.root(), true, false, &mut draw_list);
        if draw_list.is_empty() {
            return 0;
        }
        log::trace!("redraw pass: {} widgets", draw_list.len());

        let mut drawn = 0;
        for (id, region) in draw_list {
            if !self.nodes.contains_key(id) {
                continue;
            }
            for clip in region.rects() {
                self.dispatch(id, &WidgetEvent::Draw { clip: *clip });
            }
            drawn += 1;
        }
        drawn
    }

    fn collect_dirty(
        &mut self,
        id: WidgetId,
        ancestors_visible: bool,
        ancestor_drawn: bool,
        out: &mut Vec<(WidgetId, Region)>,
    ) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let dirty = node.flags.contains(WidgetFlags::DIRTY);
        node.flags.remove(WidgetFlags::DIRTY);
        let self_visible = node.is_visible();

        let draws = (dirty || ancestor_drawn) && ancestors_visible && self_visible;
        if draws {
            let region = self.visible_region(id);
            if !region.is_empty() {
                out.push((id, region));
            }
        }
        for child in self.children_of(id) {
            self.collect_dirty(child, ancestors_visible && self_visible, draws, out);
        }
    }
}
