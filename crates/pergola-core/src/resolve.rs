//! Geometry resolution.
//!
//! Stored geometry is resolved to absolute pixel boxes on every read.
//! Nothing is cached, so an ancestor resize is visible to every descendant
//! immediately, with no propagation step. The cost is that the clip and
//! redraw logic recomputes boxes each pass.
//!
//! Per axis: absolute values are used directly; percent values resolve as
//! `round(value / 100 * parent inner extent)`, where the inner extent is the
//! parent's resolved extent minus that axis's padding pair. A widget without
//! a parent (the root) resolves against the display. An expanded widget
//! ignores its stored geometry entirely: it sits at the parent's inner
//! origin and fills the parent's inner box.

use crate::geometry::{Dim, Rect};
use crate::tree::Ui;
use crate::widget::{WidgetFlags, WidgetId};

impl Ui {
    /// Position relative to the parent's inner origin, x axis.
    fn relative_x(&self, id: WidgetId) -> Dim {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        if node.flags.contains(WidgetFlags::EXPANDED) {
            0
        } else if node.flags.contains(WidgetFlags::PERCENT_X) {
            percent_of(node.x, self.parent_inner_width(id))
        } else {
            node.x.round() as Dim
        }
    }

    fn relative_y(&self, id: WidgetId) -> Dim {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        if node.flags.contains(WidgetFlags::EXPANDED) {
            0
        } else if node.flags.contains(WidgetFlags::PERCENT_Y) {
            percent_of(node.y, self.parent_inner_height(id))
        } else {
            node.y.round() as Dim
        }
    }

    /// Absolute x of the widget's box, in display coordinates. A child sits
    /// at its parent's absolute position offset by the parent's leading
    /// padding and pulled back by the parent's scroll offset.
    pub fn resolved_x(&self, id: WidgetId) -> Dim {
        let rel = self.relative_x(id);
        match self.nodes.get(id).and_then(|n| n.parent) {
            Some(parent) => {
                let pad = self
                    .nodes
                    .get(parent)
                    .map(|p| (p.padding.left as Dim, p.scroll_x))
                    .unwrap_or((0, 0));
                self.resolved_x(parent) + pad.0 - pad.1 + rel
            }
            None => rel,
        }
    }

    pub fn resolved_y(&self, id: WidgetId) -> Dim {
        let rel = self.relative_y(id);
        match self.nodes.get(id).and_then(|n| n.parent) {
            Some(parent) => {
                let pad = self
                    .nodes
                    .get(parent)
                    .map(|p| (p.padding.top as Dim, p.scroll_y))
                    .unwrap_or((0, 0));
                self.resolved_y(parent) + pad.0 - pad.1 + rel
            }
            None => rel,
        }
    }

    pub fn resolved_width(&self, id: WidgetId) -> Dim {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        if node.flags.contains(WidgetFlags::EXPANDED) {
            self.parent_inner_width(id)
        } else if node.flags.contains(WidgetFlags::PERCENT_W) {
            percent_of(node.width, self.parent_inner_width(id))
        } else {
            node.width.round() as Dim
        }
    }

    pub fn resolved_height(&self, id: WidgetId) -> Dim {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        if node.flags.contains(WidgetFlags::EXPANDED) {
            self.parent_inner_height(id)
        } else if node.flags.contains(WidgetFlags::PERCENT_H) {
            percent_of(node.height, self.parent_inner_height(id))
        } else {
            node.height.round() as Dim
        }
    }

    /// The widget's absolute box.
    pub fn resolved_rect(&self, id: WidgetId) -> Rect {
        Rect::new(
            self.resolved_x(id),
            self.resolved_y(id),
            self.resolved_width(id),
            self.resolved_height(id),
        )
    }

    /// Resolved width minus the horizontal padding pair: the extent children
    /// resolve percentages against.
    pub fn inner_width(&self, id: WidgetId) -> Dim {
        let pad = self
            .nodes
            .get(id)
            .map(|n| n.padding.horizontal())
            .unwrap_or(0);
        (self.resolved_width(id) - pad).max(0)
    }

    pub fn inner_height(&self, id: WidgetId) -> Dim {
        let pad = self
            .nodes
            .get(id)
            .map(|n| n.padding.vertical())
            .unwrap_or(0);
        (self.resolved_height(id) - pad).max(0)
    }

    /// Inner extent of the parent; the display extent for the root.
    pub fn parent_inner_width(&self, id: WidgetId) -> Dim {
        match self.nodes.get(id).and_then(|n| n.parent) {
            Some(parent) => self.inner_width(parent),
            None => self.display_size().width,
        }
    }

    pub fn parent_inner_height(&self, id: WidgetId) -> Dim {
        match self.nodes.get(id).and_then(|n| n.parent) {
            Some(parent) => self.inner_height(parent),
            None => self.display_size().height,
        }
    }
}

fn percent_of(value: f32, extent: Dim) -> Dim {
    (value / 100.0 * extent as f32).round() as Dim
}
