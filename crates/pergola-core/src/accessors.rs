//! Typed accessors over widget state.
//!
//! This is the surface widget-class implementers build against: every read
//! and write of instance state goes through here, never through node fields.
//! Setters answer `false` only for a stale handle; getters yield a neutral
//! default (zero, `false`, `None`) for one. Appearance-affecting writes mark
//! the widget dirty; none of them trigger a draw by themselves.

use std::any::Any;

use smallvec::SmallVec;

use crate::color::Color;
use crate::event::WidgetCallback;
use crate::font::Font;
use crate::geometry::Dim;
use crate::tree::Ui;
use crate::widget::{
    Widget, WidgetFlags, WidgetId, WidgetType, Z_INDEX_MAX, Z_INDEX_MIN,
};

impl Ui {
    /// Apply `f` to a live widget; invalidate when it reports a change.
    fn mutate(&mut self, id: WidgetId, f: impl FnOnce(&mut Widget) -> bool) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if f(node) {
            self.invalidate(id);
        }
        true
    }

    fn read<T>(&self, id: WidgetId, default: T, f: impl FnOnce(&Widget) -> T) -> T {
        self.nodes.get(id).map(f).unwrap_or(default)
    }

    fn flag(&self, id: WidgetId, flag: WidgetFlags) -> bool {
        self.read(id, false, |n| n.flags.contains(flag))
    }

    // ------------------------------------------------------------------
    // Position
    // ------------------------------------------------------------------

    pub fn set_position(&mut self, id: WidgetId, x: f32, y: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.x != x
                || n.y != y
                || n.flags.intersects(WidgetFlags::PERCENT_X | WidgetFlags::PERCENT_Y);
            n.x = x;
            n.y = y;
            n.flags.remove(WidgetFlags::PERCENT_X | WidgetFlags::PERCENT_Y);
            changed
        })
    }

    pub fn set_position_percent(&mut self, id: WidgetId, x: f32, y: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.x != x
                || n.y != y
                || !n.flags.contains(WidgetFlags::PERCENT_X | WidgetFlags::PERCENT_Y);
            n.x = x;
            n.y = y;
            n.flags.insert(WidgetFlags::PERCENT_X | WidgetFlags::PERCENT_Y);
            changed
        })
    }

    pub fn set_x_position(&mut self, id: WidgetId, x: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.x != x || n.flags.contains(WidgetFlags::PERCENT_X);
            n.x = x;
            n.flags.remove(WidgetFlags::PERCENT_X);
            changed
        })
    }

    pub fn set_x_position_percent(&mut self, id: WidgetId, x: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.x != x || !n.flags.contains(WidgetFlags::PERCENT_X);
            n.x = x;
            n.flags.insert(WidgetFlags::PERCENT_X);
            changed
        })
    }

    pub fn set_y_position(&mut self, id: WidgetId, y: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.y != y || n.flags.contains(WidgetFlags::PERCENT_Y);
            n.y = y;
            n.flags.remove(WidgetFlags::PERCENT_Y);
            changed
        })
    }

    pub fn set_y_position_percent(&mut self, id: WidgetId, y: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.y != y || !n.flags.contains(WidgetFlags::PERCENT_Y);
            n.y = y;
            n.flags.insert(WidgetFlags::PERCENT_Y);
            changed
        })
    }

    // ------------------------------------------------------------------
    // Size
    // ------------------------------------------------------------------

    pub fn set_size(&mut self, id: WidgetId, width: f32, height: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.width != width
                || n.height != height
                || n.flags.intersects(WidgetFlags::PERCENT_W | WidgetFlags::PERCENT_H);
            n.width = width;
            n.height = height;
            n.flags.remove(WidgetFlags::PERCENT_W | WidgetFlags::PERCENT_H);
            changed
        })
    }

    pub fn set_size_percent(&mut self, id: WidgetId, width: f32, height: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.width != width
                || n.height != height
                || !n.flags.contains(WidgetFlags::PERCENT_W | WidgetFlags::PERCENT_H);
            n.width = width;
            n.height = height;
            n.flags.insert(WidgetFlags::PERCENT_W | WidgetFlags::PERCENT_H);
            changed
        })
    }

    pub fn set_width(&mut self, id: WidgetId, width: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.width != width || n.flags.contains(WidgetFlags::PERCENT_W);
            n.width = width;
            n.flags.remove(WidgetFlags::PERCENT_W);
            changed
        })
    }

    pub fn set_width_percent(&mut self, id: WidgetId, width: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.width != width || !n.flags.contains(WidgetFlags::PERCENT_W);
            n.width = width;
            n.flags.insert(WidgetFlags::PERCENT_W);
            changed
        })
    }

    pub fn set_height(&mut self, id: WidgetId, height: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.height != height || n.flags.contains(WidgetFlags::PERCENT_H);
            n.height = height;
            n.flags.remove(WidgetFlags::PERCENT_H);
            changed
        })
    }

    pub fn set_height_percent(&mut self, id: WidgetId, height: f32) -> bool {
        self.mutate(id, |n| {
            let changed = n.height != height || !n.flags.contains(WidgetFlags::PERCENT_H);
            n.height = height;
            n.flags.insert(WidgetFlags::PERCENT_H);
            changed
        })
    }

    // ------------------------------------------------------------------
    // Expanded
    // ------------------------------------------------------------------

    pub fn set_expanded(&mut self, id: WidgetId, expanded: bool) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.flags.contains(WidgetFlags::EXPANDED) == expanded {
            return true;
        }
        node.flags.toggle(WidgetFlags::EXPANDED);
        if expanded {
            self.invalidate(id);
        } else {
            // Collapsing uncovers parent area the widget no longer owns.
            self.invalidate_with_parent(id);
        }
        true
    }

    pub fn toggle_expanded(&mut self, id: WidgetId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        let expanded = self.is_expanded(id);
        self.set_expanded(id, !expanded)
    }

    pub fn is_expanded(&self, id: WidgetId) -> bool {
        self.flag(id, WidgetFlags::EXPANDED)
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    pub fn show(&mut self, id: WidgetId) -> bool {
        self.mutate(id, |n| {
            if !n.flags.contains(WidgetFlags::HIDDEN) {
                return false;
            }
            n.flags.remove(WidgetFlags::HIDDEN);
            true
        })
    }

    /// Hide a widget. Focus or capture held inside the hidden subtree is
    /// released; the vacated area becomes the parent's to repaint.
    pub fn hide(&mut self, id: WidgetId) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.flags.contains(WidgetFlags::HIDDEN) {
            return true;
        }
        node.flags.insert(WidgetFlags::HIDDEN);
        self.release_references_into(id);
        self.invalidate_with_parent(id);
        true
    }

    /// Hide every direct child, leaving the widget itself visible.
    pub fn hide_children(&mut self, id: WidgetId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        for child in self.children_of(id) {
            self.hide(child);
        }
        true
    }

    pub fn is_hidden(&self, id: WidgetId) -> bool {
        self.flag(id, WidgetFlags::HIDDEN)
    }

    /// Not hidden and not fully transparent. Ancestors are not consulted.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.read(id, false, |n| n.is_visible())
    }

    pub fn set_alpha(&mut self, id: WidgetId, alpha: u8) -> bool {
        self.mutate(id, |n| {
            if n.alpha == alpha {
                return false;
            }
            n.alpha = alpha;
            true
        })
    }

    pub fn alpha(&self, id: WidgetId) -> u8 {
        self.read(id, 0, |n| n.alpha)
    }

    // ------------------------------------------------------------------
    // Z-order and style
    // ------------------------------------------------------------------

    pub fn set_z_index(&mut self, id: WidgetId, z_index: i32) -> bool {
        let z_index = z_index.clamp(Z_INDEX_MIN, Z_INDEX_MAX);
        let parent = match self.nodes.get_mut(id) {
            Some(n) => {
                if n.z_index == z_index {
                    return true;
                }
                n.z_index = z_index;
                n.parent
            }
            None => return false,
        };
        if let Some(parent) = parent {
            self.resort_children(parent);
        }
        self.invalidate(id);
        true
    }

    pub fn z_index(&self, id: WidgetId) -> i32 {
        self.read(id, 0, |n| n.z_index)
    }

    pub fn set_3d(&mut self, id: WidgetId, enable: bool) -> bool {
        self.mutate(id, |n| {
            if n.flags.contains(WidgetFlags::STYLE_3D) == enable {
                return false;
            }
            n.flags.toggle(WidgetFlags::STYLE_3D);
            true
        })
    }

    pub fn is_3d(&self, id: WidgetId) -> bool {
        self.flag(id, WidgetFlags::STYLE_3D)
    }

    // ------------------------------------------------------------------
    // Padding
    // ------------------------------------------------------------------

    pub fn set_padding_top(&mut self, id: WidgetId, value: u8) -> bool {
        self.mutate(id, |n| {
            let changed = n.padding.top != value;
            n.padding.top = value;
            changed
        })
    }

    pub fn set_padding_right(&mut self, id: WidgetId, value: u8) -> bool {
        self.mutate(id, |n| {
            let changed = n.padding.right != value;
            n.padding.right = value;
            changed
        })
    }

    pub fn set_padding_bottom(&mut self, id: WidgetId, value: u8) -> bool {
        self.mutate(id, |n| {
            let changed = n.padding.bottom != value;
            n.padding.bottom = value;
            changed
        })
    }

    pub fn set_padding_left(&mut self, id: WidgetId, value: u8) -> bool {
        self.mutate(id, |n| {
            let changed = n.padding.left != value;
            n.padding.left = value;
            changed
        })
    }

    pub fn set_padding_top_bottom(&mut self, id: WidgetId, value: u8) -> bool {
        self.set_padding_top(id, value) && self.set_padding_bottom(id, value)
    }

    pub fn set_padding_left_right(&mut self, id: WidgetId, value: u8) -> bool {
        self.set_padding_left(id, value) && self.set_padding_right(id, value)
    }

    pub fn set_padding(&mut self, id: WidgetId, value: u8) -> bool {
        self.set_padding_top_bottom(id, value) && self.set_padding_left_right(id, value)
    }

    pub fn padding_top(&self, id: WidgetId) -> u8 {
        self.read(id, 0, |n| n.padding.top)
    }

    pub fn padding_right(&self, id: WidgetId) -> u8 {
        self.read(id, 0, |n| n.padding.right)
    }

    pub fn padding_bottom(&self, id: WidgetId) -> u8 {
        self.read(id, 0, |n| n.padding.bottom)
    }

    pub fn padding_left(&self, id: WidgetId) -> u8 {
        self.read(id, 0, |n| n.padding.left)
    }

    // ------------------------------------------------------------------
    // Scroll
    // ------------------------------------------------------------------

    pub fn set_scroll_x(&mut self, id: WidgetId, scroll: Dim) -> bool {
        self.mutate(id, |n| {
            let changed = n.scroll_x != scroll;
            n.scroll_x = scroll;
            changed
        })
    }

    pub fn set_scroll_y(&mut self, id: WidgetId, scroll: Dim) -> bool {
        self.mutate(id, |n| {
            let changed = n.scroll_y != scroll;
            n.scroll_y = scroll;
            changed
        })
    }

    pub fn inc_scroll_x(&mut self, id: WidgetId, delta: Dim) -> bool {
        self.mutate(id, |n| {
            n.scroll_x += delta;
            delta != 0
        })
    }

    pub fn inc_scroll_y(&mut self, id: WidgetId, delta: Dim) -> bool {
        self.mutate(id, |n| {
            n.scroll_y += delta;
            delta != 0
        })
    }

    pub fn scroll_x(&self, id: WidgetId) -> Dim {
        self.read(id, 0, |n| n.scroll_x)
    }

    pub fn scroll_y(&self, id: WidgetId) -> Dim {
        self.read(id, 0, |n| n.scroll_y)
    }

    // ------------------------------------------------------------------
    // Text and font
    // ------------------------------------------------------------------

    pub fn set_text(&mut self, id: WidgetId, text: &str) -> bool {
        self.mutate(id, |n| {
            if n.text.as_deref() == Some(text) {
                return false;
            }
            n.text = Some(text.to_owned());
            true
        })
    }

    pub fn clear_text(&mut self, id: WidgetId) -> bool {
        self.mutate(id, |n| n.text.take().is_some())
    }

    pub fn text(&self, id: WidgetId) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.text.as_deref())
    }

    pub fn set_font(&mut self, id: WidgetId, font: &'static Font) -> bool {
        self.mutate(id, |n| {
            let changed = n.font != Some(font);
            n.font = Some(font);
            changed
        })
    }

    pub fn font(&self, id: WidgetId) -> Option<&'static Font> {
        self.read(id, None, |n| n.font)
    }

    /// Both a font and a non-empty text buffer are set: the precondition
    /// for any text drawing.
    pub fn has_font_and_text(&self, id: WidgetId) -> bool {
        self.read(id, false, |n| {
            n.font.is_some() && n.text.as_deref().is_some_and(|t| !t.is_empty())
        })
    }

    // ------------------------------------------------------------------
    // Colors
    // ------------------------------------------------------------------

    /// Override one palette slot for this instance. The first override
    /// copies the descriptor palette so untouched slots keep their
    /// defaults.
    pub fn set_color(&mut self, id: WidgetId, index: usize, color: Color) -> bool {
        self.mutate(id, |n| {
            let defaults = n.ty.colors;
            let palette = n
                .colors
                .get_or_insert_with(|| SmallVec::from_slice(defaults));
            if palette.len() <= index {
                palette.resize(index + 1, Color::BLACK);
            }
            let changed = palette[index] != color;
            palette[index] = color;
            changed
        })
    }

    /// Instance palette first, then the descriptor palette, then black.
    pub fn color(&self, id: WidgetId, index: usize) -> Color {
        self.read(id, Color::BLACK, |n| {
            n.colors
                .as_ref()
                .and_then(|c| c.get(index).copied())
                .or_else(|| n.ty.colors.get(index).copied())
                .unwrap_or(Color::BLACK)
        })
    }

    // ------------------------------------------------------------------
    // User data and callback
    // ------------------------------------------------------------------

    pub fn set_user_data(&mut self, id: WidgetId, data: Box<dyn Any>) -> bool {
        match self.nodes.get_mut(id) {
            Some(n) => {
                n.user_data = Some(data);
                true
            }
            None => false,
        }
    }

    pub fn user_data<T: 'static>(&self, id: WidgetId) -> Option<&T> {
        self.nodes
            .get(id)
            .and_then(|n| n.user_data.as_ref())
            .and_then(|d| d.downcast_ref::<T>())
    }

    pub fn user_data_mut<T: 'static>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.nodes
            .get_mut(id)
            .and_then(|n| n.user_data.as_mut())
            .and_then(|d| d.downcast_mut::<T>())
    }

    pub fn take_user_data(&mut self, id: WidgetId) -> Option<Box<dyn Any>> {
        self.nodes.get_mut(id).and_then(|n| n.user_data.take())
    }

    /// Replace the instance callback. The descriptor default remains the
    /// fallback for events the new callback does not handle itself.
    pub fn set_callback(&mut self, id: WidgetId, callback: WidgetCallback) -> bool {
        match self.nodes.get_mut(id) {
            Some(n) => {
                n.callback = Some(callback);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Invalidation configuration
    // ------------------------------------------------------------------

    /// Enable or disable invalidation for this widget. When enabling with
    /// `invalidate_now`, the widget is marked immediately so a batch of
    /// silent mutations becomes visible.
    pub fn set_ignore_invalidate(
        &mut self,
        id: WidgetId,
        ignore: bool,
        invalidate_now: bool,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.flags.set(WidgetFlags::IGNORE_INVALIDATE, ignore);
        if !ignore && invalidate_now {
            self.invalidate(id);
        }
        true
    }

    pub fn set_invalidate_with_parent(&mut self, id: WidgetId, enable: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(n) => {
                n.flags.set(WidgetFlags::INVALIDATE_WITH_PARENT, enable);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Identity queries
    // ------------------------------------------------------------------

    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.read(id, None, |n| n.parent)
    }

    /// Application-assigned id, 0 for a stale handle.
    pub fn id_of(&self, id: WidgetId) -> u32 {
        self.read(id, 0, |n| n.id)
    }

    pub fn type_of(&self, id: WidgetId) -> Option<&'static WidgetType> {
        self.read(id, None, |n| Some(n.ty))
    }

    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.flag(id, WidgetFlags::FOCUSED)
    }

    pub fn is_active(&self, id: WidgetId) -> bool {
        self.flag(id, WidgetFlags::ACTIVE)
    }

    pub fn allows_children(&self, id: WidgetId) -> bool {
        self.read(id, false, |n| n.ty.allows_children())
    }

    pub fn is_dialog_base(&self, id: WidgetId) -> bool {
        self.read(id, false, |n| n.ty.is_dialog_base())
    }
}
