use std::any::Any;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::color::Color;
use crate::event::{DefaultCallback, WidgetCallback};
use crate::font::Font;
use crate::geometry::{Dim, Padding};

slotmap::new_key_type! {
    /// Handle to a widget in the tree arena.
    ///
    /// Generational: once the widget is freed the key stops resolving, so a
    /// stale handle can never alias a recycled slot. Accessors that fail to
    /// resolve a handle return their neutral default instead of touching
    /// freed state.
    pub struct WidgetId;
}

/// Z-index bounds. Values outside are clamped on set.
pub const Z_INDEX_MAX: i32 = i32::MAX;
pub const Z_INDEX_MIN: i32 = i32::MIN;

bitflags! {
    /// Per-instance state and configuration bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct WidgetFlags: u32 {
        const HIDDEN                 = 1 << 0;
        const FOCUSED                = 1 << 1;
        const ACTIVE                 = 1 << 2;
        const STYLE_3D               = 1 << 3;
        /// Ignore stored geometry; fill the parent's inner box.
        const EXPANDED               = 1 << 4;
        /// Stored x is a percentage of the parent's inner width.
        const PERCENT_X              = 1 << 5;
        /// Stored y is a percentage of the parent's inner height.
        const PERCENT_Y              = 1 << 6;
        const PERCENT_W              = 1 << 7;
        const PERCENT_H              = 1 << 8;
        /// Invalidate requests on this widget are dropped.
        const IGNORE_INVALIDATE      = 1 << 9;
        /// Invalidating this widget also marks its immediate parent.
        const INVALIDATE_WITH_PARENT = 1 << 10;
        /// Needs redraw. Internal; set via invalidate, cleared by the pass.
        const DIRTY                  = 1 << 11;
        /// Queued for the removal pass. Internal.
        const REMOVE_PENDING         = 1 << 12;
    }
}

bitflags! {
    /// Capability flags carried by a type descriptor.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TypeFlags: u8 {
        const ALLOW_CHILDREN = 1 << 0;
        const DIALOG_BASE    = 1 << 1;
    }
}

/// Immutable per-class behavior table.
///
/// One static per widget class; every instance of the class points at the
/// same descriptor. The descriptor supplies behavior (the default callback),
/// appearance defaults (the palette) and structural capabilities. There is
/// no subclassing: a class *is* its descriptor plus whatever its callback
/// does.
#[derive(Debug)]
pub struct WidgetType {
    pub name: &'static str,
    pub flags: TypeFlags,
    pub callback: DefaultCallback,
    /// Default palette, indexed by the class's own color constants.
    pub colors: &'static [Color],
}

impl WidgetType {
    pub const fn allows_children(&self) -> bool {
        self.flags.contains(TypeFlags::ALLOW_CHILDREN)
    }

    pub const fn is_dialog_base(&self) -> bool {
        self.flags.contains(TypeFlags::DIALOG_BASE)
    }
}

/// One node of the widget tree. Crate-private: widget-class code goes
/// through the `Ui` accessors, never through fields.
pub(crate) struct Widget {
    /// Application-assigned id for lookups; not required to be unique.
    pub id: u32,
    pub ty: &'static WidgetType,
    pub parent: Option<WidgetId>,
    /// Sorted by (z_index, seq): back-to-front paint order.
    pub children: SmallVec<[WidgetId; 4]>,
    /// Stored geometry. Units are pixels or percent per the PERCENT_* flags;
    /// resolution happens on read, never here.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub padding: Padding,
    pub z_index: i32,
    pub alpha: u8,
    pub flags: WidgetFlags,
    pub scroll_x: Dim,
    pub scroll_y: Dim,
    pub text: Option<String>,
    pub font: Option<&'static Font>,
    /// Per-instance palette override; falls back to the descriptor palette.
    pub colors: Option<SmallVec<[Color; 4]>>,
    pub user_data: Option<Box<dyn Any>>,
    pub callback: Option<WidgetCallback>,
    /// Creation order, the stable tie-break between siblings of equal
    /// z-index. Bumped by put-on-front.
    pub seq: u64,
}

impl Widget {
    pub(crate) fn new(
        ty: &'static WidgetType,
        id: u32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        parent: Option<WidgetId>,
        callback: Option<WidgetCallback>,
        flags: WidgetFlags,
        seq: u64,
    ) -> Self {
        Widget {
            id,
            ty,
            parent,
            children: SmallVec::new(),
            x,
            y,
            width,
            height,
            padding: Padding::default(),
            z_index: 0,
            alpha: 0xFF,
            flags,
            scroll_x: 0,
            scroll_y: 0,
            text: None,
            font: None,
            colors: None,
            user_data: None,
            callback,
            seq,
        }
    }

    /// Not hidden and not fully transparent. Visibility of ancestors is the
    /// caller's concern.
    pub(crate) fn is_visible(&self) -> bool {
        !self.flags.contains(WidgetFlags::HIDDEN) && self.alpha > 0
    }

    /// Visible and fully opaque: the only widgets that occlude siblings.
    pub(crate) fn is_opaque(&self) -> bool {
        self.is_visible() && self.alpha == 0xFF
    }
}
