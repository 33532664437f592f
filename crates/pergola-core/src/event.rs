use std::rc::Rc;

use crate::geometry::{Dim, Point, Rect};
use crate::tree::Ui;
use crate::widget::WidgetId;

/// One raw sample from a touch controller, as captured by the host's
/// interrupt handler. Producers only ever enqueue these; interpretation
/// (capture, move synthesis, click detection) happens inside the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchSample {
    pub x: Dim,
    pub y: Dim,
    pub state: TouchState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchState {
    Pressed,
    Released,
}

impl TouchSample {
    pub const fn pressed(x: Dim, y: Dim) -> Self {
        TouchSample {
            x,
            y,
            state: TouchState::Pressed,
        }
    }

    pub const fn released(x: Dim, y: Dim) -> Self {
        TouchSample {
            x,
            y,
            state: TouchState::Released,
        }
    }

    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One decoded key. The incremental codepoint decoder lives with the host;
/// by the time a key reaches the queue it is a complete `char`. Control keys
/// use their ASCII control codes, mirroring what serial input produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub ch: char,
}

impl KeyInput {
    pub const BACKSPACE: KeyInput = KeyInput { ch: '\u{8}' };
    pub const TAB: KeyInput = KeyInput { ch: '\t' };
    pub const ENTER: KeyInput = KeyInput { ch: '\r' };
    pub const ESCAPE: KeyInput = KeyInput { ch: '\u{1b}' };

    pub const fn new(ch: char) -> Self {
        KeyInput { ch }
    }
}

/// The command contract between the tree and widget-class code.
///
/// Every event a widget can observe flows through its callback as one of
/// these. Widget classes handle what they care about and report the rest as
/// [`EventOutcome::Ignored`]; an ignored event is a no-op, never an error.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetEvent {
    /// Delivered once, right after the widget is linked into the tree.
    Init,
    /// Redraw request for one visible fragment of the widget. `clip` is in
    /// absolute display coordinates and already excludes occluded parts.
    Draw { clip: Rect },
    /// The widget is about to be freed. Children observe this before their
    /// parent.
    Remove,
    FocusIn,
    FocusOut,
    /// The widget captured the touch stream.
    ActiveIn,
    /// Capture released.
    ActiveOut,
    TouchStart { at: Point },
    /// Pressed sample while captured; `at` may be outside the widget.
    TouchMove { at: Point },
    TouchEnd { at: Point },
    /// Release landed inside the widget's resolved box.
    Click { at: Point },
    /// Delivered only to the focused widget.
    KeyPress { key: KeyInput },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    Ignored,
}

/// Type-descriptor default callback. Descriptors are `&'static` tables, so
/// their callbacks are plain function pointers.
pub type DefaultCallback = fn(&mut Ui, WidgetId, &WidgetEvent) -> EventOutcome;

/// Per-instance callback override. Applications usually want to capture
/// state here, so instance callbacks are counted closures. A specialization
/// shim handles its own events and forwards the rest to the descriptor
/// default it wraps.
pub type WidgetCallback = Rc<dyn Fn(&mut Ui, WidgetId, &WidgetEvent) -> EventOutcome>;

/// Default callback that handles nothing. Suitable for purely structural
/// descriptors (containers, the root).
pub fn unhandled(_ui: &mut Ui, _id: WidgetId, _event: &WidgetEvent) -> EventOutcome {
    EventOutcome::Ignored
}
