pub use crate::color::Color;
pub use crate::error::InputError;
pub use crate::event::{
    DefaultCallback, EventOutcome, KeyInput, TouchSample, TouchState, WidgetCallback, WidgetEvent,
    unhandled,
};
pub use crate::font::Font;
pub use crate::geometry::{Dim, Padding, Point, Rect, Region, Size};
pub use crate::tree::Ui;
pub use crate::widget::{
    TypeFlags, WidgetFlags, WidgetId, WidgetType, Z_INDEX_MAX, Z_INDEX_MIN,
};
