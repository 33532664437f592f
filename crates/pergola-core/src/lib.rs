//! # Widget Tree, Invalidation, and Input Routing
//!
//! Pergola's core is a retained-mode widget engine for small display
//! devices: a tree of widget instances owned by an arena, geometry resolved
//! on demand, damage tracked per node, and touch/keyboard input routed with
//! capture and single-focus semantics.
//!
//! There are four main pieces:
//!
//! - [`Ui`] — the engine context: arena, root, focus/capture, input queues.
//! - [`WidgetType`] — a per-class `&'static` behavior table; the only class
//!   mechanism.
//! - [`WidgetEvent`] / callbacks — the dispatch contract every widget speaks.
//! - [`Ui::process`] — the per-tick entry point the host loop drives.
//!
//! ## Building a screen
//!
//! ```rust
//! use pergola_core::*;
//!
//! static PANEL: WidgetType = WidgetType {
//!     name: "panel",
//!     flags: TypeFlags::ALLOW_CHILDREN,
//!     callback: unhandled,
//!     colors: &[Color::WHITE, Color::BLACK],
//! };
//!
//! let mut ui = Ui::new(Size::new(480, 272));
//! let panel = ui
//!     .create(&PANEL, 1, 10.0, 10.0, 200.0, 120.0, None, None, WidgetFlags::empty())
//!     .unwrap();
//! ui.set_padding(panel, 4);
//! ```
//!
//! Geometry may be absolute pixels or percentages of the parent's inner box,
//! per axis. Percentages are resolved on every read, so resizing an ancestor
//! reflows the subtree with no propagation step:
//!
//! ```rust
//! # use pergola_core::*;
//! # static PANEL: WidgetType = WidgetType {
//! #     name: "panel",
//! #     flags: TypeFlags::ALLOW_CHILDREN,
//! #     callback: unhandled,
//! #     colors: &[],
//! # };
//! # let mut ui = Ui::new(Size::new(480, 272));
//! # let panel = ui
//! #     .create(&PANEL, 1, 0.0, 0.0, 100.0, 100.0, None, None, WidgetFlags::empty())
//! #     .unwrap();
//! let half = ui
//!     .create(&PANEL, 2, 0.0, 0.0, 50.0, 50.0, Some(panel), None, WidgetFlags::empty())
//!     .unwrap();
//! ui.set_size_percent(half, 50.0, 50.0);
//! assert_eq!(ui.resolved_width(half), 50);
//! ui.set_size(panel, 200.0, 200.0);
//! assert_eq!(ui.resolved_width(half), 100);
//! ```
//!
//! ## Widget classes
//!
//! A widget class is a descriptor plus a callback; there is no structural
//! subclassing. The instance callback, when set, replaces the descriptor
//! default; a class that only wants to intercept a few events forwards the
//! rest to the default it wraps:
//!
//! ```rust
//! # use pergola_core::*;
//! # use std::rc::Rc;
//! fn button_callback(ui: &mut Ui, id: WidgetId, event: &WidgetEvent) -> EventOutcome {
//!     match event {
//!         WidgetEvent::Click { .. } => {
//!             ui.invalidate(id);
//!             EventOutcome::Handled
//!         }
//!         _ => unhandled(ui, id, event),
//!     }
//! }
//! ```
//!
//! ## Ticking
//!
//! Producers (a touch ISR, a serial handler) call [`Ui::inject_touch`] and
//! [`Ui::inject_key`]; those only enqueue into bounded ring buffers. The
//! host loop calls [`Ui::process`] once per tick, which drains the queues,
//! dispatches, executes deferred removals at the safe point, and runs the
//! redraw pass. Mutating accessors mark widgets dirty but never draw;
//! drawing happens only inside the tick.
//!
//! Removal is two-phase: [`Ui::remove`] from inside a callback is always
//! deferred until the stack is clear, so a button may remove its own dialog
//! without pulling the tree out from under the dispatcher.

pub mod accessors;
pub mod color;
pub mod error;
pub mod event;
pub mod font;
pub mod geometry;
pub mod input;
pub mod paint;
pub mod prelude;
pub mod resolve;
pub mod tests;
pub mod tree;
pub mod widget;

pub use color::*;
pub use error::*;
pub use event::*;
pub use font::*;
pub use geometry::*;
pub use input::{KEY_QUEUE_LEN, TOUCH_QUEUE_LEN};
pub use prelude::*;
pub use tree::*;
pub use widget::*;
