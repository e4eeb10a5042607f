//! # Folio core
//!
//! Immediate-mode GUI toolkit: the whole widget tree is rebuilt every frame
//! inside `frame_begin`/`frame_end` on a single [`Context`], producing a
//! renderer-agnostic draw command list.
//!
//! ```no_run
//! use folio_core::*;
//!
//! let mut ctx = Context::new(Style::dark());
//! ctx.frame_begin();
//! if ctx.window_begin(
//!     "Demo",
//!     Rect::new(50.0, 50.0, 300.0, 400.0),
//!     PanelFlags::BORDER | PanelFlags::TITLE,
//! ) {
//!     ctx.layout_row_dynamic(24.0, 1);
//!     label(&mut ctx, "Hello", TextAlign::Left);
//!     if let CardBegin::Open { pressed } = card_begin(&mut ctx, "intro", 60.0, &CardStyle::default()) {
//!         if pressed {
//!             log::info!("card clicked");
//!         }
//!         ctx.layout_row_dynamic(24.0, 1);
//!         label(&mut ctx, "Nested content", TextAlign::Left);
//!         card_end(&mut ctx);
//!     }
//! }
//! ctx.window_end();
//! let frame = ctx.frame_end();
//! # let _ = frame;
//! ```
//!
//! Windows are retained across frames by title hash; everything else is
//! rebuilt per frame. One context per UI thread; nothing here is `Sync`.

pub mod behavior;
pub mod card;
pub mod color;
pub mod command;
pub mod context;
pub mod geometry;
pub mod input;
pub mod panel;
pub mod style;
pub mod tests;
pub mod widgets;
pub mod window;

pub use behavior::*;
pub use card::*;
pub use color::*;
pub use command::*;
pub use context::Context;
pub use geometry::*;
pub use input::*;
pub use panel::{Panel, PanelFlags, PanelKind};
pub use style::*;
pub use widgets::*;
pub use window::{Window, WindowId};
