//! Glow chrome core.
//!
//! Up to four decoration windows, one per edge, follow an owner window around and turn clicks
//! on the glow into native non-client actions on the owner (resize, maximize, activate).
//! Nothing here talks to a window system directly: the owner comes in through [`OwnerWindow`]
//! and native side effects go out through [`gw_platform::DecorationPlatform`].

pub mod appearance;
pub mod decoration;
pub mod dpi;
pub mod edge;
pub mod owner;
pub mod set;

pub use appearance::{AppearanceSource, ChromeAppearance};
pub use decoration::{DecorationWindow, RESTORE_DELAY};
pub use dpi::{DpiContext, DpiScale};
pub use edge::{
    Edge, EdgeGeometryProcessor, HorizontalAlignment, LogicalPoint, LogicalRect, Orientation,
    VerticalAlignment,
};
pub use owner::{OwnerEvent, OwnerSnapshot, OwnerWindow};
pub use set::DecorationSet;
