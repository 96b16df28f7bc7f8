use std::rc::Rc;
use std::time::Duration;

use crate::{Color, NativeMessage, PhysicalRect, Visibility, WindowId};

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Error returned by decoration-facing platform APIs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("window creation failed: {0}")]
    WindowCreation(String),
    #[error("native call failed: {0}")]
    Native(String),
    #[error("invalid window handle: {0:?}")]
    InvalidHandle(WindowId),
    #[error("unsupported on this platform: {0}")]
    Unsupported(String),
}

/// Cursor icon (system cursor).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorIcon {
    #[default]
    Arrow,
    SizeNWSE,
    SizeNESW,
    SizeNS,
    SizeWE,
}

/// Non-client hit-test code.
///
/// Discriminants match the Win32 `HT*` values so backends can pass them straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum HitTestCode {
    Nowhere = 0,
    Client = 1,
    Caption = 2,
    Left = 10,
    Right = 11,
    Top = 12,
    TopLeft = 13,
    TopRight = 14,
    Bottom = 15,
    BottomLeft = 16,
    BottomRight = 17,
}

impl HitTestCode {
    #[inline]
    pub fn raw(self) -> i32 {
        self as i32
    }
}

/// Mouse-activate answer meaning "don't activate, but deliver the click".
pub const MA_NOACTIVATE: isize = 3;

/// Callback installed on a decoration window's message stream.
///
/// Return `Some(result)` to mark the message as handled, or `None` to fall back to default
/// processing.
pub type MessageFilter = Rc<dyn Fn(NativeMessage) -> Option<isize>>;

/// Native surface consumed by decoration windows.
///
/// Everything here runs on the UI thread. Implementations are expected to be cheap to call
/// repeatedly; the decoration layer does not memoize positioning.
pub trait DecorationPlatform {
    /// Create a hidden, non-activating popup owned by `owner`.
    fn create_decoration_window(&self, owner: WindowId, title: &str) -> Result<WindowId>;

    /// Mark the window as a tool window and enable double-click delivery for its class.
    fn apply_decoration_styles(&self, window: WindowId) -> Result<()>;

    fn install_message_filter(&self, window: WindowId, filter: MessageFilter) -> Result<()>;

    fn remove_message_filter(&self, window: WindowId);

    /// Move and size `window` in one call, placed in z-order relative to `anchor`, without
    /// activating it.
    fn position_window(&self, window: WindowId, anchor: WindowId, rect: PhysicalRect)
    -> Result<()>;

    fn set_visibility(&self, window: WindowId, visibility: Visibility) -> Result<()>;

    fn destroy_window(&self, window: WindowId) -> Result<()>;

    /// Post a non-client primary-button-down to `owner`.
    fn post_nc_button_down(&self, owner: WindowId, code: HitTestCode) -> Result<()>;

    /// Send a non-client primary-button double click to `owner`.
    fn send_nc_double_click(&self, owner: WindowId, code: HitTestCode) -> Result<()>;

    fn set_cursor(&self, cursor: CursorIcon);

    /// Convert a screen point to `window` client coordinates (device pixels).
    fn screen_to_client(&self, window: WindowId, x: i32, y: i32) -> Option<(i32, i32)>;

    /// Horizontal and vertical DPI of `window`, if available.
    fn query_dpi(&self, window: WindowId) -> Option<(u32, u32)>;

    /// Whether the user enabled the minimize/restore animation.
    fn minimize_animation_enabled(&self) -> bool;

    /// Run `callback` once on the UI thread after `delay` without blocking it meanwhile.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>);

    /// Repaint the decoration with a flat color.
    fn repaint(&self, window: WindowId, color: Color) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_codes_match_win32_values() {
        assert_eq!(HitTestCode::Nowhere.raw(), 0);
        assert_eq!(HitTestCode::Left.raw(), 10);
        assert_eq!(HitTestCode::TopRight.raw(), 14);
        assert_eq!(HitTestCode::BottomRight.raw(), 17);
    }
}
