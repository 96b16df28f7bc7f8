use gw_platform::NativeMessage;
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    WM_LBUTTONDBLCLK, WM_LBUTTONDOWN, WM_MOUSEACTIVATE, WM_NCDESTROY, WM_NCHITTEST, WM_SETCURSOR,
};

/// Extract a signed point from Win32 `LPARAM`.
#[inline]
fn extract_point(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 as i16) as i32;
    let y = ((lparam.0 >> 16) as i16) as i32;
    (x, y)
}

/// Convert decoration window messages to [`NativeMessage`].
pub struct MessageConverter;

impl MessageConverter {
    pub fn convert(msg: u32, _wparam: WPARAM, lparam: LPARAM) -> NativeMessage {
        match msg {
            WM_MOUSEACTIVATE => NativeMessage::MouseActivate,

            WM_LBUTTONDOWN => {
                let (x, y) = extract_point(lparam);
                NativeMessage::LeftButtonDown { x, y }
            }

            WM_LBUTTONDBLCLK => {
                let (x, y) = extract_point(lparam);
                NativeMessage::LeftButtonDoubleClick { x, y }
            }

            // Screen coordinates.
            WM_NCHITTEST => {
                let (x, y) = extract_point(lparam);
                NativeMessage::HitTest { x, y }
            }

            WM_SETCURSOR => NativeMessage::SetCursor,
            WM_NCDESTROY => NativeMessage::Destroyed,
            other => NativeMessage::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::win_api::make_point_lparam;

    #[test]
    fn hit_test_keeps_negative_screen_coordinates() {
        let lparam = LPARAM(make_point_lparam(-1200, 40));
        assert_eq!(
            MessageConverter::convert(WM_NCHITTEST, WPARAM(0), lparam),
            NativeMessage::HitTest { x: -1200, y: 40 }
        );
    }

    #[test]
    fn unrelated_messages_pass_through() {
        assert_eq!(
            MessageConverter::convert(0x0200, WPARAM(0), LPARAM(0)),
            NativeMessage::Other(0x0200)
        );
    }
}
