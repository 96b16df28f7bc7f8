use gw_platform::CursorIcon;
use windows::Win32::UI::WindowsAndMessaging::{
    IDC_ARROW, IDC_SIZENESW, IDC_SIZENS, IDC_SIZENWSE, IDC_SIZEWE, SetCursor,
};
use windows::core::PCWSTR;

use crate::win_api;

pub fn cursor_id(cursor: CursorIcon) -> PCWSTR {
    match cursor {
        CursorIcon::Arrow => IDC_ARROW,
        CursorIcon::SizeNWSE => IDC_SIZENWSE,
        CursorIcon::SizeNESW => IDC_SIZENESW,
        CursorIcon::SizeNS => IDC_SIZENS,
        CursorIcon::SizeWE => IDC_SIZEWE,
    }
}

pub fn set_cursor(cursor: CursorIcon) {
    if let Ok(handle) = win_api::load_system_cursor(cursor_id(cursor)) {
        unsafe {
            let _ = SetCursor(Some(handle));
        }
    }
}
