//! Window class and message procedure shared by every decoration window.
//!
//! Per-window state (installed filter, fill color) lives in a thread-local registry keyed by
//! handle, so the procedure never needs `GWLP_USERDATA`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::OnceLock;

use gw_platform::{Color, MessageFilter, NativeMessage, PlatformError};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::HBRUSH;
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, HCURSOR, WM_ERASEBKGND, WM_NCDESTROY, WM_PAINT, WNDCLASSW,
};
use windows::core::{PCWSTR, w};

use crate::message_converter::MessageConverter;
use crate::win_api;

static CLASS_ATOM: OnceLock<u16> = OnceLock::new();

pub fn class_name() -> PCWSTR {
    w!("GlowChromeDecoration")
}

/// Register the decoration class on first use.
pub fn ensure_registered() -> gw_platform::Result<()> {
    let atom = *CLASS_ATOM.get_or_init(|| {
        let instance = match win_api::get_module_handle() {
            Ok(instance) => instance,
            Err(e) => {
                log::error!("GetModuleHandleW failed: {e}");
                return 0;
            }
        };
        let class = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(decoration_proc),
            hInstance: instance.into(),
            // No class cursor; WM_SETCURSOR picks one per hit-test.
            hCursor: HCURSOR::default(),
            hbrBackground: HBRUSH::default(),
            lpszClassName: class_name(),
            ..Default::default()
        };
        win_api::register_class(&class)
    });

    if atom == 0 {
        return Err(PlatformError::WindowCreation(
            "decoration window class is not registered".to_string(),
        ));
    }
    Ok(())
}

#[derive(Default)]
struct Slot {
    filter: Option<MessageFilter>,
    color: Color,
}

thread_local! {
    static SLOTS: RefCell<HashMap<isize, Slot>> = RefCell::new(HashMap::new());
}

fn key(hwnd: HWND) -> isize {
    hwnd.0 as isize
}

pub fn set_filter(hwnd: HWND, filter: MessageFilter) {
    SLOTS.with_borrow_mut(|slots| slots.entry(key(hwnd)).or_default().filter = Some(filter));
}

pub fn clear_filter(hwnd: HWND) {
    SLOTS.with_borrow_mut(|slots| {
        if let Some(slot) = slots.get_mut(&key(hwnd)) {
            slot.filter = None;
        }
    });
}

pub fn set_color(hwnd: HWND, color: Color) {
    SLOTS.with_borrow_mut(|slots| slots.entry(key(hwnd)).or_default().color = color);
}

fn color(hwnd: HWND) -> Color {
    SLOTS.with_borrow(|slots| slots.get(&key(hwnd)).map(|s| s.color).unwrap_or_default())
}

// Cloned out so the filter can re-enter the registry.
fn filter(hwnd: HWND) -> Option<MessageFilter> {
    SLOTS.with_borrow(|slots| slots.get(&key(hwnd)).and_then(|s| s.filter.clone()))
}

fn forget(hwnd: HWND) {
    SLOTS.with_borrow_mut(|slots| {
        slots.remove(&key(hwnd));
    });
}

fn paint(hwnd: HWND) {
    let ps = win_api::begin_paint(hwnd);
    win_api::fill_rect(ps.hdc, &ps.rcPaint, color(hwnd).to_colorref());
    win_api::end_paint(hwnd, &ps);
}

unsafe extern "system" fn decoration_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_ERASEBKGND => return LRESULT(1),
        WM_PAINT => {
            paint(hwnd);
            return LRESULT(0);
        }
        _ => {}
    }

    let message = MessageConverter::convert(msg, wparam, lparam);
    let handled = match message {
        NativeMessage::Other(_) => None,
        message => filter(hwnd).and_then(|filter| filter(message)),
    };

    if msg == WM_NCDESTROY {
        forget(hwnd);
    }

    match handled {
        Some(result) => LRESULT(result),
        None => win_api::def_window_proc(hwnd, msg, wparam, lparam),
    }
}
