#![cfg(target_os = "windows")]
//! Win32 backend for `gw_chrome`: decoration popups, thread timers and an owner adapter that
//! subclasses an existing top-level window.

mod cursor;
mod decoration_class;
mod message_converter;
mod owner;
mod platform;
mod timer;
pub mod win_api;

pub use owner::Win32OwnerWindow;
pub use platform::Win32DecorationPlatform;

use std::ffi::c_void;

use gw_platform::WindowId;
use windows::Win32::Foundation::HWND;

#[inline]
pub fn window_id(hwnd: HWND) -> WindowId {
    WindowId::from_raw(hwnd.0 as usize)
}

#[inline]
pub fn hwnd(window: WindowId) -> HWND {
    HWND(window.raw() as *mut c_void)
}
