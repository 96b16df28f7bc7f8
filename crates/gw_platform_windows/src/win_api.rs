use std::{ffi::OsStr, ffi::c_void, iter::once, mem::size_of, os::windows::ffi::OsStrExt};

use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::{
    GetDpiForWindow, PROCESS_PER_MONITOR_DPI_AWARE, SetProcessDpiAwareness,
};
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::PCWSTR;

/// Signature shared by every window procedure in this crate.
pub type WindowProc = unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> LRESULT;

#[inline]
pub fn set_process_per_monitor_dpi_aware() -> windows::core::Result<()> {
    unsafe { SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE) }
}

#[inline]
pub fn def_window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

#[inline]
pub fn get_module_handle() -> windows::core::Result<HMODULE> {
    unsafe { GetModuleHandleW(None) }
}

#[inline]
pub fn load_system_cursor(id: PCWSTR) -> windows::core::Result<HCURSOR> {
    unsafe { LoadCursorW(None, id) }
}

#[inline]
pub fn register_class(window_class: &WNDCLASSW) -> u16 {
    unsafe { RegisterClassW(window_class) }
}

/// Create a hidden popup owned by `owner`.
///
/// Owned popups stay above their owner in z-order and are destroyed with it.
pub fn create_owned_popup(
    class_name: PCWSTR,
    title: &str,
    owner: HWND,
) -> windows::core::Result<HWND> {
    let instance = get_module_handle()?;
    let title = to_wide_chars(title);
    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class_name,
            PCWSTR(title.as_ptr()),
            WS_POPUP,
            0,
            0,
            0,
            0,
            Some(owner),
            None,
            Some(instance.into()),
            None,
        )
    }
}

#[inline]
pub fn get_window_long(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX) -> isize {
    unsafe { GetWindowLongPtrW(hwnd, index) }
}

#[inline]
pub fn set_window_long(hwnd: HWND, index: WINDOW_LONG_PTR_INDEX, value: isize) -> isize {
    unsafe { SetWindowLongPtrW(hwnd, index, value) }
}

#[inline]
pub fn get_class_long(hwnd: HWND, index: GET_CLASS_LONG_INDEX) -> usize {
    unsafe { GetClassLongPtrW(hwnd, index) }
}

#[inline]
pub fn set_class_long(hwnd: HWND, index: GET_CLASS_LONG_INDEX, value: isize) -> usize {
    unsafe { SetClassLongPtrW(hwnd, index, value) }
}

/// Replace a window's procedure, returning the previous one (0 on failure).
#[inline]
pub fn subclass_window(hwnd: HWND, proc: WindowProc) -> isize {
    set_window_long(hwnd, GWLP_WNDPROC, proc as usize as isize)
}

/// Forward a message to a procedure previously returned by [`subclass_window`].
///
/// # Safety
/// `prev` must be a non-zero value obtained from `GWLP_WNDPROC` for `hwnd`.
#[inline]
pub unsafe fn call_previous_proc(
    prev: isize,
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let prev: WindowProc = unsafe { std::mem::transmute::<isize, WindowProc>(prev) };
    unsafe { CallWindowProcW(Some(prev), hwnd, msg, wparam, lparam) }
}

#[inline]
pub fn show_window_no_activate(hwnd: HWND) -> windows::core::Result<()> {
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
    }
    Ok(())
}

#[inline]
pub fn show_window(hwnd: HWND) -> windows::core::Result<()> {
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = SetForegroundWindow(hwnd);
    }
    Ok(())
}

#[inline]
pub fn hide_window(hwnd: HWND) -> windows::core::Result<()> {
    unsafe {
        let _ = ShowWindow(hwnd, SW_HIDE);
    }
    Ok(())
}

#[inline]
pub fn request_redraw(hwnd: HWND) -> windows::core::Result<()> {
    unsafe { InvalidateRect(Some(hwnd), None, FALSE.into()).ok() }
}

/// Begin a WM_PAINT cycle and return the PAINTSTRUCT.
///
/// The returned PAINTSTRUCT must be passed to [`end_paint`].
#[inline]
pub fn begin_paint(hwnd: HWND) -> PAINTSTRUCT {
    let mut ps = PAINTSTRUCT::default();
    unsafe {
        BeginPaint(hwnd, &mut ps);
    }
    ps
}

#[inline]
pub fn end_paint(hwnd: HWND, ps: &PAINTSTRUCT) {
    unsafe {
        let _ = EndPaint(hwnd, ps);
    }
}

/// Fill `rect` on `hdc` with a solid `0x00BBGGRR` color.
pub fn fill_rect(hdc: HDC, rect: &RECT, colorref: u32) {
    unsafe {
        let brush = CreateSolidBrush(COLORREF(colorref));
        if brush.is_invalid() {
            return;
        }
        FillRect(hdc, rect, brush);
        let _ = DeleteObject(brush.into());
    }
}

#[inline]
pub fn destroy_window(hwnd: HWND) -> windows::core::Result<()> {
    unsafe {
        DestroyWindow(hwnd)?;
    }
    Ok(())
}

#[inline]
pub fn is_window(hwnd: HWND) -> bool {
    unsafe { IsWindow(Some(hwnd)).as_bool() }
}

#[inline]
pub fn is_window_visible(hwnd: HWND) -> bool {
    unsafe { IsWindowVisible(hwnd).as_bool() }
}

#[inline]
pub fn is_minimized(hwnd: HWND) -> bool {
    unsafe { IsIconic(hwnd).as_bool() }
}

#[inline]
pub fn is_maximized(hwnd: HWND) -> bool {
    unsafe { IsZoomed(hwnd).as_bool() }
}

#[inline]
pub fn is_foreground(hwnd: HWND) -> bool {
    unsafe { GetForegroundWindow() == hwnd }
}

#[inline]
pub fn set_foreground_window(hwnd: HWND) -> bool {
    unsafe { SetForegroundWindow(hwnd).as_bool() }
}

#[inline]
pub fn set_window_pos(
    hwnd: HWND,
    hwnd_insert_after: Option<HWND>,
    x: i32,
    y: i32,
    cx: i32,
    cy: i32,
    flags: SET_WINDOW_POS_FLAGS,
) -> windows::core::Result<()> {
    unsafe {
        SetWindowPos(hwnd, hwnd_insert_after, x, y, cx, cy, flags)?;
    }
    Ok(())
}

#[inline]
pub fn get_window_rect(hwnd: HWND) -> windows::core::Result<RECT> {
    let mut rect = RECT::default();
    unsafe {
        GetWindowRect(hwnd, &mut rect)?;
    }
    Ok(rect)
}

#[inline]
pub fn get_client_rect(hwnd: HWND) -> windows::core::Result<RECT> {
    let mut rect = RECT::default();
    unsafe {
        GetClientRect(hwnd, &mut rect)?;
    }
    Ok(rect)
}

pub fn screen_to_client(hwnd: HWND, x: i32, y: i32) -> Option<(i32, i32)> {
    let mut point = POINT { x, y };
    unsafe { ScreenToClient(hwnd, &mut point).as_bool() }.then_some((point.x, point.y))
}

pub fn cursor_pos() -> Option<(i32, i32)> {
    let mut point = POINT::default();
    unsafe { GetCursorPos(&mut point) }
        .ok()
        .map(|_| (point.x, point.y))
}

/// Per-window DPI; 0 when the handle is invalid.
#[inline]
pub fn dpi_for_window(hwnd: HWND) -> u32 {
    unsafe { GetDpiForWindow(hwnd) }
}

/// Whether the "animate windows when minimizing and maximizing" setting is on.
pub fn minimize_animation_enabled() -> windows::core::Result<bool> {
    let mut info = ANIMATIONINFO {
        cbSize: size_of::<ANIMATIONINFO>() as u32,
        iMinAnimate: 0,
    };
    unsafe {
        SystemParametersInfoW(
            SPI_GETANIMATION,
            info.cbSize,
            Some((&mut info as *mut ANIMATIONINFO).cast::<c_void>()),
            SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
        )?;
    }
    Ok(info.iMinAnimate != 0)
}

/// System-wide unique message id for `name`, or 0 on failure.
#[inline]
pub fn register_window_message(name: PCWSTR) -> u32 {
    unsafe { RegisterWindowMessageW(name) }
}

#[inline]
pub fn post_message(
    hwnd: HWND,
    msg: u32,
    wparam: usize,
    lparam: isize,
) -> windows::core::Result<()> {
    unsafe {
        PostMessageW(Some(hwnd), msg, WPARAM(wparam), LPARAM(lparam))?;
    }
    Ok(())
}

#[inline]
pub fn send_message(hwnd: HWND, msg: u32, wparam: usize, lparam: isize) -> LRESULT {
    unsafe { SendMessageW(hwnd, msg, Some(WPARAM(wparam)), Some(LPARAM(lparam))) }
}

/// Pack a point into an `LPARAM` the way `MAKELPARAM(x, y)` does.
#[inline]
pub fn make_point_lparam(x: i32, y: i32) -> isize {
    let lo = (x as i16 as u16) as u32;
    let hi = (y as i16 as u16) as u32;
    ((hi << 16) | lo) as i32 as isize
}

#[inline]
pub fn quit_message_loop(exit_code: i32) {
    unsafe {
        PostQuitMessage(exit_code);
    }
}

#[inline]
pub fn run_message_loop() {
    unsafe {
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Convert a Rust string to a NUL-terminated UTF-16 buffer for Win32 APIs.
#[inline]
pub fn to_wide_chars(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_lparam_packs_signed_words() {
        assert_eq!(make_point_lparam(1, 2), 0x0002_0001);
        let packed = make_point_lparam(-5, 10);
        assert_eq!((packed as i16) as i32, -5);
        assert_eq!(((packed >> 16) as i16) as i32, 10);
    }

    #[test]
    fn wide_strings_are_nul_terminated() {
        assert_eq!(to_wide_chars("ab"), vec![b'a' as u16, b'b' as u16, 0]);
    }
}
