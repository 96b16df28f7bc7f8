use std::time::Duration;

use gw_platform::{
    Color, CursorIcon, DecorationPlatform, HitTestCode, MessageFilter, PhysicalRect,
    PlatformError, Result, Visibility, WindowId,
};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    CS_DBLCLKS, GCL_STYLE, GWL_EXSTYLE, SWP_NOACTIVATE, WM_NCLBUTTONDBLCLK, WM_NCLBUTTONDOWN,
    WS_EX_TOOLWINDOW,
};

use crate::{cursor, decoration_class, hwnd, timer, win_api, window_id};

fn native(e: windows::core::Error) -> PlatformError {
    PlatformError::Native(e.to_string())
}

/// Cursor position packed for a non-client mouse message.
fn cursor_lparam() -> isize {
    win_api::cursor_pos()
        .map(|(x, y)| win_api::make_point_lparam(x, y))
        .unwrap_or(0)
}

/// [`DecorationPlatform`] on plain Win32 popups.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32DecorationPlatform;

impl Win32DecorationPlatform {
    pub fn new() -> Self {
        Self
    }

    fn live(window: WindowId) -> Result<HWND> {
        let handle = hwnd(window);
        if window.is_valid() && win_api::is_window(handle) {
            Ok(handle)
        } else {
            Err(PlatformError::InvalidHandle(window))
        }
    }
}

impl DecorationPlatform for Win32DecorationPlatform {
    fn create_decoration_window(&self, owner: WindowId, title: &str) -> Result<WindowId> {
        decoration_class::ensure_registered()?;
        let owner = Self::live(owner)?;
        let handle = win_api::create_owned_popup(decoration_class::class_name(), title, owner)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
        Ok(window_id(handle))
    }

    fn apply_decoration_styles(&self, window: WindowId) -> Result<()> {
        let handle = Self::live(window)?;

        let ex_style = win_api::get_window_long(handle, GWL_EXSTYLE);
        win_api::set_window_long(
            handle,
            GWL_EXSTYLE,
            ex_style | WS_EX_TOOLWINDOW.0 as isize,
        );

        // Class-wide, so every decoration window receives double clicks.
        let class_style = win_api::get_class_long(handle, GCL_STYLE);
        win_api::set_class_long(handle, GCL_STYLE, (class_style | CS_DBLCLKS.0 as usize) as isize);
        Ok(())
    }

    fn install_message_filter(&self, window: WindowId, filter: MessageFilter) -> Result<()> {
        let handle = Self::live(window)?;
        decoration_class::set_filter(handle, filter);
        Ok(())
    }

    fn remove_message_filter(&self, window: WindowId) {
        decoration_class::clear_filter(hwnd(window));
    }

    fn position_window(
        &self,
        window: WindowId,
        anchor: WindowId,
        rect: PhysicalRect,
    ) -> Result<()> {
        let handle = Self::live(window)?;
        win_api::set_window_pos(
            handle,
            Some(hwnd(anchor)),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            SWP_NOACTIVATE,
        )
        .map_err(native)
    }

    fn set_visibility(&self, window: WindowId, visibility: Visibility) -> Result<()> {
        let handle = Self::live(window)?;
        match visibility {
            Visibility::Visible => win_api::show_window_no_activate(handle),
            Visibility::Hidden | Visibility::Collapsed => win_api::hide_window(handle),
        }
        .map_err(native)
    }

    fn destroy_window(&self, window: WindowId) -> Result<()> {
        let handle = Self::live(window)?;
        win_api::destroy_window(handle).map_err(native)
    }

    fn post_nc_button_down(&self, owner: WindowId, code: HitTestCode) -> Result<()> {
        let owner = Self::live(owner)?;
        win_api::post_message(
            owner,
            WM_NCLBUTTONDOWN,
            code.raw() as usize,
            cursor_lparam(),
        )
        .map_err(native)
    }

    fn send_nc_double_click(&self, owner: WindowId, code: HitTestCode) -> Result<()> {
        let owner = Self::live(owner)?;
        win_api::send_message(owner, WM_NCLBUTTONDBLCLK, code.raw() as usize, cursor_lparam());
        Ok(())
    }

    fn set_cursor(&self, cursor: CursorIcon) {
        cursor::set_cursor(cursor);
    }

    fn screen_to_client(&self, window: WindowId, x: i32, y: i32) -> Option<(i32, i32)> {
        win_api::screen_to_client(hwnd(window), x, y)
    }

    fn query_dpi(&self, window: WindowId) -> Option<(u32, u32)> {
        match win_api::dpi_for_window(hwnd(window)) {
            0 => None,
            dpi => Some((dpi, dpi)),
        }
    }

    fn minimize_animation_enabled(&self) -> bool {
        win_api::minimize_animation_enabled().unwrap_or_else(|e| {
            log::warn!("SPI_GETANIMATION failed: {e}");
            false
        })
    }

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        timer::schedule_once(delay, callback);
    }

    fn repaint(&self, window: WindowId, color: Color) -> Result<()> {
        let handle = Self::live(window)?;
        decoration_class::set_color(handle, color);
        win_api::request_redraw(handle).map_err(native)
    }
}
