//! [`OwnerWindow`] for an existing top-level HWND.
//!
//! The owner's window procedure is subclassed (`GWLP_WNDPROC`); every message is forwarded to
//! the previous procedure first, then translated into [`OwnerEvent`]s.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::OnceLock;

use gw_chrome::{OwnerEvent, OwnerSnapshot, OwnerWindow};
use gw_platform::{
    EventHub, PlatformError, Result, SubscriptionId, Visibility, WindowId, WindowState,
};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    GWLP_WNDPROC, SIZE_MAXIMIZED, SIZE_MINIMIZED, SIZE_RESTORED, WA_INACTIVE, WM_ACTIVATE, WM_APP,
    WM_DESTROY, WM_MOVE, WM_PAINT, WM_SHOWWINDOW, WM_SIZE,
};
use windows::core::w;

use crate::{hwnd, win_api, window_id};

static CONTENT_RENDERED: OnceLock<u32> = OnceLock::new();

/// Posted to the owner after its first paint. Registered so it can't collide with the host's
/// own `WM_APP` messages.
fn content_rendered_message() -> u32 {
    *CONTENT_RENDERED.get_or_init(|| {
        match win_api::register_window_message(w!("GlowChrome.ContentRendered")) {
            0 => {
                log::warn!("RegisterWindowMessageW failed, falling back to a WM_APP message");
                WM_APP + 71
            }
            msg => msg,
        }
    })
}

struct Entry {
    prev_proc: isize,
    owner: Weak<Win32OwnerWindow>,
}

thread_local! {
    static OWNERS: RefCell<HashMap<isize, Entry>> = RefCell::new(HashMap::new());
}

fn key(hwnd: HWND) -> isize {
    hwnd.0 as isize
}

pub struct Win32OwnerWindow {
    hwnd: HWND,
    events: EventHub<OwnerEvent>,
    resizable: Cell<bool>,
    active: Cell<bool>,
    shown: Cell<bool>,
    state: Cell<WindowState>,
    render_posted: Cell<bool>,
    attached: Cell<bool>,
}

fn current_state(hwnd: HWND) -> WindowState {
    if win_api::is_minimized(hwnd) {
        WindowState::Minimized
    } else if win_api::is_maximized(hwnd) {
        WindowState::Maximized
    } else {
        WindowState::Normal
    }
}

impl Win32OwnerWindow {
    /// Subclass `window` and start reporting its events.
    pub fn attach(window: WindowId) -> Result<Rc<Self>> {
        let handle = hwnd(window);
        if !window.is_valid() || !win_api::is_window(handle) {
            return Err(PlatformError::InvalidHandle(window));
        }
        if OWNERS.with_borrow(|owners| owners.contains_key(&key(handle))) {
            return Err(PlatformError::Native(format!(
                "{window:?} already has an owner adapter"
            )));
        }

        let owner = Rc::new(Self {
            hwnd: handle,
            events: EventHub::new(),
            resizable: Cell::new(true),
            active: Cell::new(win_api::is_foreground(handle)),
            shown: Cell::new(win_api::is_window_visible(handle)),
            state: Cell::new(current_state(handle)),
            render_posted: Cell::new(false),
            attached: Cell::new(false),
        });

        let prev_proc = win_api::subclass_window(handle, owner_proc);
        if prev_proc == 0 {
            return Err(PlatformError::Native(
                "SetWindowLongPtrW(GWLP_WNDPROC) failed".to_string(),
            ));
        }
        OWNERS.with_borrow_mut(|owners| {
            owners.insert(
                key(handle),
                Entry {
                    prev_proc,
                    owner: Rc::downgrade(&owner),
                },
            );
        });
        owner.attached.set(true);

        // Already painted: nothing would trigger the first WM_PAINT again.
        if owner.shown.get()
            && let Err(e) = win_api::request_redraw(handle)
        {
            log::warn!("failed to repaint {window:?} after attaching: {e}");
        }

        log::debug!("owner adapter attached to {window:?}");
        Ok(owner)
    }

    pub fn window_id(&self) -> WindowId {
        window_id(self.hwnd)
    }

    /// Whether decorations should offer resize hit-testing.
    pub fn set_resizable(&self, resizable: bool) {
        self.resizable.set(resizable);
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable.get()
    }

    /// Restore the previous window procedure. Idempotent.
    pub fn detach(&self) {
        if !self.attached.replace(false) {
            return;
        }
        let entry = OWNERS.with_borrow_mut(|owners| owners.remove(&key(self.hwnd)));
        if let Some(entry) = entry
            && win_api::is_window(self.hwnd)
        {
            win_api::set_window_long(self.hwnd, GWLP_WNDPROC, entry.prev_proc);
        }
        log::debug!("owner adapter detached from {:?}", self.window_id());
    }

    fn emit(&self, event: OwnerEvent) {
        log::trace!("owner {:?}: {event:?}", self.window_id());
        self.events.emit(&event);
    }

    fn after_message(&self, msg: u32, wparam: WPARAM) {
        match msg {
            WM_PAINT => {
                if !self.render_posted.replace(true)
                    && let Err(e) = win_api::post_message(self.hwnd, content_rendered_message(), 0, 0)
                {
                    log::warn!("failed to post content-rendered notification: {e}");
                }
            }
            WM_MOVE => self.emit(OwnerEvent::LocationChanged),
            WM_SIZE => {
                let state = match wparam.0 as u32 {
                    SIZE_RESTORED => Some(WindowState::Normal),
                    SIZE_MINIMIZED => Some(WindowState::Minimized),
                    SIZE_MAXIMIZED => Some(WindowState::Maximized),
                    _ => None,
                };
                if let Some(state) = state
                    && self.state.replace(state) != state
                {
                    self.emit(OwnerEvent::StateChanged);
                }
                self.emit(OwnerEvent::SizeChanged);
            }
            WM_ACTIVATE => {
                let active = (wparam.0 & 0xFFFF) as u32 != WA_INACTIVE;
                self.active.set(active);
                self.emit(if active {
                    OwnerEvent::Activated
                } else {
                    OwnerEvent::Deactivated
                });
            }
            WM_SHOWWINDOW => {
                self.shown.set(wparam.0 != 0);
                self.emit(OwnerEvent::VisibilityChanged);
            }
            WM_DESTROY => {
                self.emit(OwnerEvent::Closed);
                self.detach();
            }
            _ => {}
        }
    }
}

impl OwnerWindow for Win32OwnerWindow {
    fn handle(&self) -> WindowId {
        self.window_id()
    }

    fn snapshot(&self) -> OwnerSnapshot {
        let scale = match win_api::dpi_for_window(self.hwnd) {
            0 => 1.0,
            dpi => dpi as f64 / 96.0,
        };
        let rect = win_api::get_window_rect(self.hwnd).unwrap_or_default();

        OwnerSnapshot {
            handle: self.window_id(),
            left: rect.left as f64 / scale,
            top: rect.top as f64 / scale,
            width: (rect.right - rect.left) as f64 / scale,
            height: (rect.bottom - rect.top) as f64 / scale,
            is_active: self.active.get(),
            window_state: self.state.get(),
            visibility: if self.shown.get() {
                Visibility::Visible
            } else {
                Visibility::Hidden
            },
            resizable: self.resizable.get(),
        }
    }

    fn activate(&self) {
        if !win_api::set_foreground_window(self.hwnd) {
            log::debug!("SetForegroundWindow refused for {:?}", self.window_id());
        }
    }

    fn subscribe(&self, handler: Rc<dyn Fn(&OwnerEvent)>) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.events.unsubscribe(id);
    }
}

impl Drop for Win32OwnerWindow {
    fn drop(&mut self) {
        self.detach();
    }
}

unsafe extern "system" fn owner_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let entry = OWNERS.with_borrow(|owners| {
        owners
            .get(&key(hwnd))
            .map(|entry| (entry.prev_proc, entry.owner.upgrade()))
    });
    let Some((prev_proc, owner)) = entry else {
        return win_api::def_window_proc(hwnd, msg, wparam, lparam);
    };

    if msg == content_rendered_message() {
        if let Some(owner) = owner {
            owner.emit(OwnerEvent::ContentRendered);
        }
        return LRESULT(0);
    }

    let result = unsafe { win_api::call_previous_proc(prev_proc, hwnd, msg, wparam, lparam) };
    if let Some(owner) = owner {
        owner.after_message(msg, wparam);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_rendered_message_is_registered_once() {
        let msg = content_rendered_message();
        assert!((0xC000..=0xFFFF).contains(&msg), "{msg:#x}");
        assert_eq!(content_rendered_message(), msg);
    }
}
