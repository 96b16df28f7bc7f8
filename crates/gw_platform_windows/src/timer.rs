//! One-shot thread timers.
//!
//! `SetTimer` without a window delivers `WM_TIMER` to the calling thread's queue, where
//! `DispatchMessageW` invokes [`timer_proc`]. Callbacks therefore run on the UI thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{KillTimer, SetTimer};

thread_local! {
    static PENDING: RefCell<HashMap<usize, Box<dyn FnOnce()>>> = RefCell::new(HashMap::new());
}

pub fn schedule_once(delay: Duration, callback: Box<dyn FnOnce()>) {
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX).max(1);
    let id = unsafe { SetTimer(None, 0, millis, Some(timer_proc)) };
    if id == 0 {
        log::warn!("SetTimer failed, running the {delay:?} callback immediately");
        callback();
        return;
    }
    PENDING.with_borrow_mut(|pending| {
        pending.insert(id, callback);
    });
}

unsafe extern "system" fn timer_proc(_hwnd: HWND, _msg: u32, id: usize, _time: u32) {
    unsafe {
        let _ = KillTimer(None, id);
    }
    let callback = PENDING.with_borrow_mut(|pending| pending.remove(&id));
    if let Some(callback) = callback {
        callback();
    }
}
