use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use gw_chrome::{AppearanceSource, DecorationSet};
use gw_platform::Color;
use gw_platform_windows::{Win32DecorationPlatform, Win32OwnerWindow, win_api, window_id};
use gw_settings::ConfigManager;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, CreateWindowExW, HTCAPTION, HTCLIENT, IDC_ARROW, WINDOW_EX_STYLE,
    WM_DESTROY, WM_KEYDOWN, WM_NCCALCSIZE, WM_NCHITTEST, WM_PAINT, WNDCLASSW, WS_MAXIMIZEBOX,
    WS_MINIMIZEBOX, WS_POPUP, WS_SYSMENU, WS_THICKFRAME,
};
use windows::core::w;

const CAPTION_HEIGHT: i32 = 32;
const BACKGROUND: u32 = 0x001E1E1E;
const CAPTION: u32 = 0x00302D2D;

const KEY_ESCAPE: usize = 0x1B;
const KEY_A: usize = 0x41;
const KEY_R: usize = 0x52;

/// What the keyboard shortcuts act on.
struct DemoState {
    owner: Rc<Win32OwnerWindow>,
    appearance: Rc<AppearanceSource>,
    accents: Vec<(u8, u8, u8)>,
    accent: usize,
}

thread_local! {
    static STATE: RefCell<Option<DemoState>> = const { RefCell::new(None) };
}

pub fn run() -> Result<()> {
    if let Err(e) = win_api::set_process_per_monitor_dpi_aware() {
        log::warn!("per-monitor DPI awareness unavailable: {e}");
    }

    let config = ConfigManager::new();
    let settings = config.get();
    log::info!(
        "glow {} / corner {} / mode {:?}",
        settings.glow_size,
        settings.edge_size,
        settings.chrome_mode
    );

    let hwnd = create_owner_window().context("failed to create the demo window")?;
    let owner =
        Win32OwnerWindow::attach(window_id(hwnd)).context("failed to hook the demo window")?;
    let decorations = DecorationSet::attach(
        owner.clone(),
        Rc::new(Win32DecorationPlatform::new()),
        &settings,
    );

    STATE.with_borrow_mut(|state| {
        *state = Some(DemoState {
            owner,
            appearance: Rc::clone(decorations.appearance()),
            accents: vec![
                settings.active_color(),
                (202, 81, 0),
                (16, 124, 16),
                (104, 33, 122),
            ],
            accent: 0,
        });
    });

    win_api::show_window(hwnd)?;
    log::info!("A cycles the accent color, R toggles resizing, Esc quits");
    win_api::run_message_loop();

    STATE.with_borrow_mut(|state| *state = None);
    drop(decorations);
    Ok(())
}

fn create_owner_window() -> Result<HWND> {
    let instance = win_api::get_module_handle()?;
    let class = WNDCLASSW {
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(owner_proc),
        hInstance: instance.into(),
        hCursor: win_api::load_system_cursor(IDC_ARROW)?,
        lpszClassName: w!("GlowDemoOwner"),
        ..Default::default()
    };
    if win_api::register_class(&class) == 0 {
        bail!("RegisterClassW failed");
    }

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            w!("GlowDemoOwner"),
            w!("Glow Chrome"),
            WS_POPUP | WS_THICKFRAME | WS_SYSMENU | WS_MINIMIZEBOX | WS_MAXIMIZEBOX,
            240,
            160,
            960,
            640,
            None,
            None,
            Some(instance.into()),
            None,
        )
    }?;
    Ok(hwnd)
}

fn cycle_accent() {
    let next = STATE.with_borrow_mut(|state| {
        let state = state.as_mut()?;
        state.accent = (state.accent + 1) % state.accents.len();
        Some((Rc::clone(&state.appearance), state.accents[state.accent]))
    });
    // Observers repaint synchronously, outside the state borrow.
    if let Some((appearance, color)) = next {
        appearance.set_active_brush(Color::from(color));
    }
}

fn toggle_resizable() {
    let owner = STATE.with_borrow(|state| state.as_ref().map(|s| Rc::clone(&s.owner)));
    if let Some(owner) = owner {
        owner.set_resizable(!owner.is_resizable());
        log::info!("resizable: {}", owner.is_resizable());
    }
}

fn paint(hwnd: HWND) {
    let ps = win_api::begin_paint(hwnd);
    if let Ok(client) = win_api::get_client_rect(hwnd) {
        win_api::fill_rect(ps.hdc, &client, BACKGROUND);
        let caption = RECT {
            bottom: client.top + CAPTION_HEIGHT,
            ..client
        };
        win_api::fill_rect(ps.hdc, &caption, CAPTION);
    }
    win_api::end_paint(hwnd, &ps);
}

fn hit_test(hwnd: HWND, lparam: LPARAM) -> u32 {
    let x = (lparam.0 as i16) as i32;
    let y = ((lparam.0 >> 16) as i16) as i32;
    match win_api::screen_to_client(hwnd, x, y) {
        Some((_, y)) if y < CAPTION_HEIGHT => HTCAPTION,
        _ => HTCLIENT,
    }
}

unsafe extern "system" fn owner_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // No native frame; the glow windows stand in for it.
        WM_NCCALCSIZE if wparam.0 != 0 => LRESULT(0),
        WM_NCHITTEST => LRESULT(hit_test(hwnd, lparam) as isize),
        WM_PAINT => {
            paint(hwnd);
            LRESULT(0)
        }
        WM_KEYDOWN => {
            match wparam.0 {
                KEY_ESCAPE => {
                    let _ = win_api::destroy_window(hwnd);
                }
                KEY_A => cycle_accent(),
                KEY_R => toggle_resizable(),
                _ => {}
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            win_api::quit_message_loop(0);
            LRESULT(0)
        }
        _ => win_api::def_window_proc(hwnd, msg, wparam, lparam),
    }
}
