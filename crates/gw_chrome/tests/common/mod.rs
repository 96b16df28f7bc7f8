#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gw_chrome::{
    AppearanceSource, DecorationSet, DpiContext, EdgeGeometryProcessor, OwnerEvent, OwnerSnapshot,
    OwnerWindow,
};
use gw_platform::{
    Color, CursorIcon, DecorationPlatform, EventHub, HitTestCode, MessageFilter, NativeMessage,
    PhysicalRect, PlatformError, SubscriptionId, Visibility, WindowId, WindowState,
};

pub fn owner_id() -> WindowId {
    WindowId::from_raw(1)
}

/// Everything observable that crosses the platform or owner boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create { owner: WindowId, title: String },
    Styles(WindowId),
    InstallFilter(WindowId),
    RemoveFilter(WindowId),
    Position {
        window: WindowId,
        anchor: WindowId,
        rect: PhysicalRect,
    },
    Visibility(WindowId, Visibility),
    Destroy(WindowId),
    NcButtonDown(WindowId, HitTestCode),
    NcDoubleClick(WindowId, HitTestCode),
    SetCursor(CursorIcon),
    Repaint(WindowId, Color),
    Activate(WindowId),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct MockPlatform {
    pub log: CallLog,
    next_window: Cell<usize>,
    filters: RefCell<HashMap<WindowId, MessageFilter>>,
    placed: RefCell<HashMap<WindowId, PhysicalRect>>,
    timers: RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>,
    pub animation: Cell<bool>,
    pub dpi: Cell<Option<(u32, u32)>>,
    pub dpi_queries: Cell<usize>,
    pub fail_create: Cell<bool>,
    /// Run scheduled callbacks inline, like a timer backend that failed to arm.
    pub run_timers_inline: Cell<bool>,
    pub scheduled: Cell<usize>,
}

impl MockPlatform {
    pub fn new(log: CallLog) -> Rc<Self> {
        Rc::new(Self {
            log,
            next_window: Cell::new(1001),
            filters: RefCell::new(HashMap::new()),
            placed: RefCell::new(HashMap::new()),
            timers: RefCell::new(Vec::new()),
            animation: Cell::new(false),
            dpi: Cell::new(Some((96, 96))),
            dpi_queries: Cell::new(0),
            fail_create: Cell::new(false),
            run_timers_inline: Cell::new(false),
            scheduled: Cell::new(0),
        })
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    /// Deliver a native message the way a window procedure would.
    pub fn send(&self, window: WindowId, message: NativeMessage) -> Option<isize> {
        let filter = self.filters.borrow().get(&window).cloned();
        filter.and_then(|filter| filter(message))
    }

    pub fn has_filter(&self, window: WindowId) -> bool {
        self.filters.borrow().contains_key(&window)
    }

    pub fn pending_timers(&self) -> Vec<Duration> {
        self.timers.borrow().iter().map(|(d, _)| *d).collect()
    }

    /// Remove the pending callbacks without running them.
    pub fn take_timers(&self) -> Vec<Box<dyn FnOnce()>> {
        self.timers
            .borrow_mut()
            .drain(..)
            .map(|(_, callback)| callback)
            .collect()
    }

    pub fn fire_timers(&self) {
        let due: Vec<_> = self.timers.borrow_mut().drain(..).collect();
        for (_, callback) in due {
            callback();
        }
    }
}

impl DecorationPlatform for MockPlatform {
    fn create_decoration_window(
        &self,
        owner: WindowId,
        title: &str,
    ) -> gw_platform::Result<WindowId> {
        if self.fail_create.get() {
            return Err(PlatformError::WindowCreation("mock".to_string()));
        }
        self.record(Call::Create {
            owner,
            title: title.to_string(),
        });
        let id = self.next_window.get();
        self.next_window.set(id + 1);
        Ok(WindowId::from_raw(id))
    }

    fn apply_decoration_styles(&self, window: WindowId) -> gw_platform::Result<()> {
        self.record(Call::Styles(window));
        Ok(())
    }

    fn install_message_filter(
        &self,
        window: WindowId,
        filter: MessageFilter,
    ) -> gw_platform::Result<()> {
        self.record(Call::InstallFilter(window));
        self.filters.borrow_mut().insert(window, filter);
        Ok(())
    }

    fn remove_message_filter(&self, window: WindowId) {
        self.record(Call::RemoveFilter(window));
        self.filters.borrow_mut().remove(&window);
    }

    fn position_window(
        &self,
        window: WindowId,
        anchor: WindowId,
        rect: PhysicalRect,
    ) -> gw_platform::Result<()> {
        self.record(Call::Position {
            window,
            anchor,
            rect,
        });
        self.placed.borrow_mut().insert(window, rect);
        Ok(())
    }

    fn set_visibility(&self, window: WindowId, visibility: Visibility) -> gw_platform::Result<()> {
        self.record(Call::Visibility(window, visibility));
        Ok(())
    }

    fn destroy_window(&self, window: WindowId) -> gw_platform::Result<()> {
        self.record(Call::Destroy(window));
        Ok(())
    }

    fn post_nc_button_down(&self, owner: WindowId, code: HitTestCode) -> gw_platform::Result<()> {
        self.record(Call::NcButtonDown(owner, code));
        Ok(())
    }

    fn send_nc_double_click(&self, owner: WindowId, code: HitTestCode) -> gw_platform::Result<()> {
        self.record(Call::NcDoubleClick(owner, code));
        Ok(())
    }

    fn set_cursor(&self, cursor: CursorIcon) {
        self.record(Call::SetCursor(cursor));
    }

    fn screen_to_client(&self, window: WindowId, x: i32, y: i32) -> Option<(i32, i32)> {
        let rect = *self.placed.borrow().get(&window)?;
        Some((x - rect.x, y - rect.y))
    }

    fn query_dpi(&self, _window: WindowId) -> Option<(u32, u32)> {
        self.dpi_queries.set(self.dpi_queries.get() + 1);
        self.dpi.get()
    }

    fn minimize_animation_enabled(&self) -> bool {
        self.animation.get()
    }

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let scheduled = self.scheduled.get() + 1;
        self.scheduled.set(scheduled);
        assert!(scheduled < 64, "schedule re-entered {scheduled} times");
        if self.run_timers_inline.get() {
            callback();
            return;
        }
        self.timers.borrow_mut().push((delay, callback));
    }

    fn repaint(&self, window: WindowId, color: Color) -> gw_platform::Result<()> {
        self.record(Call::Repaint(window, color));
        Ok(())
    }
}

pub struct MockOwner {
    state: RefCell<OwnerSnapshot>,
    events: EventHub<OwnerEvent>,
    log: CallLog,
}

impl MockOwner {
    pub fn new(log: CallLog) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(OwnerSnapshot {
                handle: owner_id(),
                left: 100.0,
                top: 50.0,
                width: 800.0,
                height: 600.0,
                is_active: true,
                window_state: WindowState::Normal,
                visibility: Visibility::Visible,
                resizable: true,
            }),
            events: EventHub::new(),
            log,
        })
    }

    pub fn modify(&self, f: impl FnOnce(&mut OwnerSnapshot)) {
        f(&mut self.state.borrow_mut());
    }

    pub fn emit(&self, event: OwnerEvent) {
        self.events.emit(&event);
    }

    pub fn set_state(&self, state: WindowState) {
        self.modify(|s| s.window_state = state);
        self.emit(OwnerEvent::StateChanged);
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.len()
    }
}

impl OwnerWindow for MockOwner {
    fn handle(&self) -> WindowId {
        owner_id()
    }

    fn snapshot(&self) -> OwnerSnapshot {
        *self.state.borrow()
    }

    fn activate(&self) {
        self.log.borrow_mut().push(Call::Activate(owner_id()));
        self.modify(|s| s.is_active = true);
        self.emit(OwnerEvent::Activated);
    }

    fn subscribe(&self, handler: Rc<dyn Fn(&OwnerEvent)>) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.events.unsubscribe(id);
    }
}

pub struct Fixture {
    pub log: CallLog,
    pub platform: Rc<MockPlatform>,
    pub owner: Rc<MockOwner>,
    pub appearance: Rc<AppearanceSource>,
    pub dpi: Rc<DpiContext>,
}

impl Fixture {
    pub fn new() -> Self {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        Self {
            platform: MockPlatform::new(Rc::clone(&log)),
            owner: MockOwner::new(Rc::clone(&log)),
            appearance: Rc::new(AppearanceSource::default()),
            dpi: Rc::new(DpiContext::new()),
            log,
        }
    }

    pub fn attach(&self) -> DecorationSet {
        self.attach_with(EdgeGeometryProcessor::all(9.0, 20.0))
    }

    pub fn attach_with(
        &self,
        processors: impl IntoIterator<Item = EdgeGeometryProcessor>,
    ) -> DecorationSet {
        let owner: Rc<dyn OwnerWindow> = self.owner.clone();
        let platform: Rc<dyn DecorationPlatform> = self.platform.clone();
        DecorationSet::new(
            owner,
            platform,
            Rc::clone(&self.appearance),
            Rc::clone(&self.dpi),
            processors,
        )
    }

    /// Attach, render once, and forget the setup calls.
    pub fn attach_rendered(&self) -> DecorationSet {
        let set = self.attach();
        self.owner.emit(OwnerEvent::ContentRendered);
        self.clear();
        set
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn positions(&self) -> Vec<(WindowId, PhysicalRect)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Position { window, rect, .. } => Some((window, rect)),
                _ => None,
            })
            .collect()
    }

    pub fn visibility_calls(&self) -> Vec<(WindowId, Visibility)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Visibility(window, v) => Some((window, v)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }
}
