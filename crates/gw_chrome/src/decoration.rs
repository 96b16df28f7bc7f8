use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gw_platform::{
    Color, CursorIcon, DecorationPlatform, HitTestCode, MA_NOACTIVATE, MessageFilter,
    NativeMessage, SubscriptionId, Visibility, WindowId, WindowState,
};
use gw_settings::ChromeMode;

use crate::edge::{HorizontalAlignment, LogicalPoint, LogicalRect, Orientation, VerticalAlignment};
use crate::{
    AppearanceSource, ChromeAppearance, DpiContext, DpiScale, Edge, EdgeGeometryProcessor,
    OwnerEvent, OwnerSnapshot, OwnerWindow,
};

/// How long a restore-from-minimize is given to finish animating before the glow reappears.
pub const RESTORE_DELAY: Duration = Duration::from_millis(250);

/// One edge's glow window.
///
/// Mirrors the owner's visibility, geometry and activation, and turns clicks on the glow into
/// non-client messages for the owner. Dropping the window closes it.
pub struct DecorationWindow {
    inner: Rc<Inner>,
}

struct Inner {
    processor: EdgeGeometryProcessor,
    owner: Rc<dyn OwnerWindow>,
    platform: Rc<dyn DecorationPlatform>,
    appearance_source: Rc<AppearanceSource>,
    dpi: Rc<DpiContext>,
    handle: Option<WindowId>,

    appearance_subscription: Cell<Option<SubscriptionId>>,
    closed: Cell<bool>,
    rendered: Cell<bool>,
    restore_pending: Cell<bool>,
    restore_generation: Cell<u64>,
    last_owner_state: Cell<WindowState>,
    visibility: Cell<Visibility>,
    is_glowing: Cell<bool>,
    appearance: Cell<ChromeAppearance>,
    cursor: Cell<CursorIcon>,
    bounds: Cell<LogicalRect>,
}

impl DecorationWindow {
    /// Create the native window for `processor`'s edge and hook it up.
    ///
    /// If the platform can't produce a handle the decoration still tracks state but never
    /// touches the window system.
    pub fn new(
        owner: Rc<dyn OwnerWindow>,
        platform: Rc<dyn DecorationPlatform>,
        appearance_source: Rc<AppearanceSource>,
        dpi: Rc<DpiContext>,
        processor: EdgeGeometryProcessor,
    ) -> Self {
        let edge = processor.edge();
        let handle = match platform.create_decoration_window(owner.handle(), edge.name()) {
            Ok(handle) if handle.is_valid() => Some(handle),
            Ok(_) => {
                log::warn!("{edge:?} decoration: platform returned an invalid handle");
                None
            }
            Err(e) => {
                log::warn!("{edge:?} decoration unavailable: {e}");
                None
            }
        };

        let snapshot = owner.snapshot();
        let inner = Rc::new(Inner {
            processor,
            appearance: Cell::new(appearance_source.get()),
            owner,
            platform,
            appearance_source,
            dpi,
            handle,
            appearance_subscription: Cell::new(None),
            closed: Cell::new(false),
            rendered: Cell::new(false),
            restore_pending: Cell::new(false),
            restore_generation: Cell::new(0),
            last_owner_state: Cell::new(snapshot.window_state),
            visibility: Cell::new(Visibility::Collapsed),
            is_glowing: Cell::new(snapshot.is_active),
            cursor: Cell::new(CursorIcon::Arrow),
            bounds: Cell::new(processor.rect(&snapshot)),
        });

        let weak = Rc::downgrade(&inner);
        let subscription = inner
            .appearance_source
            .subscribe(Rc::new(move |appearance: &ChromeAppearance| {
                if let Some(inner) = weak.upgrade() {
                    inner.set_appearance(*appearance);
                }
            }));
        inner.appearance_subscription.set(Some(subscription));

        if let Some(handle) = handle {
            inner.realize(handle);
        }

        Self { inner }
    }

    /// Re-derive visibility and geometry from the owner's current state.
    pub fn update(&self) {
        self.inner.update();
    }

    /// Dispatch an owner lifecycle event.
    pub fn on_owner_event(&self, event: OwnerEvent) {
        self.inner.on_owner_event(event);
    }

    /// Run a native message through the decoration's input logic.
    ///
    /// Returns `Some(result)` when the message is handled.
    pub fn filter_message(&self, message: NativeMessage) -> Option<isize> {
        self.inner.filter_message(message)
    }

    /// Close the native window. Idempotent; later updates are no-ops.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    pub fn handle(&self) -> Option<WindowId> {
        self.inner.handle
    }

    pub fn edge(&self) -> Edge {
        self.inner.processor.edge()
    }

    pub fn processor(&self) -> &EdgeGeometryProcessor {
        &self.inner.processor
    }

    pub fn visibility(&self) -> Visibility {
        self.inner.visibility.get()
    }

    /// Logical bounds from the last geometry pass.
    pub fn bounds(&self) -> LogicalRect {
        self.inner.bounds.get()
    }

    pub fn is_restore_pending(&self) -> bool {
        self.inner.restore_pending.get()
    }

    /// Whether the owner is active; picks the active or inactive brush.
    pub fn is_glowing(&self) -> bool {
        self.inner.is_glowing.get()
    }

    pub fn orientation(&self) -> Orientation {
        self.inner.processor.orientation()
    }

    pub fn alignment(&self) -> (HorizontalAlignment, VerticalAlignment) {
        self.inner.processor.alignment()
    }

    pub fn active_brush(&self) -> Color {
        self.inner.appearance.get().active_brush
    }

    pub fn inactive_brush(&self) -> Color {
        self.inner.appearance.get().inactive_brush
    }

    pub fn chrome_mode(&self) -> ChromeMode {
        self.inner.appearance.get().chrome_mode
    }

    pub fn current_brush(&self) -> Color {
        self.inner.current_brush()
    }

    /// Cursor chosen by the last hit-test query.
    pub fn cursor(&self) -> CursorIcon {
        self.inner.cursor.get()
    }
}

impl Drop for DecorationWindow {
    fn drop(&mut self) {
        self.inner.close();
    }
}

impl std::fmt::Debug for DecorationWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecorationWindow")
            .field("edge", &self.edge())
            .field("handle", &self.handle())
            .field("visibility", &self.visibility())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Inner {
    fn realize(self: &Rc<Self>, handle: WindowId) {
        let edge = self.processor.edge();

        if let Err(e) = self.platform.apply_decoration_styles(handle) {
            log::warn!("{edge:?} decoration: failed to apply window styles: {e}");
        }

        let weak: Weak<Inner> = Rc::downgrade(self);
        let filter: MessageFilter = Rc::new(move |message: NativeMessage| {
            weak.upgrade()
                .and_then(|inner| inner.filter_message(message))
        });
        if let Err(e) = self.platform.install_message_filter(handle, filter) {
            log::warn!("{edge:?} decoration: message filter not installed: {e}");
        }

        self.scale();
        self.repaint();
        log::debug!("{edge:?} decoration realized as {handle:?}");
    }

    fn scale(&self) -> DpiScale {
        let Some(handle) = self.handle else {
            return self.dpi.current();
        };
        self.dpi.resolve(|| {
            self.platform
                .query_dpi(handle)
                .and_then(|(x, y)| DpiScale::from_dpi(x, y))
        })
    }

    fn on_owner_event(self: &Rc<Self>, event: OwnerEvent) {
        match event {
            OwnerEvent::ContentRendered => {
                if self.closed.get() {
                    return;
                }
                self.rendered.set(true);
                self.update();
            }
            OwnerEvent::Closed => self.close(),
            _ => self.update(),
        }
    }

    fn update(self: &Rc<Self>) {
        if self.closed.get() || !self.rendered.get() {
            return;
        }

        let owner = self.owner.snapshot();
        // Recorded first: a continuation may re-enter update() from inside schedule().
        let previous_state = self.last_owner_state.replace(owner.window_state);
        self.set_glowing(owner.is_active);

        if owner.visibility == Visibility::Hidden {
            self.apply_geometry(&owner);
            self.apply_visibility(Visibility::Hidden);
        } else if owner.window_state == WindowState::Normal {
            if self.restore_pending.get() {
                // The scheduled continuation will pick up the latest snapshot.
            } else if previous_state == WindowState::Minimized
                && self.platform.minimize_animation_enabled()
            {
                self.schedule_restore();
            } else {
                self.apply_geometry(&owner);
                self.apply_visibility(Visibility::Visible);
            }
        } else {
            self.cancel_restore();
            self.apply_visibility(Visibility::Collapsed);
        }
    }

    fn schedule_restore(self: &Rc<Self>) {
        self.restore_pending.set(true);
        let generation = self.restore_generation.get();
        log::debug!(
            "{:?} decoration: deferring restore by {RESTORE_DELAY:?}",
            self.processor.edge()
        );

        let weak = Rc::downgrade(self);
        self.platform.schedule(
            RESTORE_DELAY,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                // Superseded by a later minimize.
                if inner.restore_generation.get() != generation {
                    return;
                }
                inner.restore_pending.set(false);
                if inner.closed.get() {
                    return;
                }
                inner.update();
            }),
        );
    }

    fn cancel_restore(&self) {
        if self.restore_pending.replace(false) {
            self.restore_generation
                .set(self.restore_generation.get().wrapping_add(1));
            log::debug!(
                "{:?} decoration: pending restore cancelled",
                self.processor.edge()
            );
        }
    }

    fn apply_geometry(&self, owner: &OwnerSnapshot) {
        let bounds = self.processor.rect(owner);
        self.bounds.set(bounds);

        let Some(handle) = self.handle else {
            return;
        };
        let rect = self.scale().to_physical(bounds);
        if let Err(e) = self.platform.position_window(handle, owner.handle, rect) {
            log::warn!("{:?} decoration: positioning failed: {e}", self.processor.edge());
        }
    }

    fn apply_visibility(&self, visibility: Visibility) {
        if self.visibility.replace(visibility) == visibility {
            return;
        }
        log::debug!("{:?} decoration -> {visibility:?}", self.processor.edge());

        if let Some(handle) = self.handle
            && let Err(e) = self.platform.set_visibility(handle, visibility)
        {
            log::warn!("{:?} decoration: visibility change failed: {e}", self.processor.edge());
        }
    }

    fn set_glowing(&self, glowing: bool) {
        if self.is_glowing.replace(glowing) != glowing {
            self.repaint();
        }
    }

    fn set_appearance(&self, appearance: ChromeAppearance) {
        if self.closed.get() {
            return;
        }
        if self.appearance.replace(appearance) != appearance {
            self.repaint();
        }
    }

    fn current_brush(&self) -> Color {
        self.appearance.get().brush(self.is_glowing.get())
    }

    fn repaint(&self) {
        if let Some(handle) = self.handle
            && let Err(e) = self.platform.repaint(handle, self.current_brush())
        {
            log::warn!("{:?} decoration: repaint failed: {e}", self.processor.edge());
        }
    }

    fn to_local(&self, x: i32, y: i32) -> LogicalPoint {
        let (x, y) = self.scale().to_logical(x, y);
        LogicalPoint::new(x, y)
    }

    fn filter_message(&self, message: NativeMessage) -> Option<isize> {
        if self.closed.get() {
            return None;
        }
        log::trace!("{:?} decoration message {message:?}", self.processor.edge());

        match message {
            NativeMessage::MouseActivate => Some(MA_NOACTIVATE),

            NativeMessage::LeftButtonDown { x, y } => {
                if !self.owner.snapshot().is_active {
                    self.owner.activate();
                }

                // Activation may have moved or resized things; classify against fresh geometry.
                let owner = self.owner.snapshot();
                let bounds = self.processor.rect(&owner);
                let code = self
                    .processor
                    .hit_test(self.to_local(x, y), bounds.width, bounds.height);
                if let Err(e) = self.platform.post_nc_button_down(owner.handle, code) {
                    log::warn!("failed to forward button down {code:?}: {e}");
                }
                None
            }

            NativeMessage::HitTest { x, y } => {
                let owner = self.owner.snapshot();
                if !owner.resizable {
                    self.cursor.set(CursorIcon::Arrow);
                    return Some(HitTestCode::Nowhere.raw() as isize);
                }

                let handle = self.handle?;
                let (cx, cy) = self.platform.screen_to_client(handle, x, y)?;
                let bounds = self.processor.rect(&owner);
                let cursor = self
                    .processor
                    .cursor(self.to_local(cx, cy), bounds.width, bounds.height);
                self.cursor.set(cursor);
                self.platform.set_cursor(cursor);
                None
            }

            NativeMessage::SetCursor => {
                self.platform.set_cursor(self.cursor.get());
                Some(1)
            }

            NativeMessage::LeftButtonDoubleClick { .. } => {
                if let Some(code) = self.processor.double_click_code() {
                    let owner = self.owner.handle();
                    if let Err(e) = self.platform.send_nc_double_click(owner, code) {
                        log::warn!("failed to forward double click {code:?}: {e}");
                    }
                }
                None
            }

            NativeMessage::Destroyed => {
                self.release(false);
                None
            }

            NativeMessage::Other(_) => None,
        }
    }

    fn close(&self) {
        self.release(true);
    }

    /// Mark closed and drop every hook. `destroy` is false when the native window is already
    /// going away on its own.
    fn release(&self, destroy: bool) {
        if self.closed.replace(true) {
            return;
        }
        self.restore_pending.set(false);

        if let Some(id) = self.appearance_subscription.take() {
            self.appearance_source.unsubscribe(id);
        }

        if let Some(handle) = self.handle {
            self.platform.remove_message_filter(handle);
            if destroy && let Err(e) = self.platform.destroy_window(handle) {
                log::warn!("{:?} decoration: destroy failed: {e}", self.processor.edge());
            }
        }
        log::debug!("{:?} decoration closed", self.processor.edge());
    }
}
