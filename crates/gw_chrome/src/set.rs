use std::cell::Cell;
use std::rc::Rc;

use gw_platform::{DecorationPlatform, SubscriptionId};
use gw_settings::ChromeSettings;

use crate::{
    AppearanceSource, DecorationWindow, DpiContext, Edge, EdgeGeometryProcessor, OwnerEvent,
    OwnerWindow,
};

/// The decoration windows of one owner.
///
/// Owns every [`DecorationWindow`] and forwards owner events to them. When the owner closes
/// (or the set is closed or dropped) every window is closed exactly once.
pub struct DecorationSet {
    inner: Rc<SetInner>,
}

struct SetInner {
    owner: Rc<dyn OwnerWindow>,
    appearance: Rc<AppearanceSource>,
    windows: Vec<DecorationWindow>,
    subscription: Cell<Option<SubscriptionId>>,
    closed: Cell<bool>,
}

impl DecorationSet {
    /// One window per processor; a second processor for an edge already taken is skipped.
    pub fn new(
        owner: Rc<dyn OwnerWindow>,
        platform: Rc<dyn DecorationPlatform>,
        appearance: Rc<AppearanceSource>,
        dpi: Rc<DpiContext>,
        processors: impl IntoIterator<Item = EdgeGeometryProcessor>,
    ) -> Self {
        let mut windows: Vec<DecorationWindow> = Vec::with_capacity(Edge::ALL.len());
        for processor in processors {
            if windows.iter().any(|w| w.edge() == processor.edge()) {
                log::warn!("duplicate {:?} processor ignored", processor.edge());
                continue;
            }
            windows.push(DecorationWindow::new(
                Rc::clone(&owner),
                Rc::clone(&platform),
                Rc::clone(&appearance),
                Rc::clone(&dpi),
                processor,
            ));
        }

        let inner = Rc::new(SetInner {
            owner,
            appearance,
            windows,
            subscription: Cell::new(None),
            closed: Cell::new(false),
        });

        let weak = Rc::downgrade(&inner);
        let id = inner.owner.subscribe(Rc::new(move |event: &OwnerEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.dispatch(*event);
            }
        }));
        inner.subscription.set(Some(id));

        log::debug!(
            "attached {} decoration(s) to {:?}",
            inner.windows.len(),
            inner.owner.handle()
        );
        Self { inner }
    }

    /// All four edges, sized and colored from `settings`, sharing the process DPI context.
    pub fn attach(
        owner: Rc<dyn OwnerWindow>,
        platform: Rc<dyn DecorationPlatform>,
        settings: &ChromeSettings,
    ) -> Self {
        Self::new(
            owner,
            platform,
            Rc::new(AppearanceSource::from_settings(settings)),
            DpiContext::process(),
            EdgeGeometryProcessor::all(settings.glow_size, settings.edge_size),
        )
    }

    pub fn windows(&self) -> &[DecorationWindow] {
        &self.inner.windows
    }

    pub fn window(&self, edge: Edge) -> Option<&DecorationWindow> {
        self.inner.windows.iter().find(|w| w.edge() == edge)
    }

    pub fn appearance(&self) -> &Rc<AppearanceSource> {
        &self.inner.appearance
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Feed an owner event by hand, e.g. `ContentRendered` when attaching to an owner that
    /// has already painted.
    pub fn notify(&self, event: OwnerEvent) {
        self.inner.dispatch(event);
    }

    /// Re-sync every window with the owner.
    pub fn update(&self) {
        if self.is_closed() {
            return;
        }
        for window in &self.inner.windows {
            window.update();
        }
    }

    /// Detach from the owner and close every window. Idempotent.
    pub fn close(&self) {
        self.inner.close();
    }
}

impl Drop for DecorationSet {
    fn drop(&mut self) {
        self.inner.close();
    }
}

impl SetInner {
    fn dispatch(&self, event: OwnerEvent) {
        if self.closed.get() {
            return;
        }
        for window in &self.windows {
            window.on_owner_event(event);
        }
        if event == OwnerEvent::Closed {
            self.close();
        }
    }

    fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        for window in &self.windows {
            window.close();
        }
        if let Some(id) = self.subscription.take() {
            self.owner.unsubscribe(id);
        }
        log::debug!("decorations of {:?} closed", self.owner.handle());
    }
}
