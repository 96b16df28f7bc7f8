use std::rc::Rc;

use gw_platform::{SubscriptionId, Visibility, WindowId, WindowState};

/// Point-in-time view of the owner window, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerSnapshot {
    pub handle: WindowId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub is_active: bool,
    pub window_state: WindowState,
    pub visibility: Visibility,
    pub resizable: bool,
}

/// Lifecycle notifications raised by the owner window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerEvent {
    ContentRendered,
    StateChanged,
    LocationChanged,
    SizeChanged,
    Activated,
    Deactivated,
    VisibilityChanged,
    Closed,
}

/// The window being decorated.
///
/// Implemented by toolkit adapters; the decoration core only pulls snapshots and listens to
/// [`OwnerEvent`]s. All calls happen on the UI thread.
pub trait OwnerWindow {
    fn handle(&self) -> WindowId;

    fn snapshot(&self) -> OwnerSnapshot;

    /// Bring the owner to the foreground and give it focus.
    fn activate(&self);

    fn subscribe(&self, handler: Rc<dyn Fn(&OwnerEvent)>) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}
