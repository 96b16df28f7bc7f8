use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Platform-agnostic view of the native messages a decoration window cares about.
///
/// Backends convert raw window messages into this enum before handing them to the
/// installed [`MessageFilter`](crate::MessageFilter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeMessage {
    /// The window is about to be activated by a mouse click.
    MouseActivate,
    /// Primary button pressed. Client coordinates, device pixels.
    LeftButtonDown { x: i32, y: i32 },
    /// Primary button double click. Client coordinates, device pixels.
    LeftButtonDoubleClick { x: i32, y: i32 },
    /// Non-client hit-test query. Screen coordinates, device pixels.
    HitTest { x: i32, y: i32 },
    /// The system asks the window to set the cursor.
    SetCursor,
    /// The native window is being destroyed.
    Destroyed,
    /// Anything else; always passes through.
    Other(u32),
}

/// Handle returned by [`EventHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Single-threaded synchronous event fan-out.
///
/// Handlers may subscribe or unsubscribe (themselves or others) while an event is being
/// emitted; a handler removed mid-emit is not invoked afterwards.
pub struct EventHub<T> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, Rc<dyn Fn(&T)>)>>,
}

impl<T> Default for EventHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventHub<T> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, handler: Rc<dyn Fn(&T)>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Returns `false` if the id was not (or no longer) subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.handlers.borrow().iter().any(|(existing, _)| *existing == id)
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    pub fn emit(&self, event: &T) {
        // Snapshot first: handlers re-enter the hub.
        let snapshot: Vec<_> = self
            .handlers
            .borrow()
            .iter()
            .map(|(id, handler)| (*id, Rc::clone(handler)))
            .collect();

        for (id, handler) in snapshot {
            if self.is_subscribed(id) {
                handler(event);
            }
        }
    }
}
