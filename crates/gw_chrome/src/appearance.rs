use std::cell::Cell;
use std::rc::Rc;

use gw_platform::{Color, EventHub, SubscriptionId};
use gw_settings::{ChromeMode, ChromeSettings};

/// What the renderer needs to paint a decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeAppearance {
    pub active_brush: Color,
    pub inactive_brush: Color,
    pub chrome_mode: ChromeMode,
}

impl ChromeAppearance {
    pub fn from_settings(settings: &ChromeSettings) -> Self {
        Self {
            active_brush: settings.active_color().into(),
            inactive_brush: settings.inactive_color().into(),
            chrome_mode: settings.chrome_mode,
        }
    }

    pub fn brush(&self, glowing: bool) -> Color {
        if glowing {
            self.active_brush
        } else {
            self.inactive_brush
        }
    }
}

impl Default for ChromeAppearance {
    fn default() -> Self {
        Self::from_settings(&ChromeSettings::default())
    }
}

/// Observable appearance shared by the decorations of one owner.
///
/// Subscribers are called synchronously, and only when a value actually changes.
pub struct AppearanceSource {
    current: Cell<ChromeAppearance>,
    observers: EventHub<ChromeAppearance>,
}

impl AppearanceSource {
    pub fn new(initial: ChromeAppearance) -> Self {
        Self {
            current: Cell::new(initial),
            observers: EventHub::new(),
        }
    }

    pub fn from_settings(settings: &ChromeSettings) -> Self {
        Self::new(ChromeAppearance::from_settings(settings))
    }

    pub fn get(&self) -> ChromeAppearance {
        self.current.get()
    }

    pub fn subscribe(&self, observer: Rc<dyn Fn(&ChromeAppearance)>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers.unsubscribe(id);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn set_active_brush(&self, brush: Color) {
        self.set(ChromeAppearance {
            active_brush: brush,
            ..self.get()
        });
    }

    pub fn set_inactive_brush(&self, brush: Color) {
        self.set(ChromeAppearance {
            inactive_brush: brush,
            ..self.get()
        });
    }

    pub fn set_chrome_mode(&self, mode: ChromeMode) {
        self.set(ChromeAppearance {
            chrome_mode: mode,
            ..self.get()
        });
    }

    pub fn apply_settings(&self, settings: &ChromeSettings) {
        self.set(ChromeAppearance::from_settings(settings));
    }

    pub fn set(&self, appearance: ChromeAppearance) {
        if self.current.get() == appearance {
            return;
        }
        self.current.set(appearance);
        self.observers.emit(&appearance);
    }
}

impl Default for AppearanceSource {
    fn default() -> Self {
        Self::new(ChromeAppearance::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn observers_see_changes_once() {
        let source = AppearanceSource::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = {
            let seen = Rc::clone(&seen);
            source.subscribe(Rc::new(move |a: &ChromeAppearance| seen.borrow_mut().push(*a)))
        };

        source.set_active_brush(Color::rgb(255, 0, 0));
        source.set_active_brush(Color::rgb(255, 0, 0));
        source.set_chrome_mode(ChromeMode::Office2013);

        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1].active_brush, Color::rgb(255, 0, 0));
        assert_eq!(seen.borrow()[1].chrome_mode, ChromeMode::Office2013);

        source.unsubscribe(id);
        source.set_inactive_brush(Color::rgb(1, 1, 1));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn brush_selection_follows_glow_state() {
        let appearance = ChromeAppearance::default();
        assert_eq!(appearance.brush(true), Color::rgb(0, 122, 204));
        assert_eq!(appearance.brush(false), Color::rgb(64, 64, 64));
    }
}
