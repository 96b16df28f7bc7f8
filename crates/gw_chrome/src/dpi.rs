use std::cell::Cell;
use std::rc::Rc;

use gw_platform::PhysicalRect;

use crate::LogicalRect;

/// Device pixels per logical unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpiScale {
    pub x: f64,
    pub y: f64,
}

impl DpiScale {
    pub const DEFAULT: DpiScale = DpiScale { x: 1.0, y: 1.0 };

    /// Build from raw DPI values (96 = 100%). Zero DPI is rejected.
    pub fn from_dpi(dpi_x: u32, dpi_y: u32) -> Option<Self> {
        Self::new(dpi_x as f64 / 96.0, dpi_y as f64 / 96.0)
    }

    pub fn new(x: f64, y: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(x) && valid(y)).then_some(Self { x, y })
    }

    pub fn to_physical(self, rect: LogicalRect) -> PhysicalRect {
        PhysicalRect {
            x: (rect.left * self.x).round() as i32,
            y: (rect.top * self.y).round() as i32,
            width: (rect.width * self.x).round() as i32,
            height: (rect.height * self.y).round() as i32,
        }
    }

    pub fn to_logical(self, x: i32, y: i32) -> (f64, f64) {
        (x as f64 / self.x, y as f64 / self.y)
    }
}

impl Default for DpiScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

thread_local! {
    static PROCESS_DPI: Rc<DpiContext> = Rc::new(DpiContext::new());
}

/// Lazily resolved, then frozen, scale factor shared by every decoration window.
///
/// Per-monitor DPI is deliberately not tracked: the first successful query wins for the rest
/// of the process.
#[derive(Debug, Default)]
pub struct DpiContext {
    scale: Cell<Option<DpiScale>>,
}

impl DpiContext {
    pub const fn new() -> Self {
        Self {
            scale: Cell::new(None),
        }
    }

    /// The context shared by all decorations on the UI thread.
    pub fn process() -> Rc<DpiContext> {
        PROCESS_DPI.with(Rc::clone)
    }

    pub fn get(&self) -> Option<DpiScale> {
        self.scale.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.scale.get().is_some()
    }

    /// Return the cached scale, or run `query` once to resolve it.
    ///
    /// A failed query is not cached; the caller gets [`DpiScale::DEFAULT`] for now and the next
    /// call queries again.
    pub fn resolve(&self, query: impl FnOnce() -> Option<DpiScale>) -> DpiScale {
        if let Some(scale) = self.scale.get() {
            return scale;
        }
        match query() {
            Some(scale) => {
                log::debug!("DPI scale resolved to {}x{}", scale.x, scale.y);
                self.scale.set(Some(scale));
                scale
            }
            None => {
                log::warn!("DPI query failed, falling back to 1.0");
                DpiScale::DEFAULT
            }
        }
    }

    /// Cached scale or the default; never queries.
    pub fn current(&self) -> DpiScale {
        self.scale.get().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_successful_resolution_wins() {
        let ctx = DpiContext::new();
        let first = ctx.resolve(|| DpiScale::from_dpi(144, 144));
        let second = ctx.resolve(|| panic!("must not query again"));

        assert_eq!(first, DpiScale { x: 1.5, y: 1.5 });
        assert_eq!(second, first);
    }

    #[test]
    fn failure_falls_back_without_caching() {
        let ctx = DpiContext::new();
        assert_eq!(ctx.resolve(|| None), DpiScale::DEFAULT);
        assert!(!ctx.is_resolved());

        assert_eq!(ctx.resolve(|| DpiScale::from_dpi(192, 192)).x, 2.0);
        assert!(ctx.is_resolved());
    }

    #[test]
    fn zero_dpi_is_not_a_scale() {
        assert_eq!(DpiScale::from_dpi(0, 96), None);
        assert_eq!(DpiScale::new(f64::NAN, 1.0), None);
    }

    #[test]
    fn physical_conversion_rounds_each_component() {
        let scale = DpiScale::from_dpi(120, 120).unwrap();
        let rect = scale.to_physical(LogicalRect::new(-9.0, 100.0, 818.0, 9.0));
        assert_eq!(rect, PhysicalRect::new(-11, 125, 1023, 11));
    }

    #[test]
    fn process_context_is_shared() {
        let a = DpiContext::process();
        let b = DpiContext::process();
        assert!(Rc::ptr_eq(&a, &b));
    }
}
