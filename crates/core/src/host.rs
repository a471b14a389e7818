//! Host surfaces and the probe used to measure them.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Identifies a bounded element inside the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// The surface a container observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostSurface {
    /// The whole host viewport (terminal window).
    Viewport,
    /// A bounded element laid out inside the viewport.
    Element(ElementId),
}

/// Host measurement of a bounded element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBox {
    pub client_width: f64,
    pub client_height: f64,
    pub bounding_left: f64,
    pub bounding_top: f64,
}

impl ElementBox {
    pub const fn new(client_width: f64, client_height: f64, left: f64, top: f64) -> Self {
        Self {
            client_width,
            client_height,
            bounding_left: left,
            bounding_top: top,
        }
    }

    /// Whether a point in host units lies inside this box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.bounding_left
            && y >= self.bounding_top
            && x < self.bounding_left + self.client_width
            && y < self.bounding_top + self.client_height
    }
}

/// Raw layout notification delivered by the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostNotification {
    ViewportResized,
    ElementResized(ElementId),
}

/// Token returned by [`SurfaceProbe::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// Live measurements of host surfaces plus observer bookkeeping.
pub trait SurfaceProbe {
    /// Inner `(width, height)` of the viewport.
    fn viewport_size(&self) -> (f64, f64);

    /// Current box of an element, or `None` if the host no longer knows it.
    fn element_box(&self, id: ElementId) -> Option<ElementBox>;

    /// Register interest in layout changes of `surface`.
    fn observe(&self, surface: HostSurface) -> ObserverId;

    /// Drop a registration made with [`SurfaceProbe::observe`].
    fn unobserve(&self, id: ObserverId);
}

/// In-process host model.
///
/// The terminal loop writes the viewport size and element layout here;
/// containers read it back when a notification is dispatched.
#[derive(Debug, Default)]
pub struct Host {
    viewport: Cell<(f64, f64)>,
    elements: RefCell<HashMap<ElementId, ElementBox>>,
    observers: RefCell<HashMap<ObserverId, HostSurface>>,
    next_observer: Cell<u64>,
}

impl Host {
    pub fn new(width: f64, height: f64) -> Self {
        let host = Self::default();
        host.viewport.set((width, height));
        host
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.viewport.set((width, height));
    }

    pub fn set_element(&self, id: ElementId, rect: ElementBox) {
        self.elements.borrow_mut().insert(id, rect);
    }

    pub fn remove_element(&self, id: ElementId) {
        self.elements.borrow_mut().remove(&id);
    }

    /// Number of live observers registered for `surface`.
    pub fn observer_count(&self, surface: HostSurface) -> usize {
        self.observers
            .borrow()
            .values()
            .filter(|s| **s == surface)
            .count()
    }
}

impl SurfaceProbe for Host {
    fn viewport_size(&self) -> (f64, f64) {
        self.viewport.get()
    }

    fn element_box(&self, id: ElementId) -> Option<ElementBox> {
        self.elements.borrow().get(&id).copied()
    }

    fn observe(&self, surface: HostSurface) -> ObserverId {
        let id = ObserverId(self.next_observer.get());
        self.next_observer.set(id.0 + 1);
        self.observers.borrow_mut().insert(id, surface);
        id
    }

    fn unobserve(&self, id: ObserverId) {
        self.observers.borrow_mut().remove(&id);
    }
}
