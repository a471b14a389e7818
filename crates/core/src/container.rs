//! Container: one resize contract over two kinds of host surface.
//!
//! A container observes either the whole viewport or a bounded element and
//! turns host layout notifications into [`ResizeEvent`]s for its listeners.
//! Measurements are taken from the probe when a notification is dispatched,
//! so a burst of notifications is processed one by one against the latest
//! layout.

use std::fmt;
use std::rc::Rc;

use crate::host::{HostNotification, HostSurface, ObserverId, SurfaceProbe};
use crate::types::ResizeEvent;

/// Events a container can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
}

/// Listener registration handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type ResizeCallback = Rc<dyn Fn(&ResizeEvent)>;

/// Ordered callback list with identity-based removal.
pub struct Listeners<E> {
    entries: Vec<(ListenerId, Rc<dyn Fn(&E)>)>,
    next_id: u64,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

fn same_callback<E>(a: &Rc<dyn Fn(&E)>, b: &Rc<dyn Fn(&E)>) -> bool {
    // Compare data pointers only; vtable pointers are not unique.
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

impl<E> Listeners<E> {
    /// Register `callback`. Registering the same `Rc` twice keeps one entry.
    pub fn add(&mut self, callback: Rc<dyn Fn(&E)>) -> ListenerId {
        if let Some((id, _)) = self
            .entries
            .iter()
            .find(|(_, existing)| same_callback(existing, &callback))
        {
            return *id;
        }
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Remove the entry registered with this exact `Rc`.
    pub fn remove(&mut self, callback: &Rc<dyn Fn(&E)>) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|(_, existing)| !same_callback(existing, callback));
        self.entries.len() != before
    }

    pub fn remove_id(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    /// Call every listener in registration order.
    pub fn dispatch(&self, event: &E) {
        for (_, callback) in &self.entries {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub struct Container {
    surface: HostSurface,
    probe: Rc<dyn SurfaceProbe>,
    observer: Option<ObserverId>,
    resize: Listeners<ResizeEvent>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("surface", &self.surface)
            .field("observer", &self.observer)
            .field("resize", &self.resize)
            .finish()
    }
}

impl Container {
    /// Attach to `surface`, registering one observer with the probe.
    pub fn new(surface: HostSurface, probe: Rc<dyn SurfaceProbe>) -> Self {
        let observer = probe.observe(surface);
        tracing::debug!(?surface, observer = observer.0, "container attached");
        Self {
            surface,
            probe,
            observer: Some(observer),
            resize: Listeners::default(),
        }
    }

    pub fn surface(&self) -> HostSurface {
        self.surface
    }

    pub fn probe(&self) -> &Rc<dyn SurfaceProbe> {
        &self.probe
    }

    pub fn is_disposed(&self) -> bool {
        self.observer.is_none()
    }

    fn measure(&self) -> Option<ResizeEvent> {
        match self.surface {
            HostSurface::Viewport => {
                let (width, height) = self.probe.viewport_size();
                Some(ResizeEvent::new(height, width, 0.0, 0.0))
            }
            HostSurface::Element(id) => self.probe.element_box(id).map(|b| {
                ResizeEvent::new(
                    b.client_height,
                    b.client_width,
                    b.bounding_left,
                    b.bounding_top,
                )
            }),
        }
    }

    /// Measure the surface now.
    ///
    /// Used for first-paint sizing, before any notification arrived. An
    /// element unknown to the host measures as an empty box.
    pub fn make_resize_event(&self) -> ResizeEvent {
        self.measure().unwrap_or_default()
    }

    /// Whether `notification` concerns the observed surface.
    pub fn handles(&self, notification: HostNotification) -> bool {
        match (self.surface, notification) {
            (HostSurface::Viewport, HostNotification::ViewportResized) => true,
            (HostSurface::Element(id), HostNotification::ElementResized(changed)) => id == changed,
            _ => false,
        }
    }

    /// Feed a host layout notification.
    ///
    /// Returns the dispatched event, or `None` when the notification is for
    /// another surface, the element vanished, or the container is disposed.
    pub fn notify(&mut self, notification: HostNotification) -> Option<ResizeEvent> {
        if self.is_disposed() || !self.handles(notification) {
            return None;
        }
        let event = self.measure()?;
        self.resize.dispatch(&event);
        Some(event)
    }

    pub fn add_listener(&mut self, kind: EventKind, callback: ResizeCallback) -> ListenerId {
        match kind {
            EventKind::Resize => self.resize.add(callback),
        }
    }

    pub fn remove_listener(&mut self, kind: EventKind, callback: &ResizeCallback) -> bool {
        match kind {
            EventKind::Resize => self.resize.remove(callback),
        }
    }

    pub fn remove_listener_id(&mut self, kind: EventKind, id: ListenerId) -> bool {
        match kind {
            EventKind::Resize => self.resize.remove_id(id),
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Resize => self.resize.len(),
        }
    }

    /// Unobserve the host surface and drop every listener.
    ///
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(observer) = self.observer.take() {
            self.probe.unobserve(observer);
            tracing::debug!(surface = ?self.surface, observer = observer.0, "container disposed");
        }
        self.resize.clear();
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        self.dispose();
    }
}
