//! Host container layer - resize-aware view of a host surface
//!
//! The runtime can be mounted on the whole terminal window or on a bounded
//! region inside it. This crate hides the difference behind [`Container`]:
//!
//! - [`host`]: surface kinds, element boxes, and the [`SurfaceProbe`] trait the
//!   host runtime implements (plus [`Host`], an in-process implementation)
//! - [`container`]: the [`Container`] itself and its typed listener lists
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use tui_tiles_core::{Container, Host, HostNotification, HostSurface, SurfaceProbe};
//!
//! let host = Rc::new(Host::new(80.0, 48.0));
//! let probe: Rc<dyn SurfaceProbe> = host.clone();
//! let mut container = Container::new(HostSurface::Viewport, probe);
//!
//! host.set_viewport(100.0, 48.0);
//! let event = container.notify(HostNotification::ViewportResized).unwrap();
//! assert_eq!(event.width, 100.0);
//! ```

pub mod container;
pub mod host;

pub use tui_tiles_types as types;

pub use container::{Container, EventKind, ListenerId, Listeners, ResizeCallback};
pub use host::{
    ElementBox, ElementId, Host, HostNotification, HostSurface, ObserverId, SurfaceProbe,
};
