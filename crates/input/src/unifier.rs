//! InputUnifier: keyboard and pointer gestures folded into one `Input` stream.
//!
//! Two debounce windows keep step-based movement readable:
//!
//! - key auto-repeat of one code is accepted at most once per
//!   `key_debounce_ms` (fresh presses are never debounced),
//! - swipe gestures are recognized at most once per `touch_debounce_ms`.
//!
//! Windows are measured between event timestamps, never against the clock at
//! processing time.

use std::collections::HashMap;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use tui_tiles_core::{Container, ElementBox, HostNotification};

use crate::event::{KeyDown, PointerEvent, PointerKind, RawInput};
use crate::map::ControlMap;
use crate::types::{Input, ResizeEvent, KEY_DEBOUNCE_MS, MIN_SWIPE_DISTANCE, TOUCH_DEBOUNCE_MS};

/// Axis chosen when a swipe travels equally far on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagonalTieBreak {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    pub controls: ControlMap,
    pub auto_focus: bool,
    pub key_debounce_ms: u64,
    pub touch_debounce_ms: u64,
    pub min_swipe_distance: f64,
    pub diagonal: DiagonalTieBreak,
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            controls: ControlMap::standard(),
            auto_focus: true,
            key_debounce_ms: KEY_DEBOUNCE_MS,
            touch_debounce_ms: TOUCH_DEBOUNCE_MS,
            min_swipe_distance: MIN_SWIPE_DISTANCE,
            diagonal: DiagonalTieBreak::Vertical,
        }
    }
}

impl InputParams {
    pub fn with_controls(mut self, controls: ControlMap) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    pub fn with_min_swipe_distance(mut self, distance: f64) -> Self {
        self.min_swipe_distance = distance;
        self
    }

    pub fn with_debounce_ms(mut self, key_ms: u64, touch_ms: u64) -> Self {
        self.key_debounce_ms = key_ms;
        self.touch_debounce_ms = touch_ms;
        self
    }

    pub fn with_diagonal(mut self, diagonal: DiagonalTieBreak) -> Self {
        self.diagonal = diagonal;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchPhase {
    #[default]
    Idle,
    /// Pointer is down; no gesture recognized during this touch yet.
    Touching,
    /// At least one swipe was recognized during this touch.
    Sliding,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    pub phase: TouchPhase,
    /// Reference position swipe deltas are measured from.
    pub origin: (f64, f64),
    pub last_gesture_ms: Option<u64>,
}

impl GestureState {
    pub fn is_touching(&self) -> bool {
        self.phase != TouchPhase::Idle
    }

    pub fn is_sliding(&self) -> bool {
        self.phase == TouchPhase::Sliding
    }
}

/// Most inputs one [`InputUnifier::handle_batch`] call returns.
pub const BATCH_CAPACITY: usize = 32;

pub struct InputUnifier {
    params: InputParams,
    container: Container,
    capture: ElementBox,
    focused: bool,
    last_keys: HashMap<String, u64>,
    gesture: GestureState,
}

fn capture_region(event: &ResizeEvent) -> ElementBox {
    ElementBox::new(event.width, event.height, event.left, event.top)
}

impl InputUnifier {
    /// Layer a touch-capture region over `container` (its full box).
    pub fn new(params: InputParams, container: Container) -> Self {
        let capture = capture_region(&container.make_resize_event());
        let focused = params.auto_focus;
        Self {
            params,
            container,
            capture,
            focused,
            last_keys: HashMap::new(),
            gesture: GestureState::default(),
        }
    }

    pub fn params(&self) -> &InputParams {
        &self.params
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn capture_region(&self) -> ElementBox {
        self.capture
    }

    pub fn handle(&mut self, raw: RawInput) -> Option<Input> {
        match raw {
            RawInput::Key(key) => self.handle_key(&key),
            RawInput::Pointer(pointer) => self.handle_pointer(pointer),
            RawInput::Focus(focused) => {
                self.handle_focus(focused);
                None
            }
            RawInput::Layout(notification) => {
                self.handle_layout(notification);
                None
            }
        }
    }

    /// Handle raw events until `raws` runs out or [`BATCH_CAPACITY`] inputs
    /// are recognized.
    ///
    /// No event is pulled once the batch is full, so passing `&mut iter`
    /// leaves the rest for the next call.
    pub fn handle_batch<I>(&mut self, raws: I) -> ArrayVec<Input, BATCH_CAPACITY>
    where
        I: IntoIterator<Item = RawInput>,
    {
        let mut inputs = ArrayVec::new();
        let mut raws = raws.into_iter();
        while !inputs.is_full() {
            let Some(raw) = raws.next() else { break };
            if let Some(input) = self.handle(raw) {
                inputs.push(input);
            }
        }
        inputs
    }

    pub fn handle_key(&mut self, key: &KeyDown) -> Option<Input> {
        if !self.focused || self.container.is_disposed() {
            return None;
        }
        let input = self.params.controls.lookup(&key.code)?;
        let now = key.timestamp_ms;

        if key.repeat {
            if let Some(&last) = self.last_keys.get(&key.code) {
                if now.saturating_sub(last) < self.params.key_debounce_ms {
                    return None;
                }
            }
        }

        match self.last_keys.get_mut(&key.code) {
            Some(last) => *last = now,
            None => {
                self.last_keys.insert(key.code.clone(), now);
            }
        }
        tracing::trace!(input = input.as_str(), code = %key.code, "key input");
        Some(input)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<Input> {
        if self.container.is_disposed() {
            return None;
        }
        match event.kind {
            PointerKind::Down => {
                if !self.capture.contains(event.x, event.y) {
                    return None;
                }
                self.focused = true;
                self.gesture.phase = TouchPhase::Touching;
                self.gesture.origin = (event.x, event.y);
                None
            }
            PointerKind::Move => self.pointer_move(event),
            PointerKind::Up => {
                let was = self.gesture.phase;
                self.release();
                if was == TouchPhase::Touching && self.capture.contains(event.x, event.y) {
                    tracing::trace!(input = Input::Action.as_str(), "tap");
                    Some(Input::Action)
                } else {
                    None
                }
            }
            PointerKind::Leave => {
                self.release();
                None
            }
        }
    }

    fn pointer_move(&mut self, event: PointerEvent) -> Option<Input> {
        if !self.gesture.is_touching() {
            return None;
        }
        if !self.capture.contains(event.x, event.y) {
            self.release();
            return None;
        }

        let (ox, oy) = self.gesture.origin;
        let dx = event.x - ox;
        let dy = event.y - oy;
        let min = self.params.min_swipe_distance;
        if dx.abs() < min && dy.abs() < min {
            return None;
        }

        let now = event.timestamp_ms;
        if let Some(last) = self.gesture.last_gesture_ms {
            if now.saturating_sub(last) < self.params.touch_debounce_ms {
                return None;
            }
        }

        self.gesture.last_gesture_ms = Some(now);
        self.gesture.origin = (event.x, event.y);
        self.gesture.phase = TouchPhase::Sliding;

        let input = classify_swipe(dx, dy, self.params.diagonal);
        tracing::trace!(input = input.as_str(), dx, dy, "swipe");
        Some(input)
    }

    fn release(&mut self) {
        self.gesture.phase = TouchPhase::Idle;
    }

    pub fn handle_focus(&mut self, focused: bool) {
        self.focused = focused && !self.container.is_disposed();
        if !focused {
            self.release();
        }
    }

    /// Forward a layout notification; the capture region follows the container.
    pub fn handle_layout(&mut self, notification: HostNotification) -> bool {
        match self.container.notify(notification) {
            Some(event) => {
                self.capture = capture_region(&event);
                true
            }
            None => false,
        }
    }

    /// Forget held keys and any touch in progress.
    pub fn reset(&mut self) {
        self.last_keys.clear();
        self.gesture = GestureState::default();
    }

    /// Release the container subscription and all gesture state. A disposed
    /// unifier recognizes nothing.
    pub fn dispose(&mut self) {
        self.reset();
        self.focused = false;
        self.container.dispose();
    }
}

/// Direction of a swipe from its travel.
///
/// The dominant axis wins. Equal travel goes to `tie`.
pub fn classify_swipe(dx: f64, dy: f64, tie: DiagonalTieBreak) -> Input {
    let (ax, ay) = (dx.abs(), dy.abs());
    let vertical = if ay == ax {
        tie == DiagonalTieBreak::Vertical
    } else {
        ay > ax
    };
    if vertical {
        if dy < 0.0 {
            Input::Up
        } else {
            Input::Down
        }
    } else if dx < 0.0 {
        Input::Left
    } else {
        Input::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tui_tiles_core::{ElementId, Host, HostSurface, SurfaceProbe};

    fn unifier(params: InputParams) -> (Rc<Host>, InputUnifier) {
        let host = Rc::new(Host::new(400.0, 400.0));
        let probe: Rc<dyn SurfaceProbe> = host.clone();
        let container = Container::new(HostSurface::Viewport, probe);
        (host, InputUnifier::new(params, container))
    }

    #[test]
    fn test_key_repeat_is_debounced_per_code() {
        let (_host, mut u) = unifier(InputParams::default());
        assert_eq!(u.handle_key(&KeyDown::press("ArrowLeft", 0)), Some(Input::Left));
        assert_eq!(u.handle_key(&KeyDown::repeat("ArrowLeft", 150)), None);
        assert_eq!(u.handle_key(&KeyDown::repeat("ArrowLeft", 250)), Some(Input::Left));
        // Another code has its own window.
        assert_eq!(u.handle_key(&KeyDown::repeat("KeyA", 260)), Some(Input::Left));
    }

    #[test]
    fn test_fresh_presses_are_never_debounced() {
        let (_host, mut u) = unifier(InputParams::default());
        assert_eq!(u.handle_key(&KeyDown::press("KeyW", 0)), Some(Input::Up));
        assert_eq!(u.handle_key(&KeyDown::press("KeyW", 10)), Some(Input::Up));
    }

    #[test]
    fn test_suppressed_repeat_does_not_extend_window() {
        let (_host, mut u) = unifier(InputParams::default());
        assert!(u.handle_key(&KeyDown::press("Space", 0)).is_some());
        assert!(u.handle_key(&KeyDown::repeat("Space", 100)).is_none());
        assert!(u.handle_key(&KeyDown::repeat("Space", 200)).is_some());
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let (_host, mut u) = unifier(InputParams::default());
        assert_eq!(u.handle_key(&KeyDown::press("KeyZ", 0)), None);
    }

    #[test]
    fn test_without_auto_focus_keys_wait_for_focus() {
        let (_host, mut u) = unifier(InputParams::default().with_auto_focus(false));
        assert!(!u.is_focused());
        assert_eq!(u.handle_key(&KeyDown::press("ArrowUp", 0)), None);

        u.handle_pointer(PointerEvent::down(10.0, 10.0, 5));
        assert!(u.is_focused());
        assert_eq!(u.handle_key(&KeyDown::press("ArrowUp", 6)), Some(Input::Up));

        u.handle_focus(false);
        assert_eq!(u.handle_key(&KeyDown::press("ArrowUp", 7)), None);
    }

    #[test]
    fn test_swipe_sequence() {
        let (_host, mut u) = unifier(InputParams::default());
        assert_eq!(u.handle_pointer(PointerEvent::down(100.0, 100.0, 0)), None);
        assert_eq!(u.handle_pointer(PointerEvent::moved(100.0, 140.0, 10)), Some(Input::Down));
        assert_eq!(u.handle_pointer(PointerEvent::moved(100.0, 180.0, 100)), None);
        assert_eq!(u.handle_pointer(PointerEvent::moved(100.0, 220.0, 260)), Some(Input::Down));
        assert_eq!(u.handle_pointer(PointerEvent::up(100.0, 220.0, 300)), None);
        assert_eq!(u.gesture().phase, TouchPhase::Idle);
    }

    #[test]
    fn test_sub_threshold_move_then_up_is_a_tap() {
        let (_host, mut u) = unifier(InputParams::default());
        u.handle_pointer(PointerEvent::down(50.0, 50.0, 0));
        assert_eq!(u.handle_pointer(PointerEvent::moved(70.0, 29.0, 5)), None);
        assert_eq!(u.handle_pointer(PointerEvent::up(70.0, 29.0, 6)), Some(Input::Action));
        assert_eq!(u.handle_pointer(PointerEvent::up(70.0, 29.0, 7)), None);
    }

    #[test]
    fn test_leave_cancels_the_tap() {
        let (_host, mut u) = unifier(InputParams::default());
        u.handle_pointer(PointerEvent::down(50.0, 50.0, 0));
        u.handle_pointer(PointerEvent::leave(1));
        assert_eq!(u.handle_pointer(PointerEvent::up(50.0, 50.0, 2)), None);
    }

    #[test]
    fn test_moving_outside_capture_region_is_a_leave() {
        let (_host, mut u) = unifier(InputParams::default());
        u.handle_pointer(PointerEvent::down(390.0, 50.0, 0));
        assert_eq!(u.handle_pointer(PointerEvent::moved(450.0, 50.0, 1)), None);
        assert!(!u.gesture().is_touching());
    }

    #[test]
    fn test_capture_region_follows_container() {
        let host = Rc::new(Host::new(400.0, 400.0));
        let id = ElementId(3);
        host.set_element(id, ElementBox::new(100.0, 50.0, 10.0, 10.0));
        let probe: Rc<dyn SurfaceProbe> = host.clone();
        let mut u = InputUnifier::new(
            InputParams::default(),
            Container::new(HostSurface::Element(id), probe),
        );
        assert_eq!(u.handle_pointer(PointerEvent::down(200.0, 20.0, 0)), None);
        assert!(!u.gesture().is_touching());

        host.set_element(id, ElementBox::new(300.0, 50.0, 10.0, 10.0));
        assert!(u.handle_layout(HostNotification::ElementResized(id)));
        u.handle_pointer(PointerEvent::down(200.0, 20.0, 1));
        assert!(u.gesture().is_touching());
    }

    #[test]
    fn test_diagonal_tie_break() {
        assert_eq!(classify_swipe(40.0, 40.0, DiagonalTieBreak::Vertical), Input::Down);
        assert_eq!(classify_swipe(-40.0, -40.0, DiagonalTieBreak::Vertical), Input::Up);
        assert_eq!(classify_swipe(40.0, -40.0, DiagonalTieBreak::Horizontal), Input::Right);
        assert_eq!(classify_swipe(-31.0, 5.0, DiagonalTieBreak::Vertical), Input::Left);
    }

    #[test]
    fn test_independent_debounce_windows() {
        let params = InputParams::default().with_debounce_ms(50, 500);
        let (_host, mut u) = unifier(params);
        assert!(u.handle_key(&KeyDown::press("ArrowDown", 0)).is_some());
        assert!(u.handle_key(&KeyDown::repeat("ArrowDown", 60)).is_some());

        u.handle_pointer(PointerEvent::down(0.0, 0.0, 0));
        assert!(u.handle_pointer(PointerEvent::moved(40.0, 0.0, 0)).is_some());
        assert!(u.handle_pointer(PointerEvent::moved(80.0, 0.0, 300)).is_none());
        assert!(u.handle_pointer(PointerEvent::moved(120.0, 0.0, 500)).is_some());
    }

    #[test]
    fn test_handle_batch_collects_in_order() {
        let (_host, mut u) = unifier(InputParams::default());
        let inputs = u.handle_batch([
            RawInput::Key(KeyDown::press("ArrowRight", 0)),
            RawInput::Key(KeyDown::press("KeyQ", 1)),
            RawInput::Pointer(PointerEvent::down(10.0, 10.0, 2)),
            RawInput::Pointer(PointerEvent::up(10.0, 10.0, 3)),
        ]);
        assert_eq!(inputs.as_slice(), &[Input::Right, Input::Action]);
    }

    #[test]
    fn test_dispose_releases_container() {
        let (host, mut u) = unifier(InputParams::default());
        assert_eq!(host.observer_count(HostSurface::Viewport), 1);
        u.dispose();
        assert_eq!(host.observer_count(HostSurface::Viewport), 0);
        assert_eq!(u.handle_key(&KeyDown::press("ArrowUp", 0)), None);

        assert_eq!(u.handle_pointer(PointerEvent::down(10.0, 10.0, 1)), None);
        assert_eq!(u.handle_pointer(PointerEvent::up(10.0, 10.0, 2)), None);
        u.handle_focus(true);
        assert!(!u.is_focused());
        assert_eq!(u.handle_key(&KeyDown::press("ArrowUp", 3)), None);
        assert!(!u.gesture().is_touching());
    }

    #[test]
    fn test_full_batch_leaves_remaining_events_for_next_call() {
        let (_host, mut u) = unifier(InputParams::default());
        let presses: Vec<RawInput> = (0..40u64)
            .map(|t| {
                let code = if t % 2 == 0 { "ArrowLeft" } else { "ArrowRight" };
                RawInput::Key(KeyDown::press(code, t))
            })
            .collect();
        let mut pending = presses.into_iter();

        let first = u.handle_batch(&mut pending);
        assert_eq!(first.len(), BATCH_CAPACITY);
        let second = u.handle_batch(&mut pending);
        assert_eq!(second.len(), 40 - BATCH_CAPACITY);
        assert!(u.handle_batch(&mut pending).is_empty());

        let all: Vec<Input> = first.into_iter().chain(second).collect();
        assert_eq!(all.len(), 40);
        assert!(all.iter().step_by(2).all(|&i| i == Input::Left));
        assert!(all.iter().skip(1).step_by(2).all(|&i| i == Input::Right));
    }
}
