//! Input unification module (engine-facing).
//!
//! This module is independent of any game logic. It maps terminal key and
//! mouse events into host input events ([`KeyDown`], [`PointerEvent`]) and
//! folds them into one discrete [`crate::types::Input`] stream with an
//! [`InputUnifier`]: key auto-repeat is debounced, pointer drags become
//! swipes, and a clean tap becomes the action input.

pub mod event;
pub mod map;
pub mod unifier;

pub use tui_tiles_types as types;

pub use event::{KeyDown, PointerEvent, PointerKind, RawInput};
pub use map::{key_code_name, pointer_from_mouse, should_quit, ControlMap, KeyBinding, KeyTranslator};
pub use unifier::{
    classify_swipe, DiagonalTieBreak, BATCH_CAPACITY, GestureState, InputParams, InputUnifier, TouchPhase,
};
