//! Player chrome state: menus, controls auto-hide, pause overlay and shortcuts.

pub mod controls_visibility;
pub mod keyboard;
pub mod menus;

pub use controls_visibility::{ControlsVisibility, VisibilityContext};
pub use keyboard::{Key, KeyAction, action_for};
pub use menus::{MenuState, OverlayMenu};
