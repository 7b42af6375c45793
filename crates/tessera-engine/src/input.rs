//! Input snapshot consumed by the frame driver.
//!
//! The platform layer owns event polling and fills this snapshot each frame:
//! per-key current state, mouse buttons, mouse deltas, and delta-time. The
//! core reads edges by comparing against the previous frame's state and
//! advances per-key repeat accumulators; it never talks to the platform
//! directly.

use serde::{Deserialize, Serialize};

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space bar
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl KeyCode {
    /// Number of tracked keys.
    pub const COUNT: usize = KeyCode::Right as usize + 1;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left button
    Left,
    /// Middle button
    Middle,
    /// Right button
    Right,
}

impl MouseButton {
    /// Number of tracked buttons.
    pub const COUNT: usize = MouseButton::Right as usize + 1;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Per-frame input snapshot.
#[derive(Debug, Clone)]
pub struct InputState {
    current_keys: [bool; KeyCode::COUNT],
    previous_keys: [bool; KeyCode::COUNT],
    repeat_accum: [f32; KeyCode::COUNT],
    repeating: [bool; KeyCode::COUNT],
    repeat_delay: f32,
    repeat_period: f32,

    current_mouse: [bool; MouseButton::COUNT],
    previous_mouse: [bool; MouseButton::COUNT],
    mouse_delta: (i32, i32),
    mouse_logical_delta: (f32, f32),

    delta_time: f32,
}

impl InputState {
    /// Creates a snapshot with the given key-repeat timing.
    #[must_use]
    pub fn new(repeat_delay: f32, repeat_period: f32) -> Self {
        Self {
            current_keys: [false; KeyCode::COUNT],
            previous_keys: [false; KeyCode::COUNT],
            repeat_accum: [0.0; KeyCode::COUNT],
            repeating: [false; KeyCode::COUNT],
            repeat_delay,
            repeat_period,
            current_mouse: [false; MouseButton::COUNT],
            previous_mouse: [false; MouseButton::COUNT],
            mouse_delta: (0, 0),
            mouse_logical_delta: (0.0, 0.0),
            delta_time: 0.0,
        }
    }

    // === Platform-facing updates ===

    /// Records a key's current state.
    pub fn set_key(&mut self, key: KeyCode, down: bool) {
        self.current_keys[key.index()] = down;
    }

    /// Records a mouse button's current state.
    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        self.current_mouse[button.index()] = down;
    }

    /// Records this frame's mouse movement: raw pixels and the logical
    /// (scale-corrected) equivalent.
    pub fn set_mouse_delta(&mut self, raw: (i32, i32), logical: (f32, f32)) {
        self.mouse_delta = raw;
        self.mouse_logical_delta = logical;
    }

    /// Records this frame's delta-time in seconds.
    pub fn set_delta_time(&mut self, dt: f32) {
        self.delta_time = dt;
    }

    /// Rolls current state into previous state at the end of a frame and
    /// clears the per-frame deltas.
    pub fn next_frame(&mut self) {
        self.previous_keys = self.current_keys;
        self.previous_mouse = self.current_mouse;
        self.mouse_delta = (0, 0);
        self.mouse_logical_delta = (0.0, 0.0);
    }

    // === Core-facing queries ===

    /// Whether a key is currently held.
    #[must_use]
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.current_keys[key.index()]
    }

    /// Whether a key changed to down this frame.
    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        let i = key.index();
        (self.current_keys[i] ^ self.previous_keys[i]) && self.current_keys[i]
    }

    /// Whether a key changed to up this frame.
    #[must_use]
    pub fn just_released(&self, key: KeyCode) -> bool {
        let i = key.index();
        (self.current_keys[i] ^ self.previous_keys[i]) && !self.current_keys[i]
    }

    /// Key-repeat query: fires on a fresh press, again after the repeat
    /// delay, then every repeat period while held.
    ///
    /// Advances the key's accumulator by this frame's delta-time, so call it
    /// at most once per key per frame.
    pub fn repeat(&mut self, key: KeyCode) -> bool {
        let i = key.index();
        if !self.current_keys[i] {
            self.repeat_accum[i] = 0.0;
            self.repeating[i] = false;
            return false;
        }
        if !self.previous_keys[i] {
            // Fresh press: fire immediately, start the delay window.
            self.repeat_accum[i] = 0.0;
            self.repeating[i] = false;
            return true;
        }

        self.repeat_accum[i] += self.delta_time;
        let threshold = if self.repeating[i] {
            self.repeat_period
        } else {
            self.repeat_delay
        };
        if self.repeat_accum[i] >= threshold {
            self.repeat_accum[i] = 0.0;
            self.repeating[i] = true;
            return true;
        }
        false
    }

    /// Whether a mouse button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.current_mouse[button.index()]
    }

    /// Whether a mouse button changed to down this frame.
    #[must_use]
    pub fn mouse_just_pressed(&self, button: MouseButton) -> bool {
        let i = button.index();
        (self.current_mouse[i] ^ self.previous_mouse[i]) && self.current_mouse[i]
    }

    /// This frame's raw mouse delta in pixels.
    #[must_use]
    pub const fn mouse_delta(&self) -> (i32, i32) {
        self.mouse_delta
    }

    /// This frame's logical (scale-corrected) mouse delta.
    #[must_use]
    pub const fn mouse_logical_delta(&self) -> (f32, f32) {
        self.mouse_logical_delta
    }

    /// This frame's delta-time in seconds.
    #[must_use]
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_fire_once() {
        let mut input = InputState::new(0.25, 0.05);
        input.set_key(KeyCode::H, true);
        assert!(input.just_pressed(KeyCode::H));
        assert!(input.is_down(KeyCode::H));

        input.next_frame();
        assert!(!input.just_pressed(KeyCode::H));
        assert!(input.is_down(KeyCode::H));

        input.set_key(KeyCode::H, false);
        assert!(input.just_released(KeyCode::H));
        input.next_frame();
        assert!(!input.just_released(KeyCode::H));
    }

    #[test]
    fn repeat_fires_on_press_then_after_delay_then_per_period() {
        let mut input = InputState::new(0.2, 0.05);
        input.set_delta_time(0.1);

        input.set_key(KeyCode::J, true);
        assert!(input.repeat(KeyCode::J), "fresh press fires");
        input.next_frame();

        assert!(!input.repeat(KeyCode::J), "0.1s held, delay not reached");
        input.next_frame();
        assert!(input.repeat(KeyCode::J), "0.2s held, delay reached");
        input.next_frame();

        // Now repeating: each 0.1s frame exceeds the 0.05s period.
        assert!(input.repeat(KeyCode::J));
        input.next_frame();
        assert!(input.repeat(KeyCode::J));
    }

    #[test]
    fn releasing_resets_the_repeat_state() {
        let mut input = InputState::new(0.2, 0.05);
        input.set_delta_time(0.3);
        input.set_key(KeyCode::J, true);
        assert!(input.repeat(KeyCode::J));
        input.next_frame();
        assert!(input.repeat(KeyCode::J));

        input.set_key(KeyCode::J, false);
        assert!(!input.repeat(KeyCode::J));
        input.next_frame();

        // A new press starts over with the full delay.
        input.set_key(KeyCode::J, true);
        assert!(input.repeat(KeyCode::J));
    }

    #[test]
    fn mouse_state_and_deltas() {
        let mut input = InputState::new(0.25, 0.05);
        input.set_mouse_button(MouseButton::Right, true);
        input.set_mouse_delta((4, -2), (2.0, -1.0));
        assert!(input.mouse_down(MouseButton::Right));
        assert!(input.mouse_just_pressed(MouseButton::Right));
        assert_eq!(input.mouse_delta(), (4, -2));
        assert_eq!(input.mouse_logical_delta(), (2.0, -1.0));

        input.next_frame();
        assert!(!input.mouse_just_pressed(MouseButton::Right));
        assert_eq!(input.mouse_delta(), (0, 0));
    }
}
