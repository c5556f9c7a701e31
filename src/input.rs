//! Raw key polling and the blend-factor control driven by the Up/Down keys.
use fxhash::FxHashSet;
use glutin::event::{ElementState, KeyboardInput, VirtualKeyCode};

/// Amount added or removed per press.
pub const BLEND_STEP: f32 = 0.1;

/// Set of keys currently held down, updated from window events.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    held: FxHashSet<VirtualKeyCode>,
}

impl KeyboardState {
    pub fn new() -> KeyboardState {
        KeyboardState::default()
    }

    pub fn set(&mut self, key: VirtualKeyCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn handle_input(&mut self, input: &KeyboardInput) {
        if let Some(key) = input.virtual_keycode {
            self.set(key, input.state == ElementState::Pressed);
        }
    }

    pub fn is_pressed(&self, key: VirtualKeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Forgets every held key. Key releases are not delivered to unfocused windows.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

//--------------------------------------------------------------------------------------------------

/// Which key last triggered a step. A key only steps again after both keys were released
/// (or after the other key triggered).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EdgeState {
    Up,
    Down,
    Neutral,
}

/// A value in `[0, 1]` stepped by [BLEND_STEP] on each Up/Down press.
#[derive(Copy, Clone, Debug)]
pub struct BlendControl {
    value: f32,
    state: EdgeState,
}

impl BlendControl {
    pub fn new(initial: f32) -> BlendControl {
        BlendControl {
            value: initial.max(0.0).min(1.0),
            state: EdgeState::Neutral,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn state(&self) -> EdgeState {
        self.state
    }

    /// Advances the control by one frame given which keys are held.
    ///
    /// Returns the value if a step was taken this frame (even when clamping left it unchanged),
    /// so that the caller knows to upload it.
    pub fn update(&mut self, up: bool, down: bool) -> Option<f32> {
        let mut stepped = false;
        if up && self.state != EdgeState::Up {
            self.value = (self.value + BLEND_STEP).min(1.0);
            self.state = EdgeState::Up;
            stepped = true;
        }
        if down && self.state != EdgeState::Down {
            self.value = (self.value - BLEND_STEP).max(0.0);
            self.state = EdgeState::Down;
            stepped = true;
        }
        if !up && !down {
            self.state = EdgeState::Neutral;
        }

        if stepped {
            Some(self.value)
        } else {
            None
        }
    }

    pub fn poll(&mut self, keys: &KeyboardState) -> Option<f32> {
        self.update(
            keys.is_pressed(VirtualKeyCode::Up),
            keys.is_pressed(VirtualKeyCode::Down),
        )
    }
}
