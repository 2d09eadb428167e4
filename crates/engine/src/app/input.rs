/// Keys the loop polls as level-sensed signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    S,
    A,
    D,
    Space,
    Escape,
}

const KEY_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

const MOUSE_BUTTON_COUNT: usize = 2;

/// Raw wheel units reported per notch.
pub const WHEEL_UNITS_PER_NOTCH: i32 = 120;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KeyStates {
    down: [bool; KEY_COUNT],
}

impl KeyStates {
    pub(crate) fn set(&mut self, key: Key, is_down: bool) {
        self.down[key.index()] = is_down;
    }

    pub(crate) fn is_down(&self, key: Key) -> bool {
        self.down[key.index()]
    }

    pub(crate) fn release_all(&mut self) {
        self.down = [false; KEY_COUNT];
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MouseButtonStates {
    down: [bool; MOUSE_BUTTON_COUNT],
}

impl MouseButtonStates {
    pub(crate) fn set(&mut self, button: MouseButton, is_down: bool) {
        self.down[button.index()] = is_down;
    }

    pub(crate) fn is_down(&self, button: MouseButton) -> bool {
        self.down[button.index()]
    }

    pub(crate) fn release_all(&mut self) {
        self.down = [false; MOUSE_BUTTON_COUNT];
    }
}

impl Key {
    const fn index(self) -> usize {
        match self {
            Key::W => 0,
            Key::S => 1,
            Key::A => 2,
            Key::D => 3,
            Key::Space => 4,
            Key::Escape => 5,
        }
    }
}

impl MouseButton {
    const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
        }
    }
}

/// Movement keys held at the instant the snapshot was taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// One-shot events that fired on this frame only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressEvents {
    pub jump: bool,
    pub left_click: bool,
    pub right_click: bool,
}

/// Everything the simulation sees of the input devices for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInputSnapshot {
    movement: MovementKeys,
    presses: PressEvents,
    mouse_delta: (i32, i32),
    wheel_delta: i32,
}

impl FrameInputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(
        movement: MovementKeys,
        presses: PressEvents,
        mouse_delta: (i32, i32),
        wheel_delta: i32,
    ) -> Self {
        Self {
            movement,
            presses,
            mouse_delta,
            wheel_delta,
        }
    }

    pub fn movement(&self) -> MovementKeys {
        self.movement
    }

    pub fn jump_pressed(&self) -> bool {
        self.presses.jump
    }

    pub fn left_click_pressed(&self) -> bool {
        self.presses.left_click
    }

    pub fn right_click_pressed(&self) -> bool {
        self.presses.right_click
    }

    /// Relative mouse motion since the previous frame, in device units.
    pub fn mouse_delta(&self) -> (i32, i32) {
        self.mouse_delta
    }

    /// Raw wheel movement since the previous frame, positive away from the
    /// user.
    pub fn wheel_delta(&self) -> i32 {
        self.wheel_delta
    }

    /// Whole wheel notches, positive when the wheel rolls toward the user.
    pub fn scroll_steps(&self) -> i32 {
        self.wheel_delta / -WHEEL_UNITS_PER_NOTCH
    }
}
