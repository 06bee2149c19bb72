/// Device-independent input vocabulary.
///
/// The front-end translates raw key events into [`InputEvent`]s (discrete
/// presses) and a [`Steering`] value (directional keys held this frame).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Fire,
    PauseToggle,
    MenuUp,
    MenuDown,
    MenuConfirm,
    /// Any other key.  Still counts as "a keypress" for lockout skipping.
    Other,
    /// Leave the program from any state.
    Quit,
}

/// Directional keys currently held.  Polled every tick, not event driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
}

impl Steering {
    pub const NONE: Steering = Steering { left: false, right: false };
    pub const LEFT: Steering = Steering { left: true, right: false };
    pub const RIGHT: Steering = Steering { left: false, right: true };

    /// Net horizontal direction: -1, 0 or +1.  Both held cancel out.
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// What the caller should do after feeding an input to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}
