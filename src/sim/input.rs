//! Device-agnostic control state.
//!
//! The window layer translates its key / pointer / wheel events into
//! [`Action`]s and deltas; once per frame [`Controls::take_cmd`] folds them
//! into the scalar signals the simulation consumes.

use bitflags::bitflags;

/// Turn per pixel of horizontal pointer motion, in keyboard-turn units.
pub const POINTER_SENSITIVITY: f64 = 0.1;

/// Field-of-view change per wheel notch.
pub const FOV_STEP_DEG: f64 = 5.0;

bitflags! {
    /// Movement keys currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Held: u8 {
        const FORWARD      = 0x01;
        const BACK         = 0x02;
        const STRAFE_LEFT  = 0x04;
        const STRAFE_RIGHT = 0x08;
        const TURN_LEFT    = 0x10;
        const TURN_RIGHT   = 0x20;
        const SPRINT       = 0x40;
    }
}

/// A held control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Sprint,
}

impl Action {
    fn flag(self) -> Held {
        match self {
            Action::Forward => Held::FORWARD,
            Action::Back => Held::BACK,
            Action::StrafeLeft => Held::STRAFE_LEFT,
            Action::StrafeRight => Held::STRAFE_RIGHT,
            Action::TurnLeft => Held::TURN_LEFT,
            Action::TurnRight => Held::TURN_RIGHT,
            Action::Sprint => Held::SPRINT,
        }
    }
}

/// One frame's worth of control signals.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f64, // –1 … +1
    pub strafe: f64,  // –1 … +1  (left / right)
    pub turn: f64,    // + = left (counter-clockwise)
    pub sprint: bool,
    /// Requested field-of-view change in radians.
    pub fov_delta: f64,
    pub quit: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Controls {
    held: Held,
    pointer_dx: f64,
    wheel: f64,
    quit: bool,
}

impl Controls {
    pub fn press(&mut self, action: Action) {
        self.held.insert(action.flag());
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(action.flag());
    }

    /// Mirror a level-triggered key poll.
    pub fn set(&mut self, action: Action, down: bool) {
        self.held.set(action.flag(), down);
    }

    #[inline]
    pub fn held(&self) -> Held {
        self.held
    }

    /// Horizontal pointer motion in pixels; applies to the next command
    /// only.
    pub fn pointer_delta(&mut self, dx: f64) {
        if dx.is_finite() {
            self.pointer_dx += dx;
        }
    }

    /// Wheel notches, positive away from the user (narrows the view).
    pub fn scroll(&mut self, notches: f64) {
        if notches.is_finite() {
            self.wheel += notches;
        }
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Fold the current state into a command and reset the one-shot
    /// inputs (pointer, wheel). Quit is sticky.
    pub fn take_cmd(&mut self) -> InputCmd {
        let axis = |pos: Held, neg: Held| {
            self.held.contains(pos) as i8 as f64 - self.held.contains(neg) as i8 as f64
        };

        let cmd = InputCmd {
            forward: axis(Held::FORWARD, Held::BACK),
            strafe: axis(Held::STRAFE_RIGHT, Held::STRAFE_LEFT),
            turn: axis(Held::TURN_LEFT, Held::TURN_RIGHT) - self.pointer_dx * POINTER_SENSITIVITY,
            sprint: self.held.contains(Held::SPRINT),
            fov_delta: -self.wheel * FOV_STEP_DEG.to_radians(),
            quit: self.quit,
        };
        self.pointer_dx = 0.0;
        self.wheel = 0.0;
        cmd
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
