mod agent;
mod clock;
mod collision;
mod input;

pub use agent::{
    ACCELERATION, Agent, FOOTPRINT, LINEAR_DRAG, MOVE_SPEED, MotionModel, REST_THRESHOLD,
    SPRINT_SPEED, SpawnError, TURN_RATE,
};
pub use clock::{FrameClock, FrameStats, MAX_DT};
pub use collision::{MoveResult, SNAP_EPSILON, slide_move};
pub use input::{Action, Controls, FOV_STEP_DEG, Held, InputCmd};
