use glam::{DVec2, dvec2};
use rand::Rng;
use thiserror::Error;

use super::collision::slide_move;
use super::input::InputCmd;
use crate::world::{Grid, Pose};

pub const ACCELERATION: f64 = 20.0; // cells / s²
pub const LINEAR_DRAG: f64 = 5.0; // 1 / s
pub const MOVE_SPEED: f64 = 5.0; // cells / s
pub const SPRINT_SPEED: f64 = 10.0; // cells / s
pub const TURN_RATE: f64 = std::f64::consts::PI; // rad / second (180°/s)
pub const FOOTPRINT: f64 = 1.0; // cells
/// Velocity components below this are snapped to zero.
pub const REST_THRESHOLD: f64 = 1e-3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("map has no empty cell to spawn in")]
    NoEmptyCell,
}

/// How input turns into velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionModel {
    /// Input sets the velocity outright.
    Direct,
    /// Input accelerates; linear drag slows the agent back down.
    #[default]
    Accelerated,
}

/// The viewer: a point with heading and velocity moving through the grid.
#[derive(Clone, Debug)]
pub struct Agent {
    pose: Pose,
    vel: DVec2,
    speed: f64,
    model: MotionModel,
}

impl Agent {
    /// Place a new agent at the centre of a uniformly random empty cell,
    /// heading 0, at rest.
    pub fn spawn<R: Rng + ?Sized>(
        grid: &Grid,
        model: MotionModel,
        rng: &mut R,
    ) -> Result<Self, SpawnError> {
        if grid.count_empty() == 0 {
            return Err(SpawnError::NoEmptyCell);
        }

        // rejection sampling; terminates because one empty cell exists
        let (x, y) = loop {
            let x = rng.gen_range(0..grid.width());
            let y = rng.gen_range(0..grid.height());
            if grid.classify(x, y).is_empty() {
                break (x, y);
            }
        };
        log::debug!("agent spawned in cell ({x}, {y})");

        let centre = dvec2(x as f64 + 0.5, y as f64 + 0.5);
        Ok(Self::at(Pose::new(centre, 0.0), model))
    }

    /// Agent at a fixed pose, at rest.
    pub fn at(pose: Pose, model: MotionModel) -> Self {
        Self {
            pose,
            vel: DVec2::ZERO,
            speed: 0.0,
            model,
        }
    }

    /* ── accessors ─────────────────────────────────────────────────── */
    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.pose.pos
    }

    #[inline]
    pub fn heading(&self) -> f64 {
        self.pose.heading
    }

    /// Current speed magnitude, cells per second.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.vel
    }

    #[inline]
    pub fn model(&self) -> MotionModel {
        self.model
    }

    #[inline]
    pub fn footprint(&self) -> f64 {
        FOOTPRINT
    }

    /// Speed cap for this command.
    #[inline]
    pub fn max_speed(sprint: bool) -> f64 {
        if sprint { SPRINT_SPEED } else { MOVE_SPEED }
    }

    /* ── motion ────────────────────────────────────────────────────── */

    /// Turn by `angular` (+ = counter-clockwise) for `dt` seconds.
    pub fn rotate(&mut self, angular: f64, dt: f64) {
        let delta = angular * TURN_RATE * dt;
        if delta.is_finite() && delta != 0.0 {
            self.pose.heading = (self.pose.heading + delta).rem_euclid(std::f64::consts::TAU);
        }
    }

    /// Advance one frame of `dt` seconds, resolving collisions against
    /// `grid`. The agent always ends the frame in an empty cell.
    pub fn integrate(&mut self, grid: &Grid, cmd: &InputCmd, dt: f64) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        /* 1. wish direction in world space */
        let local = dvec2(cmd.forward, cmd.strafe);
        let local = if local.is_finite() {
            local.normalize_or_zero()
        } else {
            DVec2::ZERO
        };
        let wish = self.pose.forward() * local.x + self.pose.right() * local.y;
        let cap = Self::max_speed(cmd.sprint);

        /* 2. velocity */
        match self.model {
            MotionModel::Direct => self.vel = wish * cap,
            MotionModel::Accelerated => {
                self.vel += wish * ACCELERATION * dt;
                let speed = self.vel.length();
                if speed > cap {
                    self.vel *= cap / speed;
                }
            }
        }

        /* 3. move */
        let from = self.pose.pos;
        let res = slide_move(grid, from, from + self.vel * dt, FOOTPRINT);
        self.pose.pos = res.pos;
        if res.blocked_x {
            self.vel.x = 0.0;
        }
        if res.blocked_y {
            self.vel.y = 0.0;
        }

        /* 4. drag */
        if self.model == MotionModel::Accelerated {
            self.vel *= (1.0 - LINEAR_DRAG * dt).max(0.0);
            if self.vel.x.abs() < REST_THRESHOLD {
                self.vel.x = 0.0;
            }
            if self.vel.y.abs() < REST_THRESHOLD {
                self.vel.y = 0.0;
            }
        }

        self.speed = self.vel.length();
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn forward() -> InputCmd {
        InputCmd {
            forward: 1.0,
            ..InputCmd::default()
        }
    }

    fn room_agent(model: MotionModel) -> (Grid, Agent) {
        let grid = Grid::bordered(5, 5).unwrap();
        let agent = Agent::at(Pose::new(dvec2(2.5, 2.5), 0.0), model);
        (grid, agent)
    }

    #[test]
    fn spawn_lands_on_empty_cell_centre() {
        let grid = Grid::demo();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let a = Agent::spawn(&grid, MotionModel::default(), &mut rng).unwrap();
            let p = a.position();
            assert_eq!(grid.at(p.x, p.y).map(|t| t.is_empty()), Some(true));
            assert_eq!(p.fract(), dvec2(0.5, 0.5));
            assert_eq!(a.heading(), 0.0);
            assert_eq!(a.velocity(), DVec2::ZERO);
        }
    }

    #[test]
    fn spawn_finds_the_only_empty_cell() {
        let g = Grid::from_rows(&["111", "101", "111"]).unwrap();
        let a = Agent::spawn(&g, MotionModel::Direct, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.position(), dvec2(1.5, 1.5));
    }

    #[test]
    fn all_solid_map_refuses_to_spawn() {
        let g = Grid::from_rows(&["11", "11"]).unwrap();
        let err = Agent::spawn(&g, MotionModel::default(), &mut StdRng::seed_from_u64(0));
        assert_eq!(err.unwrap_err(), SpawnError::NoEmptyCell);
    }

    #[test]
    fn zero_input_keeps_agent_still() {
        for model in [MotionModel::Direct, MotionModel::Accelerated] {
            let (g, mut a) = room_agent(model);
            a.integrate(&g, &InputCmd::default(), 1.0 / 60.0);
            assert_eq!(a.position(), dvec2(2.5, 2.5));
            assert_eq!(a.velocity(), DVec2::ZERO);
            assert_eq!(a.speed(), 0.0);
        }
    }

    #[test]
    fn direct_model_moves_at_fixed_speed() {
        let (g, mut a) = room_agent(MotionModel::Direct);
        a.integrate(&g, &forward(), 0.1);
        assert!((a.position() - dvec2(3.0, 2.5)).length() < 1e-9);
        assert!((a.speed() - MOVE_SPEED).abs() < 1e-12);

        // diagonal input is normalised, not √2 faster
        let (g, mut a) = room_agent(MotionModel::Direct);
        let cmd = InputCmd {
            forward: 1.0,
            strafe: 1.0,
            ..InputCmd::default()
        };
        a.integrate(&g, &cmd, 0.01);
        assert!((a.speed() - MOVE_SPEED).abs() < 1e-9);
    }

    #[test]
    fn strafe_right_moves_down_screen_at_heading_zero() {
        let (g, mut a) = room_agent(MotionModel::Direct);
        let cmd = InputCmd {
            strafe: 1.0,
            ..InputCmd::default()
        };
        a.integrate(&g, &cmd, 0.1);
        assert!((a.position() - dvec2(2.5, 3.0)).length() < 1e-9);
    }

    #[test]
    fn accelerated_speed_never_exceeds_cap() {
        let mut rng = StdRng::seed_from_u64(42);
        let g = Grid::demo();
        let mut a = Agent::spawn(&g, MotionModel::Accelerated, &mut rng).unwrap();
        for i in 0..2000 {
            let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            let cmd = InputCmd {
                forward: angle.cos(),
                strafe: angle.sin(),
                sprint: i % 3 == 0,
                ..InputCmd::default()
            };
            let dt = rng.gen_range(0.001..0.5);
            a.integrate(&g, &cmd, dt);
            assert!(a.speed() <= SPRINT_SPEED + 1e-9);
            if !cmd.sprint {
                assert!(a.speed() <= MOVE_SPEED + 1e-9);
            }
            a.rotate(rng.gen_range(-1.0..1.0), dt);
        }
    }

    #[test]
    fn drag_brings_agent_to_rest() {
        let (g, mut a) = room_agent(MotionModel::Accelerated);
        a.integrate(&g, &forward(), 0.05);
        assert!(a.speed() > 0.0);
        for _ in 0..200 {
            a.integrate(&g, &InputCmd::default(), 0.05);
        }
        assert_eq!(a.velocity(), DVec2::ZERO);
    }

    #[test]
    fn huge_dt_stops_instead_of_reversing() {
        let (g, mut a) = room_agent(MotionModel::Accelerated);
        a.integrate(&g, &forward(), 0.05);
        a.integrate(&g, &InputCmd::default(), 10.0);
        assert_eq!(a.velocity(), DVec2::ZERO);
    }

    #[test]
    fn agent_always_ends_in_empty_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = Grid::demo();
        for model in [MotionModel::Direct, MotionModel::Accelerated] {
            let mut a = Agent::spawn(&g, model, &mut rng).unwrap();
            for _ in 0..3000 {
                let cmd = InputCmd {
                    forward: rng.gen_range(-1.0..=1.0),
                    strafe: rng.gen_range(-1.0..=1.0),
                    sprint: rng.gen_bool(0.5),
                    ..InputCmd::default()
                };
                a.rotate(rng.gen_range(-1.0..=1.0), 0.05);
                a.integrate(&g, &cmd, rng.gen_range(0.001..0.25));
                let p = a.position();
                assert!(g.is_walkable(p.x, p.y), "left the floor at {p:?}");
            }
        }
    }

    #[test]
    fn wall_blocks_and_zeroes_that_axis() {
        let (g, mut a) = room_agent(MotionModel::Direct);
        for _ in 0..10 {
            a.integrate(&g, &forward(), 0.1);
        }
        assert!(a.position().x < 4.0);
        assert_eq!(a.velocity().x, 0.0);
    }

    #[test]
    fn rotate_wraps_and_ignores_garbage() {
        let mut a = Agent::at(Pose::new(dvec2(1.5, 1.5), 0.0), MotionModel::Direct);
        a.rotate(-1.0, 0.5);
        assert!((a.heading() - 1.5 * std::f64::consts::PI).abs() < 1e-12);
        a.rotate(f64::NAN, 1.0);
        assert!((a.heading() - 1.5 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn bad_dt_is_ignored() {
        let (g, mut a) = room_agent(MotionModel::Accelerated);
        a.integrate(&g, &forward(), f64::NAN);
        a.integrate(&g, &forward(), -1.0);
        assert_eq!(a.position(), dvec2(2.5, 2.5));
        assert_eq!(a.speed(), 0.0);
    }
}
