//! Top-level owner of the simulation: grid, agent, ray buffer and the two
//! drawing passes. One [`App::tick`] plus one [`App::render`] per frame.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::engine::{Ray, Raycaster};
use crate::renderer::{Minimap, Projector, Renderer};
use crate::sim::{Agent, InputCmd, SpawnError};
use crate::world::{Grid, GridError, Pose, TextureTable};

/// Field-of-view limits for interactive zoom.
pub const MIN_FOV_DEG: f64 = 30.0;
pub const MAX_FOV_DEG: f64 = 150.0;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

pub struct App {
    config: Config,
    grid: Grid,
    agent: Agent,
    caster: Raycaster,
    projector: Projector,
    minimap: Option<Minimap>,
    texture: &'static TextureTable,
    quit: bool,
}

impl App {
    /// Validate `config`, build the map, spawn the agent and cast the
    /// first frame.
    pub fn new(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let grid = config.map.build()?;
        debug!("grid {}x{} built from {:?}", grid.width(), grid.height(), config.map);
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let agent = Agent::spawn(&grid, config.motion, &mut rng)?;
        let caster = Raycaster::new(config.cast_settings())?;

        info!(
            "map {}x{} ({} empty cells), {}x{} screen, {} rays, fov {:.0}°, {:?} motion",
            grid.width(),
            grid.height(),
            grid.count_empty(),
            config.width,
            config.height,
            config.ray_count(),
            config.fov_deg,
            config.motion,
        );

        let mut app = Self {
            minimap: config.minimap.then(|| Minimap::new(config.minimap_scale)),
            config,
            grid,
            agent,
            caster,
            projector: Projector::default(),
            texture: TextureTable::shared(),
            quit: false,
        };
        app.recast();
        Ok(app)
    }

    /* ── accessors ─────────────────────────────────────────────────── */
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Ray results for the current pose.
    #[inline]
    pub fn rays(&self) -> &[Ray] {
        self.caster.rays()
    }

    #[inline]
    pub fn fov(&self) -> f64 {
        self.caster.fov()
    }

    #[inline]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Teleport the agent (at rest) and recast.
    pub fn place_agent(&mut self, pose: Pose) {
        self.agent = Agent::at(pose, self.config.motion);
        self.recast();
    }

    /* ── per frame ─────────────────────────────────────────────────── */

    /// Apply one frame of input: turn, move, zoom, then recast.
    pub fn tick(&mut self, cmd: &InputCmd, dt: f64) {
        if cmd.quit {
            self.quit = true;
        }

        self.agent.rotate(cmd.turn, dt);
        self.agent.integrate(&self.grid, cmd, dt);

        if cmd.fov_delta != 0.0 && cmd.fov_delta.is_finite() {
            let fov = (self.caster.fov() + cmd.fov_delta)
                .clamp(MIN_FOV_DEG.to_radians(), MAX_FOV_DEG.to_radians());
            if let Err(e) = self.caster.set_fov(fov) {
                warn!("fov change ignored: {e}");
            }
        }

        self.recast();
    }

    /// Open a frame on `r` and draw the view, plus the minimap when
    /// enabled. `time` is wall-clock seconds for the bob phase.
    pub fn render<R: Renderer>(&self, r: &mut R, time: f64) {
        r.begin_frame(self.config.width, self.config.height);
        self.projector
            .draw(r, self.caster.rays(), self.agent.speed(), time, self.texture);
        if let Some(minimap) = &self.minimap {
            minimap.draw(r, &self.grid, self.agent.pose(), self.caster.rays());
        }
    }

    #[inline]
    fn recast(&mut self) {
        self.caster.cast(self.agent.pose(), &self.grid);
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
