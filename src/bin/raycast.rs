//! Interactive viewer.
//!
//! ```bash
//! cargo run --release -- --map demo
//! RUST_LOG=debug cargo run -- --rays 320 --spread uniform
//! ```
//!
//! W/S move, A/D strafe, ←/→ turn, Shift sprints, drag with the left mouse
//! button to turn, wheel zooms, Esc quits.

use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::info;
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

use yaray_rs::{
    App, Config, MapChoice,
    config::{DEFAULT_FOV_DEG, DEFAULT_HEIGHT, DEFAULT_MINIMAP_SCALE, DEFAULT_WIDTH},
    engine::{AngleSpread, DEFAULT_ATTENUATION, DEFAULT_RENDER_DISTANCE, Execution},
    renderer::{Renderer, Software},
    sim::{Action, Controls, FrameClock, FrameStats, MotionModel},
    world::DEFAULT_SIZE,
};

const TARGET_FPS: usize = 60;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Ray count (defaults to one per screen column)
    #[arg(long)]
    rays: Option<usize>,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = DEFAULT_FOV_DEG)]
    fov: f64,

    #[arg(long, value_enum, default_value_t = Spread::Linear)]
    spread: Spread,

    /// Cast all rays on one thread
    #[arg(long)]
    sequential: bool,

    #[arg(long, value_enum, default_value_t = Motion::Accel)]
    motion: Motion,

    /// Grid-line crossings per ray before giving up
    #[arg(long, default_value_t = DEFAULT_RENDER_DISTANCE)]
    render_distance: usize,

    /// Light lost per cell of distance
    #[arg(long, default_value_t = DEFAULT_ATTENUATION)]
    attenuation: f64,

    /// Slice height in pixels of a wall one cell away (defaults to screen height)
    #[arg(long)]
    wall_height: Option<f64>,

    #[arg(long, value_enum, default_value_t = Map::Room)]
    map: Map,

    /// Side length of the bordered room
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    #[arg(long)]
    no_minimap: bool,

    #[arg(long, default_value_t = DEFAULT_MINIMAP_SCALE)]
    minimap_scale: u32,

    /// Spawn RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Spread {
    Uniform,
    Linear,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Motion {
    Direct,
    Accel,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Map {
    Room,
    Demo,
}

impl Opts {
    fn into_config(self) -> Config {
        Config {
            width: self.width,
            height: self.height,
            rays: self.rays,
            fov_deg: self.fov,
            spread: match self.spread {
                Spread::Uniform => AngleSpread::Uniform,
                Spread::Linear => AngleSpread::ScreenLinear,
            },
            execution: if self.sequential {
                Execution::Sequential
            } else {
                Execution::Parallel
            },
            motion: match self.motion {
                Motion::Direct => MotionModel::Direct,
                Motion::Accel => MotionModel::Accelerated,
            },
            render_distance: self.render_distance,
            attenuation: self.attenuation,
            wall_height: self.wall_height,
            map: match self.map {
                Map::Room => MapChoice::Bordered {
                    width: self.size,
                    height: self.size,
                },
                Map::Demo => MapChoice::Demo,
            },
            minimap: !self.no_minimap,
            minimap_scale: self.minimap_scale,
            seed: self.seed,
        }
    }
}

const BINDINGS: [(Key, Action); 9] = [
    (Key::W, Action::Forward),
    (Key::Up, Action::Forward),
    (Key::S, Action::Back),
    (Key::Down, Action::Back),
    (Key::A, Action::StrafeLeft),
    (Key::D, Action::StrafeRight),
    (Key::Left, Action::TurnLeft),
    (Key::Right, Action::TurnRight),
    (Key::LeftShift, Action::Sprint),
];

/// Level-triggered key poll plus pointer / wheel deltas.
fn poll_input(win: &Window, controls: &mut Controls, last_mouse_x: &mut Option<f32>) {
    for action in BINDINGS.iter().map(|&(_, a)| a) {
        let down = BINDINGS
            .iter()
            .any(|&(k, a)| a == action && win.is_key_down(k));
        controls.set(action, down);
    }
    if win.is_key_down(Key::RightShift) {
        controls.press(Action::Sprint);
    }
    if win.is_key_down(Key::Escape) {
        controls.request_quit();
    }

    /* drag to turn */
    let mouse_x = win.get_mouse_pos(MouseMode::Pass).map(|(x, _)| x);
    if win.get_mouse_down(MouseButton::Left) {
        if let (Some(now), Some(before)) = (mouse_x, *last_mouse_x) {
            controls.pointer_delta((now - before) as f64);
        }
    }
    *last_mouse_x = mouse_x;

    if let Some((_, dy)) = win.get_scroll_wheel() {
        if dy != 0.0 {
            controls.scroll(dy.signum() as f64);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = Opts::parse().into_config();
    let (w, h) = (config.width, config.height);
    let mut app = App::new(config)?;

    let mut win = Window::new("yaray", w, h, WindowOptions::default())?;
    win.set_target_fps(TARGET_FPS);
    info!("window {w}x{h} open, Esc quits");

    let mut renderer = Software::default();
    let mut controls = Controls::default();
    let mut clock = FrameClock::new();
    let mut stats = FrameStats::default();
    let mut last_mouse_x = None;

    while win.is_open() && !app.should_quit() {
        let t0 = Instant::now(); // ┌─ frame timer start

        poll_input(&win, &mut controls, &mut last_mouse_x);
        let cmd = controls.take_cmd();
        app.tick(&cmd, clock.tick());

        app.render(&mut renderer, clock.elapsed());
        let mut presented = Ok(());
        renderer.end_frame(|fb, w, h| presented = win.update_with_buffer(fb, w, h));
        presented?;

        stats.record(t0.elapsed());
    }

    info!("bye");
    Ok(())
}
