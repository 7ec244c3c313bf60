//! Per-column ray casting.
//!
//! One [`Raycaster`] owns the ray buffer for the whole run; [`Raycaster::cast`]
//! overwrites every slot each frame from a frozen [`Pose`] and [`Grid`].
//! Rays are independent, so the loop can be split across worker threads
//! (`Execution::Parallel`, cargo feature `parallel`).

use log::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::march::Marcher;
use super::types::{Ray, Side, TexSample, WallHit, base_color};
use crate::config::ConfigError;
use crate::world::{CellTag, DEFAULT_TEXTURE_RESOLUTION, Grid, Pose};

/// Grid-line crossings examined before a ray gives up.
pub const DEFAULT_RENDER_DISTANCE: usize = 128;

/// Light lost per cell of distance.
pub const DEFAULT_ATTENUATION: f64 = 0.04;

/// Distances are floored here so a viewer standing on a wall face still
/// projects a finite slice.
pub const MIN_DISTANCE: f64 = 1e-4;

/// How ray angles are laid out across the field of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AngleSpread {
    /// Equal angular spacing: `heading − fov/2 + i·fov/N`.
    Uniform,
    /// Equal spacing on the projection plane (arctangent remap).
    #[default]
    ScreenLinear,
}

impl AngleSpread {
    /// Absolute angle of ray `i` out of `n`.
    #[inline]
    pub fn angle(self, i: usize, n: usize, heading: f64, fov: f64) -> f64 {
        let n_f = n as f64;
        match self {
            AngleSpread::Uniform => heading - fov * 0.5 + i as f64 * (fov / n_f),
            AngleSpread::ScreenLinear => {
                let k = 2.0 * (fov * 0.5).tan() / n_f;
                heading + (k * (i as f64 - n_f * 0.5)).atan()
            }
        }
    }
}

/// Whether [`Raycaster::cast`] splits the ray loop across threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Execution {
    Sequential,
    #[default]
    Parallel,
}

/// Everything fixed about a raycaster at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastSettings {
    /// Number of rays (screen columns), ≥ 1.
    pub rays: usize,
    /// Horizontal field of view in radians, `0 ≤ fov < π`.
    pub fov: f64,
    pub spread: AngleSpread,
    pub execution: Execution,
    /// Crossing budget per ray.
    pub render_distance: usize,
    /// Slice height in pixels of a wall at distance 1.
    pub wall_height: f64,
    pub attenuation: f64,
    pub texture_resolution: usize,
}

impl Default for CastSettings {
    fn default() -> Self {
        Self {
            rays: 320,
            fov: 90_f64.to_radians(),
            spread: AngleSpread::default(),
            execution: Execution::default(),
            render_distance: DEFAULT_RENDER_DISTANCE,
            wall_height: 200.0,
            attenuation: DEFAULT_ATTENUATION,
            texture_resolution: DEFAULT_TEXTURE_RESOLUTION,
        }
    }
}

impl CastSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rays == 0 {
            return Err(ConfigError::ZeroRays);
        }
        check_fov(self.fov)?;
        if self.render_distance == 0 {
            return Err(ConfigError::BadRenderDistance);
        }
        if !(self.wall_height.is_finite() && self.wall_height > 0.0) {
            return Err(ConfigError::BadWallHeight(self.wall_height));
        }
        if !(self.attenuation.is_finite() && self.attenuation >= 0.0) {
            return Err(ConfigError::BadAttenuation(self.attenuation));
        }
        if self.texture_resolution == 0 {
            return Err(ConfigError::BadTextureResolution);
        }
        Ok(())
    }
}

/// A field of view must open forwards, short of a half turn.
pub fn check_fov(fov: f64) -> Result<(), ConfigError> {
    if fov.is_finite() && (0.0..std::f64::consts::PI).contains(&fov) {
        Ok(())
    } else {
        Err(ConfigError::BadFov(fov.to_degrees()))
    }
}

/*───────────────────────────────────────────────────────────────────────*/
/*                              Raycaster                               */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Raycaster {
    settings: CastSettings,
    rays: Vec<Ray>,
}

impl Raycaster {
    pub fn new(settings: CastSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        if settings.execution == Execution::Parallel && !cfg!(feature = "parallel") {
            warn!("parallel ray casting requested, built without `parallel`: casting sequentially");
        }
        debug!(
            "raycaster: {} rays, fov {:.1}°, {:?}, {:?}",
            settings.rays,
            settings.fov.to_degrees(),
            settings.spread,
            settings.execution
        );
        Ok(Self {
            rays: vec![Ray::UNSET; settings.rays],
            settings,
        })
    }

    #[inline]
    pub fn settings(&self) -> &CastSettings {
        &self.settings
    }

    /// Results of the last [`Raycaster::cast`].
    #[inline]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    #[inline]
    pub fn fov(&self) -> f64 {
        self.settings.fov
    }

    /// Change the field of view for the next cast.
    pub fn set_fov(&mut self, fov: f64) -> Result<(), ConfigError> {
        check_fov(fov)?;
        self.settings.fov = fov;
        Ok(())
    }

    pub fn set_execution(&mut self, execution: Execution) {
        self.settings.execution = execution;
    }

    /// Recompute every ray against `pose` and `grid`.
    pub fn cast(&mut self, pose: Pose, grid: &Grid) {
        let s = self.settings;
        let n = self.rays.len();
        for_each_ray(&mut self.rays, s.execution, |i, ray| {
            let angle = s.spread.angle(i, n, pose.heading, s.fov);
            *ray = Ray {
                angle,
                hit: cast_ray(grid, pose, angle, &s),
            };
        });
    }
}

#[cfg(feature = "parallel")]
fn for_each_ray<F>(rays: &mut [Ray], execution: Execution, job: F)
where
    F: Fn(usize, &mut Ray) + Send + Sync,
{
    match execution {
        Execution::Parallel => rays
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, ray)| job(i, ray)),
        Execution::Sequential => rays
            .iter_mut()
            .enumerate()
            .for_each(|(i, ray)| job(i, ray)),
    }
}

#[cfg(not(feature = "parallel"))]
fn for_each_ray<F>(rays: &mut [Ray], _execution: Execution, job: F)
where
    F: Fn(usize, &mut Ray),
{
    rays.iter_mut()
        .enumerate()
        .for_each(|(i, ray)| job(i, ray));
}

/*──────────────────────── single ray ─────────────────────────────────*/

/// March one ray cast at absolute `angle` from `pose`.
///
/// `None` when the crossing budget runs out or the ray leaves the grid.
pub fn cast_ray(grid: &Grid, pose: Pose, angle: f64, s: &CastSettings) -> Option<WallHit> {
    let dir = Pose::direction(angle);

    let crossing = Marcher::new(pose.pos, dir)
        .take(s.render_distance)
        .map(|c| (c, grid.get(c.cell.0, c.cell.1)))
        .take_while(|(_, tag)| tag.is_some())
        .find(|(_, tag)| tag.is_some_and(|t| !t.is_empty()));

    let (c, Some(tag)) = crossing? else {
        return None;
    };

    let raw_distance = (c.point - pose.pos).length();
    let distance = (raw_distance * (angle - pose.heading).cos()).max(MIN_DISTANCE);
    let height = s.wall_height / distance;
    let light = (1.0 - distance * s.attenuation).clamp(0.0, 1.0);

    let texture = (tag == CellTag::Textured).then(|| TexSample {
        column: texture_column(c.side, c.point, s.texture_resolution),
        step: height / s.texture_resolution as f64,
    });

    Some(WallHit {
        distance,
        raw_distance,
        point: c.point,
        cell: c.cell,
        tag,
        side: c.side,
        height,
        light,
        color: base_color(tag).shade(light),
        texture,
    })
}

/// Texture column from the fractional position along the crossed face,
/// mirrored on the far faces so the pattern never reads backwards.
#[inline]
fn texture_column(side: Side, point: glam::DVec2, res: usize) -> usize {
    let u = match side {
        Side::West => point.y.fract(),
        Side::East => 1.0 - point.y.fract(),
        Side::South => point.x.fract(),
        Side::North => 1.0 - point.x.fract(),
    };
    ((u * res as f64) as usize).min(res - 1)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;
    use std::f64::consts::FRAC_PI_2;

    fn settings(rays: usize, fov_deg: f64) -> CastSettings {
        CastSettings {
            rays,
            fov: fov_deg.to_radians(),
            ..CastSettings::default()
        }
    }

    /// Corridor one cell tall running along x, wall at `x = wall_x`.
    fn corridor(wall_x: usize) -> Grid {
        Grid::bordered(wall_x + 1, 3).unwrap()
    }

    #[test]
    fn straight_shot_hits_at_integer_distance() {
        for d in 1..=6 {
            // eye on a grid line, face `d` cells ahead
            let grid = corridor(2 + d);
            let pose = Pose::new(dvec2(2.0, 1.5), 0.0);
            let hit = cast_ray(&grid, pose, 0.0, &settings(1, 0.0)).unwrap();
            assert!((hit.distance - d as f64).abs() < 1e-3, "d={d}: {}", hit.distance);
            assert_eq!(hit.side, Side::West);
        }
    }

    #[test]
    fn single_ray_in_small_room() {
        // 3×3 open interior, eye at the centre cell facing +x
        let grid = Grid::bordered(5, 5).unwrap();
        let mut rc = Raycaster::new(settings(1, 0.0)).unwrap();
        rc.cast(Pose::new(dvec2(2.5, 2.5), 0.0), &grid);
        let hit = rc.rays()[0].hit.unwrap();
        assert!((hit.point - dvec2(4.0, 2.5)).length() < 1e-5);
        assert!((hit.distance - 1.5).abs() < 1e-5);
        assert_eq!(hit.cell, (4, 2));
    }

    #[test]
    fn tight_room_hits_adjacent_border() {
        let grid = Grid::bordered(4, 4).unwrap();
        let hit = cast_ray(&grid, Pose::new(dvec2(2.5, 2.5), 0.0), 0.0, &settings(1, 0.0)).unwrap();
        assert!((hit.distance - 0.5).abs() < 1e-5);
    }

    #[test]
    fn height_is_projection_of_distance() {
        let grid = Grid::demo();
        let mut rc = Raycaster::new(settings(64, 90.0)).unwrap();
        rc.cast(Pose::new(dvec2(3.5, 2.5), 0.6), &grid);
        let wall_h = rc.settings().wall_height;
        for ray in rc.rays() {
            let hit = ray.hit.expect("closed arena, every ray hits");
            assert!(hit.distance > 0.0);
            assert_eq!(hit.height, wall_h / hit.distance);
            assert!((0.0..=1.0).contains(&hit.light));
        }
    }

    #[test]
    fn perpendicular_correction_removes_bulge() {
        // long flat wall at x = 10, eye 5 cells away
        let grid = Grid::bordered(11, 41).unwrap();
        let pose = Pose::new(dvec2(5.0, 20.5), 0.0);
        let s = settings(2, 60.0);
        let theta = 25_f64.to_radians();
        let left = cast_ray(&grid, pose, theta, &s).unwrap();
        let right = cast_ray(&grid, pose, -theta, &s).unwrap();
        let centre = cast_ray(&grid, pose, 0.0, &s).unwrap();

        assert!((left.distance - right.distance).abs() < 1e-9);
        assert!((left.distance - 5.0).abs() < 1e-6);
        assert!((centre.distance - 5.0).abs() < 1e-6);
        assert!(left.raw_distance > centre.raw_distance + 0.4);
        assert!((left.raw_distance - 5.0 / theta.cos()).abs() < 1e-6);
    }

    #[test]
    fn uniform_spread_covers_fov() {
        let fov = 90_f64.to_radians();
        let a0 = AngleSpread::Uniform.angle(0, 4, 1.0, fov);
        let a2 = AngleSpread::Uniform.angle(2, 4, 1.0, fov);
        assert!((a0 - (1.0 - fov / 2.0)).abs() < 1e-12);
        assert!((a2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn screen_linear_spread_is_even_on_the_plane() {
        let fov = 70_f64.to_radians();
        let n = 8;
        let first = AngleSpread::ScreenLinear.angle(0, n, 0.0, fov);
        assert!((first + fov / 2.0).abs() < 1e-12);
        // tangents are equally spaced
        let t: Vec<f64> = (0..n)
            .map(|i| AngleSpread::ScreenLinear.angle(i, n, 0.0, fov).tan())
            .collect();
        let gap = t[1] - t[0];
        assert!(t.windows(2).all(|w| ((w[1] - w[0]) - gap).abs() < 1e-12));
        assert_eq!(AngleSpread::ScreenLinear.angle(n / 2, n, 0.3, fov), 0.3);
    }

    #[test]
    fn textured_hit_samples_face_fraction() {
        let grid = Grid::from_rows(&["11111", "10005", "11111"]).unwrap();
        let pose = Pose::new(dvec2(1.5, 1.25), 0.0);
        let s = settings(1, 0.0);
        let hit = cast_ray(&grid, pose, 0.0, &s).unwrap();
        assert_eq!(hit.tag, CellTag::Textured);
        let tex = hit.texture.unwrap();
        assert_eq!(tex.column, s.texture_resolution / 4);
        assert_eq!(tex.step, hit.height / s.texture_resolution as f64);

        // flat walls carry no texture sample
        let flat = cast_ray(&grid, pose, FRAC_PI_2, &s).unwrap();
        assert!(flat.texture.is_none());
    }

    #[test]
    fn far_faces_are_mirrored() {
        let res = 16;
        let p = dvec2(3.0, 2.25);
        assert_eq!(texture_column(Side::West, p, res), 4);
        assert_eq!(texture_column(Side::East, p, res), 12);
        let q = dvec2(1.75, 4.0);
        assert_eq!(texture_column(Side::South, q, res), 12);
        assert_eq!(texture_column(Side::North, q, res), 4);
    }

    #[test]
    fn shading_applies_to_flat_colours() {
        let grid = corridor(12);
        let s = CastSettings {
            attenuation: 0.1,
            ..settings(1, 0.0)
        };
        let hit = cast_ray(&grid, Pose::new(dvec2(2.0, 1.5), 0.0), 0.0, &s).unwrap();
        assert!((hit.light - 0.0).abs() < 1e-3); // 10 cells × 0.1
        let near = cast_ray(&grid, Pose::new(dvec2(7.0, 1.5), 0.0), 0.0, &s).unwrap();
        assert!((near.light - 0.5).abs() < 1e-3);
        assert!(near.color.r > 100 && near.color.r < 150);
    }

    #[test]
    fn exhausted_budget_is_a_miss() {
        let grid = corridor(40);
        let s = CastSettings {
            render_distance: 8,
            ..settings(1, 0.0)
        };
        assert!(cast_ray(&grid, Pose::new(dvec2(1.5, 1.5), 0.0), 0.0, &s).is_none());
    }

    #[test]
    fn open_layout_leaving_grid_is_a_miss() {
        let grid = Grid::from_rows(&["000", "000"]).unwrap();
        let hit = cast_ray(&grid, Pose::new(dvec2(1.5, 0.5), 0.0), 0.0, &settings(1, 0.0));
        assert!(hit.is_none());
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let grid = Grid::demo();
        let pose = Pose::new(dvec2(7.5, 9.5), 2.1);
        let mut seq = Raycaster::new(CastSettings {
            execution: Execution::Sequential,
            ..settings(200, 75.0)
        })
        .unwrap();
        let mut par = Raycaster::new(CastSettings {
            execution: Execution::Parallel,
            ..settings(200, 75.0)
        })
        .unwrap();
        seq.cast(pose, &grid);
        par.cast(pose, &grid);
        assert_eq!(seq.rays(), par.rays());
    }

    #[test]
    fn every_slot_is_rewritten_each_cast() {
        let grid = Grid::demo();
        let mut rc = Raycaster::new(settings(16, 90.0)).unwrap();
        rc.cast(Pose::new(dvec2(3.5, 2.5), 0.0), &grid);
        let first: Vec<f64> = rc.rays().iter().map(|r| r.angle).collect();
        rc.cast(Pose::new(dvec2(3.5, 2.5), 1.0), &grid);
        for (a, r) in first.iter().zip(rc.rays()) {
            assert!((r.angle - a - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn bad_settings_rejected() {
        assert_eq!(
            Raycaster::new(settings(0, 90.0)).err(),
            Some(ConfigError::ZeroRays)
        );
        assert!(matches!(
            Raycaster::new(settings(10, 180.0)).err(),
            Some(ConfigError::BadFov(_))
        ));
        let mut rc = Raycaster::new(settings(10, 90.0)).unwrap();
        assert!(rc.set_fov(f64::NAN).is_err());
        assert_eq!(rc.fov(), 90_f64.to_radians());
    }
}
