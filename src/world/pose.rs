use glam::{DVec2, dvec2};

/// Viewer position and heading on the map plane.
///
/// * Position is in map cells, `y` grows **down** the screen.
/// * Heading is radians, counter-clockwise positive as seen on screen,
///   so the forward vector is `(cos θ, −sin θ)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub pos: DVec2,
    pub heading: f64,
}

impl Pose {
    pub fn new(pos: DVec2, heading: f64) -> Self {
        Self { pos, heading }
    }

    /// Unit direction of a ray cast at absolute `angle`.
    #[inline(always)]
    pub fn direction(angle: f64) -> DVec2 {
        let (s, c) = angle.sin_cos();
        dvec2(c, -s)
    }

    /// Unit vector the viewer looks along.
    #[inline(always)]
    pub fn forward(&self) -> DVec2 {
        Self::direction(self.heading)
    }

    /// Unit vector to the viewer's right (positive strafe).
    #[inline(always)]
    pub fn right(&self) -> DVec2 {
        let (s, c) = self.heading.sin_cos();
        dvec2(s, c)
    }

    /// Express a map point in view space:
    ///  .x = lateral offset (+ right)
    ///  .y = depth along the forward axis
    #[inline]
    pub fn to_view(&self, p: DVec2) -> DVec2 {
        let d = p - self.pos;
        dvec2(d.dot(self.right()), d.dot(self.forward()))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn forward_and_right_are_orthonormal() {
        let p = Pose::new(DVec2::ZERO, 0.7);
        let f = p.forward();
        let r = p.right();
        assert!((f.length() - 1.0).abs() < 1e-12);
        assert!((r.length() - 1.0).abs() < 1e-12);
        assert!(f.dot(r).abs() < 1e-12);
    }

    #[test]
    fn heading_zero_faces_plus_x_and_turns_ccw_on_screen() {
        let east = Pose::new(DVec2::ZERO, 0.0);
        assert!((east.forward() - dvec2(1.0, 0.0)).length() < 1e-12);
        // +90° faces up the screen, i.e. −y
        let north = Pose::new(DVec2::ZERO, FRAC_PI_2);
        assert!((north.forward() - dvec2(0.0, -1.0)).length() < 1e-12);
        // facing east, the right hand points down the screen
        assert!((east.right() - dvec2(0.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn to_view_axes_align() {
        let p = Pose::new(dvec2(2.0, 3.0), 0.0);
        assert!((p.to_view(dvec2(12.0, 3.0)) - dvec2(0.0, 10.0)).length() < 1e-12);
        assert!((p.to_view(dvec2(2.0, 8.0)) - dvec2(5.0, 0.0)).length() < 1e-12);
    }
}
