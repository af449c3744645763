//! Uniform Catmull-Rom path the robot walks along.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct PathCurve {
    points: Vec<Vec3>,
}

impl PathCurve {
    /// Needs at least two control points.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        (points.len() >= 2).then_some(Self { points })
    }

    /// A path heading down +Z whose control points wander sideways.
    pub fn meander(seed: u64, length: f32, control_points: usize, amplitude: f32) -> Self {
        let n = control_points.max(2);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points = (0..n)
            .map(|i| {
                let z = length * i as f32 / (n - 1) as f32;
                // keep both ends centred so the spawn and the finish line line up
                let x = if i == 0 || i == n - 1 {
                    0.0
                } else {
                    (rng.random::<f32>() * 2.0 - 1.0) * amplitude
                };
                Vec3::new(x, 0.0, z)
            })
            .collect();
        Self { points }
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    fn segment(&self, t: f32) -> ([Vec3; 4], f32) {
        let n = self.points.len();
        let segments = n - 1;
        let f = t.clamp(0.0, 1.0) * segments as f32;
        let i = (f.floor() as usize).min(segments - 1);
        let u = f - i as f32;
        let p = [
            self.points[i.saturating_sub(1)],
            self.points[i],
            self.points[i + 1],
            self.points[(i + 2).min(n - 1)],
        ];
        (p, u)
    }

    pub fn sample(&self, t: f32) -> Vec3 {
        let ([p0, p1, p2, p3], u) = self.segment(t);
        let u2 = u * u;
        let u3 = u2 * u;
        0.5 * (2.0 * p1
            + (p2 - p0) * u
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
            + (3.0 * p1 - p0 - 3.0 * p2 + p3) * u3)
    }

    /// Unit direction of travel at `t`.
    pub fn tangent(&self, t: f32) -> Vec3 {
        let ([p0, p1, p2, p3], u) = self.segment(t);
        let d = 0.5
            * ((p2 - p0)
                + 2.0 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u
                + 3.0 * (3.0 * p1 - p0 - 3.0 * p2 + p3) * u * u);
        d.normalize_or(Vec3::Z)
    }

    /// Horizontal unit vector across the path (+X while heading down +Z).
    pub fn side(&self, t: f32) -> Vec3 {
        Vec3::Y.cross(self.tangent(t)).normalize_or(Vec3::X)
    }

    /// Heading angle matching `(sin yaw, 0, cos yaw)` as forward.
    pub fn yaw(&self, t: f32) -> f32 {
        let d = self.tangent(t);
        d.x.atan2(d.z)
    }

    pub fn points(&self, count: usize) -> Vec<Vec3> {
        let count = count.max(2);
        (0..count)
            .map(|i| self.sample(i as f32 / (count - 1) as f32))
            .collect()
    }

    /// Polyline approximation of the arc length.
    pub fn length(&self) -> f32 {
        self.points(self.points.len() * 16)
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }
}
