//! Robot locomotion along the city path and the idle/walk blend it drives.

use glam::Vec3;

use super::gesture::Directions;
use super::path::PathCurve;

pub const WALK_SPEED: f32 = 5.0;
pub const BACKWARD_SPEED: f32 = 2.5;
pub const LANE_SPEED: f32 = 4.0;
/// Higher settles the blend faster.
pub const GAIT_DAMPING: f32 = 8.0;

/// Blend target in [0, 1] for a movement speed.
pub fn gait_target(speed: f32, walk_speed: f32) -> f32 {
    if walk_speed <= 0.0 {
        return 0.0;
    }
    (speed.abs() / walk_speed).clamp(0.0, 1.0)
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Gait {
    pub value: f32,
}

impl Gait {
    /// Eases toward the target for `speed`; frame-rate independent.
    pub fn update(&mut self, speed: f32, dt: f32) -> f32 {
        let target = gait_target(speed, WALK_SPEED);
        let k = 1.0 - (-GAIT_DAMPING * dt.max(0.0)).exp();
        self.value += (target - self.value) * k;
        self.value
    }

    /// Interpolates a pose parameter between its idle and walk values.
    pub fn blend(&self, idle: f32, walk: f32) -> f32 {
        idle + (walk - idle) * self.value
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RobotController {
    /// Curve parameter in [0, 1].
    pub t: f32,
    /// Sideways offset from the centre line, metres.
    pub lateral: f32,
    pub max_lateral: f32,
    pub speed: f32,
    pub gait: Gait,
}

impl RobotController {
    pub fn new(max_lateral: f32) -> Self {
        Self {
            t: 0.0,
            lateral: 0.0,
            max_lateral: max_lateral.max(0.0),
            speed: 0.0,
            gait: Gait::default(),
        }
    }

    pub fn update(&mut self, input: Directions, dt: f32, path_length: f32) {
        self.speed = match (input.up, input.down) {
            (true, false) => WALK_SPEED,
            (false, true) => -BACKWARD_SPEED,
            _ => 0.0,
        };
        if path_length > 0.0 {
            self.t = (self.t + self.speed * dt / path_length).clamp(0.0, 1.0);
        }

        let strafe = match (input.left, input.right) {
            (true, false) => -LANE_SPEED,
            (false, true) => LANE_SPEED,
            _ => 0.0,
        };
        let lateral = self.lateral + strafe * dt;
        self.lateral = lateral.clamp(-self.max_lateral, self.max_lateral);

        let moving = self.speed.abs().max(strafe.abs());
        self.gait.update(moving, dt);
    }

    pub fn position(&self, path: &PathCurve) -> Vec3 {
        path.sample(self.t) + path.side(self.t) * self.lateral
    }

    pub fn finished(&self) -> bool {
        self.t >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_clamped() {
        assert_eq!(gait_target(0.0, WALK_SPEED), 0.0);
        assert_eq!(gait_target(2.5, 5.0), 0.5);
        assert_eq!(gait_target(50.0, 5.0), 1.0);
        assert_eq!(gait_target(1.0, 0.0), 0.0);
    }

    #[test]
    fn gait_eases_without_overshoot() {
        let mut gait = Gait::default();
        let mut last = 0.0;
        for _ in 0..120 {
            let v = gait.update(WALK_SPEED, 1.0 / 60.0);
            assert!(v >= last && v <= 1.0);
            last = v;
        }
        assert!(last > 0.99);
        assert!((gait.blend(0.0, 2.0) - 2.0 * last).abs() < 1e-6);
    }

    #[test]
    fn walking_forward_advances_along_path() {
        let end = Vec3::new(0.0, 0.0, 100.0);
        let path = PathCurve::new(vec![Vec3::ZERO, end]).unwrap();
        let mut robot = RobotController::new(4.0);
        let up = Directions {
            up: true,
            ..Default::default()
        };
        for _ in 0..60 {
            robot.update(up, 1.0 / 60.0, path.length());
        }
        assert!((robot.t - WALK_SPEED / 100.0).abs() < 1e-3);
        assert!(robot.position(&path).z > 0.0);
        assert!(robot.gait.value > 0.9);
        assert!(!robot.finished());
    }

    #[test]
    fn lane_changes_stay_on_street() {
        let mut robot = RobotController::new(3.0);
        let right = Directions { right: true, ..Default::default() };
        for _ in 0..600 {
            robot.update(right, 1.0 / 60.0, 100.0);
        }
        assert_eq!(robot.lateral, 3.0);
        assert_eq!(robot.t, 0.0);
    }

    #[test]
    fn cannot_back_past_start() {
        let mut robot = RobotController::new(3.0);
        robot.update(Directions { down: true, ..Default::default() }, 1.0, 100.0);
        assert_eq!(robot.t, 0.0);
        assert_eq!(robot.speed, -BACKWARD_SPEED);
    }
}
