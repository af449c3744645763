//! Hand-landmark gesture classification.
//!
//! The browser runs the landmark model on webcam frames and reports the 21
//! points of one hand. Where the hand sits in the frame picks the direction:
//! the camera is mirrored, so moving the hand to the player's left reads as
//! left even though it lands on the right half of the raw image.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

pub const HAND_LANDMARKS: usize = 21;
pub const LOW_THRESHOLD: f32 = 0.35;
pub const HIGH_THRESHOLD: f32 = 0.65;

/// Normalised image coordinates, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    const UP: u8 = 1;
    const DOWN: u8 = 1 << 1;
    const LEFT: u8 = 1 << 2;
    const RIGHT: u8 = 1 << 3;

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    fn bits(self) -> u8 {
        let mut bits = 0;
        if self.up {
            bits |= Self::UP;
        }
        if self.down {
            bits |= Self::DOWN;
        }
        if self.left {
            bits |= Self::LEFT;
        }
        if self.right {
            bits |= Self::RIGHT;
        }
        bits
    }

    fn from_bits(bits: u8) -> Self {
        Self {
            up: bits & Self::UP != 0,
            down: bits & Self::DOWN != 0,
            left: bits & Self::LEFT != 0,
            right: bits & Self::RIGHT != 0,
        }
    }
}

/// Anything but one full hand yields no direction.
pub fn classify(hand: &[Landmark]) -> Directions {
    if hand.len() != HAND_LANDMARKS {
        return Directions::default();
    }
    let n = hand.len() as f32;
    let cx = hand.iter().map(|p| p.x).sum::<f32>() / n;
    let cy = hand.iter().map(|p| p.y).sum::<f32>() / n;
    let mirrored_x = 1.0 - cx;

    Directions {
        up: cy < LOW_THRESHOLD,
        down: cy > HIGH_THRESHOLD,
        left: mirrored_x < LOW_THRESHOLD,
        right: mirrored_x > HIGH_THRESHOLD,
    }
}

/// Latest classified gesture, written by the capture callback and sampled by
/// the frame loop. Readers may see a value one frame stale.
#[derive(Debug, Clone, Default)]
pub struct GestureRef(Arc<AtomicU8>);

impl GestureRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, dirs: Directions) {
        self.0.store(dirs.bits(), Ordering::Relaxed);
    }

    pub fn sample(&self) -> Directions {
        Directions::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn clear(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}
