//! Random placement of a sprite inside a container while steering clear of
//! fixed UI regions (the clock face and the control bar).

use crate::rng::RandomSource;

/// Axis-aligned rectangle in container-local pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap; rectangles sharing only an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// false when every attempt overlapped an obstacle and the last candidate was kept.
    pub clear: bool,
}

/// Pick a top-left position for a `sprite_w` x `sprite_h` sprite within an
/// `area_w` x `area_h` container. Tries up to `max_attempts` uniform candidates
/// and returns the first one overlapping none of `obstacles`.
pub fn place_avoiding(
    area_w: f64,
    area_h: f64,
    sprite_w: f64,
    sprite_h: f64,
    obstacles: &[Rect],
    rng: &mut impl RandomSource,
    max_attempts: u32,
) -> Placement {
    let max_x = (area_w - sprite_w).max(0.0);
    let max_y = (area_h - sprite_h).max(0.0);
    let mut last = Placement {
        x: 0.0,
        y: 0.0,
        clear: false,
    };
    for _ in 0..max_attempts.max(1) {
        let x = rng.next_f64() * max_x;
        let y = rng.next_f64() * max_y;
        let candidate = Rect::new(x, y, sprite_w, sprite_h);
        let blocked = obstacles
            .iter()
            .filter(|o| !o.is_empty())
            .any(|o| o.intersects(&candidate));
        last = Placement {
            x,
            y,
            clear: !blocked,
        };
        if !blocked {
            break;
        }
    }
    last
}
