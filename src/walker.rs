//! Wandering cats: each spawned cat nudges along a heading, bounces at the
//! container edges and every few steps turns to a random heading.

use crate::clock::take_whole_periods;
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
    Up,
    Down,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Left, Heading::Right, Heading::Up, Heading::Down];

    /// Unit step on screen axes (y grows downward).
    pub fn vector(self) -> (f64, f64) {
        match self {
            Heading::Left => (-1.0, 0.0),
            Heading::Right => (1.0, 0.0),
            Heading::Up => (0.0, -1.0),
            Heading::Down => (0.0, 1.0),
        }
    }

    pub fn reversed(self) -> Heading {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
        }
    }

    pub fn sprite_name(self) -> &'static str {
        match self {
            Heading::Left => "cat-left.png",
            Heading::Right => "cat-right.png",
            Heading::Up => "cat-up.png",
            Heading::Down => "cat-down.png",
        }
    }

    /// Sprite URL under `base` (e.g. `"images/"`).
    pub fn sprite_path(self, base: &str) -> String {
        if base.is_empty() || base.ends_with('/') {
            format!("{base}{}", self.sprite_name())
        } else {
            format!("{base}/{}", self.sprite_name())
        }
    }

    pub fn random(rng: &mut impl RandomSource) -> Heading {
        Heading::ALL[rng.next_index(Heading::ALL.len())]
    }
}

/// Position and motion state of one cat, in container-local pixels.
#[derive(Clone, Debug)]
pub struct CatWalker {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub heading: Heading,
    steps_since_turn: u32,
    last_step_ms: f64,
}

impl CatWalker {
    pub fn new(x: f64, y: f64, size: f64, heading: Heading, now: f64) -> Self {
        Self {
            x,
            y,
            width: size,
            height: size,
            heading,
            steps_since_turn: 0,
            last_step_ms: now,
        }
    }

    /// Move one step. Returns true when the heading (and so the sprite) changed.
    pub fn step(
        &mut self,
        area_w: f64,
        area_h: f64,
        step_px: f64,
        turn_every: u32,
        rng: &mut impl RandomSource,
    ) -> bool {
        let before = self.heading;
        let max_x = (area_w - self.width).max(0.0);
        let max_y = (area_h - self.height).max(0.0);
        let (dx, dy) = self.heading.vector();
        let nx = self.x + dx * step_px;
        let ny = self.y + dy * step_px;
        if nx < 0.0 || nx > max_x || ny < 0.0 || ny > max_y {
            self.heading = self.heading.reversed();
            self.steps_since_turn = 0;
        } else {
            self.steps_since_turn += 1;
            if turn_every > 0 && self.steps_since_turn >= turn_every {
                self.heading = Heading::random(rng);
                self.steps_since_turn = 0;
            }
        }
        self.x = nx.clamp(0.0, max_x);
        self.y = ny.clamp(0.0, max_y);
        self.heading != before
    }

    /// Number of steps owed since the last call, given a step period. Keeps the
    /// fractional remainder so the cadence does not drift with frame timing.
    pub fn steps_due(&mut self, now: f64, period_ms: f64) -> u32 {
        if period_ms <= 0.0 || now < self.last_step_ms {
            self.last_step_ms = now;
            return 0;
        }
        take_whole_periods(&mut self.last_step_ms, now, period_ms)
    }

    /// Forget time spent paused so a resumed cat does not sprint to catch up.
    pub fn resync(&mut self, now: f64) {
        self.last_step_ms = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::tests::SeqRng;

    #[test]
    fn test_step_moves_along_heading() {
        let mut rng = SeqRng::new(&[0.0]);
        let mut cat = CatWalker::new(10.0, 10.0, 50.0, Heading::Right, 0.0);
        let changed = cat.step(200.0, 200.0, 4.0, 0, &mut rng);
        assert!(!changed);
        assert_eq!((cat.x, cat.y), (14.0, 10.0));
        assert_eq!(rng.pos, 0);
    }

    #[test]
    fn test_step_bounces_at_edge() {
        let mut rng = SeqRng::new(&[0.0]);
        let mut cat = CatWalker::new(148.0, 0.0, 50.0, Heading::Right, 0.0);
        let changed = cat.step(200.0, 200.0, 4.0, 0, &mut rng);
        assert!(changed);
        assert_eq!(cat.heading, Heading::Left);
        assert_eq!(cat.x, 150.0);
        cat.step(200.0, 200.0, 4.0, 0, &mut rng);
        assert_eq!(cat.x, 146.0);
    }

    #[test]
    fn test_periodic_turn() {
        // next_index(4) with 0.8 -> Down
        let mut rng = SeqRng::new(&[0.8]);
        let mut cat = CatWalker::new(50.0, 50.0, 10.0, Heading::Right, 0.0);
        assert!(!cat.step(500.0, 500.0, 1.0, 3, &mut rng));
        assert!(!cat.step(500.0, 500.0, 1.0, 3, &mut rng));
        assert!(cat.step(500.0, 500.0, 1.0, 3, &mut rng));
        assert_eq!(cat.heading, Heading::Down);
    }

    #[test]
    fn test_steps_due_keeps_remainder() {
        let mut cat = CatWalker::new(0.0, 0.0, 10.0, Heading::Up, 1_000.0);
        assert_eq!(cat.steps_due(1_050.0, 100.0), 0);
        assert_eq!(cat.steps_due(1_250.0, 100.0), 2);
        assert_eq!(cat.steps_due(1_300.0, 100.0), 1);
        cat.resync(5_000.0);
        assert_eq!(cat.steps_due(5_010.0, 100.0), 0);
    }

    #[test]
    fn test_sprite_path() {
        assert_eq!(Heading::Up.sprite_path("images/"), "images/cat-up.png");
        assert_eq!(Heading::Left.sprite_path("img"), "img/cat-left.png");
        assert_eq!(Heading::Down.sprite_path(""), "cat-down.png");
    }
}
