//! Page tunables. Defaults mirror the stock page; the `serde_json` feature
//! allows overriding them from JS before `start_clock()`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// Period of the elapsed-time tick.
    pub tick_ms: u32,
    /// Rendered cat width / height in pixels.
    pub cat_size_px: f64,
    /// Period between walk steps of a single cat.
    pub walk_step_ms: f64,
    /// Pixels moved per walk step.
    pub walk_step_px: f64,
    /// Steps between random heading changes.
    pub turn_every_steps: u32,
    /// Random candidates tried before a cat is allowed to overlap the UI.
    pub max_placement_attempts: u32,
    /// Directory holding the directional cat sprites.
    pub sprite_base: String,
    /// Live cats kept on screen; the oldest is removed past this (0 = unlimited).
    pub max_cats: usize,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1_000,
            cat_size_px: 50.0,
            walk_step_ms: 120.0,
            walk_step_px: 3.0,
            turn_every_steps: 25,
            max_placement_attempts: 20,
            sprite_base: "images/".to_string(),
            max_cats: 200,
        }
    }
}

impl ClockConfig {
    /// Cats actually created for `due` elapsed intervals. Past `max_cats` every
    /// extra cat would be evicted straight away, so the batch is capped there.
    pub fn spawn_batch(&self, due: u32) -> u32 {
        if self.max_cats == 0 {
            due
        } else {
            due.min(self.max_cats.min(u32::MAX as usize) as u32)
        }
    }
}

#[cfg(feature = "serde_json")]
impl ClockConfig {
    /// Parse overrides; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClockConfig::default();
        assert_eq!(cfg.tick_ms, 1_000);
        assert_eq!(cfg.cat_size_px, 50.0);
        assert!(cfg.max_placement_attempts > 0);
    }

    #[test]
    fn test_spawn_batch_capped_by_max_cats() {
        let cfg = ClockConfig {
            max_cats: 200,
            ..ClockConfig::default()
        };
        // Eight hours asleep with a 1 s interval
        assert_eq!(cfg.spawn_batch(28_800), 200);
        assert_eq!(cfg.spawn_batch(3), 3);
        let unlimited = ClockConfig {
            max_cats: 0,
            ..ClockConfig::default()
        };
        assert_eq!(unlimited.spawn_batch(28_800), 28_800);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_partial_json_override() {
        let cfg = ClockConfig::from_json(r#"{ "cat_size_px": 64.0, "max_cats": 10 }"#).unwrap();
        assert_eq!(cfg.cat_size_px, 64.0);
        assert_eq!(cfg.max_cats, 10);
        assert_eq!(cfg.tick_ms, ClockConfig::default().tick_ms);
        assert!(ClockConfig::from_json("{ not json").is_err());
    }
}
