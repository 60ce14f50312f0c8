//! Randomness for cat placement and wandering. Not crypto sensitive.

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len` (0 when `len == 0`).
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// Browser RNG: `getrandom` (crypto.getRandomValues) with the `rng` feature,
/// otherwise xorshift64 seeded from `performance.now()`.
pub struct BrowserRng {
    state: u64,
}

impl BrowserRng {
    pub fn new() -> Self {
        Self::with_seed(crate::performance_now().to_bits())
    }

    pub fn with_seed(seed: u64) -> Self {
        // xorshift must never hold zero
        let state = seed ^ 0x9E37_79B9_7F4A_7C15;
        Self {
            state: if state == 0 { 0x2545_F491_4F6C_DD1D } else { state },
        }
    }

    fn next_u64(&mut self) -> u64 {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return u64::from_le_bytes(buf);
            }
        }
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for BrowserRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for BrowserRng {
    fn next_f64(&mut self) -> f64 {
        // 53 high bits -> [0, 1)
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Replays a fixed list of values, cycling when exhausted.
    pub(crate) struct SeqRng {
        pub values: Vec<f64>,
        pub pos: usize,
    }

    impl SeqRng {
        pub fn new(values: &[f64]) -> Self {
            Self {
                values: values.to_vec(),
                pos: 0,
            }
        }
    }

    impl RandomSource for SeqRng {
        fn next_f64(&mut self) -> f64 {
            let v = self.values[self.pos % self.values.len()];
            self.pos += 1;
            v
        }
    }

    #[test]
    fn test_browser_rng_range() {
        let mut rng = BrowserRng::with_seed(42);
        for _ in 0..1_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_zero_seed_still_advances() {
        let mut rng = BrowserRng::with_seed(0x9E37_79B9_7F4A_7C15);
        let a = rng.next_f64();
        let b = rng.next_f64();
        assert_ne!(a, b);
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = SeqRng::new(&[0.0, 0.999_999, 0.5]);
        assert_eq!(rng.next_index(4), 0);
        assert_eq!(rng.next_index(4), 3);
        assert_eq!(rng.next_index(4), 2);
        assert_eq!(rng.next_index(0), 0);
    }
}
