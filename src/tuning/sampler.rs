//! Samplers that propose parameter values for search trials.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of candidate parameter values.
///
/// Names identify the parameter being sampled so that model-based samplers
/// can keep per-parameter history; the random sampler ignores them.
pub trait Sampler {
    /// Sample a float uniformly in `[low, high]`, or log-uniformly when `log` is set.
    fn sample_float(&mut self, name: &str, low: f64, high: f64, log: bool) -> f64;

    /// Sample an integer uniformly in `[low, high]`.
    fn sample_int(&mut self, name: &str, low: i64, high: i64) -> i64;

    /// Sample an index into `n` categorical choices.
    fn sample_choice(&mut self, name: &str, n: usize) -> usize;
}

/// Independent uniform sampling from a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn sample_float(&mut self, _name: &str, low: f64, high: f64, log: bool) -> f64 {
        if low >= high {
            return low;
        }
        if log {
            self.rng.gen_range(low.ln()..=high.ln()).exp().clamp(low, high)
        } else {
            self.rng.gen_range(low..=high)
        }
    }

    fn sample_int(&mut self, _name: &str, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn sample_choice(&mut self, _name: &str, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }
}

/// Mix a base seed with a stream identifier (SplitMix64 finaliser).
///
/// Gives every group its own reproducible sampler stream.
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut z = base ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
