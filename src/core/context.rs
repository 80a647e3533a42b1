//! Per-run generation context
//!
//! Holds the random source and the reference date for one run. Every
//! generator borrows it mutably; nothing reads randomness from a global.

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::core::config::GeneratorConfig;

/// Explicit run state passed into every generating component
#[derive(Debug)]
pub struct GenerationContext {
    rng: StdRng,
    seed: Option<u64>,
    today: NaiveDate,
    config: GeneratorConfig,
}

impl GenerationContext {
    /// Create a context; a `Some` seed makes the whole run reproducible
    pub fn new(seed: Option<u64>, config: GeneratorConfig) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            seed,
            today: Local::now().date_naive(),
            config,
        }
    }

    /// Seeded context with default configuration
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed), GeneratorConfig::default())
    }

    /// Pin the reference date used for every "today"-relative value
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Direct access to the random source
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Uniform integer in `low..=high`
    pub fn range(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    /// Uniform count in `low..=high`
    pub fn count(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    /// True with probability `p` (clamped to `[0, 1]`)
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform float in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.random()
    }

    /// Standard normal sample (Box-Muller transform)
    pub fn gaussian(&mut self) -> f64 {
        // 1 - u keeps the argument of ln in (0, 1]
        let u1: f64 = 1.0 - self.rng.random::<f64>();
        let u2: f64 = self.rng.random();
        (-2.0_f64 * u1.ln()).sqrt() * (2.0_f64 * std::f64::consts::PI * u2).cos()
    }

    /// Pick one item; `None` only for an empty slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Pick one string, falling back to an empty string for an empty slice
    pub fn pick(&mut self, items: &[String]) -> String {
        self.choose(items).cloned().unwrap_or_default()
    }

    /// Pick one string from a static list
    pub fn pick_str(&mut self, items: &[&str]) -> String {
        self.choose(items).map(|s| s.to_string()).unwrap_or_default()
    }

    /// Sample up to `amount` distinct items; the amount is capped at the pool size
    pub fn sample<T: Clone>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        let amount = amount.min(items.len());
        items
            .choose_multiple(&mut self.rng, amount)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = GenerationContext::seeded(7);
        let mut b = GenerationContext::seeded(7);
        let xs: Vec<i64> = (0..20).map(|_| a.range(0, 1_000_000)).collect();
        let ys: Vec<i64> = (0..20).map(|_| b.range(0, 1_000_000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_sample_caps_at_pool_size() {
        let mut ctx = GenerationContext::seeded(1);
        let pool = vec!["a", "b", "c"];
        let picked = ctx.sample(&pool, 10);
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn test_degenerate_ranges() {
        let mut ctx = GenerationContext::seeded(1);
        assert_eq!(ctx.range(5, 5), 5);
        assert_eq!(ctx.range(5, 2), 5);
        assert_eq!(ctx.count(3, 0), 3);
        assert!(ctx.choose::<u8>(&[]).is_none());
        assert_eq!(ctx.pick(&[]), "");
    }

    #[test]
    fn test_gaussian_is_finite_and_centered() {
        let mut ctx = GenerationContext::seeded(99);
        let samples: Vec<f64> = (0..2000).map(|_| ctx.gaussian()).collect();
        assert!(samples.iter().all(|s| s.is_finite()));
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.15, "mean {mean}");
    }

    #[test]
    fn test_with_today_pins_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let ctx = GenerationContext::seeded(1).with_today(date);
        assert_eq!(ctx.today(), date);
    }
}
