//! Event interrupt scheduler.
//!
//! After each committed transition one Bernoulli trial decides whether a
//! random event overlays the scene. An empty pool never interrupts.

use rand::Rng;
use story_rules::RandomEvent;

/// Chance of an interrupt after each transition.
pub const DEFAULT_INTERRUPT_PROBABILITY: f64 = 0.3;

/// Decides, per transition, whether to overlay a random event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventScheduler {
    probability: f64,
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_INTERRUPT_PROBABILITY)
    }
}

impl EventScheduler {
    /// Create a scheduler. The probability is clamped to `[0, 1]`; NaN means never.
    pub fn new(probability: f64) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Run the trial and pick an event uniformly from the pool.
    ///
    /// Returns the index of the chosen event.
    pub fn roll<R: Rng + ?Sized>(&self, pool: &[RandomEvent], rng: &mut R) -> Option<usize> {
        if !rng.gen_bool(self.probability) {
            return None;
        }
        if pool.is_empty() {
            tracing::debug!("interrupt fired but event pool is empty");
            return None;
        }
        Some(rng.gen_range(0..pool.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(n: usize) -> Vec<RandomEvent> {
        (0..n)
            .map(|i| RandomEvent {
                id: format!("event-{}", i),
                text: "Something happens.".to_string(),
                choices: vec![],
            })
            .collect()
    }

    #[test]
    fn test_interrupt_frequency() {
        let scheduler = EventScheduler::default();
        let pool = pool(3);
        let mut rng = StdRng::seed_from_u64(2024);

        let trials = 10_000;
        let fired = (0..trials)
            .filter(|_| scheduler.roll(&pool, &mut rng).is_some())
            .count();

        // 99% binomial interval around p = 0.3
        let p = DEFAULT_INTERRUPT_PROBABILITY;
        let margin = 2.576 * (p * (1.0 - p) / trials as f64).sqrt();
        let observed = fired as f64 / trials as f64;
        assert!(
            (observed - p).abs() <= margin,
            "observed {} outside {} +/- {}",
            observed,
            p,
            margin
        );
    }

    #[test]
    fn test_selection_covers_pool() {
        let scheduler = EventScheduler::new(1.0);
        let pool = pool(4);
        let mut rng = StdRng::seed_from_u64(9);

        let mut seen = [0usize; 4];
        for _ in 0..2_000 {
            let idx = scheduler.roll(&pool, &mut rng).unwrap();
            seen[idx] += 1;
        }
        assert!(seen.iter().all(|&count| count > 300), "{:?}", seen);
    }

    #[test]
    fn test_empty_pool_never_interrupts() {
        let scheduler = EventScheduler::new(1.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(scheduler.roll(&[], &mut rng), None);
        }
    }

    #[test]
    fn test_probability_clamped() {
        assert_eq!(EventScheduler::new(1.5).probability(), 1.0);
        assert_eq!(EventScheduler::new(-0.2).probability(), 0.0);
        assert_eq!(EventScheduler::new(f64::NAN).probability(), 0.0);

        let never = EventScheduler::new(0.0);
        let mut rng = StdRng::seed_from_u64(5);
        assert!((0..100).all(|_| never.roll(&pool(2), &mut rng).is_none()));
    }
}
