use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

/// Reproducible random subsampling for the scatter graphs.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: Pcg32,
    size: usize,
}

impl Sampler {
    /// Creates a sampler drawing at most `size` items per call.
    ///
    /// Without a seed the generator is seeded from the thread RNG.
    #[must_use]
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        log::debug!("sampling with seed {seed}");
        Self {
            rng: Pcg32::seed_from_u64(seed),
            size,
        }
    }

    /// Picks up to `size` distinct items, all of them when there are fewer.
    pub fn sample<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        if items.len() <= self.size {
            return items.to_vec();
        }
        items
            .choose_multiple(&mut self.rng, self.size)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sample() {
        let items = (0..1000).collect::<Vec<_>>();
        let a = Sampler::new(10, Some(7)).sample(&items);
        let b = Sampler::new(10, Some(7)).sample(&items);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        let mut unique = a.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_small_input_kept_whole() {
        let mut sampler = Sampler::new(10, Some(1));
        assert_eq!(sampler.sample(&[3, 1, 2]), vec![3, 1, 2]);
    }
}
