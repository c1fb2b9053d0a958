use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::error::{Error, ErrorKind, Result};

/// Validate a requested sample size and clamp it to `max`.
pub fn resolve_count(requested: usize, max: usize) -> Result<usize> {
    if requested == 0 {
        return Err(Error::invalid_argument("count must be at least 1"));
    }
    Ok(requested.min(max.max(1)))
}

/// Uniform sample of `count` distinct items (fewer if the pool is smaller).
///
/// Fisher-Yates over the pool, stopped after `count` swaps.
pub fn sample<'a, T, R>(mut pool: Vec<&'a T>, count: usize, rng: &mut R) -> Vec<&'a T>
where
    R: Rng + ?Sized,
{
    let amount = count.min(pool.len());
    pool.partial_shuffle(rng, amount);
    pool.truncate(amount);
    pool
}

/// [`sample`] with the thread-local RNG; fails on an empty pool.
pub fn sample_nonempty<'a, T>(pool: Vec<&'a T>, count: usize, what: &str) -> Result<Vec<&'a T>> {
    if pool.is_empty() {
        return Err(Error::new(ErrorKind::EmptyResult, format!("no {} match the filter", what)));
    }
    let mut rng = rand::thread_rng();
    Ok(sample(pool, count, &mut rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn count_is_validated_and_clamped() {
        assert_eq!(resolve_count(0, 20).unwrap_err().kind, ErrorKind::InvalidArgument);
        assert_eq!(resolve_count(5, 20).unwrap(), 5);
        assert_eq!(resolve_count(50, 20).unwrap(), 20);
        assert_eq!(resolve_count(15, 10).unwrap(), 10);
    }

    #[test]
    fn never_repeats_within_one_draw() {
        let items: Vec<u32> = (0..30).collect();
        let mut rng = StdRng::seed_from_u64(7);
        for count in 1..=30 {
            let picked = sample(items.iter().collect(), count, &mut rng);
            let distinct: HashSet<_> = picked.iter().collect();
            assert_eq!(picked.len(), count);
            assert_eq!(distinct.len(), count);
        }
    }

    #[test]
    fn small_pool_is_returned_whole() {
        let items = vec!["a", "b"];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample(items.iter().collect(), 20, &mut rng).len(), 2);
    }

    #[test]
    fn empty_pool_is_an_empty_result() {
        let items: Vec<u8> = Vec::new();
        let err = sample_nonempty(items.iter().collect(), 3, "images").unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyResult);
    }

    #[test]
    fn single_draws_cover_pool_uniformly() {
        let items: Vec<usize> = (0..10).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = [0usize; 10];
        for _ in 0..20_000 {
            let picked = sample(items.iter().collect(), 1, &mut rng);
            hits[*picked[0]] += 1;
        }
        // expected 2000 each, sd ~42
        for (item, &count) in hits.iter().enumerate() {
            assert!((1_700..=2_300).contains(&count), "item {} drawn {} times", item, count);
        }
    }
}
