//! Random draws used by the matchmaker. Every function takes the random source
//! explicitly so seeded generators give reproducible pairings.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

/// Draws one item with probability proportional to `weight(item)`.
///
/// Non-finite or negative weights count as zero. When no item carries any
/// weight the draw degrades to uniform. Returns `None` only for an empty slice.
pub fn sample_weighted<'a, T, R>(
    items: &'a [T],
    weight: impl Fn(&T) -> f64,
    rng: &mut R,
) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return None;
    }

    let weights = items.iter().map(|item| {
        let w = weight(item);
        if w.is_finite() && w > 0.0 { w } else { 0.0 }
    });

    match WeightedIndex::new(weights) {
        Ok(dist) => items.get(dist.sample(rng)),
        Err(_) => items.choose(rng),
    }
}

/// Two distinct items drawn uniformly.
pub fn sample_two<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<(&'a T, &'a T)>
where
    R: Rng + ?Sized,
{
    let mut picked = items.choose_multiple(rng, 2);
    let first = picked.next()?;
    let second = picked.next()?;
    Some((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_slice_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert!(sample_weighted(&empty, |_| 1.0, &mut rng).is_none());
        assert!(sample_two(&[1u8], &mut rng).is_none());
    }

    #[test]
    fn zero_weight_items_are_never_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = [0u32, 1, 2, 3];
        for _ in 0..500 {
            let drawn = sample_weighted(&items, |&i| if i == 2 { 1.0 } else { 0.0 }, &mut rng);
            assert_eq!(drawn, Some(&2));
        }
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = [10, 20, 30];
        let mut seen = [false; 3];
        for _ in 0..300 {
            let drawn = sample_weighted(&items, |_| f64::NAN, &mut rng).unwrap();
            seen[(*drawn / 10 - 1) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn heavier_items_win_more_often() {
        let mut rng = StdRng::seed_from_u64(11);
        let items = [1.0_f64, 9.0];
        let heavy = (0..5_000)
            .filter(|_| *sample_weighted(&items, |w| *w, &mut rng).unwrap() == 9.0)
            .count();
        assert!((4_200..4_800).contains(&heavy), "heavy drawn {heavy} times");
    }

    #[test]
    fn sample_two_returns_distinct_positions() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = [1, 2, 3, 4, 5];
        for _ in 0..200 {
            let (a, b) = sample_two(&items, &mut rng).unwrap();
            assert_ne!(a, b);
        }
    }
}
