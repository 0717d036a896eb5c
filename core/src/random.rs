use rand::Rng;

use crate::*;

/// Cumulative-weight walk over `choices`. An empty list yields `None`; a list
/// whose weights sum to nothing, or overflow, yields the first choice.
/// Negative and NaN weights count as zero.
pub fn pick_weighted<'a, R: Rng + ?Sized>(
    choices: &'a [WeightedChoice],
    rng: &mut R,
) -> Option<&'a WeightedChoice> {
    let Some(first) = choices.first() else {
        log::warn!("No choices available for random selection");
        return None;
    };

    let weight = |choice: &WeightedChoice| {
        if choice.weight.is_finite() && choice.weight > 0.0 {
            choice.weight
        } else {
            0.0
        }
    };
    let total: f64 = choices.iter().map(weight).sum();
    if total <= 0.0 {
        log::warn!("Weighted choice has no positive weight, using the first choice");
        return Some(first);
    }
    if !total.is_finite() {
        log::warn!("Weighted choice total overflowed, using the first choice");
        return Some(first);
    }

    let draw = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for choice in choices {
        let w = weight(choice);
        cumulative += w;
        if w > 0.0 && cumulative >= draw {
            return Some(choice);
        }
    }
    // float rounding on the last bucket
    choices.iter().rev().find(|choice| weight(choice) > 0.0)
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

pub fn pick_uniform<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.gen_range(0..items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn choice(entity_id: EntityId, weight: f64) -> WeightedChoice {
        WeightedChoice {
            target: TransitionTarget {
                entity_id,
                sound: None,
                animation: None,
            },
            weight,
        }
    }

    #[test]
    fn weights_converge_to_ratio() {
        let mut rng = SmallRng::seed_from_u64(7);
        let choices = [choice(20, 1.0), choice(21, 3.0)];

        let mut counts = [0u32; 2];
        for _ in 0..10_000 {
            let picked = pick_weighted(&choices, &mut rng).unwrap();
            counts[(picked.target.entity_id - 20) as usize] += 1;
        }

        let ratio = f64::from(counts[1]) / f64::from(counts[0]);
        assert!((2.7..3.3).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn degenerate_lists_fall_back() {
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(pick_weighted(&[], &mut rng).is_none());

        let zeros = [choice(4, 0.0), choice(5, 0.0)];
        assert_eq!(pick_weighted(&zeros, &mut rng).unwrap().target.entity_id, 4);

        let skewed = [choice(4, -2.0), choice(5, f64::NAN), choice(6, 1.0)];
        for _ in 0..50 {
            assert_eq!(pick_weighted(&skewed, &mut rng).unwrap().target.entity_id, 6);
        }

        let huge = [choice(4, f64::MAX), choice(5, f64::MAX)];
        assert_eq!(pick_weighted(&huge, &mut rng).unwrap().target.entity_id, 4);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut items = [1, 2, 3, 4, 5, 6];

        shuffle(&mut items, &mut rng);
        let mut sorted = items;
        sorted.sort();

        assert_eq!(sorted, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn uniform_pick_stays_in_slice() {
        let mut rng = SmallRng::seed_from_u64(3);

        assert_eq!(pick_uniform::<u8, _>(&[], &mut rng), None);
        for _ in 0..20 {
            assert!([7, 8, 9].contains(pick_uniform(&[7, 8, 9], &mut rng).unwrap()));
        }
    }
}
