//! Weighted operator selection.
//!
//! A single-draw, memoryless weighted choice over the eligible candidates
//! for one source. Each invocation is independent; the draw uses integer
//! arithmetic so there is no floating-point boundary to argue about.

use rand::Rng;
use serde::Serialize;

/// One eligible operator paired with its assignment weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Candidate {
    pub operator_id: i64,
    pub weight: i64,
}

/// Pick one operator from a weighted candidate list, or `None` when no
/// candidate can be selected.
///
/// Each candidate is selected with probability `weight / total_weight`.
/// Weights at or below zero contribute nothing to the total and are never
/// selected; a list whose total weight is zero behaves like an empty one.
///
/// The randomness only needs to be uniform, not cryptographic. Callers pass
/// the RNG so tests can seed a deterministic one.
pub fn select_weighted<R: Rng + ?Sized>(candidates: &[Candidate], rng: &mut R) -> Option<i64> {
    if candidates.is_empty() {
        return None;
    }

    let total: i64 = candidates.iter().map(|c| c.weight.max(0)).sum();
    if total <= 0 {
        return None;
    }

    // Draw in [0, total): the last weighted candidate absorbs the top
    // boundary, so the walk below always lands.
    let draw = rng.gen_range(0..total);

    let mut cumulative = 0i64;
    for candidate in candidates {
        cumulative += candidate.weight.max(0);
        if draw < cumulative {
            return Some(candidate.operator_id);
        }
    }

    // Unreachable with an integer draw; kept as the contract's fallback.
    candidates.iter().find(|c| c.weight > 0).map(|c| c.operator_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn candidate(operator_id: i64, weight: i64) -> Candidate {
        Candidate { operator_id, weight }
    }

    #[test]
    fn test_empty_candidates_select_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_weighted(&[], &mut rng), None);
    }

    #[test]
    fn test_single_candidate_always_selected() {
        let mut rng = StdRng::seed_from_u64(2);
        let candidates = [candidate(7, 3)];
        for _ in 0..100 {
            assert_eq!(select_weighted(&candidates, &mut rng), Some(7));
        }
    }

    #[test]
    fn test_selection_stays_within_candidate_list() {
        let mut rng = StdRng::seed_from_u64(3);
        let candidates = [candidate(1, 2), candidate(2, 5), candidate(3, 1)];
        let ids: Vec<i64> = candidates.iter().map(|c| c.operator_id).collect();
        for _ in 0..1_000 {
            let chosen = select_weighted(&candidates, &mut rng).expect("total weight is positive");
            assert!(ids.contains(&chosen), "selected unknown operator {}", chosen);
        }
    }

    #[test]
    fn test_zero_weight_candidate_never_selected() {
        let mut rng = StdRng::seed_from_u64(4);
        let candidates = [candidate(1, 0), candidate(2, 5)];
        for _ in 0..1_000 {
            assert_eq!(select_weighted(&candidates, &mut rng), Some(2));
        }
    }

    #[test]
    fn test_negative_weight_treated_as_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let candidates = [candidate(1, -3), candidate(2, 2)];
        for _ in 0..1_000 {
            assert_eq!(select_weighted(&candidates, &mut rng), Some(2));
        }
    }

    #[test]
    fn test_all_zero_weights_select_none() {
        let mut rng = StdRng::seed_from_u64(6);
        let candidates = [candidate(1, 0), candidate(2, 0)];
        assert_eq!(select_weighted(&candidates, &mut rng), None);
    }

    #[test]
    fn test_selection_frequency_tracks_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let candidates = [candidate(1, 1), candidate(2, 3)];

        let trials = 40_000;
        let mut counts: HashMap<i64, u32> = HashMap::new();
        for _ in 0..trials {
            let chosen = select_weighted(&candidates, &mut rng).expect("total weight is positive");
            *counts.entry(chosen).or_default() += 1;
        }

        let share_one = f64::from(counts[&1]) / trials as f64;
        let share_two = f64::from(counts[&2]) / trials as f64;

        // Expected 0.25 / 0.75; allow generous tolerance for a seeded run.
        assert!((share_one - 0.25).abs() < 0.02, "weight-1 share was {}", share_one);
        assert!((share_two - 0.75).abs() < 0.02, "weight-3 share was {}", share_two);
    }

    #[test]
    fn test_equal_weights_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = [candidate(1, 1), candidate(2, 1), candidate(3, 1)];

        let trials = 30_000;
        let mut counts: HashMap<i64, u32> = HashMap::new();
        for _ in 0..trials {
            let chosen = select_weighted(&candidates, &mut rng).expect("total weight is positive");
            *counts.entry(chosen).or_default() += 1;
        }

        for id in [1, 2, 3] {
            let share = f64::from(counts[&id]) / trials as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.02, "operator {} share was {}", id, share);
        }
    }
}
