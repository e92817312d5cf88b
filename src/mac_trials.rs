//! Per-slot transmission trials
//!
//! One Bernoulli draw per node, in ascending node order, so the same source
//! state always selects the same attempt set.

use crate::mac_interface::NodeId;
use crate::mac_random::RandomSource;

/// Nodes among `0..num_nodes` that attempt to transmit in one slot
pub fn generate_attempts(num_nodes: usize, p: f64, rng: &mut dyn RandomSource) -> Vec<NodeId> {
    (0..num_nodes).filter(|_| rng.bernoulli(p)).collect()
}

/// Subset of `candidates` selected with probability `p` each
///
/// Order of `candidates` is preserved; duplicates in the input are skipped.
pub fn generate_attempts_among(
    candidates: &[NodeId],
    p: f64,
    rng: &mut dyn RandomSource,
) -> Vec<NodeId> {
    let mut selected: Vec<NodeId> = Vec::with_capacity(candidates.len());
    for (i, &node) in candidates.iter().enumerate() {
        if candidates[..i].contains(&node) {
            continue;
        }
        if rng.bernoulli(p) {
            selected.push(node);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac_random::{SequenceSource, StdRandomSource};

    #[test]
    fn test_no_nodes_no_attempts() {
        let mut rng = StdRandomSource::from_seed([3u8; 32]);
        assert!(generate_attempts(0, 1.0, &mut rng).is_empty());
    }

    #[test]
    fn test_probability_boundaries() {
        let mut rng = StdRandomSource::from_seed([3u8; 32]);
        assert!(generate_attempts(20, 0.0, &mut rng).is_empty());
        assert_eq!(generate_attempts(20, 1.0, &mut rng), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_scripted_draws_select_nodes() {
        // node 0 draws 0.9, node 1 draws 0.1, node 2 draws 0.4
        let mut rng = SequenceSource::new(vec![0.9, 0.1, 0.4]);
        assert_eq!(generate_attempts(3, 0.5, &mut rng), vec![1, 2]);
        assert_eq!(rng.consumed(), 3, "one draw per node");
    }

    #[test]
    fn test_attempt_sets_are_unique_and_sorted() {
        let mut rng = StdRandomSource::from_seed([11u8; 32]);
        for _ in 0..200 {
            let attempts = generate_attempts(15, 0.4, &mut rng);
            assert!(attempts.windows(2).all(|w| w[0] < w[1]));
            assert!(attempts.iter().all(|&n| n < 15));
        }
    }

    #[test]
    fn test_among_skips_duplicate_candidates() {
        let mut rng = SequenceSource::constant(0.0);
        let selected = generate_attempts_among(&[4, 2, 4, 7], 0.5, &mut rng);
        assert_eq!(selected, vec![4, 2, 7]);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn test_attempt_frequency_tracks_probability() {
        let mut rng = StdRandomSource::from_seed([5u8; 32]);
        let slots = 5000;
        let total: usize = (0..slots)
            .map(|_| generate_attempts(10, 0.3, &mut rng).len())
            .sum();
        let mean = total as f64 / slots as f64;
        assert!((mean - 3.0).abs() < 0.15, "mean attempts {} should be near 3.0", mean);
    }
}
