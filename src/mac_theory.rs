//! Closed-form reference curves
//!
//! These are overlays for comparison with simulated results and are never
//! mixed into the simulated metrics.

/// Slotted ALOHA throughput S = G·e^(−G) at offered load G
pub fn slotted_aloha_throughput(offered_load: f64) -> f64 {
    offered_load * (-offered_load).exp()
}

/// Maximum Slotted ALOHA throughput, 1/e, reached at G = 1
pub fn slotted_aloha_max_throughput() -> f64 {
    (-1.0f64).exp()
}

/// CSMA/CD efficiency η = 1 / (1 + 5a)
pub fn csma_cd_efficiency(propagation_delay: f64) -> f64 {
    1.0 / (1.0 + 5.0 * propagation_delay)
}

/// `points` evenly spaced samples of (G, S) over `[0, max_load]`
pub fn throughput_curve(max_load: f64, points: usize) -> Vec<(f64, f64)> {
    match points {
        0 => Vec::new(),
        1 => vec![(0.0, 0.0)],
        _ => (0..points)
            .map(|i| {
                let g = max_load * i as f64 / (points - 1) as f64;
                (g, slotted_aloha_throughput(g))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aloha_peak_at_unit_load() {
        let peak = slotted_aloha_throughput(1.0);
        assert!((peak - 0.36788).abs() < 1e-5);
        assert_eq!(peak, slotted_aloha_max_throughput());
        assert!(slotted_aloha_throughput(0.5) < peak);
        assert!(slotted_aloha_throughput(2.0) < peak);
        assert_eq!(slotted_aloha_throughput(0.0), 0.0);
    }

    #[test]
    fn test_csma_cd_efficiency() {
        assert!((csma_cd_efficiency(0.01) - 1.0 / 1.05).abs() < 1e-12);
        assert!((csma_cd_efficiency(0.01) * 100.0 - 95.238).abs() < 1e-3);
        assert_eq!(csma_cd_efficiency(0.0), 1.0);
    }

    #[test]
    fn test_curve_sampling() {
        let curve = throughput_curve(5.0, 101);
        assert_eq!(curve.len(), 101);
        assert_eq!(curve[0], (0.0, 0.0));
        assert!((curve[100].0 - 5.0).abs() < 1e-12);
        assert!((curve[20].0 - 1.0).abs() < 1e-12);
        assert!(throughput_curve(5.0, 0).is_empty());
    }
}
