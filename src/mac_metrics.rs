//! Metrics aggregation and cross-protocol comparison

use log::{debug, info};

use crate::mac_config::{ConfigError, SimulationConfig};
use crate::mac_interface::{Protocol, SimTime, SimulationTrace, SlotOutcome};
use crate::mac_random::{RandomSource, StdRandomSource};
use crate::mac_runner::run;
use crate::mac_theory::{
    csma_cd_efficiency, slotted_aloha_max_throughput, slotted_aloha_throughput,
};

/// Aggregate statistics of one run (or of several pooled runs)
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    pub protocol: Protocol,

    pub success_count: usize,
    pub collision_count: usize,
    pub idle_count: usize,

    /// Number of trace records the counts were taken from
    pub records: usize,

    /// Simulated time covered, in slots
    pub total_time: SimTime,

    /// Time spent in successful transmissions
    pub success_time: SimTime,

    /// G = N × p
    pub offered_load: f64,

    /// Successes per slot (Slotted ALOHA) or per slot-time (CSMA variants)
    pub throughput: f64,

    /// Throughput relative to channel capacity, in [0, 100]
    pub efficiency_percent: f64,

    /// Share of time spent in successful transmissions
    pub channel_utilization_percent: f64,

    /// G·e^(−G), Slotted ALOHA only
    pub theoretical_throughput: Option<f64>,

    /// Simulated throughput as a share of the 1/e bound, Slotted ALOHA only
    pub percent_of_theoretical_max: Option<f64>,

    /// 1/(1+5a) × 100, CSMA/CD only
    pub theoretical_efficiency_percent: Option<f64>,
}

impl RunMetrics {
    pub fn success_rate_percent(&self) -> f64 {
        percent(self.success_count as f64, self.records as f64)
    }

    pub fn collision_rate_percent(&self) -> f64 {
        percent(self.collision_count as f64, self.records as f64)
    }

    pub fn idle_rate_percent(&self) -> f64 {
        percent(self.idle_count as f64, self.records as f64)
    }
}

/// One protocol's result in a comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub protocol: Protocol,

    /// Number of runs pooled into `metrics`
    pub runs: usize,

    pub metrics: RunMetrics,
}

/// Raw sums that every metric is derived from
#[derive(Debug, Clone, Default)]
struct Totals {
    success: usize,
    collision: usize,
    idle: usize,
    records: usize,
    total_time: SimTime,
    success_time: SimTime,
}

impl Totals {
    fn from_trace(trace: &SimulationTrace) -> Self {
        let mut totals = Totals::default();
        totals.add_trace(trace);
        totals
    }

    fn add_trace(&mut self, trace: &SimulationTrace) {
        for record in &trace.records {
            match record.outcome {
                SlotOutcome::Idle => self.idle += 1,
                SlotOutcome::Success => {
                    self.success += 1;
                    self.success_time += record.duration;
                }
                SlotOutcome::Collision => self.collision += 1,
            }
            self.total_time += record.duration;
        }
        self.records += trace.len();
    }

    fn into_metrics(self, config: &SimulationConfig) -> RunMetrics {
        let protocol = config.protocol;
        let offered_load = config.offered_load();

        let (throughput, capacity) = if protocol.is_csma() {
            (ratio(self.success as f64, self.total_time), 1.0 / config.frame_time)
        } else {
            (ratio(self.success as f64, self.records as f64), 1.0)
        };
        let efficiency_percent = (throughput / capacity * 100.0).clamp(0.0, 100.0);

        let (theoretical_throughput, percent_of_theoretical_max) = match protocol {
            Protocol::SlottedAloha => (
                Some(slotted_aloha_throughput(offered_load)),
                Some(throughput / slotted_aloha_max_throughput() * 100.0),
            ),
            _ => (None, None),
        };
        let theoretical_efficiency_percent = match protocol {
            Protocol::CsmaCd => Some(csma_cd_efficiency(config.propagation_delay) * 100.0),
            _ => None,
        };

        RunMetrics {
            protocol,
            success_count: self.success,
            collision_count: self.collision,
            idle_count: self.idle,
            records: self.records,
            total_time: self.total_time,
            success_time: self.success_time,
            offered_load,
            throughput,
            efficiency_percent,
            channel_utilization_percent: percent(self.success_time, self.total_time),
            theoretical_throughput,
            percent_of_theoretical_max,
            theoretical_efficiency_percent,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    ratio(part, whole) * 100.0
}

/// Reduce a trace into its metrics
pub fn aggregate(trace: &SimulationTrace, config: &SimulationConfig) -> RunMetrics {
    Totals::from_trace(trace).into_metrics(config)
}

/// Validate, seed and run `config`, returning the trace and its metrics
///
/// The seed is taken from the configuration or drawn fresh, and recorded in
/// the returned trace.
pub fn simulate(config: &SimulationConfig) -> Result<(SimulationTrace, RunMetrics), ConfigError> {
    config.validate()?;
    let seed = config.resolve_seed();
    let mut rng = StdRandomSource::from_seed(seed);

    let mut trace = run(config, &mut rng)?;
    trace.seed_used = Some(seed);
    let metrics = aggregate(&trace, config);
    Ok((trace, metrics))
}

/// Run every protocol once under the otherwise identical `base` parameters
///
/// Rows come back in the order of `protocols`.
pub fn compare_protocols(
    base: &SimulationConfig,
    protocols: &[Protocol],
    rng: &mut dyn RandomSource,
) -> Result<Vec<ComparisonRow>, ConfigError> {
    compare_protocols_averaged(base, protocols, 1, rng)
}

/// Run every protocol `runs` times and pool the results per protocol
///
/// Pooling sums the raw counts and times over all runs before deriving the
/// rates, so every row still satisfies the count invariants.
pub fn compare_protocols_averaged(
    base: &SimulationConfig,
    protocols: &[Protocol],
    runs: usize,
    rng: &mut dyn RandomSource,
) -> Result<Vec<ComparisonRow>, ConfigError> {
    if runs == 0 {
        return Err(ConfigError::InvalidRunCount(runs));
    }
    base.validate()?;

    info!(
        "Comparing {} protocols: N={} p={} a={} runs={}",
        protocols.len(),
        base.num_nodes,
        base.transmission_prob,
        base.propagation_delay,
        runs
    );

    let mut rows = Vec::with_capacity(protocols.len());
    for &protocol in protocols {
        let config = base.with_protocol(protocol);
        let mut totals = Totals::default();
        for i in 0..runs {
            debug!("{} run {}/{}", protocol, i + 1, runs);
            let trace = run(&config, &mut *rng)?;
            totals.add_trace(&trace);
        }
        rows.push(ComparisonRow {
            protocol,
            runs,
            metrics: totals.into_metrics(&config),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac_interface::SlotRecord;

    fn config(protocol: Protocol, num_nodes: usize, p: f64, slots: usize) -> SimulationConfig {
        SimulationConfig {
            protocol,
            num_nodes,
            transmission_prob: p,
            num_slots: slots,
            seed: Some([42u8; 32]),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_sum_to_trace_length() {
        for protocol in Protocol::ALL {
            let (trace, metrics) = simulate(&config(protocol, 7, 0.15, 500)).unwrap();
            assert_eq!(
                metrics.success_count + metrics.collision_count + metrics.idle_count,
                trace.len(),
                "{}",
                protocol
            );
            assert_eq!(metrics.records, trace.len());
            assert!((0.0..=100.0).contains(&metrics.efficiency_percent));
            assert!((0.0..=100.0).contains(&metrics.channel_utilization_percent));
        }
    }

    #[test]
    fn test_no_nodes_zero_throughput() {
        for protocol in Protocol::ALL {
            let (trace, metrics) = simulate(&config(protocol, 0, 0.5, 200)).unwrap();
            assert_eq!(metrics.idle_count, trace.len());
            assert_eq!(metrics.throughput, 0.0);
            assert_eq!(metrics.efficiency_percent, 0.0);
            assert_eq!(metrics.channel_utilization_percent, 0.0);
        }
    }

    #[test]
    fn test_zero_probability_all_idle() {
        let (_, metrics) = simulate(&config(Protocol::SlottedAloha, 5, 0.0, 1000)).unwrap();
        assert_eq!(metrics.idle_count, 1000);
        assert_eq!(metrics.success_count, 0);
        assert_eq!(metrics.collision_count, 0);
    }

    #[test]
    fn test_offered_load_is_exact() {
        for (n, p) in [(10, 0.1), (3, 0.25), (0, 0.9), (50, 1.0)] {
            let (_, metrics) = simulate(&config(Protocol::SlottedAloha, n, p, 10)).unwrap();
            assert_eq!(metrics.offered_load, n as f64 * p);
        }
    }

    #[test]
    fn test_aloha_converges_near_theory() {
        let (_, metrics) = simulate(&config(Protocol::SlottedAloha, 10, 0.1, 10_000)).unwrap();
        assert!(
            (metrics.throughput - 0.368).abs() < 0.04,
            "throughput {} should be near 1/e",
            metrics.throughput
        );
        assert!((metrics.efficiency_percent - 36.8).abs() < 4.0);
        assert_eq!(metrics.channel_utilization_percent, metrics.efficiency_percent);

        let theory = metrics.theoretical_throughput.unwrap();
        assert!((theory - 0.36788).abs() < 1e-5);
        assert!(metrics.theoretical_efficiency_percent.is_none());
    }

    #[test]
    fn test_csma_cd_theory_reported_separately() {
        let cfg = SimulationConfig {
            propagation_delay: 0.01,
            ..config(Protocol::CsmaCd, 6, 0.12, 400)
        };
        let (_, metrics) = simulate(&cfg).unwrap();
        let theory = metrics.theoretical_efficiency_percent.unwrap();
        assert!((theory - 100.0 / 1.05).abs() < 1e-9);
        assert!(metrics.channel_utilization_percent < 100.0);
        assert_ne!(theory, metrics.channel_utilization_percent);
        assert!(metrics.theoretical_throughput.is_none());
    }

    #[test]
    fn test_csma_throughput_uses_time() {
        let cfg = config(Protocol::OnePersistentCsma, 2, 0.5, 10);
        let mut trace = SimulationTrace::new(Protocol::OnePersistentCsma, 2);
        let durations = [
            (SlotOutcome::Success, 1.0),
            (SlotOutcome::Idle, 1.0),
            (SlotOutcome::Collision, 2.0),
        ];
        let mut start = 0.0;
        for (i, (outcome, duration)) in durations.iter().enumerate() {
            trace.records.push(SlotRecord {
                index: i,
                start,
                duration: *duration,
                attempting: Vec::new(),
                outcome: *outcome,
            });
            start += duration;
        }

        let metrics = aggregate(&trace, &cfg);
        assert_eq!(metrics.total_time, 4.0);
        assert_eq!(metrics.throughput, 0.25);
        assert_eq!(metrics.efficiency_percent, 25.0);
        assert_eq!(metrics.channel_utilization_percent, 25.0);
        assert!((metrics.collision_rate_percent() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_metrics() {
        for protocol in Protocol::ALL {
            let cfg = config(protocol, 9, 0.2, 300);
            let (trace_a, metrics_a) = simulate(&cfg).unwrap();
            let (trace_b, metrics_b) = simulate(&cfg).unwrap();
            assert_eq!(trace_a.records, trace_b.records);
            assert_eq!(metrics_a, metrics_b);
            assert_eq!(trace_a.seed_used, Some([42u8; 32]));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = SimulationConfig {
            propagation_delay: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            simulate(&cfg),
            Err(ConfigError::InvalidPropagationDelay(_))
        ));
    }

    #[test]
    fn test_comparison_preserves_order() {
        let order = [
            Protocol::CsmaCd,
            Protocol::SlottedAloha,
            Protocol::NonPersistentCsma,
        ];
        let mut rng = StdRandomSource::from_seed([42u8; 32]);
        let rows = compare_protocols(&config(Protocol::SlottedAloha, 6, 0.1, 300), &order, &mut rng)
            .unwrap();
        let protocols: Vec<Protocol> = rows.iter().map(|r| r.protocol).collect();
        assert_eq!(protocols, order.to_vec());
        for row in &rows {
            assert_eq!(row.runs, 1);
            assert_eq!(row.metrics.protocol, row.protocol);
            assert_eq!(row.metrics.offered_load, 6.0 * 0.1);
        }
    }

    #[test]
    fn test_averaged_comparison_pools_runs() {
        let base = config(Protocol::SlottedAloha, 5, 0.2, 100);
        let mut rng = StdRandomSource::from_seed([7u8; 32]);
        let protocols = [Protocol::SlottedAloha, Protocol::CsmaCd];
        let rows = compare_protocols_averaged(&base, &protocols, 3, &mut rng).unwrap();

        assert_eq!(rows.len(), 2);
        let aloha = &rows[0].metrics;
        assert_eq!(rows[0].runs, 3);
        assert_eq!(aloha.records, 300);
        assert_eq!(
            aloha.success_count + aloha.collision_count + aloha.idle_count,
            300
        );
    }

    #[test]
    fn test_zero_runs_rejected() {
        let mut rng = StdRandomSource::from_seed([7u8; 32]);
        assert_eq!(
            compare_protocols_averaged(&SimulationConfig::default(), &Protocol::ALL, 0, &mut rng),
            Err(ConfigError::InvalidRunCount(0))
        );
    }
}
