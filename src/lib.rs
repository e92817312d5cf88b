//! # mac-sim - Medium Access Control Protocol Simulator
//!
//! Slot-level simulations of Slotted ALOHA and the CSMA family (1-persistent,
//! non-persistent, p-persistent and CSMA/CD), producing per-slot outcome
//! traces and the throughput, efficiency and channel-utilization statistics
//! derived from them.
//!
//! ## Core Components
//!
//! - **Trial generator** (`mac_trials`): per-slot Bernoulli transmission draws
//! - **Classifier** (`mac_classifier`): idle/success/collision rule, channel
//!   time costs and backoff windows
//! - **Runner** (`mac_runner`): slot loop for ALOHA, time-horizon loop for CSMA
//! - **Metrics** (`mac_metrics`): aggregation and cross-protocol comparison
//!
//! All randomness flows through an injected [`RandomSource`], so a run is
//! reproducible from its seed.
//!
//! ```no_run
//! use mac_sim::{simulate, Protocol, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     num_nodes: 10,
//!     transmission_prob: 0.1,
//!     num_slots: 10_000,
//!     protocol: Protocol::SlottedAloha,
//!     seed: Some([42u8; 32]),
//!     ..Default::default()
//! };
//!
//! let (trace, metrics) = simulate(&config).expect("valid configuration");
//! println!("{} slots, throughput {:.3}", trace.len(), metrics.throughput);
//! ```
//!
//! ## Simulation Harness
//!
//! Scenario files, console reports and CSV export live in the `simulator/`
//! directory, outside the library.

pub mod mac_classifier;
pub mod mac_config;
pub mod mac_interface;
pub mod mac_metrics;
pub mod mac_random;
pub mod mac_runner;
pub mod mac_theory;
pub mod mac_trials;

// Re-export commonly used types
pub use mac_config::{BackoffConfig, ConfigError, SensingConfig, SimulationConfig};
pub use mac_interface::{
    NodeActivity, NodeId, Protocol, SimTime, SimulationTrace, SlotOutcome, SlotRecord,
};
pub use mac_metrics::{
    aggregate, compare_protocols, compare_protocols_averaged, simulate, ComparisonRow, RunMetrics,
};
pub use mac_random::{RandomSource, SequenceSource, StdRandomSource};
pub use mac_runner::run;
