//! Test simulation with fixed seed for reproducibility
//!
//! Run with: cargo run --example fixed_seed_test

use log::info;
use mac_sim::{simulate, Protocol, SimulationConfig};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    // Use a fixed seed for reproducible results
    let fixed_seed = [42u8; 32];

    info!("Running simulations with fixed seed: {:?}", fixed_seed);

    for protocol in Protocol::ALL {
        let config = SimulationConfig {
            protocol,
            num_nodes: 10,
            transmission_prob: 0.1,
            num_slots: 1000,
            seed: Some(fixed_seed),
            ..Default::default()
        };

        let (first_trace, first) = simulate(&config).unwrap();
        let (second_trace, second) = simulate(&config).unwrap();

        assert_eq!(first_trace.seed_used, Some(fixed_seed), "Seed mismatch!");
        assert_eq!(first_trace.records, second_trace.records, "Trace mismatch!");
        assert_eq!(first, second, "Metrics mismatch!");

        info!(
            "{}: {} successes, {} collisions, {} idle",
            protocol, first.success_count, first.collision_count, first.idle_count
        );
    }

    info!("✓ Seed verification passed!");
}
