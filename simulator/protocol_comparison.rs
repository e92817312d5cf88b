//! Protocol Comparison Example
//!
//! Run with: cargo run --example protocol_comparison --release
//!
//! Runs every protocol variant under the same N, p and a, pooling several
//! runs per protocol, and exports the table as CSV.

mod report;

use log::info;
use mac_sim::{compare_protocols_averaged, Protocol, SimulationConfig, StdRandomSource};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    let config = SimulationConfig {
        num_nodes: 6,
        transmission_prob: 0.12,
        num_slots: 400,
        propagation_delay: 0.1,
        ..Default::default()
    };
    let runs = 6;

    let seed = config.resolve_seed();
    info!("Comparison seed: {:?}", seed);
    let mut rng = StdRandomSource::from_seed(seed);

    let rows = match compare_protocols_averaged(&config, &Protocol::ALL, runs, &mut rng) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    report::print_comparison(&rows);

    let csv_path = "mac_protocol_comparison.csv";
    match report::export_comparison(csv_path, &rows) {
        Ok(()) => info!("Comparison exported to: {}", csv_path),
        Err(e) => eprintln!("Error writing CSV: {}", e),
    }
}
