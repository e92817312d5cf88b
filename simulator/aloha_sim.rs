//! Slotted ALOHA Simulation Example
//!
//! Run with: cargo run --example aloha_sim

mod report;

use log::info;
use mac_sim::mac_theory::{slotted_aloha_max_throughput, throughput_curve};
use mac_sim::{simulate, Protocol, SimulationConfig};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    println!("╔════════════════════════════════════════════════════════╗");
    println!("║        Slotted ALOHA Simulator                         ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    // p = 1/N gives G = 1, the throughput peak
    let config = SimulationConfig {
        protocol: Protocol::SlottedAloha,
        num_nodes: 10,
        transmission_prob: 0.1,
        num_slots: 10_000,
        seed: None, // Will be auto-generated
        ..Default::default()
    };

    info!("Configuration:");
    info!("  Nodes: {}", config.num_nodes);
    info!("  Transmission probability: {}", config.transmission_prob);
    info!("  Slots: {}", config.num_slots);

    let (trace, metrics) = match simulate(&config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    report::print_run_summary(&config, &trace, &metrics);
    report::print_slot_activity(&trace, 30);

    println!("Theoretical throughput vs offered load:");
    for (g, s) in throughput_curve(5.0, 11) {
        let bar = "█".repeat((s * 100.0).round() as usize);
        println!("  G={:>4.1}  S={:.4} {}", g, s, bar);
    }
    println!(
        "  Simulated point: G={:.2} S={:.4} (max {:.4} at G=1)\n",
        metrics.offered_load,
        metrics.throughput,
        slotted_aloha_max_throughput()
    );

    info!("✓ Simulation complete!");
}
