use log::info;
use simple_logger::SimpleLogger;

use mac_sim::mac_theory::slotted_aloha_throughput;
use mac_sim::{aggregate, run, Protocol, SimulationConfig, StdRandomSource};

fn main() {
    SimpleLogger::new().init().unwrap();

    info!("starting");

    let num_nodes = 20;
    let num_slots = 5000;
    let mut rng = StdRandomSource::from_entropy();

    // sweep the offered load G = N × p from 0.25 to 5.0
    println!("{:>6} {:>8} {:>10} {:>10}", "G", "p", "simulated", "theory");
    for step in 1..=20 {
        let offered_load = step as f64 * 0.25;
        let config = SimulationConfig {
            protocol: Protocol::SlottedAloha,
            num_nodes,
            transmission_prob: offered_load / num_nodes as f64,
            num_slots,
            ..Default::default()
        };

        let trace = match run(&config, &mut rng) {
            Ok(trace) => trace,
            Err(e) => {
                eprintln!("skipping G={}: {}", offered_load, e);
                continue;
            }
        };
        let metrics = aggregate(&trace, &config);

        println!(
            "{:>6.2} {:>8.4} {:>10.4} {:>10.4}",
            metrics.offered_load,
            config.transmission_prob,
            metrics.throughput,
            slotted_aloha_throughput(metrics.offered_load)
        );
    }

    info!("let seed = {:?};", rng.seed());
}
