// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/aloha_optimal_load.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/csma_comparison.yaml --seed 0x1234...

mod report;

use std::env;
use std::fs;
use std::path::Path;

use log::info;
use mac_sim::{
    compare_protocols_averaged, simulate, Protocol, SimulationConfig, StdRandomSource,
};
use simple_logger::SimpleLogger;

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Simulation parameters; omitted fields keep their defaults
    #[serde(default)]
    config: SimulationConfig,

    /// Protocols to compare under the same parameters (empty = single run)
    #[serde(default)]
    compare: Vec<Protocol>,

    /// Runs pooled per protocol when comparing
    #[serde(default = "default_runs")]
    runs: usize,

    /// Where to write the trace (single run) or comparison table as CSV
    #[serde(default)]
    csv_output: Option<String>,

    /// Records shown in the activity timeline
    #[serde(default)]
    timeline: usize,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
}

fn default_runs() -> usize {
    1
}

fn main() {
    SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml | directory/> [--seed SEED_HEX]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/aloha_optimal_load.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/csma_comparison.yaml --seed 0x123456...", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    // Parse optional seed
    let seed: Option<[u8; 32]> = if args.len() >= 4 && args[2] == "--seed" {
        Some(parse_seed_hex(&args[3]))
    } else {
        None
    };

    if path.is_file() {
        run_scenario_file(path, seed);
    } else if path.is_dir() {
        run_scenario_directory(path, seed);
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        std::process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<[u8; 32]>) {
    let mut scenarios = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let extension = path.extension().and_then(|s| s.to_str());
            if extension == Some("yaml") || extension == Some("yml") {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO RUNNER - Multiple Scenarios                 ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}\n", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, seed);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  All scenarios complete!                               ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
}

fn run_scenario_file(path: &Path, seed: Option<[u8; 32]>) {
    info!("Loading scenario from: {}", path.display());

    let yaml_content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let mut scenario: ScenarioFile = serde_yaml::from_str(&yaml_content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", path.display(), e);
        std::process::exit(1);
    });

    println!("\n╔════════════════════════════════════════════════════════╗");
    let name = scenario.meta.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scenario")
            .to_string()
    });
    println!("║  {:<54}║", name);
    println!("╚════════════════════════════════════════════════════════╝\n");

    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    if seed.is_some() {
        scenario.config.seed = seed;
    }

    if scenario.compare.is_empty() {
        run_single(&scenario);
    } else {
        run_comparison(&scenario);
    }

    println!("\n✓ Scenario complete!\n");
}

fn run_single(scenario: &ScenarioFile) {
    let (trace, metrics) = simulate(&scenario.config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    report::print_run_summary(&scenario.config, &trace, &metrics);

    if scenario.timeline > 0 {
        report::print_slot_activity(&trace, scenario.timeline);
        if scenario.config.protocol.is_csma() {
            report::print_node_timeline(&trace, scenario.timeline);
        }
    }

    if let Some(ref csv_path) = scenario.csv_output {
        match report::export_trace(csv_path, &trace) {
            Ok(()) => info!("Trace exported to: {}", csv_path),
            Err(e) => eprintln!("Error writing CSV {}: {}", csv_path, e),
        }
    }
}

fn run_comparison(scenario: &ScenarioFile) {
    let seed = scenario.config.resolve_seed();
    info!("Comparison seed: {:?}", seed);
    let mut rng = StdRandomSource::from_seed(seed);

    let rows = compare_protocols_averaged(
        &scenario.config,
        &scenario.compare,
        scenario.runs,
        &mut rng,
    )
    .unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    report::print_comparison(&rows);

    if let Some(ref csv_path) = scenario.csv_output {
        match report::export_comparison(csv_path, &rows) {
            Ok(()) => info!("Comparison exported to: {}", csv_path),
            Err(e) => eprintln!("Error writing CSV {}: {}", csv_path, e),
        }
    }
}

fn parse_seed_hex(hex: &str) -> [u8; 32] {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut seed = [0u8; 32];

    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        if i >= 32 {
            break;
        }
        let parsed = std::str::from_utf8(chunk)
            .ok()
            .and_then(|byte_str| u8::from_str_radix(byte_str, 16).ok());
        seed[i] = parsed.unwrap_or_else(|| {
            eprintln!("Invalid hex seed: {}", hex);
            std::process::exit(1);
        });
    }

    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_hex() {
        let seed = parse_seed_hex("0x2a2a");
        assert_eq!(seed[0], 0x2a);
        assert_eq!(seed[1], 0x2a);
        assert_eq!(seed[2], 0);
    }

    #[test]
    fn test_scenario_file_defaults() {
        let yaml = "meta:\n  name: test\n\
                    config:\n  num_nodes: 4\n\
                    compare: [SlottedAloha, CsmaCd]\n";
        let scenario: ScenarioFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.config.num_nodes, 4);
        assert_eq!(scenario.compare, vec![Protocol::SlottedAloha, Protocol::CsmaCd]);
        assert_eq!(scenario.runs, 1);
        assert!(scenario.csv_output.is_none());
    }

    #[test]
    fn test_negative_node_count_fails_to_parse() {
        let yaml = "config:\n  num_nodes: -3\n";
        assert!(serde_yaml::from_str::<ScenarioFile>(yaml).is_err());
    }
}
