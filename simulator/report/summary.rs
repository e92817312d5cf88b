//! Console summaries

use mac_sim::{
    ComparisonRow, NodeActivity, RunMetrics, SimulationConfig, SimulationTrace, SlotOutcome,
};

/// Print parameters, counts and metrics of a single run
pub fn print_run_summary(config: &SimulationConfig, trace: &SimulationTrace, metrics: &RunMetrics) {
    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║        {:<48}║", format!("{} Simulation Results", metrics.protocol));
    println!("╚════════════════════════════════════════════════════════╝\n");

    println!("Configuration:");
    if let Some(seed) = trace.seed_used {
        println!("  Seed: {:?}", seed);
    }
    println!("  Nodes (N): {}", config.num_nodes);
    println!("  Transmission probability (p): {:.2}", config.transmission_prob);
    println!("  Offered load (G): {:.3}", metrics.offered_load);
    if metrics.protocol.is_csma() {
        println!("  Time horizon: {} slots", config.num_slots);
        println!("  Propagation delay (a): {}", config.propagation_delay);
        println!("  Frame time: {} slots", config.frame_time);
    } else {
        println!("  Time slots: {}", config.num_slots);
    }
    println!();

    println!("Outcomes ({} records, {:.1} slots):", metrics.records, metrics.total_time);
    println!(
        "  Successful: {} ({:.1}%)",
        metrics.success_count,
        metrics.success_rate_percent()
    );
    println!(
        "  Collisions: {} ({:.1}%)",
        metrics.collision_count,
        metrics.collision_rate_percent()
    );
    println!(
        "  Idle: {} ({:.1}%)",
        metrics.idle_count,
        metrics.idle_rate_percent()
    );
    println!();

    println!("Performance:");
    println!("  Throughput (S): {:.4}", metrics.throughput);
    println!("  Efficiency: {:.1}%", metrics.efficiency_percent);
    println!(
        "  Channel utilization: {:.1}%",
        metrics.channel_utilization_percent
    );
    if let Some(theory) = metrics.theoretical_throughput {
        println!("  Theoretical S = G·e^(-G): {:.4}", theory);
    }
    if let Some(share) = metrics.percent_of_theoretical_max {
        println!("  Share of 1/e maximum: {:.1}%", share);
    }
    if let Some(theory) = metrics.theoretical_efficiency_percent {
        println!("  Theoretical η = 1/(1+5a): {:.1}%", theory);
    }
    println!();
}

/// Print one line per protocol
pub fn print_comparison(rows: &[ComparisonRow]) {
    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║        Protocol Performance Comparison                ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    println!(
        "  {:<22} {:>5} {:>10} {:>11} {:>12} {:>8}",
        "Protocol", "Runs", "Throughput", "Efficiency", "Utilization", "Theory"
    );
    for row in rows {
        let m = &row.metrics;
        let theory = m
            .theoretical_efficiency_percent
            .map(|t| format!("{:.1}%", t))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<22} {:>5} {:>10.4} {:>10.1}% {:>11.1}% {:>8}",
            row.protocol.to_string(),
            row.runs,
            m.throughput,
            m.efficiency_percent,
            m.channel_utilization_percent,
            theory
        );
    }
    println!();
}

/// Transmissions per record for the first `limit` records
pub fn print_slot_activity(trace: &SimulationTrace, limit: usize) {
    println!("Transmission activity (first {} records):", limit.min(trace.len()));
    for record in trace.head(limit) {
        let mark = match record.outcome {
            SlotOutcome::Idle => '.',
            SlotOutcome::Success => '#',
            SlotOutcome::Collision => 'x',
        };
        println!(
            "  {:>5} {:>9.2}  {:<9} {}",
            record.index,
            record.start,
            record.outcome.to_string(),
            mark.to_string().repeat(record.transmissions().max(1))
        );
    }
    println!();
}

/// Per-node activity for the first `limit` records
///
/// `#` transmitting, `x` collided, `.` idle.
pub fn print_node_timeline(trace: &SimulationTrace, limit: usize) {
    let shown = limit.min(trace.len());
    println!("Node activity (first {} records):", shown);
    for node in 0..trace.num_nodes {
        let line: String = trace
            .node_timeline(node)
            .into_iter()
            .take(shown)
            .map(|activity| match activity {
                NodeActivity::Idle => '.',
                NodeActivity::Transmitting => '#',
                NodeActivity::Collided => 'x',
            })
            .collect();
        println!("  Node {:>3} {}", node, line);
    }
    println!();
}
