//! CSV export of traces and comparison tables

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use mac_sim::{ComparisonRow, SimulationTrace};

const COMPARISON_HEADER: &str = concat!(
    "protocol,runs,success,collisions,idle,offered_load,throughput,",
    "efficiency_percent,channel_utilization_percent,theoretical_efficiency_percent"
);

/// Writes simulation results as CSV
pub struct CsvExporter<W: Write> {
    writer: W,
}

impl CsvExporter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvExporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// One line per trace record
    pub fn write_trace(&mut self, trace: &SimulationTrace) -> io::Result<()> {
        writeln!(self.writer, "slot,start_time,duration,transmissions,status")?;
        for record in &trace.records {
            writeln!(
                self.writer,
                "{},{:.4},{:.4},{},{}",
                record.index,
                record.start,
                record.duration,
                record.transmissions(),
                record.outcome
            )?;
        }
        Ok(())
    }

    /// Header plus one line per protocol, in row order
    pub fn write_comparison(&mut self, rows: &[ComparisonRow]) -> io::Result<()> {
        writeln!(self.writer, "{}", COMPARISON_HEADER)?;
        for row in rows {
            let m = &row.metrics;
            let theory = m
                .theoretical_efficiency_percent
                .map(|t| format!("{:.3}", t))
                .unwrap_or_default();
            writeln!(
                self.writer,
                "{},{},{},{},{},{:.3},{:.6},{:.3},{:.3},{}",
                row.protocol.short_name(),
                row.runs,
                m.success_count,
                m.collision_count,
                m.idle_count,
                m.offered_load,
                m.throughput,
                m.efficiency_percent,
                m.channel_utilization_percent,
                theory
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub fn export_trace<P: AsRef<Path>>(path: P, trace: &SimulationTrace) -> io::Result<()> {
    let mut exporter = CsvExporter::create(path)?;
    exporter.write_trace(trace)?;
    exporter.flush()
}

pub fn export_comparison<P: AsRef<Path>>(path: P, rows: &[ComparisonRow]) -> io::Result<()> {
    let mut exporter = CsvExporter::create(path)?;
    exporter.write_comparison(rows)?;
    exporter.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mac_sim::{compare_protocols, simulate, Protocol, SimulationConfig, StdRandomSource};

    #[test]
    fn test_trace_csv_has_row_per_record() {
        let config = SimulationConfig {
            num_slots: 25,
            seed: Some([42u8; 32]),
            ..Default::default()
        };
        let (trace, _) = simulate(&config).unwrap();

        let mut exporter = CsvExporter::new(Vec::new());
        exporter.write_trace(&trace).unwrap();
        let csv = String::from_utf8(exporter.into_inner()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 26);
        assert_eq!(lines[0], "slot,start_time,duration,transmissions,status");
        assert!(lines[1].starts_with("0,0.0000,1.0000,"));
    }

    #[test]
    fn test_comparison_csv_keeps_row_order() {
        let base = SimulationConfig {
            num_slots: 100,
            ..Default::default()
        };
        let order = [Protocol::CsmaCd, Protocol::SlottedAloha];
        let mut rng = StdRandomSource::from_seed([1u8; 32]);
        let rows = compare_protocols(&base, &order, &mut rng).unwrap();

        let mut exporter = CsvExporter::new(Vec::new());
        exporter.write_comparison(&rows).unwrap();
        let csv = String::from_utf8(exporter.into_inner()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split(',').count(), 10);
        assert!(lines[0].ends_with(",theoretical_efficiency_percent"));
        assert!(lines[1].starts_with("csma-cd,1,"));
        assert!(lines[2].starts_with("slotted-aloha,1,"));
        assert!(lines[2].ends_with(','), "no CSMA/CD theory value for ALOHA");
    }
}
