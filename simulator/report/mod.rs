//! Presentation helpers for simulation results
//!
//! Console summaries and CSV export. These consume the library's traces and
//! metrics and are shared by the scenario runner and the examples.

pub mod csv_export;
pub mod summary;

pub use csv_export::{export_comparison, export_trace, CsvExporter};
pub use summary::{print_comparison, print_node_timeline, print_run_summary, print_slot_activity};
