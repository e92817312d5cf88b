use std::fmt;

use serde::Deserialize;

/// Index of a node on the shared medium, `0..num_nodes`
pub type NodeId = usize;

/// Simulated time, measured in slots
pub type SimTime = f64;

/// Medium access protocol variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Protocol {
    /// Discrete slots, every node transmits with probability p per slot
    SlottedAloha,
    /// Sense, transmit as soon as the channel is idle
    OnePersistentCsma,
    /// Sense, on busy wait a random delay before sensing again
    NonPersistentCsma,
    /// Sense, on idle transmit with the persistence probability
    PPersistentCsma,
    /// 1-persistent sensing with collision detection, jam and binary exponential backoff
    CsmaCd,
}

impl Protocol {
    /// All variants in their canonical comparison order
    pub const ALL: [Protocol; 5] = [
        Protocol::SlottedAloha,
        Protocol::OnePersistentCsma,
        Protocol::NonPersistentCsma,
        Protocol::PPersistentCsma,
        Protocol::CsmaCd,
    ];

    /// Carrier sensing variants, the ones driven by a simulated time horizon
    pub fn is_csma(&self) -> bool {
        !matches!(self, Protocol::SlottedAloha)
    }

    /// Collisions are detected and aborted early
    pub fn detects_collisions(&self) -> bool {
        matches!(self, Protocol::CsmaCd)
    }

    /// Short identifier used in CSV output and logs
    pub fn short_name(&self) -> &'static str {
        match self {
            Protocol::SlottedAloha => "slotted-aloha",
            Protocol::OnePersistentCsma => "1-persistent-csma",
            Protocol::NonPersistentCsma => "non-persistent-csma",
            Protocol::PPersistentCsma => "p-persistent-csma",
            Protocol::CsmaCd => "csma-cd",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::SlottedAloha => "Slotted ALOHA",
            Protocol::OnePersistentCsma => "1-Persistent CSMA",
            Protocol::NonPersistentCsma => "Non-Persistent CSMA",
            Protocol::PPersistentCsma => "p-Persistent CSMA",
            Protocol::CsmaCd => "CSMA/CD",
        };
        f.write_str(name)
    }
}

/// Channel state for one slot or transmission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotOutcome {
    Idle,
    Success,
    Collision,
}

impl fmt::Display for SlotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotOutcome::Idle => "Idle",
            SlotOutcome::Success => "Success",
            SlotOutcome::Collision => "Collision",
        };
        f.write_str(name)
    }
}

/// One entry of a simulation trace
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRecord {
    /// Position in the trace
    pub index: usize,

    /// Simulated time at which the slot/attempt began
    pub start: SimTime,

    /// Time consumed by this slot/attempt (1.0 for Slotted ALOHA)
    pub duration: SimTime,

    /// Nodes that transmitted, ascending
    pub attempting: Vec<NodeId>,

    pub outcome: SlotOutcome,
}

impl SlotRecord {
    /// Number of simultaneous transmissions
    pub fn transmissions(&self) -> usize {
        self.attempting.len()
    }

    pub fn end(&self) -> SimTime {
        self.start + self.duration
    }
}

/// What a single node was doing during one trace record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeActivity {
    Idle,
    Transmitting,
    Collided,
}

/// Ordered outcome sequence produced by one simulation run
#[derive(Debug, Clone)]
pub struct SimulationTrace {
    pub protocol: Protocol,

    /// Node count the trace was produced with
    pub num_nodes: usize,

    /// Seed of the random source, when the run was seeded through the config
    pub seed_used: Option<[u8; 32]>,

    pub records: Vec<SlotRecord>,
}

impl SimulationTrace {
    pub fn new(protocol: Protocol, num_nodes: usize) -> Self {
        Self {
            protocol,
            num_nodes,
            seed_used: None,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total simulated time covered by the trace
    pub fn total_time(&self) -> SimTime {
        self.records.iter().map(|r| r.duration).sum()
    }

    /// Time spent in records with the given outcome
    pub fn time_in(&self, outcome: SlotOutcome) -> SimTime {
        self.records
            .iter()
            .filter(|r| r.outcome == outcome)
            .map(|r| r.duration)
            .sum()
    }

    pub fn count(&self, outcome: SlotOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Per-record activity of one node, aligned with `records`
    pub fn node_timeline(&self, node: NodeId) -> Vec<NodeActivity> {
        self.records
            .iter()
            .map(|r| {
                if r.attempting.binary_search(&node).is_err() {
                    NodeActivity::Idle
                } else if r.outcome == SlotOutcome::Collision {
                    NodeActivity::Collided
                } else {
                    NodeActivity::Transmitting
                }
            })
            .collect()
    }

    /// The first `limit` records, for timeline views
    pub fn head(&self, limit: usize) -> &[SlotRecord] {
        &self.records[..limit.min(self.records.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, attempting: Vec<NodeId>, outcome: SlotOutcome) -> SlotRecord {
        SlotRecord {
            index,
            start: index as SimTime,
            duration: 1.0,
            attempting,
            outcome,
        }
    }

    #[test]
    fn test_node_timeline_marks_each_record() {
        let mut trace = SimulationTrace::new(Protocol::SlottedAloha, 3);
        trace.records.push(record(0, vec![], SlotOutcome::Idle));
        trace.records.push(record(1, vec![1], SlotOutcome::Success));
        trace.records.push(record(2, vec![0, 1], SlotOutcome::Collision));

        assert_eq!(
            trace.node_timeline(1),
            vec![
                NodeActivity::Idle,
                NodeActivity::Transmitting,
                NodeActivity::Collided
            ]
        );
        assert_eq!(
            trace.node_timeline(2),
            vec![NodeActivity::Idle, NodeActivity::Idle, NodeActivity::Idle]
        );
    }

    #[test]
    fn test_time_accounting() {
        let mut trace = SimulationTrace::new(Protocol::CsmaCd, 2);
        trace.records.push(SlotRecord {
            index: 0,
            start: 0.0,
            duration: 1.1,
            attempting: vec![0],
            outcome: SlotOutcome::Success,
        });
        trace.records.push(SlotRecord {
            index: 1,
            start: 1.1,
            duration: 0.7,
            attempting: vec![0, 1],
            outcome: SlotOutcome::Collision,
        });

        assert!((trace.total_time() - 1.8).abs() < 1e-12);
        assert!((trace.time_in(SlotOutcome::Success) - 1.1).abs() < 1e-12);
        assert_eq!(trace.count(SlotOutcome::Idle), 0);
        assert_eq!(trace.head(10).len(), 2);
    }

    #[test]
    fn test_protocol_names() {
        assert_eq!(Protocol::CsmaCd.to_string(), "CSMA/CD");
        assert!(!Protocol::SlottedAloha.is_csma());
        assert!(Protocol::CsmaCd.detects_collisions());
        assert!(!Protocol::OnePersistentCsma.detects_collisions());
    }
}
