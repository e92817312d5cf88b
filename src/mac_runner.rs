//! Simulation runner
//!
//! Slotted ALOHA runs `num_slots` independent slots. The CSMA variants run
//! attempt by attempt on a simulated clock until `num_slots` slot-times have
//! been consumed; each attempt starts on an idle channel and lasts as long as
//! the channel is held (see [`attempt_cost`](crate::mac_classifier::attempt_cost)).
//!
//! Node model for the CSMA variants:
//! - every node holds at most one frame; a node without a frame receives one
//!   with probability p at the start of each attempt
//! - a node that became ready while the previous attempt held the channel
//!   sensed it busy, and reacts according to the protocol's persistence rule
//! - colliders back off (binary exponential with collision detection, a
//!   random resensing delay without)

use log::{debug, info, trace};

use crate::mac_classifier::{
    binary_exponential_backoff, classify_attempt, resense_delay, SLOT_TIME,
};
use crate::mac_config::{ConfigError, SimulationConfig};
use crate::mac_interface::{
    NodeId, Protocol, SimTime, SimulationTrace, SlotOutcome, SlotRecord,
};
use crate::mac_random::RandomSource;
use crate::mac_trials::{generate_attempts, generate_attempts_among};

/// Run one simulation of `config` drawing from `rng`
///
/// The configuration is validated first; nothing is simulated if it is
/// rejected.
pub fn run(
    config: &SimulationConfig,
    rng: &mut dyn RandomSource,
) -> Result<SimulationTrace, ConfigError> {
    config.validate()?;
    Ok(MacRunner::new(config, rng).run())
}

/// Per-node state for the carrier sensing variants
#[derive(Debug, Clone, Default)]
struct NodeState {
    /// A frame is waiting to be sent
    has_frame: bool,

    /// Earliest time the node may sense the channel again
    ready_at: SimTime,

    /// Consecutive collisions of the current frame
    collisions: u32,

    /// The frame arrived while the channel was busy
    arrived_busy: bool,
}

/// Drives one run and owns its trace until it is returned
pub struct MacRunner<'a> {
    config: &'a SimulationConfig,
    rng: &'a mut dyn RandomSource,
    nodes: Vec<NodeState>,
    clock: SimTime,
    trace: SimulationTrace,
}

impl<'a> MacRunner<'a> {
    /// Create a runner for an already validated configuration
    pub fn new(config: &'a SimulationConfig, rng: &'a mut dyn RandomSource) -> Self {
        Self {
            config,
            rng,
            nodes: vec![NodeState::default(); config.num_nodes],
            clock: 0.0,
            trace: SimulationTrace::new(config.protocol, config.num_nodes),
        }
    }

    /// Main simulation loop
    pub fn run(mut self) -> SimulationTrace {
        info!(
            "Starting {} simulation: N={} p={} G={:.3} slots={} a={}",
            self.config.protocol,
            self.config.num_nodes,
            self.config.transmission_prob,
            self.config.offered_load(),
            self.config.num_slots,
            self.config.propagation_delay
        );

        if self.config.protocol.is_csma() {
            self.run_csma();
        } else {
            self.run_slotted_aloha();
        }

        info!(
            "{} simulation complete: {} records, {} successes, {} collisions over {:.1} slots",
            self.config.protocol,
            self.trace.len(),
            self.trace.count(SlotOutcome::Success),
            self.trace.count(SlotOutcome::Collision),
            self.clock
        );

        self.trace
    }

    fn push_record(&mut self, attempting: Vec<NodeId>) -> SlotRecord {
        let classification = classify_attempt(&attempting, self.config);
        let record = SlotRecord {
            index: self.trace.len(),
            start: self.clock,
            duration: classification.duration,
            attempting,
            outcome: classification.outcome,
        };
        trace!(
            "record {} t={:.2} {} ({} tx)",
            record.index,
            record.start,
            record.outcome,
            record.transmissions()
        );
        self.clock = record.end();
        self.trace.records.push(record.clone());
        record
    }

    // ------------------------------------------------------------------------
    // Slotted ALOHA
    // ------------------------------------------------------------------------

    fn run_slotted_aloha(&mut self) {
        for _ in 0..self.config.num_slots {
            let attempting = generate_attempts(
                self.config.num_nodes,
                self.config.transmission_prob,
                &mut *self.rng,
            );
            self.push_record(attempting);
        }
    }

    // ------------------------------------------------------------------------
    // Carrier sensing variants
    // ------------------------------------------------------------------------

    fn run_csma(&mut self) {
        let horizon = self.config.num_slots as SimTime;
        // span of the previous attempt when it held the channel
        let mut busy_span: Option<(SimTime, SimTime)> = None;

        while self.clock < horizon {
            self.generate_frames(busy_span.is_some());
            let eligible = self.sense_channel(busy_span);
            let contenders = self.apply_persistence(eligible);

            if contenders.is_empty() {
                self.idle_period();
                busy_span = None;
                continue;
            }

            let record = self.push_record(contenders);
            match record.outcome {
                SlotOutcome::Success => {
                    let node = &mut self.nodes[record.attempting[0]];
                    node.has_frame = false;
                    node.collisions = 0;
                }
                SlotOutcome::Collision => self.resolve_collision(&record),
                SlotOutcome::Idle => {}
            }
            busy_span = Some((record.start, record.end()));
        }
    }

    /// New frames at nodes that have none
    fn generate_frames(&mut self, channel_was_busy: bool) {
        let empty: Vec<NodeId> = (0..self.nodes.len())
            .filter(|&n| !self.nodes[n].has_frame)
            .collect();
        let arrivals =
            generate_attempts_among(&empty, self.config.transmission_prob, &mut *self.rng);

        for node in arrivals {
            let state = &mut self.nodes[node];
            state.has_frame = true;
            state.ready_at = self.clock;
            state.collisions = 0;
            state.arrived_busy = channel_was_busy;
        }
    }

    /// Nodes that found the channel idle and may transmit now
    ///
    /// Non-persistent nodes that sensed the channel busy are rescheduled
    /// after a random delay instead.
    fn sense_channel(&mut self, busy_span: Option<(SimTime, SimTime)>) -> Vec<NodeId> {
        let mut eligible = Vec::new();

        for node in 0..self.nodes.len() {
            let state = &self.nodes[node];
            if !state.has_frame || state.ready_at > self.clock {
                continue;
            }

            let sensed_busy = state.arrived_busy
                || busy_span
                    .map(|(start, end)| state.ready_at > start && state.ready_at < end)
                    .unwrap_or(false);

            if sensed_busy && self.config.protocol == Protocol::NonPersistentCsma {
                let delay = resense_delay(&self.config.sensing, &mut *self.rng);
                let state = &mut self.nodes[node];
                state.ready_at = self.clock + delay as SimTime * SLOT_TIME;
                state.arrived_busy = false;
                continue;
            }

            self.nodes[node].arrived_busy = false;
            eligible.push(node);
        }

        eligible
    }

    fn apply_persistence(&mut self, eligible: Vec<NodeId>) -> Vec<NodeId> {
        if self.config.protocol != Protocol::PPersistentCsma {
            return eligible;
        }
        // deferring nodes stay eligible for the next attempt
        generate_attempts_among(&eligible, self.config.sensing.persistence, &mut *self.rng)
    }

    /// Consume idle channel time
    ///
    /// When every node holds a frame and all of them are waiting out a delay,
    /// no arrival can happen before the earliest wake-up, so the whole gap is
    /// consumed as one idle record.
    fn idle_period(&mut self) {
        let all_waiting = !self.nodes.is_empty()
            && self
                .nodes
                .iter()
                .all(|n| n.has_frame && n.ready_at > self.clock);

        if !all_waiting {
            self.push_record(Vec::new());
            return;
        }

        let wake_up = self
            .nodes
            .iter()
            .map(|n| n.ready_at)
            .fold(SimTime::INFINITY, SimTime::min);

        let record = SlotRecord {
            index: self.trace.len(),
            start: self.clock,
            duration: wake_up - self.clock,
            attempting: Vec::new(),
            outcome: SlotOutcome::Idle,
        };
        trace!(
            "record {} t={:.2} idle gap {:.2}",
            record.index,
            record.start,
            record.duration
        );
        self.clock = wake_up;
        self.trace.records.push(record);
    }

    fn resolve_collision(&mut self, record: &SlotRecord) {
        let end = record.end();

        for &node in &record.attempting {
            let delay = if self.config.protocol.detects_collisions() {
                let collisions = self.nodes[node].collisions.saturating_add(1);
                if collisions == self.config.backoff.max_stages {
                    debug!("node {} reached the widest backoff window", node);
                }
                self.nodes[node].collisions = collisions;
                binary_exponential_backoff(collisions, &self.config.backoff, &mut *self.rng)
            } else {
                resense_delay(&self.config.sensing, &mut *self.rng)
            };

            self.nodes[node].ready_at = end + delay as SimTime * SLOT_TIME;
        }
    }
}
