//! Slot/attempt classification and channel time costs
//!
//! The outcome rule is the same for every protocol: no transmitter is an
//! idle slot, one is a success, two or more collide. Protocols differ only in
//! how long the attempt holds the channel and how colliders back off.

use crate::mac_config::{BackoffConfig, SensingConfig, SimulationConfig};
use crate::mac_interface::{NodeId, Protocol, SimTime, SlotOutcome};
use crate::mac_random::RandomSource;

/// Length of one slot, the time unit of the simulation
pub const SLOT_TIME: SimTime = 1.0;

/// Outcome of one attempt together with the channel time it consumed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub outcome: SlotOutcome,
    pub duration: SimTime,
}

/// Classify an attempt by the number of transmitting nodes
pub fn classify(attempting: &[NodeId]) -> SlotOutcome {
    match attempting.len() {
        0 => SlotOutcome::Idle,
        1 => SlotOutcome::Success,
        _ => SlotOutcome::Collision,
    }
}

/// Channel time consumed by an attempt with the given outcome
///
/// Slotted ALOHA slots always last one slot. For the CSMA variants an idle
/// sensing slot lasts one slot, a frame holds the channel for its
/// transmission time plus propagation, and a detected collision (CSMA/CD)
/// holds it for the round-trip detection window plus the jam signal.
pub fn attempt_cost(
    outcome: SlotOutcome,
    protocol: Protocol,
    config: &SimulationConfig,
) -> SimTime {
    if !protocol.is_csma() {
        return SLOT_TIME;
    }

    let frame = config.frame_time;
    let propagation = config.propagation_delay * frame;
    match outcome {
        SlotOutcome::Idle => SLOT_TIME,
        SlotOutcome::Success => frame + propagation,
        SlotOutcome::Collision if protocol.detects_collisions() => {
            2.0 * propagation + config.jam_time
        }
        SlotOutcome::Collision => frame + propagation,
    }
}

/// Classify an attempt and price it under `config.protocol`
pub fn classify_attempt(attempting: &[NodeId], config: &SimulationConfig) -> Classification {
    let outcome = classify(attempting);
    Classification {
        outcome,
        duration: attempt_cost(outcome, config.protocol, config),
    }
}

/// Contention window, in slots, after `collisions` consecutive collisions
///
/// Grows by `growth_factor` per collision and stops growing at `max_stages`.
pub fn backoff_window(collisions: u32, backoff: &BackoffConfig) -> u32 {
    let stage = collisions.clamp(1, backoff.max_stages.max(1));
    backoff
        .growth_factor
        .saturating_pow(stage - 1)
        .saturating_mul(backoff.initial_window)
        .max(1)
}

/// Random backoff in slots, uniform over `[0, W - 1]`
pub fn binary_exponential_backoff(
    collisions: u32,
    backoff: &BackoffConfig,
    rng: &mut dyn RandomSource,
) -> u32 {
    rng.uniform_int(0, backoff_window(collisions, backoff) - 1)
}

/// Random delay in slots before a node senses the channel again
pub fn resense_delay(sensing: &SensingConfig, rng: &mut dyn RandomSource) -> u32 {
    rng.uniform_int(sensing.min_delay, sensing.max_delay)
}
