//! Simulation configuration and up-front validation
//!
//! A [`SimulationConfig`] is checked once, before any slot is simulated. A
//! configuration either passes [`SimulationConfig::validate`] and the run goes
//! to completion, or it is rejected with a single [`ConfigError`].

use serde::Deserialize;
use thiserror::Error;

use crate::mac_interface::{Protocol, SimTime};
use crate::mac_random::entropy_seed;

/// Shortest frame or jam time accepted, in slots
pub const MIN_DURATION: SimTime = 1e-6;

/// Reasons a configuration is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("transmission probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("number of slots must be positive, got {0}")]
    InvalidSlotCount(usize),

    #[error("propagation delay factor must be a finite value >= 0, got {0}")]
    InvalidPropagationDelay(f64),

    #[error("frame transmission time must be a finite value >= 1e-6 slots, got {0}")]
    InvalidFrameTime(f64),

    #[error("jam time must be a finite value >= 1e-6 slots, got {0}")]
    InvalidJamTime(f64),

    #[error("a {duration} slot record cannot advance the clock over a {horizon} slot horizon")]
    InvalidTimeResolution { duration: f64, horizon: usize },

    #[error("invalid backoff configuration: {0}")]
    InvalidBackoff(String),

    #[error("sensing delay range is empty: [{min}, {max}]")]
    InvalidSensingWindow { min: u32, max: u32 },

    #[error("persistence probability must be within [0, 1], got {0}")]
    InvalidPersistence(f64),

    #[error("number of runs must be positive, got {0}")]
    InvalidRunCount(usize),
}

/// Main configuration for one simulation run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of nodes sharing the medium (N)
    pub num_nodes: usize,

    /// Per-node transmission probability (p)
    pub transmission_prob: f64,

    /// Slot count for Slotted ALOHA, simulated time horizon (in slots) for CSMA variants
    pub num_slots: usize,

    pub protocol: Protocol,

    /// Propagation delay factor (a), relative to the frame transmission time
    pub propagation_delay: f64,

    /// Frame transmission time in slots
    pub frame_time: SimTime,

    /// Time the jam signal occupies the channel after a detected collision
    pub jam_time: SimTime,

    /// Binary exponential backoff parameters (CSMA/CD)
    pub backoff: BackoffConfig,

    /// Sensing behaviour of the CSMA variants
    pub sensing: SensingConfig,

    /// Random seed (None = generate random)
    pub seed: Option<[u8; 32]>,
}

/// Binary exponential backoff parameters
///
/// After the k-th consecutive collision a node waits a uniform number of
/// slots in `[0, W(k) - 1]` with
/// `W(k) = initial_window * growth_factor^(min(k, max_stages) - 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Contention window after the first collision, in slots
    pub initial_window: u32,

    /// Window multiplier per consecutive collision
    pub growth_factor: u32,

    /// Number of collisions after which the window stops growing
    pub max_stages: u32,
}

/// Carrier sensing parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SensingConfig {
    /// Lower bound of the random resensing delay, in slots
    pub min_delay: u32,

    /// Upper bound (inclusive) of the random resensing delay, in slots
    pub max_delay: u32,

    /// Probability of transmitting on an idle channel (p-persistent CSMA)
    pub persistence: f64,
}

// ============================================================================
// Default Configurations
// ============================================================================

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_nodes: 10,
            transmission_prob: 0.1,
            num_slots: 1000,
            protocol: Protocol::SlottedAloha,
            propagation_delay: 0.0,
            frame_time: 1.0,
            jam_time: 0.5,
            backoff: BackoffConfig::default(),
            sensing: SensingConfig::default(),
            seed: None,
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_window: 2,
            growth_factor: 2,
            max_stages: 10,
        }
    }
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            min_delay: 2,
            max_delay: 7,
            persistence: 0.4,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

fn is_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl SimulationConfig {
    /// Offered load G = N × p
    pub fn offered_load(&self) -> f64 {
        self.num_nodes as f64 * self.transmission_prob
    }

    /// Same configuration with a different protocol
    pub fn with_protocol(&self, protocol: Protocol) -> Self {
        Self {
            protocol,
            ..self.clone()
        }
    }

    /// Reject configurations that cannot be simulated
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_probability(self.transmission_prob) {
            return Err(ConfigError::InvalidProbability(self.transmission_prob));
        }
        if self.num_slots == 0 {
            return Err(ConfigError::InvalidSlotCount(self.num_slots));
        }
        if !self.propagation_delay.is_finite() || self.propagation_delay < 0.0 {
            return Err(ConfigError::InvalidPropagationDelay(self.propagation_delay));
        }
        if !self.frame_time.is_finite() || self.frame_time < MIN_DURATION {
            return Err(ConfigError::InvalidFrameTime(self.frame_time));
        }
        if !self.jam_time.is_finite() || self.jam_time < MIN_DURATION {
            return Err(ConfigError::InvalidJamTime(self.jam_time));
        }
        // every record must move the clock by more than one ulp of the horizon
        let shortest = self.frame_time.min(self.jam_time).min(1.0);
        if self.num_slots as f64 * f64::EPSILON >= shortest {
            return Err(ConfigError::InvalidTimeResolution {
                duration: shortest,
                horizon: self.num_slots,
            });
        }
        self.backoff.validate()?;
        self.sensing.validate()?;
        Ok(())
    }

    /// Get or generate seed
    pub fn resolve_seed(&self) -> [u8; 32] {
        self.seed.unwrap_or_else(entropy_seed)
    }
}

impl BackoffConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_window == 0 {
            return Err(ConfigError::InvalidBackoff(
                "initial window must be at least 1 slot".to_string(),
            ));
        }
        if self.growth_factor == 0 {
            return Err(ConfigError::InvalidBackoff(
                "growth factor must be at least 1".to_string(),
            ));
        }
        if self.max_stages == 0 {
            return Err(ConfigError::InvalidBackoff(
                "at least one backoff stage is required".to_string(),
            ));
        }
        // the widest window must be representable
        self.growth_factor
            .checked_pow(self.max_stages - 1)
            .and_then(|growth| growth.checked_mul(self.initial_window))
            .ok_or_else(|| {
                ConfigError::InvalidBackoff(format!(
                    "window {} * {}^{} overflows",
                    self.initial_window,
                    self.growth_factor,
                    self.max_stages - 1
                ))
            })?;
        Ok(())
    }
}

impl SensingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay > self.max_delay {
            return Err(ConfigError::InvalidSensingWindow {
                min: self.min_delay,
                max: self.max_delay,
            });
        }
        if !is_probability(self.persistence) {
            return Err(ConfigError::InvalidPersistence(self.persistence));
        }
        Ok(())
    }
}
