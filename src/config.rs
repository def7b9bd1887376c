//! Swarm Configuration
//!
//! Everything the caller can tune about a swarm. Configs load from TOML
//! (preferred) or JSON, and are normalized at the boundary rather than
//! rejected: the kernel never sees an out-of-range value.

use crate::error::{SwarmError, SwarmResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of drones in a fresh swarm
pub const DEFAULT_AGENT_COUNT: usize = 8;

/// Default tick rate (40 ms per frame)
pub const DEFAULT_TICK_RATE_HZ: f32 = 25.0;

/// Notes are only evaluated every Nth frame
pub const NOTE_CHECK_INTERVAL: u64 = 3;

/// MIDI CC 1 (modulation wheel)
pub const DEFAULT_CONTROLLER: u8 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of drones
    pub agent_count: usize,
    /// Random jitter, 0.0-1.0
    pub chaos: f32,
    /// Pull towards formation targets, 0.0-1.0
    pub formation_strength: f32,
    /// Formation name (unknown names fall back to Circle)
    pub formation: String,
    /// Rhythm name (unknown names fall back to Continuous)
    pub rhythm: String,
    /// Scale name (unknown names fall back to Chromatic)
    pub scale: String,
    /// Root MIDI note of the scale
    pub root_note: i32,
    /// Seed for every random stream; `None` seeds from entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// How often the caller drives `step()`
    pub tick_rate_hz: f32,
    /// Frames between note evaluations
    pub note_check_interval: u64,
    /// Controller number for the occasional CC message
    pub controller: u8,
    /// Chance of a CC message accompanying each new note
    pub controller_probability: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            agent_count: DEFAULT_AGENT_COUNT,
            chaos: 0.3,
            formation_strength: 0.7,
            formation: "Circle".to_string(),
            rhythm: "Continuous".to_string(),
            scale: "Major".to_string(),
            root_note: 60,
            seed: None,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            note_check_interval: NOTE_CHECK_INTERVAL,
            controller: DEFAULT_CONTROLLER,
            controller_probability: 0.3,
        }
    }
}

impl SwarmConfig {
    /// Load from a config file
    pub fn load(path: &Path) -> SwarmResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse from string content
    pub fn parse(content: &str) -> SwarmResult<Self> {
        // Try TOML format first
        let toml_err = match toml::from_str(content) {
            Ok(config) => return Ok(config),
            Err(e) => e,
        };

        // Try JSON format
        if let Ok(config) = serde_json::from_str(content) {
            return Ok(config);
        }

        Err(SwarmError::ConfigParse(toml_err.to_string()))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> SwarmResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Clamp every value into the range the kernel expects
    pub fn normalized(mut self) -> Self {
        self.chaos = clamp_unit(self.chaos);
        self.formation_strength = clamp_unit(self.formation_strength);
        self.root_note = self.root_note.clamp(0, 127);
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            self.tick_rate_hz = DEFAULT_TICK_RATE_HZ;
        }
        self.note_check_interval = self.note_check_interval.max(1);
        self.controller = self.controller.min(127);
        self.controller_probability = if self.controller_probability.is_nan() {
            0.0
        } else {
            self.controller_probability.clamp(0.0, 1.0)
        };
        self
    }

    /// Root note as a MIDI byte
    pub fn root_pitch(&self) -> u8 {
        self.root_note.clamp(0, 127) as u8
    }
}

/// Clamp into [0, 1], mapping NaN to 0
pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
