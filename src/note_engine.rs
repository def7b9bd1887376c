//! Note Engine
//!
//! Turns drone state into MIDI-style note events. Each drone owns one voice
//! on its channel, which is either silent or holding a single pitch:
//!
//! ```text
//! Silent      --gate, pitch p-->  Holding(p)     NoteOn(p)
//! Holding(p)  --gate, pitch p-->  Holding(p)     (nothing)
//! Holding(p)  --gate, pitch q-->  Holding(q)     NoteOff(p), NoteOn(q)
//! Holding(p)  --no gate------->   Silent         NoteOff(p)
//! Silent      --no gate------->   Silent         (nothing)
//! ```
//!
//! The gate is open when the rhythm marks the drone active AND the drone is
//! moving faster than [`TRIGGER_SPEED`]. The two conditions are independent.
//!
//! Voices are tracked per drone, not per channel. Channels wrap at 16, so in
//! a swarm of more than 16 drones two drones can share a channel and sound
//! the same pitch on it at once. A transport that needs one note per channel
//! must merge them itself.

use crate::agent::{Agent, BOUNDARY};
use crate::config::DEFAULT_CONTROLLER;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

/// Drones slower than this never sound
pub const TRIGGER_SPEED: f32 = 0.3;

/// Note velocity range mapped from the Y axis
pub const MIN_VELOCITY: i32 = 30;
pub const MAX_VELOCITY: i32 = 100;

/// A discrete event for the MIDI transport
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoteEvent {
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    NoteOff { channel: u8, pitch: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl NoteEvent {
    pub fn channel(&self) -> u8 {
        match *self {
            NoteEvent::NoteOn { channel, .. }
            | NoteEvent::NoteOff { channel, .. }
            | NoteEvent::ControlChange { channel, .. } => channel,
        }
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, NoteEvent::NoteOn { .. })
    }

    pub fn is_note_off(&self) -> bool {
        matches!(self, NoteEvent::NoteOff { .. })
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteEvent::NoteOn {
                channel,
                pitch,
                velocity,
            } => write!(f, "ch{:<2} on   {:>3} vel {}", channel, pitch, velocity),
            NoteEvent::NoteOff { channel, pitch } => write!(f, "ch{:<2} off  {:>3}", channel, pitch),
            NoteEvent::ControlChange {
                channel,
                controller,
                value,
            } => write!(f, "ch{:<2} cc{} {}", channel, controller, value),
        }
    }
}

/// What a drone's position sounds like
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteMapping {
    pub pitch: u8,
    pub velocity: u8,
    pub controller_value: u8,
}

impl NoteMapping {
    /// X picks the scale degree, Y the velocity, Z the controller value.
    /// Returns `None` only for an empty scale.
    pub fn from_position(position: Vec3, scale_notes: &[u8]) -> Option<Self> {
        let last = scale_notes.len().checked_sub(1)?;

        let index = (unit(position.x) * scale_notes.len() as f32) as i64;
        let index = index.clamp(0, last as i64) as usize;

        let velocity = (unit(position.y) * (MAX_VELOCITY - MIN_VELOCITY) as f32
            + MIN_VELOCITY as f32) as i32;
        let controller_value = (unit(position.z) * 127.0) as i32;

        Some(Self {
            pitch: scale_notes[index],
            velocity: velocity.clamp(MIN_VELOCITY, MAX_VELOCITY) as u8,
            controller_value: controller_value.clamp(0, 127) as u8,
        })
    }
}

/// Map a coordinate in [-B, B] to [0, 1] (unclamped)
fn unit(coord: f32) -> f32 {
    (coord + BOUNDARY) / (2.0 * BOUNDARY)
}

/// Runs the per-drone voice state machine
#[derive(Clone, Debug)]
pub struct NoteEngine {
    rng: StdRng,
    controller: u8,
    controller_probability: f64,
}

impl NoteEngine {
    pub fn new(rng: StdRng, controller: u8, controller_probability: f64) -> Self {
        Self {
            rng,
            controller: controller.min(127),
            controller_probability: if controller_probability.is_nan() {
                0.0
            } else {
                controller_probability.clamp(0.0, 1.0)
            },
        }
    }

    /// Default controller settings with a seeded coin
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), DEFAULT_CONTROLLER, 0.3)
    }

    /// Evaluate every drone once, in index order.
    ///
    /// Drones past the end of `mask` count as inactive.
    pub fn process(&mut self, agents: &mut [Agent], mask: &[bool], scale_notes: &[u8]) -> Vec<NoteEvent> {
        let mut events = Vec::new();

        for (i, agent) in agents.iter_mut().enumerate() {
            let active = mask.get(i).copied().unwrap_or(false);
            let mapping = if active && agent.speed() > TRIGGER_SPEED {
                NoteMapping::from_position(agent.position, scale_notes)
            } else {
                None
            };

            match mapping {
                Some(mapping) => self.sound(agent, mapping, &mut events),
                None => {
                    release(agent, &mut events);
                    agent.emphasized = false;
                }
            }
        }

        events
    }

    fn sound(&mut self, agent: &mut Agent, mapping: NoteMapping, events: &mut Vec<NoteEvent>) {
        if agent.held_pitch == Some(mapping.pitch) {
            agent.emphasized = false;
            return;
        }

        let channel = agent.channel();
        release(agent, events);
        events.push(NoteEvent::NoteOn {
            channel,
            pitch: mapping.pitch,
            velocity: mapping.velocity,
        });
        agent.held_pitch = Some(mapping.pitch);

        if self.rng.gen_bool(self.controller_probability) {
            events.push(NoteEvent::ControlChange {
                channel,
                controller: self.controller,
                value: mapping.controller_value,
            });
        }

        agent.emphasized = true;
    }

    /// Silence every drone that is still holding a note
    pub fn release_all(agents: &mut [Agent]) -> Vec<NoteEvent> {
        let mut events = Vec::new();
        for agent in agents.iter_mut() {
            release(agent, &mut events);
            agent.emphasized = false;
        }
        events
    }
}

/// Holding(p) -> Silent, emitting NoteOff(p)
fn release(agent: &mut Agent, events: &mut Vec<NoteEvent>) {
    if let Some(pitch) = agent.held_pitch.take() {
        events.push(NoteEvent::NoteOff {
            channel: agent.channel(),
            pitch,
        });
    }
}
