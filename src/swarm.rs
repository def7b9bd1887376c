//! Swarm
//!
//! Owns the drones, the active formation and rhythm, the clock and the note
//! engine, and runs one frame at a time:
//!
//! 1. advance the clock
//! 2. the formation writes new targets (reading pre-frame positions)
//! 3. every drone integrates its physics
//! 4. on note-check frames only, the rhythm mask is computed and the note
//!    engine runs every drone's voice in index order
//!
//! The swarm never performs IO. `step()` hands back the frame's events and
//! a snapshot; the caller forwards them to a MIDI transport and a renderer.

use crate::agent::Agent;
use crate::clock::SimulationClock;
use crate::config::{clamp_unit, SwarmConfig};
use crate::formation::{Formation, FormationKind};
use crate::note_engine::{NoteEngine, NoteEvent};
use crate::rhythm::{Rhythm, RhythmKind};
use crate::scale::{MidiNote, SCALE_TABLE};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

/// Everything one frame produced
#[derive(Clone, Debug, Serialize)]
pub struct TickOutput {
    pub frame: u64,
    pub events: Vec<NoteEvent>,
    pub snapshot: SwarmSnapshot,
}

/// Read-only view of the swarm for a renderer
#[derive(Clone, Debug, Serialize)]
pub struct SwarmSnapshot {
    pub frame: u64,
    pub formation: &'static str,
    pub rhythm: &'static str,
    pub paused: bool,
    pub view_rotation: f32,
    pub agents: Vec<AgentSnapshot>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentSnapshot {
    pub id: usize,
    pub channel: u8,
    pub position: Vec3,
    pub velocity: Vec3,
    pub target: Vec3,
    pub trail: Vec<Vec3>,
    pub held_pitch: Option<u8>,
    pub emphasized: bool,
    pub hue: f32,
    pub size: f32,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            channel: agent.channel(),
            position: agent.position,
            velocity: agent.velocity,
            target: agent.target,
            trail: agent.trail.iter().copied().collect(),
            held_pitch: agent.held_pitch,
            emphasized: agent.emphasized,
            hue: agent.hue,
            size: agent.display_size(),
        }
    }
}

pub struct Swarm {
    agents: Vec<Agent>,
    formation: Formation,
    rhythm: Rhythm,
    clock: SimulationClock,
    notes: NoteEngine,
    chaos: f32,
    formation_strength: f32,
    scale: String,
    root_note: MidiNote,
    scale_notes: Vec<MidiNote>,
    note_check_interval: u64,
    paused: bool,
    /// Parent stream every child RNG is split from
    seeder: StdRng,
}

impl Swarm {
    pub fn new(config: SwarmConfig) -> Self {
        let config = config.normalized();
        let mut seeder = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let formation = Formation::create(&config.formation, child_rng(&mut seeder));
        let rhythm = Rhythm::create(&config.rhythm, child_rng(&mut seeder));
        let notes = NoteEngine::new(
            child_rng(&mut seeder),
            config.controller,
            config.controller_probability,
        );
        let root_note = config.root_pitch();

        info!(
            "Initializing swarm: {} drones, formation {}, rhythm {}",
            config.agent_count,
            formation.name(),
            rhythm.name()
        );

        let mut swarm = Self {
            agents: Vec::with_capacity(config.agent_count),
            formation,
            rhythm,
            clock: SimulationClock::new(),
            notes,
            chaos: config.chaos,
            formation_strength: config.formation_strength,
            scale_notes: SCALE_TABLE.notes_for(&config.scale, root_note),
            scale: config.scale,
            root_note,
            note_check_interval: config.note_check_interval,
            paused: false,
            seeder,
        };
        swarm.spawn_up_to(config.agent_count);
        swarm
    }

    /// Run one frame
    pub fn step(&mut self) -> TickOutput {
        if self.paused {
            return self.output(Vec::new());
        }

        self.clock.advance();
        let time_factor = self.clock.time_factor();

        self.formation.calculate_targets(&mut self.agents, time_factor);
        for agent in self.agents.iter_mut() {
            agent.update(self.chaos, self.formation_strength);
        }

        let mut events = Vec::new();
        if self.clock.is_note_check(self.note_check_interval) {
            let frame = self.clock.frame_count();
            let mask = self.rhythm.active_mask(self.agents.len(), frame);
            events = self.notes.process(&mut self.agents, &mask, &self.scale_notes);
            if !events.is_empty() {
                debug!("Frame {}: {} note events", frame, events.len());
            }
        }

        self.output(events)
    }

    /// Silence every held note. Call before dropping the swarm.
    pub fn shutdown(&mut self) -> Vec<NoteEvent> {
        let events = NoteEngine::release_all(&mut self.agents);
        info!("Swarm shutdown: released {} held notes", events.len());
        events
    }

    /// Grow or shrink the swarm. Removed drones release their notes.
    pub fn resize(&mut self, agent_count: usize) -> Vec<NoteEvent> {
        let mut events = Vec::new();
        if agent_count < self.agents.len() {
            let mut removed = self.agents.split_off(agent_count);
            events = NoteEngine::release_all(&mut removed);
        } else {
            self.spawn_up_to(agent_count);
        }
        if let Formation::Flock(flock) = &mut self.formation {
            flock.reseed(self.agents.len());
        }
        self.assign_hues();
        info!("Swarm resized to {} drones", self.agents.len());
        events
    }

    fn spawn_up_to(&mut self, agent_count: usize) {
        while self.agents.len() < agent_count {
            let id = self.agents.len();
            let rng = child_rng(&mut self.seeder);
            self.agents.push(Agent::new(id, rng));
        }
        self.assign_hues();
    }

    fn assign_hues(&mut self) {
        let n = self.agents.len() as f32;
        for agent in self.agents.iter_mut() {
            agent.hue = agent.id as f32 / n;
        }
    }

    /// Swap the formation by name; agent state is untouched
    pub fn set_formation(&mut self, name: &str) {
        self.formation = Formation::create(name, child_rng(&mut self.seeder));
        info!("Formation: {}", self.formation.name());
    }

    /// Swap the rhythm by name
    pub fn set_rhythm(&mut self, name: &str) {
        self.rhythm = Rhythm::create(name, child_rng(&mut self.seeder));
        info!("Rhythm: {}", self.rhythm.name());
    }

    pub fn set_scale(&mut self, name: &str) {
        self.scale = name.to_string();
        self.scale_notes = SCALE_TABLE.notes_for(&self.scale, self.root_note);
    }

    pub fn set_root_note(&mut self, root: i32) {
        self.root_note = root.clamp(0, 127) as MidiNote;
        self.scale_notes = SCALE_TABLE.notes_for(&self.scale, self.root_note);
    }

    pub fn set_chaos(&mut self, chaos: f32) {
        self.chaos = clamp_unit(chaos);
    }

    pub fn set_formation_strength(&mut self, strength: f32) {
        self.formation_strength = clamp_unit(strength);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip pause state, returning the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Direct access for callers that place drones themselves
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn formation_kind(&self) -> FormationKind {
        self.formation.kind()
    }

    pub fn rhythm_kind(&self) -> RhythmKind {
        self.rhythm.kind()
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Candidate pitches for the current scale and root
    pub fn scale_notes(&self) -> &[MidiNote] {
        &self.scale_notes
    }

    pub fn snapshot(&self) -> SwarmSnapshot {
        SwarmSnapshot {
            frame: self.clock.frame_count(),
            formation: self.formation.name(),
            rhythm: self.rhythm.name(),
            paused: self.paused,
            view_rotation: self.clock.view_rotation(),
            agents: self.agents.iter().map(AgentSnapshot::from).collect(),
        }
    }

    fn output(&self, events: Vec<NoteEvent>) -> TickOutput {
        TickOutput {
            frame: self.clock.frame_count(),
            events,
            snapshot: self.snapshot(),
        }
    }
}

fn child_rng(seeder: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(seeder.gen())
}
