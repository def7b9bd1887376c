//! # Drone Swarm - Generative MIDI Swarm Kernel
//!
//! A swarm of drones flies through interchangeable formations inside a
//! `[-15, 15]^3` cube. A rhythm decides which drones may sound on a frame,
//! and each sounding drone's position is quantized to a note in a scale.
//!
//! ## Core Features
//!
//! - **Agent physics**: target seeking, chaos noise, damping, speed clamp and
//!   lossy wall bounces, with a short trail per drone
//! - **Seven formations**: Free, Circle, Spiral, Grid, Wave, Flock (boids) and
//!   Custom (double helix)
//! - **Six rhythms**: Continuous, Alternating, Sequential, Wave, Random and
//!   Polyrhythm
//! - **Ten scales**: Chromatic, Major, Minor, Pentatonic, Blues and the modes
//! - **Stuck-note-free voices**: every drone holds at most one note on its own
//!   channel, always released before the next one starts
//!
//! The kernel performs no IO. A frame returns plain [`NoteEvent`]s for a MIDI
//! transport and a [`SwarmSnapshot`] for a renderer.
//!
//! ## Quick Start
//!
//! ```rust
//! use drone_swarm::{Swarm, SwarmConfig};
//!
//! let mut swarm = Swarm::new(SwarmConfig {
//!     formation: "Spiral".to_string(),
//!     rhythm: "Polyrhythm".to_string(),
//!     seed: Some(7),
//!     ..SwarmConfig::default()
//! });
//!
//! for _ in 0..100 {
//!     let tick = swarm.step();
//!     for event in &tick.events {
//!         // hand to a MIDI transport
//!         let _ = event;
//!     }
//! }
//!
//! // No stuck notes
//! let _release = swarm.shutdown();
//! ```

pub mod agent;
pub mod clock;
pub mod config;
pub mod error;
pub mod formation;
pub mod note_engine;
pub mod rhythm;
pub mod scale;
pub mod swarm;

pub use agent::Agent;
pub use clock::SimulationClock;
pub use config::SwarmConfig;
pub use error::{SwarmError, SwarmResult};
pub use formation::{FlockFormation, Formation, FormationKind, FreeFormation};
pub use note_engine::{NoteEngine, NoteEvent, NoteMapping};
pub use rhythm::{RandomRhythm, Rhythm, RhythmKind};
pub use scale::{notes_for, ScaleTable, SCALE_NAMES, SCALE_TABLE};
pub use swarm::{AgentSnapshot, Swarm, SwarmSnapshot, TickOutput};
