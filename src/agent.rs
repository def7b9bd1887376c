//! Drone Agent
//!
//! One simulated drone: position, velocity, the target the active
//! formation wants it at, a short trail for the renderer, and the note it
//! is currently holding on its MIDI channel.
//!
//! Physics per frame: seek the target, add chaos noise, damp, clamp the
//! speed, integrate, then bounce off the walls of the `[-15, 15]^3` cube.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::collections::VecDeque;

/// Maximum number of past positions kept per drone
pub const MAX_TRAIL: usize = 20;

/// Half-width of the cubic flight space
pub const BOUNDARY: f32 = 15.0;

/// Speed clamp applied after damping
pub const MAX_SPEED: f32 = 0.5;

/// Velocity multiplier on a wall bounce
pub const BOUNCE_FACTOR: f32 = -0.7;

/// Per-frame velocity retention
pub const DAMPING: f32 = 0.95;

/// Seek force at full formation strength
pub const SEEK_FORCE: f32 = 0.1;

/// Noise standard deviation at full chaos
pub const NOISE_SCALE: f32 = 0.05;

/// Spawn volume half-width (inside the boundary)
pub const SPAWN_EXTENT: f32 = 10.0;

/// Number of MIDI channels drones are spread across
pub const MIDI_CHANNELS: u8 = 16;

/// Renderer size of a resting drone
pub const BASE_SIZE: f32 = 100.0;

/// Renderer size of a drone that just triggered a note
pub const EMPHASIS_SIZE: f32 = 150.0;

const TARGET_EPSILON: f32 = 1e-3;

#[derive(Clone, Debug)]
pub struct Agent {
    /// Stable index in the swarm
    pub id: usize,
    pub position: Vec3,
    pub velocity: Vec3,
    pub target: Vec3,
    /// Most recent position first
    pub trail: VecDeque<Vec3>,
    /// Pitch currently sounding on this drone's channel
    pub held_pitch: Option<u8>,
    /// Set when this drone triggered a note on the last note check
    pub emphasized: bool,
    /// Display hue in [0, 1)
    pub hue: f32,
    rng: StdRng,
}

impl Agent {
    /// Spawn a drone at a random position with zero velocity
    pub fn new(id: usize, mut rng: StdRng) -> Self {
        let position = Vec3::new(
            rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
            rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
            rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
        );
        Self::at(id, position, rng)
    }

    /// Place a drone at a known position, at rest
    pub fn at(id: usize, position: Vec3, rng: StdRng) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            target: position,
            trail: VecDeque::with_capacity(MAX_TRAIL + 1),
            held_pitch: None,
            emphasized: false,
            hue: 0.0,
            rng,
        }
    }

    /// Convenience constructor with a seeded noise stream
    pub fn seeded(id: usize, seed: u64) -> Self {
        Self::new(id, StdRng::seed_from_u64(seed))
    }

    /// MIDI channel (0-15), fixed by id
    pub fn channel(&self) -> u8 {
        (self.id % MIDI_CHANNELS as usize) as u8
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Size the renderer should draw this drone at
    pub fn display_size(&self) -> f32 {
        if self.emphasized {
            EMPHASIS_SIZE
        } else {
            BASE_SIZE
        }
    }

    /// Integrate one frame of physics
    pub fn update(&mut self, chaos: f32, formation_strength: f32) {
        self.trail.push_front(self.position);
        self.trail.truncate(MAX_TRAIL);

        let to_target = self.target - self.position;
        let distance = to_target.length();
        let direction = if distance > TARGET_EPSILON {
            to_target / distance
        } else {
            Vec3::ZERO
        };
        self.velocity += direction * (SEEK_FORCE * formation_strength);

        let noise = self.noise(chaos);
        self.velocity += noise;

        self.velocity *= DAMPING;

        let speed = self.velocity.length();
        if speed > MAX_SPEED {
            self.velocity *= MAX_SPEED / speed;
        }

        self.position += self.velocity;
        self.enforce_boundaries();
    }

    fn noise(&mut self, chaos: f32) -> Vec3 {
        let std_dev = chaos * NOISE_SCALE;
        if std_dev.is_nan() || std_dev <= 0.0 {
            return Vec3::ZERO;
        }
        match Normal::new(0.0f32, std_dev) {
            Ok(normal) => Vec3::new(
                normal.sample(&mut self.rng),
                normal.sample(&mut self.rng),
                normal.sample(&mut self.rng),
            ),
            Err(_) => Vec3::ZERO,
        }
    }

    /// Bounce off the cube walls, losing some energy
    fn enforce_boundaries(&mut self) {
        for axis in 0..3 {
            let coord = self.position[axis];
            if coord > BOUNDARY {
                self.position[axis] = BOUNDARY - (coord - BOUNDARY);
                self.velocity[axis] *= BOUNCE_FACTOR;
            } else if coord < -BOUNDARY {
                self.position[axis] = -BOUNDARY - (coord + BOUNDARY);
                self.velocity[axis] *= BOUNCE_FACTOR;
            }
        }
    }
}
