//! Formations
//!
//! A formation decides where every drone wants to be on the current frame.
//! It only writes `Agent::target`; the physics step then steers towards it.
//!
//! All formations are stateless except:
//! - `Free`, which owns the random stream it draws new targets from
//! - `Flock`, which keeps its own per-drone velocity across frames

use crate::agent::Agent;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt;

/// Formation name used when a name is not recognised
pub const FALLBACK_FORMATION: FormationKind = FormationKind::Circle;

/// Chance per frame that a free drone picks a new destination
pub const FREE_RETARGET_PROBABILITY: f64 = 0.05;

/// Half-width of the volume free targets are drawn from
pub const FREE_EXTENT: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationKind {
    Free,
    Circle,
    Spiral,
    Grid,
    Wave,
    Flock,
    Custom,
}

impl FormationKind {
    /// All formations in menu order
    pub const ALL: [FormationKind; 7] = [
        FormationKind::Free,
        FormationKind::Circle,
        FormationKind::Spiral,
        FormationKind::Grid,
        FormationKind::Wave,
        FormationKind::Flock,
        FormationKind::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormationKind::Free => "Free",
            FormationKind::Circle => "Circle",
            FormationKind::Spiral => "Spiral",
            FormationKind::Grid => "Grid",
            FormationKind::Wave => "Wave",
            FormationKind::Flock => "Flock",
            FormationKind::Custom => "Custom",
        }
    }

    /// Case-insensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for FormationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The active formation strategy
#[derive(Clone, Debug)]
pub enum Formation {
    Free(FreeFormation),
    Circle,
    Spiral,
    Grid,
    Wave,
    Flock(FlockFormation),
    Custom,
}

impl Formation {
    /// Build a formation; `rng` only feeds the Free formation
    pub fn new(kind: FormationKind, rng: StdRng) -> Self {
        match kind {
            FormationKind::Free => Formation::Free(FreeFormation::new(rng)),
            FormationKind::Circle => Formation::Circle,
            FormationKind::Spiral => Formation::Spiral,
            FormationKind::Grid => Formation::Grid,
            FormationKind::Wave => Formation::Wave,
            FormationKind::Flock => Formation::Flock(FlockFormation::default()),
            FormationKind::Custom => Formation::Custom,
        }
    }

    /// Build by name, falling back to Circle
    pub fn create(name: &str, rng: StdRng) -> Self {
        let kind = FormationKind::from_name(name).unwrap_or_else(|| {
            tracing::debug!("Unknown formation '{}', using {}", name, FALLBACK_FORMATION);
            FALLBACK_FORMATION
        });
        Self::new(kind, rng)
    }

    pub fn kind(&self) -> FormationKind {
        match self {
            Formation::Free(_) => FormationKind::Free,
            Formation::Circle => FormationKind::Circle,
            Formation::Spiral => FormationKind::Spiral,
            Formation::Grid => FormationKind::Grid,
            Formation::Wave => FormationKind::Wave,
            Formation::Flock(_) => FormationKind::Flock,
            Formation::Custom => FormationKind::Custom,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Write a new target into every agent
    pub fn calculate_targets(&mut self, agents: &mut [Agent], time_factor: f32) {
        match self {
            Formation::Free(free) => free.calculate_targets(agents),
            Formation::Circle => circle_targets(agents),
            Formation::Spiral => spiral_targets(agents, time_factor),
            Formation::Grid => grid_targets(agents, time_factor),
            Formation::Wave => wave_targets(agents, time_factor),
            Formation::Flock(flock) => flock.calculate_targets(agents, time_factor),
            Formation::Custom => double_helix_targets(agents, time_factor),
        }
    }
}

/// Drones wander between random destinations
#[derive(Clone, Debug)]
pub struct FreeFormation {
    rng: StdRng,
}

impl FreeFormation {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn calculate_targets(&mut self, agents: &mut [Agent]) {
        for agent in agents.iter_mut() {
            if self.rng.gen_bool(FREE_RETARGET_PROBABILITY) {
                agent.target = Vec3::new(
                    self.rng.gen_range(-FREE_EXTENT..FREE_EXTENT),
                    self.rng.gen_range(-FREE_EXTENT..FREE_EXTENT),
                    self.rng.gen_range(-FREE_EXTENT..FREE_EXTENT),
                );
            }
        }
    }
}

fn circle_targets(agents: &mut [Agent]) {
    let n = agents.len() as f32;
    let radius = 10.0;

    for (i, agent) in agents.iter_mut().enumerate() {
        let angle = i as f32 / n * TAU;
        let y = if i % 2 == 0 { 2.0 } else { -2.0 };
        agent.target = Vec3::new(angle.cos() * radius, y, angle.sin() * radius);
    }
}

fn spiral_targets(agents: &mut [Agent], time_factor: f32) {
    let n = agents.len() as f32;
    let base_radius = 5.0;
    let height = 12.0;

    for (i, agent) in agents.iter_mut().enumerate() {
        let t = i as f32 / n;
        let angle = t * 4.0 * TAU + time_factor;
        let radius = base_radius + t * 5.0;
        agent.target = Vec3::new(
            angle.cos() * radius,
            height * (0.5 - t),
            angle.sin() * radius,
        );
    }
}

fn grid_targets(agents: &mut [Agent], time_factor: f32) {
    let grid_size = (agents.len() as f32).sqrt().ceil().max(1.0) as usize;
    let spacing = 5.0;
    let offset = spacing * (grid_size - 1) as f32 * 0.5;

    for (i, agent) in agents.iter_mut().enumerate() {
        let row = i / grid_size;
        let col = i % grid_size;
        agent.target = Vec3::new(
            spacing * col as f32 - offset,
            2.0 * (time_factor + i as f32 * 0.2).sin(),
            spacing * row as f32 - offset,
        );
    }
}

fn wave_targets(agents: &mut [Agent], time_factor: f32) {
    let divisor = agents.len().saturating_sub(1).max(1) as f32;
    let width = 15.0;
    let depth = 10.0;

    for (i, agent) in agents.iter_mut().enumerate() {
        let t = i as f32 / divisor;
        let phase = time_factor * 0.5 + t * TAU;
        agent.target = Vec3::new(
            width * (t - 0.5),
            3.0 * phase.sin(),
            depth * (0.5 - t) * (phase * 0.5).cos(),
        );
    }
}

/// Two interleaved helices, half the drones on each, half a turn apart
fn double_helix_targets(agents: &mut [Agent], time_factor: f32) {
    let n = agents.len();
    let half = n / 2;
    let radius = 8.0;

    for (i, agent) in agents.iter_mut().enumerate() {
        let t = i as f32 / n as f32;
        let height = 15.0 * (0.5 - t);

        let (offset, local) = if i < half {
            (0.0, i as f32 / half as f32)
        } else {
            (PI, (i - half) as f32 / (n - half) as f32)
        };

        let angle = local * 4.0 * TAU + time_factor + offset;
        agent.target = Vec3::new(angle.cos() * radius, height, angle.sin() * radius);
    }
}

/// Neighbourhood radii and weights for the flocking model
pub const COHESION_RADIUS: f32 = 10.0;
pub const SEPARATION_RADIUS: f32 = 5.0;
pub const ALIGNMENT_RADIUS: f32 = 7.0;
pub const COHESION_WEIGHT: f32 = 0.01;
pub const SEPARATION_WEIGHT: f32 = 0.04;
pub const ALIGNMENT_WEIGHT: f32 = 0.02;

/// Flock speed limit
pub const FLOCK_MAX_SPEED: f32 = 0.3;

/// Beyond this coordinate the flock is nudged back inwards
pub const FLOCK_AVOID_BOUNDARY: f32 = 14.0;
pub const FLOCK_AVOID_STRENGTH: f32 = 0.1;

/// How far ahead along its flock velocity a drone is steered
pub const FLOCK_LOOKAHEAD: f32 = 5.0;

/// Boids-style flocking with cohesion, separation and alignment.
///
/// The velocities here are the flock's own steering state, separate from
/// the physical agent velocity. The cache is reseeded (deterministically
/// from the index) whenever the number of agents changes.
#[derive(Clone, Debug, Default)]
pub struct FlockFormation {
    velocities: Vec<Vec3>,
}

impl FlockFormation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current steering velocities, one per agent
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Reset the steering cache to its initial values for `n` drones
    pub fn reseed(&mut self, n: usize) {
        self.velocities = (0..n)
            .map(|i| {
                let i = i as f32;
                Vec3::new(
                    (i * 0.1).sin() * 0.1,
                    (i * 0.2).cos() * 0.1,
                    (i * 0.3 + 0.5).sin() * 0.1,
                )
            })
            .collect();
    }

    pub fn calculate_targets(&mut self, agents: &mut [Agent], time_factor: f32) {
        if self.velocities.len() != agents.len() {
            self.reseed(agents.len());
        }

        // Pre-integration positions, so every drone sees the same frame
        let positions: Vec<Vec3> = agents.iter().map(|a| a.position).collect();

        for i in 0..positions.len() {
            let here = positions[i];
            let force = self.neighbour_force(i, &positions)
                + wander(time_factor + i as f32 * 0.1)
                + boundary_avoidance(here);

            let mut velocity = self.velocities[i] + force;
            let speed = velocity.length();
            if speed > FLOCK_MAX_SPEED {
                velocity *= FLOCK_MAX_SPEED / speed;
            }
            self.velocities[i] = velocity;

            agents[i].target = here + velocity * FLOCK_LOOKAHEAD;
        }
    }

    fn neighbour_force(&self, i: usize, positions: &[Vec3]) -> Vec3 {
        let here = positions[i];
        let mut cohesion = Vec3::ZERO;
        let mut separation = Vec3::ZERO;
        let mut alignment = Vec3::ZERO;
        let mut cohesion_count = 0usize;
        let mut separation_count = 0usize;
        let mut alignment_count = 0usize;

        for (j, &other) in positions.iter().enumerate() {
            if i == j {
                continue;
            }
            let distance = here.distance(other);

            if distance < COHESION_RADIUS {
                cohesion += other;
                cohesion_count += 1;
            }
            if distance < SEPARATION_RADIUS {
                separation += (here - other) / distance.max(0.1);
                separation_count += 1;
            }
            if distance < ALIGNMENT_RADIUS {
                alignment += self.velocities[j];
                alignment_count += 1;
            }
        }

        let mut force = Vec3::ZERO;
        if cohesion_count > 0 {
            force += (cohesion / cohesion_count as f32 - here) * COHESION_WEIGHT;
        }
        if separation_count > 0 {
            force += separation / separation_count as f32 * SEPARATION_WEIGHT;
        }
        if alignment_count > 0 {
            force += alignment / alignment_count as f32 * ALIGNMENT_WEIGHT;
        }
        force
    }
}

fn wander(t: f32) -> Vec3 {
    Vec3::new(
        t.sin() * 0.02,
        (t * 1.3).cos() * 0.01,
        (t * 0.7).sin() * 0.02,
    )
}

fn boundary_avoidance(position: Vec3) -> Vec3 {
    let mut nudge = Vec3::ZERO;
    for axis in 0..3 {
        if position[axis] > FLOCK_AVOID_BOUNDARY {
            nudge[axis] = -FLOCK_AVOID_STRENGTH;
        } else if position[axis] < -FLOCK_AVOID_BOUNDARY {
            nudge[axis] = FLOCK_AVOID_STRENGTH;
        }
    }
    nudge
}
