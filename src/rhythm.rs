//! Rhythms
//!
//! A rhythm decides which drones are allowed to sound on a given frame.
//! Each returns one flag per drone, in drone order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;

pub const FALLBACK_RHYTHM: RhythmKind = RhythmKind::Continuous;

/// Frames per half-cycle of the alternating rhythm
pub const ALTERNATING_PERIOD: u64 = 30;

/// Frames each drone leads in the sequential rhythm
pub const SEQUENTIAL_STEP: u64 = 10;

/// Phase advance per frame of the wave rhythm
pub const WAVE_SPEED: f32 = 0.05;

/// Frames a random mask is held before it is redrawn
pub const RANDOM_WINDOW: u64 = 20;

/// Chance a drone is active in a random mask
pub const RANDOM_DENSITY: f64 = 0.3;

/// Firing periods of the three polyrhythm groups
pub const POLYRHYTHM_PERIODS: [u64; 3] = [8, 12, 16];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RhythmKind {
    Continuous,
    Alternating,
    Sequential,
    Wave,
    Random,
    Polyrhythm,
}

impl RhythmKind {
    /// All rhythms in menu order
    pub const ALL: [RhythmKind; 6] = [
        RhythmKind::Continuous,
        RhythmKind::Alternating,
        RhythmKind::Sequential,
        RhythmKind::Wave,
        RhythmKind::Random,
        RhythmKind::Polyrhythm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RhythmKind::Continuous => "Continuous",
            RhythmKind::Alternating => "Alternating",
            RhythmKind::Sequential => "Sequential",
            RhythmKind::Wave => "Wave",
            RhythmKind::Random => "Random",
            RhythmKind::Polyrhythm => "Polyrhythm",
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

impl fmt::Display for RhythmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The active rhythm strategy
#[derive(Clone, Debug)]
pub enum Rhythm {
    Continuous,
    Alternating,
    Sequential,
    Wave,
    Random(RandomRhythm),
    Polyrhythm,
}

impl Rhythm {
    /// Build a rhythm; `rng` only feeds the Random rhythm
    pub fn new(kind: RhythmKind, rng: StdRng) -> Self {
        match kind {
            RhythmKind::Continuous => Rhythm::Continuous,
            RhythmKind::Alternating => Rhythm::Alternating,
            RhythmKind::Sequential => Rhythm::Sequential,
            RhythmKind::Wave => Rhythm::Wave,
            RhythmKind::Random => Rhythm::Random(RandomRhythm::new(rng)),
            RhythmKind::Polyrhythm => Rhythm::Polyrhythm,
        }
    }

    /// Build by name, falling back to Continuous
    pub fn create(name: &str, rng: StdRng) -> Self {
        let kind = RhythmKind::from_name(name).unwrap_or_else(|| {
            tracing::debug!("Unknown rhythm '{}', using {}", name, FALLBACK_RHYTHM);
            FALLBACK_RHYTHM
        });
        Self::new(kind, rng)
    }

    pub fn kind(&self) -> RhythmKind {
        match self {
            Rhythm::Continuous => RhythmKind::Continuous,
            Rhythm::Alternating => RhythmKind::Alternating,
            Rhythm::Sequential => RhythmKind::Sequential,
            Rhythm::Wave => RhythmKind::Wave,
            Rhythm::Random(_) => RhythmKind::Random,
            Rhythm::Polyrhythm => RhythmKind::Polyrhythm,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Which of `n` drones may sound on `frame`
    pub fn active_mask(&mut self, n: usize, frame: u64) -> Vec<bool> {
        match self {
            Rhythm::Continuous => vec![true; n],
            Rhythm::Alternating => {
                let even_active = (frame / ALTERNATING_PERIOD) % 2 == 0;
                (0..n).map(|i| (i % 2 == 0) == even_active).collect()
            }
            Rhythm::Sequential => {
                let mut mask = vec![false; n];
                if n > 0 {
                    let active = ((frame / SEQUENTIAL_STEP) % n as u64) as usize;
                    mask[active] = true;
                }
                mask
            }
            Rhythm::Wave => (0..n)
                .map(|i| {
                    let phase = frame as f32 * WAVE_SPEED + i as f32 / n as f32 * TAU;
                    phase.sin() > 0.0
                })
                .collect(),
            Rhythm::Random(random) => random.active_mask(n, frame),
            Rhythm::Polyrhythm => (0..n)
                .map(|i| frame % POLYRHYTHM_PERIODS[i % 3] == 0)
                .collect(),
        }
    }
}

/// Random activation, redrawn once per window and held in between
#[derive(Clone, Debug)]
pub struct RandomRhythm {
    rng: StdRng,
    mask: Vec<bool>,
    window: Option<u64>,
}

impl RandomRhythm {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            mask: Vec::new(),
            window: None,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn active_mask(&mut self, n: usize, frame: u64) -> Vec<bool> {
        let window = frame / RANDOM_WINDOW;
        if self.window != Some(window) || self.mask.len() != n {
            self.window = Some(window);
            self.mask = (0..n).map(|_| self.rng.gen_bool(RANDOM_DENSITY)).collect();
        }
        self.mask.clone()
    }
}
