use drone_swarm::agent::Agent;
use drone_swarm::note_engine::TRIGGER_SPEED;
use drone_swarm::{notes_for, NoteEngine, NoteEvent};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Chromatic from 60: x = -15 lands on 60, x = -11.25 on 64
const X_FOR_60: f32 = -15.0;
const X_FOR_64: f32 = -11.25;

fn fast_drone(id: usize) -> Agent {
    let mut agent = Agent::at(id, Vec3::new(X_FOR_60, 0.0, 0.0), StdRng::seed_from_u64(0));
    agent.velocity = Vec3::new(0.0, 0.45, 0.0);
    agent
}

fn engine() -> NoteEngine {
    // No controller messages, so only note events are emitted
    NoteEngine::new(StdRng::seed_from_u64(3), 1, 0.0)
}

#[test]
fn test_pitch_change_emits_off_then_on() {
    let notes = notes_for("Chromatic", 60);
    let mut engine = engine();
    let mut agents = vec![fast_drone(5)];
    let mut timeline = Vec::new();

    for tick in 0..4 {
        agents[0].position.x = if tick < 3 { X_FOR_60 } else { X_FOR_64 };
        for event in engine.process(&mut agents, &[true], &notes) {
            timeline.push((tick, event));
        }
    }

    assert_eq!(
        timeline,
        vec![
            (0, NoteEvent::NoteOn { channel: 5, pitch: 60, velocity: 65 }),
            (3, NoteEvent::NoteOff { channel: 5, pitch: 60 }),
            (3, NoteEvent::NoteOn { channel: 5, pitch: 64, velocity: 65 }),
        ]
    );
    assert_eq!(agents[0].held_pitch, Some(64));
}

#[test]
fn test_repeated_pitch_clears_emphasis() {
    let notes = notes_for("Chromatic", 60);
    let mut engine = engine();
    let mut agents = vec![fast_drone(0)];

    engine.process(&mut agents, &[true], &notes);
    assert!(agents[0].emphasized);
    assert!(engine.process(&mut agents, &[true], &notes).is_empty());
    assert!(!agents[0].emphasized);
}

#[test]
fn test_slowing_down_releases() {
    let notes = notes_for("Chromatic", 60);
    let mut engine = engine();
    let mut agents = vec![fast_drone(1)];
    engine.process(&mut agents, &[true], &notes);

    agents[0].velocity = Vec3::new(0.0, TRIGGER_SPEED * 0.5, 0.0);
    let events = engine.process(&mut agents, &[true], &notes);
    assert_eq!(events, vec![NoteEvent::NoteOff { channel: 1, pitch: 60 }]);
    assert_eq!(agents[0].held_pitch, None);
}

#[test]
fn test_silent_stays_silent() {
    let notes = notes_for("Chromatic", 60);
    let mut engine = engine();
    let mut agents = vec![fast_drone(1)];
    for _ in 0..5 {
        assert!(engine.process(&mut agents, &[false], &notes).is_empty());
    }
}

#[test]
fn test_never_two_notes_on_one_channel() {
    let notes = notes_for("Major", 48);
    let mut engine = NoteEngine::new(StdRng::seed_from_u64(8), 1, 0.5);
    let mut agents: Vec<Agent> = (0..12).map(fast_drone).collect();
    let mut sounding = [None::<u8>; 16];

    for step in 0..200usize {
        for (i, agent) in agents.iter_mut().enumerate() {
            agent.position.x = ((step * 7 + i * 13) % 30) as f32 - 15.0;
        }
        let mask: Vec<bool> = (0..agents.len()).map(|i| (step + i) % 4 != 0).collect();

        for event in engine.process(&mut agents, &mask, &notes) {
            let channel = event.channel() as usize;
            match event {
                NoteEvent::NoteOn { pitch, .. } => {
                    assert!(sounding[channel].is_none(), "overlapping note on channel {}", channel);
                    sounding[channel] = Some(pitch);
                }
                NoteEvent::NoteOff { pitch, .. } => {
                    assert_eq!(sounding[channel], Some(pitch));
                    sounding[channel] = None;
                }
                NoteEvent::ControlChange { .. } => {
                    assert!(sounding[channel].is_some());
                }
            }
        }
    }

    for event in NoteEngine::release_all(&mut agents) {
        sounding[event.channel() as usize] = None;
    }
    assert!(sounding.iter().all(Option::is_none));
}
