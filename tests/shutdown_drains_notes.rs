use drone_swarm::{NoteEvent, Swarm, SwarmConfig};
use glam::Vec3;

fn swarm(agent_count: usize) -> Swarm {
    Swarm::new(SwarmConfig {
        agent_count,
        seed: Some(11),
        ..SwarmConfig::default()
    })
}

#[test]
fn test_shutdown_releases_each_held_note() {
    let mut swarm = swarm(2);
    swarm.agents_mut()[0].held_pitch = Some(60);
    swarm.agents_mut()[1].held_pitch = Some(67);

    let events = swarm.shutdown();
    assert_eq!(
        events,
        vec![
            NoteEvent::NoteOff { channel: 0, pitch: 60 },
            NoteEvent::NoteOff { channel: 1, pitch: 67 },
        ]
    );
    assert!(swarm.agents().iter().all(|a| a.held_pitch.is_none()));
    assert!(swarm.shutdown().is_empty());
}

#[test]
fn test_every_note_on_is_eventually_released() {
    let mut swarm = Swarm::new(SwarmConfig {
        agent_count: 20,
        chaos: 0.9,
        formation: "Flock".to_string(),
        rhythm: "Random".to_string(),
        seed: Some(3),
        ..SwarmConfig::default()
    });
    // Keep drones fast enough to sound
    for agent in swarm.agents_mut() {
        agent.velocity = Vec3::new(0.4, 0.2, 0.0);
    }

    let mut on_count = 0;
    let mut off_count = 0;
    for _ in 0..300 {
        for event in swarm.step().events {
            on_count += event.is_note_on() as usize;
            off_count += event.is_note_off() as usize;
        }
    }
    let released = swarm.shutdown();
    off_count += released.len();

    // Every on is matched by exactly one off
    assert_eq!(on_count, off_count);
    assert!(on_count > 0, "swarm never sounded");
    assert!(swarm.agents().iter().all(|a| a.held_pitch.is_none()));
}

#[test]
fn test_resize_down_releases_removed_drones() {
    let mut swarm = swarm(4);
    swarm.agents_mut()[3].held_pitch = Some(72);
    let events = swarm.resize(2);
    assert_eq!(events, vec![NoteEvent::NoteOff { channel: 3, pitch: 72 }]);
    assert_eq!(swarm.agents().len(), 2);

    assert!(swarm.resize(5).is_empty());
    assert_eq!(swarm.agents().len(), 5);
    let ids: Vec<usize> = swarm.agents().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}
