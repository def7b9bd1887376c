use drone_swarm::agent::{BOUNDARY, MAX_SPEED, MAX_TRAIL};
use drone_swarm::{FormationKind, Swarm, SwarmConfig};

fn assert_invariants(swarm: &Swarm, label: &str) {
    for agent in swarm.agents() {
        assert!(
            agent.position.abs().max_element() <= BOUNDARY,
            "{}: drone {} left the cube at {:?}",
            label,
            agent.id,
            agent.position
        );
        assert!(
            agent.speed() <= MAX_SPEED + 1e-5,
            "{}: drone {} too fast ({})",
            label,
            agent.id,
            agent.speed()
        );
        assert!(agent.trail.len() <= MAX_TRAIL);
    }
}

#[test]
fn test_invariants_hold_for_every_formation() {
    for kind in FormationKind::ALL {
        let mut swarm = Swarm::new(SwarmConfig {
            agent_count: 16,
            chaos: 1.0,
            formation_strength: 1.0,
            formation: kind.name().to_string(),
            seed: Some(2024),
            ..SwarmConfig::default()
        });
        for _ in 0..400 {
            swarm.step();
            assert_invariants(&swarm, kind.name());
        }
    }
}

#[test]
fn test_invariants_hold_when_thrown_at_the_walls() {
    let mut swarm = Swarm::new(SwarmConfig {
        agent_count: 8,
        chaos: 0.0,
        formation_strength: 1.0,
        seed: Some(5),
        ..SwarmConfig::default()
    });
    for (i, agent) in swarm.agents_mut().iter_mut().enumerate() {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        agent.position = glam::Vec3::splat(14.9 * sign);
        agent.velocity = glam::Vec3::splat(0.5 * sign);
    }
    for _ in 0..200 {
        swarm.step();
        assert_invariants(&swarm, "walls");
    }
}

#[test]
fn test_trail_fills_to_capacity() {
    let mut swarm = Swarm::new(SwarmConfig {
        agent_count: 3,
        seed: Some(1),
        ..SwarmConfig::default()
    });
    for _ in 0..MAX_TRAIL * 3 {
        swarm.step();
    }
    assert!(swarm.agents().iter().all(|a| a.trail.len() == MAX_TRAIL));
}
